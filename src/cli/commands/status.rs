//! `mrt status` command - Project status dashboard

use console::style;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project).map_err(|e| miette::miette!("{}", e))?;

    let by_status = store.work_order_counts_by_status();
    let overdue = store.count_overdue_work_orders();
    let equipment = store.count_equipment();
    let craftsmen = store.count_craftsmen();
    let reports = store.count_reports();
    let attachments = store.count_attachments();
    let attachment_bytes = store.attachments().total_size();

    if global.format == OutputFormat::Json {
        let status = serde_json::json!({
            "equipment": equipment,
            "craftsmen": craftsmen,
            "work_orders": { "by_status": by_status, "overdue": overdue },
            "reports": reports,
            "attachments": { "count": attachments, "bytes": attachment_bytes },
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_default()
        );
        return Ok(());
    }

    let width = 52;
    println!("{}", style("MRT Project Status").bold().underlined());
    println!("{}", "═".repeat(width));

    println!();
    println!("{}", style("WORK ORDERS").bold());
    if by_status.is_empty() {
        println!("  none");
    }
    for group in &by_status {
        println!("  {:<14} {}", group.group, style(group.count).cyan());
    }
    if overdue > 0 {
        println!("  {:<14} {}", "overdue", style(overdue).red().bold());
    }

    println!();
    println!("{}", style("REGISTRY").bold());
    println!("  {:<14} {}", "equipment", style(equipment).cyan());
    println!("  {:<14} {}", "craftsmen", style(craftsmen).cyan());

    println!();
    println!("{}", style("REPORTS").bold());
    println!("  {:<14} {}", "filed", style(reports).cyan());
    println!(
        "  {:<14} {} ({} bytes)",
        "attachments",
        style(attachments).cyan(),
        attachment_bytes
    );

    println!();
    println!("{}", "═".repeat(width));

    Ok(())
}
