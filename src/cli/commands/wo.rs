//! `mrt wo` command - Work order management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, format_short_id, parse_record_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::store::Store;
use crate::entities::{Priority, WorkOrder, WorkOrderStatus};

#[derive(Subcommand, Debug)]
pub enum WoCommands {
    /// List work orders
    List(ListArgs),

    /// Open a new work order
    New(NewArgs),

    /// Show a work order
    Show(ShowArgs),

    /// Transition a work order to a new status
    Status(StatusArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<WorkOrderStatus>,

    /// Filter by minimum priority
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Title
    #[arg(long, short = 't')]
    pub title: String,

    /// Free-text description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Target equipment ID
    #[arg(long, short = 'e')]
    pub equipment: Option<String>,

    /// Assigned craftsman ID
    #[arg(long, short = 'c')]
    pub craftsman: Option<String>,

    /// Priority
    #[arg(long, short = 'p', default_value = "medium")]
    pub priority: Priority,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Work order ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Work order ID
    pub id: String,

    /// New status
    pub status: WorkOrderStatus,
}

pub fn run(cmd: WoCommands, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project).map_err(|e| miette::miette!("{}", e))?;

    match cmd {
        WoCommands::List(args) => run_list(&store, args, global),
        WoCommands::New(args) => run_new(&store, args),
        WoCommands::Show(args) => run_show(&store, args, global),
        WoCommands::Status(args) => run_status(&store, args),
    }
}

fn run_list(store: &Store, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let mut work_orders = store
        .list_work_orders(args.status)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(priority) = args.priority {
        work_orders.retain(|wo| wo.priority >= priority);
    }

    if let Some(limit) = args.limit {
        work_orders.truncate(limit);
    }

    if args.count {
        println!("{}", work_orders.len());
        return Ok(());
    }

    if work_orders.is_empty() {
        println!("No work orders found.");
        return Ok(());
    }

    let format = if global.format == OutputFormat::Auto {
        OutputFormat::Tsv
    } else {
        global.format
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&work_orders).into_diagnostic()?
        ),
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&work_orders).into_diagnostic()?)
        }
        OutputFormat::Csv => {
            println!("id,title,priority,status,due_date,completed_date");
            for wo in &work_orders {
                println!(
                    "{},{},{},{},{},{}",
                    wo.id,
                    escape_csv(&wo.title),
                    wo.priority,
                    wo.status,
                    wo.due_date.map(|d| d.to_string()).unwrap_or_default(),
                    wo.completed_date.map(|d| d.to_string()).unwrap_or_default(),
                );
            }
        }
        OutputFormat::Id => {
            for wo in &work_orders {
                println!("{}", wo.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | Title | Priority | Status | Due |");
            println!("|---|---|---|---|---|");
            for wo in &work_orders {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    format_short_id(&wo.id),
                    wo.title,
                    wo.priority,
                    wo.status,
                    wo.due_date.map(|d| d.to_string()).unwrap_or_default(),
                );
            }
        }
        _ => {
            println!(
                "{:<17} {:<30} {:<10} {:<13} {:<12}",
                style("ID").bold(),
                style("TITLE").bold(),
                style("PRIORITY").bold(),
                style("STATUS").bold(),
                style("DUE").bold()
            );
            println!("{}", "-".repeat(85));
            for wo in &work_orders {
                let priority_styled = match wo.priority {
                    Priority::Critical => style(wo.priority.to_string()).red().bold(),
                    Priority::High => style(wo.priority.to_string()).yellow(),
                    _ => style(wo.priority.to_string()).white(),
                };
                println!(
                    "{:<17} {:<30} {:<10} {:<13} {:<12}",
                    style(format_short_id(&wo.id)).cyan(),
                    truncate_str(&wo.title, 28),
                    priority_styled,
                    wo.status,
                    wo.due_date.map(|d| d.to_string()).unwrap_or_default(),
                );
            }
            println!();
            println!("{} work order(s) found.", style(work_orders.len()).cyan());
        }
    }

    Ok(())
}

fn run_new(store: &Store, args: NewArgs) -> Result<()> {
    let mut work_order = WorkOrder::new(args.title);
    work_order.description = args.description;
    work_order.priority = args.priority;
    work_order.due_date = args.due;
    work_order.notes = args.notes;

    // Referenced records must exist; a dangling assignment helps nobody
    if let Some(ref raw) = args.equipment {
        let id = parse_record_id(raw)?;
        store
            .get_equipment(&id)
            .map_err(|e| miette::miette!("{}", e))?;
        work_order.equipment = Some(id);
    }
    if let Some(ref raw) = args.craftsman {
        let id = parse_record_id(raw)?;
        store
            .get_craftsman(&id)
            .map_err(|e| miette::miette!("{}", e))?;
        work_order.craftsman = Some(id);
    }

    store
        .insert_work_order(&work_order)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Opened work order {}",
        style("✓").green(),
        style(&work_order.id).cyan()
    );
    println!(
        "   {} | {} | {}",
        style(&work_order.title).white(),
        style(&work_order.priority).yellow(),
        work_order.status
    );

    Ok(())
}

fn run_show(store: &Store, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_record_id(&args.id)?;
    let work_order = store
        .get_work_order(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&work_order).into_diagnostic()?
        ),
        _ => print!("{}", serde_yml::to_string(&work_order).into_diagnostic()?),
    }

    Ok(())
}

fn run_status(store: &Store, args: StatusArgs) -> Result<()> {
    let id = parse_record_id(&args.id)?;
    let before = store
        .get_work_order(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    let updated = store
        .update_work_order_status(&id, args.status)
        .map_err(|e| {
            miette::miette!(
                "{}\nAllowed from {}: {}",
                e,
                before.status,
                before
                    .status
                    .allowed_transitions()
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;

    println!(
        "{} {} {} -> {}",
        style("✓").green(),
        style(format_short_id(&updated.id)).cyan(),
        before.status,
        style(updated.status).bold()
    );
    if let Some(date) = updated.completed_date {
        println!("   completed_date: {}", date);
    }

    Ok(())
}
