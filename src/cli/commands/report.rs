//! `mrt report` command - Maintenance report management
//!
//! `report new` drives the form engine from one of two shells: an interactive
//! schema-driven prompt loop, or repeatable `--set`/`--row` flags for
//! scripted use. Both feed the same engine and hit the same validation.

use std::path::PathBuf;

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_short_id, parse_record_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::identity::RecordId;
use crate::core::project::Project;
use crate::core::store::{NewReport, Store};
use crate::report::form::{parse_value, Severity};
use crate::report::schema::FieldKind;
use crate::report::{render, FormEngine};
use crate::schema::PayloadValidator;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// List maintenance reports
    List(ListArgs),

    /// File a maintenance report against a work order
    New(NewArgs),

    /// Show a report, rendered or raw
    Show(ShowArgs),

    /// Validate stored report payloads against the document schema
    Validate(ValidateArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by craftsman ID
    #[arg(long, short = 'c')]
    pub craftsman: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Work order ID to file against
    pub work_order: String,

    /// Craftsman ID (defaults to the configured craftsman)
    #[arg(long, short = 'c')]
    pub craftsman: Option<String>,

    /// Fill the form interactively
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Set a field, section.key=value (repeatable)
    #[arg(long = "set", value_name = "SECTION.KEY=VALUE")]
    pub set: Vec<String>,

    /// Append a row, section.table=col|col|... (repeatable)
    #[arg(long = "row", value_name = "SECTION.TABLE=V|V|...")]
    pub row: Vec<String>,

    /// Attach a file (repeatable)
    #[arg(long = "attach", value_name = "PATH")]
    pub attach: Vec<PathBuf>,

    /// Free-text comments
    #[arg(long)]
    pub comments: Option<String>,

    /// Proceed past non-blocking warnings without confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Report ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Report ID (all reports when omitted)
    pub id: Option<String>,
}

pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let mut store = Store::open(&project).map_err(|e| miette::miette!("{}", e))?;

    match cmd {
        ReportCommands::List(args) => run_list(&store, args, global),
        ReportCommands::New(args) => run_new(&mut store, args),
        ReportCommands::Show(args) => run_show(&store, args, global),
        ReportCommands::Validate(args) => run_validate(&store, args),
    }
}

fn run_list(store: &Store, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let mut reports = store.list_reports().map_err(|e| miette::miette!("{}", e))?;

    if let Some(ref craftsman) = args.craftsman {
        reports.retain(|r| r.craftsman.to_string() == *craftsman);
    }

    if let Some(limit) = args.limit {
        reports.truncate(limit);
    }

    if args.count {
        println!("{}", reports.len());
        return Ok(());
    }

    if reports.is_empty() {
        println!("No reports found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&reports).into_diagnostic()?
        ),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&reports).into_diagnostic()?),
        OutputFormat::Id => {
            for report in &reports {
                println!("{}", report.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<17} {:<17} {:<12} {:<20}",
                style("ID").bold(),
                style("WORK ORDER").bold(),
                style("CRAFTSMAN").bold(),
                style("TYPE").bold(),
                style("DATE").bold()
            );
            println!("{}", "-".repeat(85));
            for report in &reports {
                let maintenance_type = report
                    .report_data
                    .pointer("/general/maintenance_type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("-")
                    .to_string();
                println!(
                    "{:<17} {:<17} {:<17} {:<12} {:<20}",
                    style(format_short_id(&report.id)).cyan(),
                    format_short_id(&report.work_order),
                    format_short_id(&report.craftsman),
                    truncate_str(&maintenance_type, 10),
                    report.report_date.format("%Y-%m-%d %H:%M"),
                );
            }
            println!();
            println!("{} report(s) found.", style(reports.len()).cyan());
        }
    }

    Ok(())
}

fn run_new(store: &mut Store, args: NewArgs) -> Result<()> {
    let work_order_id = parse_record_id(&args.work_order)?;
    let work_order = store
        .get_work_order(&work_order_id)
        .map_err(|e| miette::miette!("{}", e))?;

    let equipment_id = work_order.equipment.clone().ok_or_else(|| {
        miette::miette!(
            "work order {} has no target equipment; a report needs one",
            work_order_id
        )
    })?;
    let equipment = store
        .get_equipment(&equipment_id)
        .map_err(|e| miette::miette!("{}", e))?;

    let craftsman_id = resolve_craftsman(args.craftsman.as_deref())?;
    let craftsman = store
        .get_craftsman(&craftsman_id)
        .map_err(|e| miette::miette!("{}", e))?;

    // Friendly early rejection; the UNIQUE constraint still guards the race
    if let Some(existing) = store
        .get_report_for_work_order(&work_order_id)
        .map_err(|e| miette::miette!("{}", e))?
    {
        return Err(miette::miette!(
            "work order {} already has report {}",
            format_short_id(&work_order_id),
            existing.id
        ));
    }

    let mut engine = FormEngine::new(&work_order, &equipment, &craftsman);
    println!(
        "{} Filing report for {} ({} form)",
        style("◆").cyan(),
        style(&work_order.title).bold(),
        style(engine.category()).yellow()
    );

    let mut comments = args.comments.clone();
    if args.interactive {
        comments = run_wizard(&mut engine, comments)?;
    } else {
        apply_flags(&mut engine, &args)?;
    }

    // Blocking issues abort; warnings need an explicit go-ahead
    let issues = engine.validate();
    for issue in issues.iter().filter(|i| i.severity == Severity::Error) {
        eprintln!(
            "{} [{}] {}",
            style("✗").red(),
            issue.section,
            issue.message
        );
    }
    if issues.iter().any(|i| i.severity == Severity::Error) {
        return Err(miette::miette!("report validation failed"));
    }

    let warnings: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .collect();
    if !warnings.is_empty() && !args.yes {
        for warning in &warnings {
            eprintln!(
                "{} [{}] {}",
                style("!").yellow(),
                warning.section,
                warning.message
            );
        }
        if args.interactive {
            let proceed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Continue anyway?")
                .default(false)
                .interact()
                .into_diagnostic()?;
            if !proceed {
                return Err(miette::miette!("submission cancelled"));
            }
        } else {
            return Err(miette::miette!(
                "submission needs confirmation; re-run with --yes to proceed"
            ));
        }
    }

    let document = engine.collect().map_err(|e| miette::miette!("{}", e))?;

    let report = store
        .create_report(NewReport {
            work_order: &work_order_id,
            equipment: &equipment_id,
            craftsman: &craftsman_id,
            document: &document,
            comments: comments.as_deref(),
            attachments: &args.attach,
        })
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Filed report {}",
        style("✓").green(),
        style(&report.id).cyan()
    );
    println!(
        "   Work order {} is now {}",
        format_short_id(&work_order_id),
        style("completed").green()
    );
    if !args.attach.is_empty() {
        println!("   {} attachment(s) stored", args.attach.len());
    }

    Ok(())
}

fn resolve_craftsman(flag: Option<&str>) -> Result<RecordId> {
    let config = Config::load();
    let raw = flag
        .map(String::from)
        .or_else(|| config.craftsman().map(String::from))
        .ok_or_else(|| {
            miette::miette!(
                "no craftsman identity; pass --craftsman or set 'craftsman' in .mrt/config.yaml"
            )
        })?;
    parse_record_id(&raw)
}

/// Apply `--set section.key=value` and `--row section.table=a|b|c` flags
fn apply_flags(engine: &mut FormEngine, args: &NewArgs) -> Result<()> {
    for pair in &args.set {
        let (path, value) = pair
            .split_once('=')
            .ok_or_else(|| miette::miette!("--set expects SECTION.KEY=VALUE, got '{}'", pair))?;
        let (section, key) = path
            .split_once('.')
            .ok_or_else(|| miette::miette!("--set expects SECTION.KEY=VALUE, got '{}'", pair))?;
        engine
            .set_field(section, key, value)
            .map_err(|e| miette::miette!("--set {}: {}", path, e))?;
    }

    for pair in &args.row {
        let (path, values) = pair
            .split_once('=')
            .ok_or_else(|| miette::miette!("--row expects SECTION.TABLE=V|V|..., got '{}'", pair))?;
        let (section, table) = path
            .split_once('.')
            .ok_or_else(|| miette::miette!("--row expects SECTION.TABLE=V|V|..., got '{}'", pair))?;
        let columns: Vec<String> = values.split('|').map(|v| v.trim().to_string()).collect();
        engine
            .push_row(section, table, &columns)
            .map_err(|e| miette::miette!("--row {}: {}", path, e))?;
    }

    Ok(())
}

/// Interactive schema-driven prompt loop
fn run_wizard(engine: &mut FormEngine, comments: Option<String>) -> Result<Option<String>> {
    let theme = ColorfulTheme::default();

    for section in engine.sections() {
        println!();
        println!("{} {}", style("◆").cyan(), style(section.title).bold());
        println!("{}", style("─".repeat(50)).dim());

        for field in section.fields {
            let raw = prompt_field(&theme, field)?;
            if let Some(raw) = raw {
                // Inputs are pre-validated by the prompt, so this only
                // trips on logic drift between prompt and engine
                engine
                    .set_field(section.key, field.key, &raw)
                    .map_err(|e| miette::miette!("{}.{}: {}", section.key, field.key, e))?;
            }
        }

        for table in section.tables {
            for _ in 0..table.max_rows {
                let add = Confirm::with_theme(&theme)
                    .with_prompt(format!("Add a row to {}?", table.title))
                    .default(false)
                    .interact()
                    .into_diagnostic()?;
                if !add {
                    break;
                }
                let mut values = Vec::with_capacity(table.columns.len());
                for column in table.columns {
                    values.push(prompt_field(&theme, column)?.unwrap_or_default());
                }
                engine
                    .push_row(section.key, table.key, &values)
                    .map_err(|e| miette::miette!("{}.{}: {}", section.key, table.key, e))?;
            }
        }
    }

    println!();
    let comments = match comments {
        Some(comments) => Some(comments),
        None => {
            let text: String = Input::with_theme(&theme)
                .with_prompt("Additional comments")
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;
            if text.is_empty() { None } else { Some(text) }
        }
    };

    Ok(comments)
}

/// Prompt for one field; None means "leave the seeded default"
fn prompt_field(
    theme: &ColorfulTheme,
    field: &'static crate::report::FieldSpec,
) -> Result<Option<String>> {
    let prompt = field.label.to_string();

    match field.kind {
        FieldKind::Bool => {
            let checked = Confirm::with_theme(theme)
                .with_prompt(&prompt)
                .default(false)
                .interact()
                .into_diagnostic()?;
            Ok(Some(if checked { "yes" } else { "no" }.to_string()))
        }
        FieldKind::Choice(options) => {
            let default_idx = field
                .default
                .and_then(|d| options.iter().position(|o| *o == d))
                .unwrap_or(0);
            let selection = Select::with_theme(theme)
                .with_prompt(&prompt)
                .items(options)
                .default(default_idx)
                .interact()
                .into_diagnostic()?;
            Ok(Some(options[selection].to_string()))
        }
        FieldKind::Text | FieldKind::LongText => {
            let value: String = Input::with_theme(theme)
                .with_prompt(&prompt)
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;
            Ok(Some(value))
        }
        FieldKind::Integer { unit, .. } | FieldKind::Decimal { unit, .. } => {
            let prompt = match unit {
                Some(unit) => format!("{} ({})", prompt, unit),
                None => prompt,
            };
            let value: String = Input::with_theme(theme)
                .with_prompt(&prompt)
                .default(field.default.unwrap_or("0").to_string())
                .validate_with(|input: &String| {
                    parse_value(field, input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .into_diagnostic()?;
            Ok(Some(value))
        }
        FieldKind::Date => {
            let value: String = Input::with_theme(theme)
                .with_prompt(&prompt)
                .default(chrono::Local::now().date_naive().to_string())
                .validate_with(|input: &String| {
                    parse_value(field, input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .into_diagnostic()?;
            Ok(Some(value))
        }
        FieldKind::Time => {
            let value: String = Input::with_theme(theme)
                .with_prompt(&prompt)
                .default(chrono::Local::now().format("%H:%M").to_string())
                .validate_with(|input: &String| {
                    parse_value(field, input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .into_diagnostic()?;
            Ok(Some(value))
        }
    }
}

fn run_show(store: &Store, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_record_id(&args.id)?;
    let report = store.get_report(&id).map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            );
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    // Rendered view
    println!(
        "{} Maintenance Report {}",
        style("◆").cyan(),
        style(&report.id).bold()
    );
    println!(
        "Work order: {}   Equipment: {}",
        format_short_id(&report.work_order),
        format_short_id(&report.equipment)
    );
    let craftsman_line = match store.get_craftsman(&report.craftsman) {
        Ok(craftsman) => craftsman.name,
        Err(_) => report.craftsman.to_string(),
    };
    println!(
        "Craftsman: {}   Date: {}",
        craftsman_line,
        report.report_date.format("%Y-%m-%d %H:%M")
    );

    for section in render(&report.report_data) {
        println!();
        println!("{}", style(&section.title).bold().underlined());
        for (label, value) in &section.fields {
            println!("  {:<38} {}", format!("{}:", label), value);
        }
    }

    if let Some(ref comments) = report.comments {
        println!();
        println!("{}", style("Comments").bold().underlined());
        println!("  {}", comments);
    }

    let attachments = store
        .list_attachments(&report.id)
        .map_err(|e| miette::miette!("{}", e))?;
    if !attachments.is_empty() {
        println!();
        println!("{}", style("Attachments").bold().underlined());
        for attachment in &attachments {
            println!(
                "  {} ({} bytes, {})",
                attachment.filename,
                attachment.file_size,
                attachment.file_type.as_deref().unwrap_or("unknown"),
            );
        }
    }

    Ok(())
}

fn run_validate(store: &Store, args: ValidateArgs) -> Result<()> {
    let validator = PayloadValidator::new().map_err(|e| miette::miette!("{}", e))?;

    let reports = match args.id {
        Some(ref raw) => {
            let id = parse_record_id(raw)?;
            vec![store.get_report(&id).map_err(|e| miette::miette!("{}", e))?]
        }
        None => store.list_reports().map_err(|e| miette::miette!("{}", e))?,
    };

    if reports.is_empty() {
        println!("No reports to validate.");
        return Ok(());
    }

    let mut invalid = 0;
    for report in &reports {
        let violations = validator.validate(&report.report_data);
        if violations.is_empty() {
            println!("{} {}", style("✓").green(), format_short_id(&report.id));
        } else {
            invalid += 1;
            println!("{} {}", style("✗").red(), format_short_id(&report.id));
            for violation in &violations {
                let path = if violation.path.is_empty() {
                    "(root)".to_string()
                } else {
                    violation.path.clone()
                };
                println!("    {} {}", style(path).dim(), violation.message);
            }
        }
    }

    if invalid > 0 {
        Err(miette::miette!(
            "{} of {} report payload(s) failed validation",
            invalid,
            reports.len()
        ))
    } else {
        println!(
            "{} report payload(s) conform to the document schema.",
            reports.len()
        );
        Ok(())
    }
}
