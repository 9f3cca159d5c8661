//! `mrt equipment` command - Equipment registry management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use dialoguer::Input;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, format_short_id, parse_record_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::store::Store;
use crate::entities::Equipment;
use crate::report::classify;

#[derive(Subcommand, Debug)]
pub enum EquipmentCommands {
    /// List equipment
    List(ListArgs),

    /// Register new equipment
    New(NewArgs),

    /// Show an equipment record
    Show(ShowArgs),

    /// Classify equipment into a report category
    Classify(ClassifyArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by explicit category tag
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in name, model, and location
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Equipment name (prompted when omitted)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Manufacturer
    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Model designation
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Serial number
    #[arg(long)]
    pub serial: Option<String>,

    /// Physical location
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Installation date (YYYY-MM-DD)
    #[arg(long)]
    pub installed: Option<NaiveDate>,

    /// Operational status
    #[arg(long)]
    pub status: Option<String>,

    /// Explicit category tag (mechanical, electrical, hvac, plumbing)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Custom metadata, key=value (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Equipment ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Equipment ID
    pub id: String,

    /// Persist the inferred category as the explicit tag
    #[arg(long)]
    pub save: bool,
}

pub fn run(cmd: EquipmentCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        EquipmentCommands::List(args) => run_list(args, global),
        EquipmentCommands::New(args) => run_new(args),
        EquipmentCommands::Show(args) => run_show(args, global),
        EquipmentCommands::Classify(args) => run_classify(args),
    }
}

fn open_store() -> Result<Store> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    Store::open(&project).map_err(|e| miette::miette!("{}", e))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store()?;
    let mut equipment = store.list_equipment().map_err(|e| miette::miette!("{}", e))?;

    if let Some(ref category) = args.category {
        let category = category.to_lowercase();
        equipment.retain(|e| {
            e.category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(&category))
        });
    }

    if let Some(ref search) = args.search {
        let search = search.to_lowercase();
        equipment.retain(|e| {
            e.name.to_lowercase().contains(&search)
                || e.model
                    .as_deref()
                    .is_some_and(|m| m.to_lowercase().contains(&search))
                || e.location
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(&search))
        });
    }

    if let Some(limit) = args.limit {
        equipment.truncate(limit);
    }

    if args.count {
        println!("{}", equipment.len());
        return Ok(());
    }

    if equipment.is_empty() {
        println!("No equipment found.");
        return Ok(());
    }

    let format = if global.format == OutputFormat::Auto {
        OutputFormat::Tsv
    } else {
        global.format
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&equipment).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&equipment).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            println!("id,name,model,location,category,status");
            for eq in &equipment {
                println!(
                    "{},{},{},{},{},{}",
                    eq.id,
                    escape_csv(&eq.name),
                    escape_csv(eq.model.as_deref().unwrap_or_default()),
                    escape_csv(eq.location.as_deref().unwrap_or_default()),
                    eq.category.as_deref().unwrap_or_default(),
                    eq.status.as_deref().unwrap_or_default(),
                );
            }
        }
        OutputFormat::Id => {
            for eq in &equipment {
                println!("{}", eq.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Model | Location | Category | Status |");
            println!("|---|---|---|---|---|---|");
            for eq in &equipment {
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    format_short_id(&eq.id),
                    eq.name,
                    eq.model.as_deref().unwrap_or_default(),
                    eq.location.as_deref().unwrap_or_default(),
                    eq.category.as_deref().unwrap_or_default(),
                    eq.status.as_deref().unwrap_or_default(),
                );
            }
        }
        _ => {
            println!(
                "{:<17} {:<26} {:<14} {:<16} {:<12} {:<10}",
                style("ID").bold(),
                style("NAME").bold(),
                style("MODEL").bold(),
                style("LOCATION").bold(),
                style("CATEGORY").bold(),
                style("STATUS").bold()
            );
            println!("{}", "-".repeat(98));
            for eq in &equipment {
                println!(
                    "{:<17} {:<26} {:<14} {:<16} {:<12} {:<10}",
                    style(format_short_id(&eq.id)).cyan(),
                    truncate_str(&eq.name, 24),
                    truncate_str(eq.model.as_deref().unwrap_or("-"), 12),
                    truncate_str(eq.location.as_deref().unwrap_or("-"), 14),
                    eq.category.as_deref().unwrap_or("-"),
                    eq.status.as_deref().unwrap_or("-"),
                );
            }
            println!();
            println!("{} equipment record(s) found.", style(equipment.len()).cyan());
        }
    }

    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let store = open_store()?;

    let name = match args.name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Equipment name")
            .interact_text()
            .into_diagnostic()?,
    };

    let mut equipment = Equipment::new(name);
    equipment.manufacturer = args.manufacturer;
    equipment.model = args.model;
    equipment.serial_number = args.serial;
    equipment.location = args.location;
    equipment.installation_date = args.installed;
    equipment.status = args.status;
    equipment.category = args.category;

    for pair in &args.meta {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| miette::miette!("--meta expects KEY=VALUE, got '{}'", pair))?;
        equipment.custom_fields.insert(
            key.trim().to_string(),
            serde_json::Value::String(value.trim().to_string()),
        );
    }

    store
        .insert_equipment(&equipment)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Registered equipment {}",
        style("✓").green(),
        style(&equipment.id).cyan()
    );
    println!(
        "   {} | {}",
        style(&equipment.name).white(),
        style(classify(&equipment)).yellow()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store()?;
    let id = parse_record_id(&args.id)?;
    let equipment = store
        .get_equipment(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&equipment).into_diagnostic()?
        ),
        _ => print!("{}", serde_yml::to_string(&equipment).into_diagnostic()?),
    }

    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let store = open_store()?;
    let id = parse_record_id(&args.id)?;
    let equipment = store
        .get_equipment(&id)
        .map_err(|e| miette::miette!("{}", e))?;

    let category = classify(&equipment);
    println!("{}", category);

    if args.save {
        store
            .set_equipment_category(&id, category.key())
            .map_err(|e| miette::miette!("{}", e))?;
        println!(
            "{} Saved category tag on {}",
            style("✓").green(),
            style(&id).cyan()
        );
    }

    Ok(())
}
