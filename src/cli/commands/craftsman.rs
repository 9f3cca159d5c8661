//! `mrt craftsman` command - Craftsman management

use clap::Subcommand;
use console::style;
use dialoguer::Input;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::format_short_id;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::store::Store;
use crate::entities::Craftsman;

#[derive(Subcommand, Debug)]
pub enum CraftsmanCommands {
    /// List craftsmen
    List,

    /// Add a craftsman
    New(NewArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Full name (prompted when omitted)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Trade or specialization
    #[arg(long, short = 't')]
    pub trade: Option<String>,
}

pub fn run(cmd: CraftsmanCommands, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project).map_err(|e| miette::miette!("{}", e))?;

    match cmd {
        CraftsmanCommands::List => run_list(&store, global),
        CraftsmanCommands::New(args) => run_new(&store, args),
    }
}

fn run_list(store: &Store, global: &GlobalOpts) -> Result<()> {
    let craftsmen = store.list_craftsmen().map_err(|e| miette::miette!("{}", e))?;

    if craftsmen.is_empty() {
        println!("No craftsmen found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&craftsmen).into_diagnostic()?
        ),
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&craftsmen).into_diagnostic()?)
        }
        OutputFormat::Id => {
            for craftsman in &craftsmen {
                println!("{}", craftsman.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<26} {:<16}",
                style("ID").bold(),
                style("NAME").bold(),
                style("TRADE").bold()
            );
            println!("{}", "-".repeat(60));
            for craftsman in &craftsmen {
                println!(
                    "{:<17} {:<26} {:<16}",
                    style(format_short_id(&craftsman.id)).cyan(),
                    craftsman.name,
                    craftsman.trade.as_deref().unwrap_or("-"),
                );
            }
        }
    }

    Ok(())
}

fn run_new(store: &Store, args: NewArgs) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Craftsman name")
            .interact_text()
            .into_diagnostic()?,
    };

    let craftsman = Craftsman::new(name, args.trade);
    store
        .insert_craftsman(&craftsman)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Added craftsman {}",
        style("✓").green(),
        style(&craftsman.id).cyan()
    );
    println!("   {}", style(&craftsman.name).white());
    println!(
        "   Set {} to file reports as this craftsman",
        style(format!("MRT_CRAFTSMAN={}", craftsman.id)).yellow()
    );

    Ok(())
}
