use clap::Parser;
use miette::Result;
use mrt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => mrt::cli::commands::init::run(args),
        Commands::Equipment(cmd) => mrt::cli::commands::equipment::run(cmd, &global),
        Commands::Craftsman(cmd) => mrt::cli::commands::craftsman::run(cmd, &global),
        Commands::Wo(cmd) => mrt::cli::commands::wo::run(cmd, &global),
        Commands::Report(cmd) => mrt::cli::commands::report::run(cmd, &global),
        Commands::Status(args) => mrt::cli::commands::status::run(args, &global),
        Commands::Completions(args) => mrt::cli::commands::completions::run(args),
    }
}
