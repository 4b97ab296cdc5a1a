use clap::Parser;
use miette::Result;
use pdk::cli::{Cli, Commands, GlobalOpts};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `PDK_LOG=pdk=debug`
const LOG_ENV: &str = "PDK_LOG";

fn init_logging(global: &GlobalOpts) {
    let default = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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
    init_logging(&global);

    match cli.command {
        Commands::Labels(args) => pdk::cli::commands::labels::run(args, &global),
        Commands::Locations(args) => pdk::cli::commands::locations::run(args, &global),
        Commands::Reconcile(args) => pdk::cli::commands::reconcile::run(args, &global),
        Commands::MoveStock(args) => pdk::cli::commands::move_stock::run(args, &global),
        Commands::Pick(args) => pdk::cli::commands::pick::run(args, &global),
        Commands::Parse(args) => pdk::cli::commands::parse::run(args, &global),
        Commands::Resolve(args) => pdk::cli::commands::resolve::run(args, &global),
        Commands::Snapshot(args) => pdk::cli::commands::snapshot::run(args, &global),
        Commands::Completions(args) => pdk::cli::commands::completions::run(args),
    }
}
