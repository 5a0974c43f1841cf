use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::SourceOverrides;

#[derive(Parser)]
#[command(name = "vsop")]
#[command(about = "Live history browser: setlists, rankings, playback links", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> local -> ...)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Fail instead of warn when the config carries keys nothing reads
    #[arg(long, global = true, default_value_t = false)]
    strict_config: bool,

    /// Performances CSV (overrides the configured source)
    #[arg(long, global = true)]
    performances: Option<String>,

    /// Events CSV (overrides the configured source)
    #[arg(long, global = true)]
    events: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Show which column each logical field resolved to
    Columns {
        /// Print the resolved maps and join report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Song ranking by play count
    Songs {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List events
    Events {
        /// Case-insensitive partial match over "<date> <venue> <title>"
        #[arg(long)]
        search: Option<String>,

        /// Only events not yet performed, soonest first
        #[arg(long, default_value_t = false)]
        upcoming: bool,

        /// Sort by date instead of table order
        #[arg(long, default_value_t = false)]
        by_date: bool,
    },

    /// Ordered setlist of one event with playback links
    Setlist {
        /// Event id as written in the events table
        #[arg(long)]
        event: String,
    },

    /// Build a playback link from a video reference
    Link {
        /// Bare id, short link, or full URL
        reference: String,

        /// Start offset in seconds
        #[arg(long, default_value = "0")]
        offset: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    let overrides = SourceOverrides {
        performances: cli.performances,
        events: cli.events,
    };

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = vsop_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Link { reference, offset } => {
            let settings = commands::load_settings(&cli.config_paths, cli.strict_config)?;
            let link = settings.link_synthesizer().build_link(&reference, &offset);
            println!("link={link}");
        }

        Commands::Columns { json } => {
            let settings = commands::load_settings(&cli.config_paths, cli.strict_config)?;
            let catalog = commands::load_catalog(&settings, &overrides).await?;
            commands::browse::print_columns(&catalog, json)?;
        }

        Commands::Songs { limit } => {
            let settings = commands::load_settings(&cli.config_paths, cli.strict_config)?;
            let catalog = commands::load_catalog(&settings, &overrides).await?;
            commands::browse::print_songs(&catalog, limit);
        }

        Commands::Events {
            search,
            upcoming,
            by_date,
        } => {
            let settings = commands::load_settings(&cli.config_paths, cli.strict_config)?;
            let catalog = commands::load_catalog(&settings, &overrides).await?;
            commands::browse::print_events(&catalog, search.as_deref(), upcoming, by_date);
        }

        Commands::Setlist { event } => {
            let settings = commands::load_settings(&cli.config_paths, cli.strict_config)?;
            let catalog = commands::load_catalog(&settings, &overrides).await?;
            commands::browse::print_setlist(&catalog, &settings.link_synthesizer(), &event)?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries only command output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
