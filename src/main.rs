//! CLI entry point for wp-front

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wp_front::WpFront;

#[derive(Parser)]
#[command(name = "wp-front")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "A server-rendered front-end for WordPress vehicle listings", long_about = None)]
struct Cli {
    /// Directory containing _config.yml (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Serve content from a JSON snapshot instead of the WordPress API
    #[arg(short, long, global = true)]
    fixtures: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Render one detail page to stdout
    Render {
        /// Slug of the entry
        slug: String,
    },

    /// Print the head metadata for a slug
    Meta {
        /// Slug of the entry
        slug: String,

        /// Print HTML head tags instead of JSON
        #[arg(short, long)]
        tags: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "wp_front=debug,info"
    } else {
        "wp_front=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let load = || match &cli.fixtures {
        Some(fixtures) => WpFront::with_fixtures(&base_dir, fixtures),
        None => WpFront::new(&base_dir),
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let site = load()?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            wp_front::server::start(&site, &ip, port).await?;
        }

        Commands::Render { slug } => {
            let site = load()?;
            tracing::debug!("Rendering {}", slug);
            wp_front::commands::render::run(&site, &slug)?;
        }

        Commands::Meta { slug, tags } => {
            let site = load()?;
            wp_front::commands::meta::run(&site, &slug, tags)?;
        }

        Commands::Version => {
            println!("wp-front version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
