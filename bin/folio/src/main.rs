//! Folio CLI
//!
//! Builds the portfolio and blog content into pages, metadata and crawler files.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use folio::Collection;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Content pipeline for a portfolio and blog"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Content collection argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CollectionArg {
    Projects,
    Blog,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Projects => Collection::Projects,
            CollectionArg::Blog => Collection::Blog,
        }
    }
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the site into the output directory
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Content directory (defaults to build.content_dir)
        #[arg(long)]
        content: Option<std::path::PathBuf>,
        /// Override site URL (e.g., https://example.com)
        #[arg(long)]
        url: Option<String>,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Create a new project or post
    New {
        /// Collection to add the document to
        #[arg(value_enum)]
        collection: CollectionArg,
        /// Slug of the new document (e.g., my-first-post)
        slug: String,
        /// Document title (derived from the slug when omitted)
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Print sitemap.xml to stdout
    Sitemap,
    /// Print robots.txt to stdout
    Robots,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            content,
            url,
        } => {
            folio::cmd::build::run(
                &cli.config,
                output.as_deref(),
                content.as_deref(),
                url.as_deref(),
            )?;
        }
        Commands::Check { strict } => {
            folio::cmd::check::run(&cli.config, strict)?;
        }
        Commands::New {
            collection,
            slug,
            title,
        } => {
            folio::cmd::new::run(&cli.config, collection.into(), &slug, title.as_deref())?;
        }
        Commands::Sitemap => {
            folio::cmd::sitemap::run(&cli.config)?;
        }
        Commands::Robots => {
            folio::cmd::robots::run(&cli.config)?;
        }
    }

    Ok(())
}
