//! Folio CLI Library
//!
//! Command implementations behind the `folio` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check, new, sitemap, robots)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use folio::cmd;
//!
//! // Build the site described by folio.toml
//! cmd::build::run(Path::new("folio.toml"), None, None, None).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use folio_core::{Collection, Config};
pub use folio_generator::{BuildStats, Builder, ContentRepository};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// `RUST_LOG` directives are honored on top of the chosen level.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
