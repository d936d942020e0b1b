//! Robots command - prints robots.txt

use std::path::Path;

use color_eyre::eyre::Result;
use folio_generator::RobotsGenerator;

use super::load_config;

/// Print the crawler policy to stdout.
pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", RobotsGenerator::new(config.site).policy().to_robots_txt());
    Ok(())
}
