//! Config command - print the effective configuration

use anyhow::Result;
use foodsearch_core::config::Config;

/// Print the loaded configuration as TOML, or only where it came from
pub fn run(config: &Config, path_only: bool) -> Result<()> {
    if path_only {
        match &config.path {
            Some(path) => println!("{}", path.display()),
            None => println!("(defaults)"),
        }
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
