//! Keys command implementation

use anyhow::Result;
use colored::*;
use lathe::config::FLAG_USAGE_KEYS;
use lathe::Configuration;

pub fn list_keys(config: &Configuration) -> Result<()> {
    match config.source() {
        Some(path) => println!("{} {}", "Configuration:".bold(), path.display()),
        None => println!("{} {}", "Configuration:".bold(), "defaults".dimmed()),
    }

    for key in FLAG_USAGE_KEYS {
        let value = match config.get(key) {
            Ok(Some(value)) => value.to_string().green(),
            Ok(None) => "unset".dimmed(),
            Err(e) => e.to_string().red(),
        };
        println!("  {} = {}", key.name().bold(), value);
        println!("      {}", key.description().dimmed());
    }
    Ok(())
}
