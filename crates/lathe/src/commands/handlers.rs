//! Handlers command implementation

use anyhow::Result;
use colored::*;
use lathe::Registry;

pub fn list_handlers(registry: &Registry) -> Result<()> {
    println!("{}", "Registered handlers".bold());
    for visitor in registry.visitors() {
        println!("  {:>6}  {}", visitor.priority().to_string().cyan(), visitor.name());
    }
    Ok(())
}
