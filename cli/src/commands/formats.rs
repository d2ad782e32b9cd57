//! # Pressure Formats Command
//!
//! File: cli/src/commands/formats.rs
//!
//! Prints the formats Pressure recognises, their extensions and what each does
//! with more than one input file.
//!
use crate::common::archive::format::CompressionFormat;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// `pressure formats` takes no arguments.
#[derive(Parser, Debug)]
pub struct FormatsArgs {}

pub async fn handle_formats(_args: FormatsArgs) -> Result<()> {
    info!("Handling formats command...");
    print!("{}", render_table());
    Ok(())
}

fn render_table() -> String {
    let mut table = format!("{:<8}{:<11}{}\n", "FORMAT", "EXTENSION", "MULTIPLE FILES");
    for format in CompressionFormat::ALL {
        table.push_str(&format!(
            "{:<8}{:<11}{}\n",
            format.name(),
            format!(".{}", format.extension()),
            format.multi_file_behaviour()
        ));
    }
    table
}
