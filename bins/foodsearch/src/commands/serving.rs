//! Serving command - parse a serving-size string

use crate::OutputFormat;
use anyhow::Result;
use foodsearch_engine::parse_serving_size;

/// Parse and print a serving size
pub fn run(raw: &str, format: OutputFormat) -> Result<()> {
    let info = parse_serving_size(Some(raw));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Text => {
            let quantity = info
                .quantity
                .map_or_else(|| "-".to_string(), |q| q.to_string());
            println!("quantity: {quantity}");
            println!("unit:     {}", info.unit.as_deref().unwrap_or("-"));
            println!("original: {raw}");
        }
    }

    Ok(())
}
