//! The `eduboost modules` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use eduboost_providers::{builtin_modules, find_module};

use super::common::Format;

pub fn execute(query: Option<String>, format: String) -> Result<()> {
    let format = Format::parse_plain(&format)?;

    let modules = match &query {
        Some(q) => vec![find_module(q).with_context(|| format!("unknown module '{q}'"))?],
        None => builtin_modules(),
    };

    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&modules)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Code", "Module", "Level", "Description"]);
    for m in &modules {
        table.add_row(vec![
            Cell::new(&m.module_code),
            Cell::new(&m.module_name),
            Cell::new(m.level),
            Cell::new(&m.description),
        ]);
    }
    println!("{table}");
    Ok(())
}
