//! `trice check` — print the ID list.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use trice_core::{Item, Registry, RegistryError};

use super::absolute;

/// Arguments for `trice check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// ID list path.
    #[arg(long, default_value = "til.json")]
    pub list: PathBuf,

    /// Only show call sites present in source.
    #[arg(long)]
    pub active: bool,

    /// Emit the (filtered) list as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: u16,
    #[tabled(rename = "TYPE")]
    fmt_type: String,
    #[tabled(rename = "FORMAT")]
    fmt_strg: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "REMOVED")]
    removed: String,
}

impl ItemRow {
    fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.get(),
            fmt_type: item.fmt_type.clone(),
            fmt_strg: item.fmt_strg.clone(),
            created: format_unix(item.created),
            removed: if item.is_active() {
                "-".to_string()
            } else {
                format_unix(item.removed)
            },
        }
    }
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let list = absolute(&self.list)?;
        let Some(registry) = load_soft(&list)? else {
            return Ok(());
        };

        let items: Vec<&Item> = registry
            .iter()
            .filter(|i| !self.active || i.is_active())
            .collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&items).context("failed to serialize ID list")?
            );
            return Ok(());
        }

        println!(
            "{} | {} items | {} active | {} removed",
            list.display().to_string().bold(),
            registry.len(),
            registry.active_count().to_string().green(),
            (registry.len() - registry.active_count()).to_string().bright_black(),
        );
        if items.is_empty() {
            println!("ID list is empty. Run 'trice update' first.");
            return Ok(());
        }
        let mut table = Table::new(items.into_iter().map(ItemRow::from_item));
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

/// Load the list for a read-only command; a missing file is reported and yields `None`.
pub(crate) fn load_soft(list: &Path) -> Result<Option<Registry>> {
    match Registry::load(list) {
        Ok(registry) => Ok(Some(registry)),
        Err(RegistryError::ListNotFound { .. }) => {
            println!("ID list {} not found, exit", list.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("failed to read ID list {}", list.display())),
    }
}

fn format_unix(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_unix_is_utc() {
        assert_eq!(format_unix(0), "1970-01-01 00:00:00");
    }
}
