//! `trice lookup <ID>...` — resolve trace IDs the way a decoder does.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use trice_core::RegistryError;

use super::absolute;
use super::check::load_soft;

/// Arguments for `trice lookup`.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// IDs to resolve.
    #[arg(required = true)]
    pub ids: Vec<u16>,

    /// ID list path.
    #[arg(long, default_value = "til.json")]
    pub list: PathBuf,
}

impl LookupArgs {
    pub fn run(self) -> Result<()> {
        let list = absolute(&self.list)?;
        let Some(registry) = load_soft(&list)? else {
            return Ok(());
        };

        // Unknown IDs are reported and skipped, never fatal.
        for id in self.ids {
            match registry.locate(id) {
                Ok(item) => {
                    let line = format!("{id:>5}  {:<10} {}", item.fmt_type, item.fmt_strg);
                    if item.is_active() {
                        println!("{line}");
                    } else {
                        println!("{}", line.bright_black());
                    }
                }
                Err(RegistryError::NotFound { id }) => {
                    tracing::warn!("unknown trace ID {id}");
                    println!("{id:>5}  {}", "unknown trace ID".red());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
