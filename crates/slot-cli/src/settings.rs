//! Layered engine settings for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the optional `--config` TOML
//! file, `SLOTS_*` environment variables, then command-line flags.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use slot_engine::interval::DEFAULT_SLOT_MINUTES;
use slot_engine::SchedulerConfig;

pub fn load(path: Option<&str>, slot_minutes: Option<u32>) -> Result<SchedulerConfig> {
    let mut builder =
        Config::builder().set_default("slot_minutes", i64::from(DEFAULT_SLOT_MINUTES))?;

    if let Some(path) = path {
        builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("SLOTS"));

    if let Some(minutes) = slot_minutes {
        builder = builder.set_override("slot_minutes", i64::from(minutes))?;
    }

    builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}
