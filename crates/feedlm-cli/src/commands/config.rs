use crate::Context;
use anyhow::{Result, bail};
use feedlm_driver::DriverConfig;
use std::fs;

/// Print the configuration `run` would use
pub fn show(ctx: &Context) -> Result<()> {
    let path = ctx.store.config_path();
    let config = DriverConfig::load(&path)?;

    if !ctx.is_json() {
        let source = if path.exists() {
            path.display().to_string()
        } else {
            "built-in defaults".to_string()
        };
        eprintln!("# {}", source);
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Write the defaults so they can be edited
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = ctx.store.config_path();
    if path.exists() && !force {
        bail!(
            "Config already exists at {}. Use --force to overwrite it.",
            path.display()
        );
    }

    fs::create_dir_all(ctx.store.root())?;
    let json = serde_json::to_string_pretty(&DriverConfig::default())?;
    fs::write(&path, json)?;

    if !ctx.is_json() {
        println!("✅ Wrote default config to {}", path.display());
    }
    Ok(())
}
