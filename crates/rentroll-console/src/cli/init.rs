/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When AppConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::path::PathBuf;

use rentroll_adapter::DEFAULT_BASE_URL;
use rentroll_console::AppConfig;

pub fn run_init(output: PathBuf, force: bool) -> Result<()> {
    println!("{}", style("RentRoll Console Init").bold().cyan());
    println!(
        "{}",
        style("This will create a configuration for the RentRoll backend.").dim()
    );

    let theme = ColorfulTheme::default();

    if output.exists() && !force {
        let overwrite = Confirm::with_theme(&theme)
            .with_prompt(format!("{} exists. Overwrite?", output.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("{}", style("Nothing written.").yellow());
            return Ok(());
        }
    }

    let base_url: String = Input::with_theme(&theme)
        .with_prompt("Server URL")
        .default(DEFAULT_BASE_URL.to_string())
        .interact_text()?;

    println!("\n{}", style("--- Business ---").bold());
    let bid: i64 = Input::with_theme(&theme)
        .with_prompt("Business ID (BID)")
        .default(1)
        .validate_with(|bid: &i64| {
            if *bid > 0 {
                Ok(())
            } else {
                Err("BID must be positive")
            }
        })
        .interact_text()?;

    let bud: String = Input::with_theme(&theme)
        .with_prompt("Business unit designation (BUD)")
        .default("REX".to_string())
        .interact_text()?;

    let config = AppConfig::starter(base_url, bid, bud.trim().to_string());
    config.validate()?;
    let yaml = config.to_yaml()?;

    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}
