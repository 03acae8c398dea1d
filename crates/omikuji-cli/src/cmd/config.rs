use crate::output::{print_json, print_warnings, print_yaml};
use anyhow::{bail, Result};
use clap::Subcommand;
use omikuji_core::config::{Config, WarnLevel};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration with secrets masked
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(config: Config, subcommand: ConfigSubcommand, json: bool) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let shown = config.redacted();
            if json {
                print_json(&shown)
            } else {
                print_yaml(&shown)
            }
        }
        ConfigSubcommand::Validate => validate(&config, json),
    }
}

fn validate(config: &Config, json: bool) -> Result<()> {
    let warnings = config.validate();
    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("config ok");
    } else {
        print_warnings(&warnings);
    }

    let errors = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .count();
    if errors > 0 {
        bail!("config has {errors} error(s)");
    }
    Ok(())
}
