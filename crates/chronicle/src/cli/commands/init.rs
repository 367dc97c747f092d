//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use chronicle_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
use chronicle_core::config::{validate_config, Config};

use crate::cli::Cli;

/// Create a chronicle configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Never prompt; fail if the file already exists
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.toml { DEFAULT_CONFIG_TOML } else { DEFAULT_CONFIG_YAML };
        let config_path = self.output.clone().unwrap_or_else(|| cwd.join(default_name));

        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        let content = self.render()?;
        std::fs::write(&config_path, &content)?;

        if !cli.quiet {
            println!(
                "{} Created configuration at {}",
                style("✓").green().bold(),
                style(config_path.display()).cyan()
            );
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to map your commit types", config_path.display());
            println!("  2. Run {} to see how commits are categorized", style("chronicle preview").cyan());
            println!("  3. Run {} to update the changelog", style("chronicle update").cyan());
        }

        Ok(())
    }

    fn render(&self) -> anyhow::Result<String> {
        if !self.toml {
            return Ok(DEFAULT_CONFIG_TEMPLATE.to_string());
        }

        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
        validate_config(&config)?;
        Ok(toml::to_string_pretty(&config)?)
    }
}
