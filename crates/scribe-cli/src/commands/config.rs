use super::CommandContext;
use crate::ConfigCommands;
use crate::config::ScribeConfig;
use anyhow::{Result, bail};
use std::path::Path;

pub fn handle_config_command(ctx: &CommandContext, command: ConfigCommands, cli_config: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Init { force } => {
            let Some(target) = cli_config.map(Path::to_path_buf).or_else(ScribeConfig::default_path) else {
                bail!("No configuration directory available; pass --config <PATH>");
            };
            init_config(&target, force)
        }
    }
}

fn show_config(ctx: &CommandContext) -> Result<()> {
    println!("Current Configuration");
    println!("=====================");
    println!("Providers: {:?}", ctx.provider);
    println!();
    print!("{}", toml::to_string_pretty(&ctx.config)?);

    Ok(())
}

fn init_config(target: &Path, force: bool) -> Result<()> {
    if target.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", target.display());
    }
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    ScribeConfig::default().save_to_file(target)?;
    println!("Wrote default configuration to {}", target.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("nested").join("config.toml");

        init_config(&target, false).unwrap();
        assert_eq!(ScribeConfig::load_from_file(&target).unwrap(), ScribeConfig::default());

        std::fs::write(&target, "[analysis]\ndebounce_ms = 99\n").unwrap();
        assert!(init_config(&target, false).is_err());

        init_config(&target, true).unwrap();
        assert_eq!(ScribeConfig::load_from_file(&target).unwrap().analysis.debounce_ms, 250);
    }
}
