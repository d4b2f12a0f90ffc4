//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};

use tessera_config::{LayerStatus, TesseraConfig};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration as TOML
    Show,

    /// Show which config files are loaded and their precedence
    Which,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./tessera.toml) instead of user config
        #[arg(long)]
        local: bool,
    },

    /// Show configuration file path
    Path,
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Which => cmd_which(ctx),
        ConfigCommand::Init { local } => cmd_init(local),
        ConfigCommand::Path => cmd_path(),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = tessera_config::load_config()?;

    for warning in loaded.warnings() {
        eprintln!("warning: {}", warning);
    }

    if ctx.verbose {
        let sources = loaded.loaded_from();
        if sources.is_empty() {
            println!("# No config files loaded (using defaults)");
        } else {
            for source in sources {
                println!("# Loaded: {}", source.display());
            }
        }
        println!();
    }

    print!("{}", loaded.config.resolved().to_toml()?);
    Ok(())
}

fn cmd_which(_ctx: &Context) -> Result<()> {
    let loaded = tessera_config::load_config()?;

    println!("Config file search order (later overrides earlier):\n");

    for layer in &loaded.layers {
        let status = match &layer.status {
            LayerStatus::Loaded => "✓ loaded".to_string(),
            LayerStatus::Missing => "· not found".to_string(),
            LayerStatus::Malformed(reason) => format!("✗ ignored ({})", reason),
        };
        println!("  {} {}", status, layer.path.display());
    }

    println!();
    let loaded_count = loaded.loaded_from().len();
    if loaded_count == 0 {
        println!("No config files found. Run 'tessera config init' to create one.");
    } else {
        println!("{} config file(s) loaded.", loaded_count);
    }

    Ok(())
}

fn cmd_init(local: bool) -> Result<()> {
    let path = if local {
        std::path::PathBuf::from("tessera.toml")
    } else {
        let dir = tessera_config::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        std::fs::create_dir_all(&dir)?;
        dir.join("config.toml")
    };

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    let body = TesseraConfig::new().resolved().to_toml()?;
    let contents = format!("# Tessera Configuration\n\n{}", body);
    std::fs::write(&path, contents)?;
    println!("Created config file: {}", path.display());

    Ok(())
}

fn cmd_path() -> Result<()> {
    if let Some(path) = tessera_config::user_config_file() {
        println!("{}", path.display());
    } else {
        eprintln!("Could not determine config directory");
    }
    Ok(())
}
