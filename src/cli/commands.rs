//! Subcommand handlers for styles and config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::config::{Config, ConfigError};
use crate::generation::{style_anchor, ElfStyle};
use crate::i18n::Language;

/// Print the available styles.
pub fn list_styles(language: Language) {
    println!("Available styles:");
    for style in ElfStyle::ALL {
        println!("  {:<8} {}", style.as_str(), style.label(language));
        println!("           {}", style_anchor(style));
    }
    println!();
    println!("Use --style <name> to select a style.");
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    config_path: &Path,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!();
            print!("{}", config.to_toml()?);
            println!();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if Config::init(config_path)? {
                println!("Created config file: {}", config_path.display());
            } else {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'elf-booth config show' to view current settings.");
            }
        }
    }
    Ok(())
}
