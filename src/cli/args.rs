//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Facing, Group, Lang, Quality, Style};
use crate::config::Config;
use crate::i18n::Language;

/// Lapland elf photo booth
#[derive(Parser, Debug)]
#[command(name = "elf-booth")]
#[command(version, about = "Turn a photo into a Lapland elf portrait", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Interactive booth with the default camera
    elf-booth

    # Use a photo file instead of a camera
    elf-booth --photo me.jpg

    # One-shot transform with a 4K upscale and a certificate
    elf-booth transform me.jpg --style frost --upscale 4k --name Aino

ENVIRONMENT:
    GEMINI_API_KEY    Gemini API key (API_KEY is also accepted)")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Photo file used instead of a camera
    #[arg(long)]
    pub photo: Option<PathBuf>,

    /// Camera index; picked by facing mode when omitted
    #[arg(long)]
    pub device: Option<u32>,

    /// Camera facing mode
    #[arg(long)]
    pub facing: Option<Facing>,

    /// UI language
    #[arg(long, short)]
    pub language: Option<Lang>,

    /// Disable background music
    #[arg(long)]
    pub no_music: bool,

    /// Directory for downloads
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Let command-line flags override the loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(photo) = &self.photo {
            config.camera.photo = Some(photo.clone());
        }
        if let Some(device) = self.device {
            config.camera.device = Some(device);
        }
        if let Some(facing) = self.facing {
            config.camera.facing = match facing {
                Facing::User => "user",
                Facing::Environment => "environment",
            }
            .to_string();
        }
        if let Some(language) = self.language {
            config.ui.language = Language::from(language).code().to_ascii_lowercase();
        }
        if self.no_music {
            config.ui.music = false;
        }
        if let Some(dir) = &self.output_dir {
            config.export.output_dir = Some(dir.clone());
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transform a photo without the interactive booth
    Transform {
        /// Photo to transform
        photo: PathBuf,

        /// Elf style
        #[arg(long, short, default_value = "classic")]
        style: Style,

        /// One person or a group
        #[arg(long, short, default_value = "single")]
        group: Group,

        /// Upscale the result
        #[arg(long, short)]
        upscale: Option<Quality>,

        /// Also save a certificate with this name
        #[arg(long, short)]
        name: Option<String>,
    },
    /// List available styles
    Styles,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
