//! CLI enum types for style, group, resolution, facing and language options.

use clap::ValueEnum;

use crate::camera::FacingMode;
use crate::generation::{ElfStyle, GroupType, UpscaleLevel};
use crate::i18n::Language;

/// Elf costume style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Style {
    #[default]
    Classic,
    Frost,
    Forest,
    Royal,
}

impl From<Style> for ElfStyle {
    fn from(s: Style) -> Self {
        match s {
            Style::Classic => ElfStyle::Classic,
            Style::Frost => ElfStyle::Frost,
            Style::Forest => ElfStyle::Forest,
            Style::Royal => ElfStyle::Royal,
        }
    }
}

/// One person or a group in the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Group {
    #[default]
    Single,
    Group,
}

impl From<Group> for GroupType {
    fn from(g: Group) -> Self {
        match g {
            Group::Single => GroupType::Single,
            Group::Group => GroupType::Group,
        }
    }
}

/// Upscale target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Quality {
    #[value(name = "2k")]
    K2,
    #[value(name = "4k")]
    K4,
}

impl From<Quality> for UpscaleLevel {
    fn from(q: Quality) -> Self {
        match q {
            Quality::K2 => UpscaleLevel::K2,
            Quality::K4 => UpscaleLevel::K4,
        }
    }
}

/// Which way the camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Facing {
    /// Front camera, mirrored
    #[default]
    User,
    Environment,
}

impl From<Facing> for FacingMode {
    fn from(f: Facing) -> Self {
        match f {
            Facing::User => FacingMode::User,
            Facing::Environment => FacingMode::Environment,
        }
    }
}

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Lang {
    #[default]
    Fi,
    En,
}

impl From<Lang> for Language {
    fn from(l: Lang) -> Self {
        match l {
            Lang::Fi => Language::Fi,
            Lang::En => Language::En,
        }
    }
}
