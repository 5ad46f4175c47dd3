//! Options a user picks before and after generation.

use std::fmt;
use std::str::FromStr;

use crate::i18n::Language;

/// Costume style of the generated elf portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElfStyle {
    #[default]
    Classic,
    Frost,
    Forest,
    Royal,
}

impl ElfStyle {
    pub const ALL: [ElfStyle; 4] = [
        ElfStyle::Classic,
        ElfStyle::Frost,
        ElfStyle::Forest,
        ElfStyle::Royal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElfStyle::Classic => "classic",
            ElfStyle::Frost => "frost",
            ElfStyle::Forest => "forest",
            ElfStyle::Royal => "royal",
        }
    }

    /// Localized name shown on the style picker.
    pub fn label(self, language: Language) -> &'static str {
        let t = language.strings();
        match self {
            ElfStyle::Classic => t.style_classic,
            ElfStyle::Frost => t.style_frost,
            ElfStyle::Forest => t.style_forest,
            ElfStyle::Royal => t.style_royal,
        }
    }
}

impl fmt::Display for ElfStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElfStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ElfStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown style '{}'. Available styles: classic, frost, forest, royal",
                    s
                )
            })
    }
}

/// Whether the photo shows one person or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupType {
    #[default]
    Single,
    Group,
}

impl FromStr for GroupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "solo" | "one" => Ok(GroupType::Single),
            "group" | "many" => Ok(GroupType::Group),
            other => Err(format!("Unknown group type '{}'. Use 'single' or 'group'", other)),
        }
    }
}

/// Output size of a generated image.
///
/// Ordered, so `UpscaleLevel::K2 > UpscaleLevel::K1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum UpscaleLevel {
    #[default]
    K1,
    K2,
    K4,
}

impl UpscaleLevel {
    pub const ALL: [UpscaleLevel; 3] = [UpscaleLevel::K1, UpscaleLevel::K2, UpscaleLevel::K4];

    /// Label used by the image API and in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            UpscaleLevel::K1 => "1K",
            UpscaleLevel::K2 => "2K",
            UpscaleLevel::K4 => "4K",
        }
    }
}

impl fmt::Display for UpscaleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpscaleLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1K" | "1" => Ok(UpscaleLevel::K1),
            "2K" | "2" => Ok(UpscaleLevel::K2),
            "4K" | "4" => Ok(UpscaleLevel::K4),
            other => Err(format!("Unknown resolution '{}'. Use 1K, 2K or 4K", other)),
        }
    }
}
