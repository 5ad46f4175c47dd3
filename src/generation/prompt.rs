//! Prompt text sent to the image model.

use super::options::{ElfStyle, GroupType, UpscaleLevel};

/// Costume and scenery description for each style.
pub fn style_anchor(style: ElfStyle) -> &'static str {
    match style {
        ElfStyle::Classic => {
            "Traditional Lapland Christmas portrait. Red velvet elf coat with gold trim and \
             knitted details, in a warmly lit wooden cabin or a snowy forest."
        }
        ElfStyle::Frost => {
            "Arctic frost elf portrait. Icy blue and white winter clothing with fur trim, \
             a snowy landscape with soft northern lights behind."
        }
        ElfStyle::Forest => {
            "Northern forest elf portrait. Earthy greens and dark reds, wool and leather, \
             spruce forest with light snowfall and lantern glow."
        }
        ElfStyle::Royal => {
            "Festive royal elf portrait. Burgundy attire with gold embroidery and fur trim, \
             a grand winter hall lit by candles."
        }
    }
}

const IDENTITY_RULES: &str = "Preserve every face exactly: same identity, age and facial \
structure. Keep proportions realistic; this is a photograph, not an illustration.";

const NEGATIVE_RULES: &str = "No cartoon features, no text, no logos, no extra fingers, \
no face swapping.";

/// Prompt for turning a captured photo into an elf portrait.
pub fn transform_prompt(style: ElfStyle, group: GroupType) -> String {
    let composition = match group {
        GroupType::Single => "Focus on the main subject.",
        GroupType::Group => "Transform every person in the group coherently.",
    };
    format!(
        "Transform the person(s) in the photo into realistic Lapland Christmas elves.\n\
         {IDENTITY_RULES}\n\
         Clothing and scene: {}\n\
         Use a 3:4 portrait composition. {}\n\
         {NEGATIVE_RULES}",
        style_anchor(style),
        composition
    )
}

/// Prompt for re-rendering an existing portrait at `level`.
pub fn upscale_prompt(style: ElfStyle, level: UpscaleLevel) -> String {
    format!(
        "Enhance and upscale this portrait to {} resolution.\n\
         {IDENTITY_RULES} Keep the same pose, expression and composition.\n\
         Sharpen fabric and hair detail consistent with: {}\n\
         {NEGATIVE_RULES}",
        level,
        style_anchor(style)
    )
}
