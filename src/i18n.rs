//! User-facing text in Finnish and English.

use std::fmt;
use std::str::FromStr;

/// Display language of the booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Fi,
    En,
}

impl Language {
    pub fn strings(self) -> &'static Translation {
        match self {
            Language::Fi => &FI,
            Language::En => &EN,
        }
    }

    /// Short code as shown on the language switcher.
    pub fn code(self) -> &'static str {
        match self {
            Language::Fi => "FI",
            Language::En => "EN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fi" | "fin" | "finnish" | "suomi" => Ok(Language::Fi),
            "en" | "eng" | "english" => Ok(Language::En),
            other => Err(format!("Unknown language '{}'. Use 'fi' or 'en'", other)),
        }
    }
}

/// All strings the booth shows to a user.
#[derive(Debug)]
pub struct Translation {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub button_begin: &'static str,
    pub key_gate_title: &'static str,
    pub key_gate_desc: &'static str,
    pub group_select_title: &'static str,
    pub group_single: &'static str,
    pub group_group: &'static str,
    pub smile_text: &'static str,
    pub select_style_title: &'static str,
    pub style_classic: &'static str,
    pub style_frost: &'static str,
    pub style_forest: &'static str,
    pub style_royal: &'static str,
    pub processing: &'static str,
    pub processing_sub: &'static str,
    pub result_title: &'static str,
    pub upscaling_text: &'static str,
    pub upscale_success: &'static str,
    pub input_name_placeholder: &'static str,
    pub input_group_name_placeholder: &'static str,
    pub error_title: &'static str,
    pub error_action: &'static str,
    pub saved: &'static str,

    pub credential_missing: &'static str,
    pub credential_not_found: &'static str,
    pub credential_permission: &'static str,
    pub camera_unavailable: &'static str,
    pub generation_failed: &'static str,
    pub upscale_failed: &'static str,
    pub export_failed: &'static str,

    pub cert_title: &'static str,
    pub cert_proof: &'static str,
    pub cert_official: &'static str,
    pub cert_experience: &'static str,
    pub cert_place: &'static str,
    pub cert_magic: &'static str,
}

pub const FI: Translation = Translation {
    title: "Tonttukuvaamo",
    subtitle: "Muutu Lapin tontuksi",
    button_begin: "Aloita taika",
    key_gate_title: "Avain taikaan",
    key_gate_desc: "Valitse API-avain, jotta tonttutaika voi alkaa.",
    group_select_title: "Kuka kuvaan tulee?",
    group_single: "Yksin",
    group_group: "Ryhmä",
    smile_text: "Hymyile!",
    select_style_title: "Valitse tonttutyyli",
    style_classic: "Perinteinen",
    style_frost: "Huurre",
    style_forest: "Metsä",
    style_royal: "Kuninkaallinen",
    processing: "Taikaa tapahtuu...",
    processing_sub: "Tontut työskentelevät kuvasi parissa",
    result_title: "Olet nyt tonttu!",
    upscaling_text: "Terävöitetään...",
    upscale_success: "Kuva terävöitetty",
    input_name_placeholder: "Etunimesi",
    input_group_name_placeholder: "Ryhmän nimi",
    error_title: "Voi ei!",
    error_action: "Yritä uudelleen",
    saved: "Tallennettu",

    credential_missing: "API-avainta ei ole valittu.",
    credential_not_found: "API-avain täytyy valita uudelleen.",
    credential_permission: "API-avaimella ei ole oikeuksia. Valitse maksullinen projekti.",
    camera_unavailable: "Kameraa ei voitu avata. Tarkista luvat laitteen asetuksista.",
    generation_failed: "Taika kohtasi odottamattoman esteen. Yritä uudelleen.",
    upscale_failed: "Terävöitys epäonnistui. Kokeile myöhemmin uudelleen.",
    export_failed: "PDF-tiedoston luominen epäonnistui.",

    cert_title: "Tonttudiplomi",
    cert_proof: "Tämä todistaa, että",
    cert_official: "on virallinen Lapin tonttu",
    cert_experience: "ja on osoittanut todellista joulutaikaa",
    cert_place: "Rovaniemi",
    cert_magic: "Joulupukin pajan virallinen todistus",
};

pub const EN: Translation = Translation {
    title: "Elf Booth",
    subtitle: "Become a Lapland elf",
    button_begin: "Start the magic",
    key_gate_title: "Key to the magic",
    key_gate_desc: "Select an API key so the elf magic can begin.",
    group_select_title: "Who is in the picture?",
    group_single: "Just me",
    group_group: "Group",
    smile_text: "Smile!",
    select_style_title: "Choose your elf style",
    style_classic: "Classic",
    style_frost: "Frost",
    style_forest: "Forest",
    style_royal: "Royal",
    processing: "Magic is happening...",
    processing_sub: "The elves are working on your picture",
    result_title: "You are an elf now!",
    upscaling_text: "Enhancing...",
    upscale_success: "Image enhanced",
    input_name_placeholder: "Your first name",
    input_group_name_placeholder: "Group name",
    error_title: "Oh no!",
    error_action: "Try again",
    saved: "Saved",

    credential_missing: "No API key has been selected.",
    credential_not_found: "The API key must be selected again.",
    credential_permission: "The API key has no access. Select a paid project.",
    camera_unavailable: "The camera could not be opened. Check the permissions in your device settings.",
    generation_failed: "The magic ran into an unexpected obstacle. Please try again.",
    upscale_failed: "Enhancing failed. Please try again later.",
    export_failed: "Creating the PDF file failed.",

    cert_title: "Elf Certificate",
    cert_proof: "This certifies that",
    cert_official: "is an official Lapland elf",
    cert_experience: "and has shown true Christmas magic",
    cert_place: "Rovaniemi",
    cert_magic: "Official certificate of Santa's workshop",
};
