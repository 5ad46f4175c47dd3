//! Line-based console presentation of the booth.
//!
//! Renders the current screen as text, turns typed commands into
//! [`Intent`]s and applies background completions as they arrive.

use std::fmt::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::booth::BoothError;
use crate::credentials::ApiKeyStore;
use crate::flow::{AppState, Completions, FlowDriver, Intent, Session};
use crate::generation::{ElfStyle, GroupType, UpscaleLevel};
use crate::i18n::Language;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Intents(Vec<Intent>),
    /// Store a typed API key, then continue past the key gate
    SetKey(String),
    Help,
    Quit,
    Unknown(String),
}

/// Render the screen for `session`.
pub fn render(session: &Session) -> String {
    let t = session.language().strings();
    let mut out = String::new();
    let _ = writeln!(out);
    match session.state() {
        AppState::Hero => {
            let _ = writeln!(out, "*** {} ***", t.title);
            let _ = writeln!(out, "{}", t.subtitle);
            let _ = writeln!(out, "[Enter] {}", t.button_begin);
        }
        AppState::KeyGate => {
            let _ = writeln!(out, "== {} ==", t.key_gate_title);
            let _ = writeln!(out, "{}", t.key_gate_desc);
            let _ = writeln!(out, "[key] reload  |  [key <API_KEY>] use this key");
        }
        AppState::GroupSelect => {
            let _ = writeln!(out, "== {} ==", t.group_select_title);
            let _ = writeln!(out, "[1] {}  [2] {}", t.group_single, t.group_group);
        }
        AppState::Camera => {
            let _ = writeln!(out, "== {} ==", t.smile_text);
            let _ = writeln!(out, "[Enter] snap");
        }
        AppState::StyleSelect => {
            let _ = writeln!(out, "== {} ==", t.select_style_title);
            for (index, style) in ElfStyle::ALL.iter().enumerate() {
                let marker = if *style == session.selected_style() {
                    '*'
                } else {
                    ' '
                };
                let _ = writeln!(out, "{}[{}] {}", marker, index + 1, style.label(session.language()));
            }
            let _ = writeln!(out, "[go] {}", t.button_begin);
        }
        AppState::Magic => {
            let _ = writeln!(out, "{}", t.processing);
            let _ = writeln!(out, "{}", t.processing_sub);
        }
        AppState::Result => {
            let _ = writeln!(
                out,
                "== {} ({}) ==",
                t.result_title,
                session.current_resolution()
            );
            if session.is_upscaling() {
                let _ = writeln!(out, "{}", t.upscaling_text);
            }
            let placeholder = match session.group_type() {
                GroupType::Single => t.input_name_placeholder,
                GroupType::Group => t.input_group_name_placeholder,
            };
            if session.name_entry_open() {
                let _ = writeln!(
                    out,
                    "{}: {}  [diploma] [cancel]",
                    placeholder,
                    session.first_name()
                );
            } else {
                let _ = writeln!(out, "[name <{}>]", placeholder);
            }
            let _ = writeln!(out, "[2k] [4k] [save]");
        }
        AppState::Certificate => {
            let _ = writeln!(out, "== {} ==", t.cert_title);
            let _ = writeln!(out, "{} {}", t.cert_proof, session.first_name());
            let _ = writeln!(out, "[pdf] [save] [back]");
        }
        AppState::Error => {
            let _ = writeln!(out, "== {} ==", t.error_title);
            let _ = writeln!(out, "[retry] {}", t.error_action);
        }
    }
    if let Some(message) = session.error_message() {
        let _ = writeln!(out, "! {}", message);
    }
    if let Some(notice) = session.notice() {
        let _ = writeln!(out, "> {}", notice.message(session.language()));
    }
    out
}

/// Parse one typed line in the context of `session`.
pub fn parse_command(session: &Session, line: &str) -> ConsoleCommand {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_ascii_lowercase(), rest.trim()),
        None => (line.to_ascii_lowercase(), ""),
    };
    let one = |intent: Intent| ConsoleCommand::Intents(vec![intent]);

    match word.as_str() {
        "quit" | "exit" | ":q" => return ConsoleCommand::Quit,
        "help" | "?" => return ConsoleCommand::Help,
        "reset" => return one(Intent::Reset),
        "music" => return one(Intent::ToggleMusic),
        "ok" => return one(Intent::DismissMessage),
        "lang" => {
            return match rest.parse::<Language>() {
                Ok(language) => one(Intent::SetLanguage(language)),
                Err(_) => ConsoleCommand::Unknown(line.to_string()),
            }
        }
        _ => {}
    }

    match (session.state(), word.as_str()) {
        (AppState::Hero, "" | "start") => one(Intent::Begin),
        (AppState::KeyGate, "key") if rest.is_empty() => one(Intent::SelectCredential),
        (AppState::KeyGate, "key") => ConsoleCommand::SetKey(rest.to_string()),
        (AppState::GroupSelect, "1" | "single") => one(Intent::ChooseGroup(GroupType::Single)),
        (AppState::GroupSelect, "2" | "group") => one(Intent::ChooseGroup(GroupType::Group)),
        (AppState::Camera, "" | "snap") => one(Intent::Capture),
        (AppState::StyleSelect, "go" | "") => one(Intent::StartMagic),
        (AppState::StyleSelect, choice) => match style_choice(choice) {
            Some(style) => one(Intent::ChooseStyle(style)),
            None => ConsoleCommand::Unknown(line.to_string()),
        },
        (AppState::Result, "2k") => one(Intent::Upscale(UpscaleLevel::K2)),
        (AppState::Result, "4k") => one(Intent::Upscale(UpscaleLevel::K4)),
        (AppState::Result, "name") => ConsoleCommand::Intents(vec![
            Intent::OpenNameEntry,
            Intent::EditName(rest.to_string()),
        ]),
        (AppState::Result, "diploma") => one(Intent::CreateCertificate),
        (AppState::Result, "cancel") => one(Intent::CancelNameEntry),
        (AppState::Result | AppState::Certificate, "save") => one(Intent::DownloadImage),
        (AppState::Certificate, "pdf") => one(Intent::DownloadCertificate),
        (AppState::Certificate, "back") => one(Intent::Back),
        (AppState::Error, "retry" | "") => one(Intent::Retry),
        _ => ConsoleCommand::Unknown(line.to_string()),
    }
}

fn style_choice(choice: &str) -> Option<ElfStyle> {
    match choice.parse::<usize>() {
        Ok(n) if (1..=ElfStyle::ALL.len()).contains(&n) => Some(ElfStyle::ALL[n - 1]),
        Ok(_) => None,
        Err(_) => choice.parse().ok(),
    }
}

const HELP: &str = "Commands: start, key [API_KEY], 1/2, snap, 1-4 or style name, go, \
2k, 4k, name <text>, diploma, cancel, save, pdf, back, retry, lang fi|en, music, ok, reset, quit";

/// Run the interactive booth on stdin/stdout until `quit`, end of input or Ctrl-C.
pub async fn run_interactive(
    mut driver: FlowDriver,
    mut completions: Completions,
    keys: Arc<ApiKeyStore>,
) -> Result<(), BoothError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", render(driver.session()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(driver.session(), &line) {
                    ConsoleCommand::Intents(intents) => {
                        for intent in intents {
                            driver.handle(intent);
                        }
                    }
                    ConsoleCommand::SetKey(key) => {
                        keys.set(key);
                        driver.handle(Intent::SelectCredential);
                    }
                    ConsoleCommand::Help => println!("{}", HELP),
                    ConsoleCommand::Quit => break,
                    ConsoleCommand::Unknown(text) => {
                        log::debug!("Unknown command '{}'", text);
                        println!("? ({})", HELP);
                    }
                }
            }
            Some(completion) = completions.next() => driver.complete(completion),
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                break;
            }
        }
        print!("{}", render(driver.session()));
    }

    driver.shutdown();
    Ok(())
}

/// Options for a non-interactive run.
#[derive(Debug, Clone)]
pub struct Script {
    pub style: ElfStyle,
    pub group: GroupType,
    pub upscale: Option<UpscaleLevel>,
    pub name: Option<String>,
}

/// Drive one visit from start to download without user input.
///
/// Returns the final session state on success; any error screen ends the run.
pub async fn run_scripted(
    mut driver: FlowDriver,
    mut completions: Completions,
    script: Script,
) -> Result<AppState, BoothError> {
    let steps = [
        Intent::Begin,
        Intent::ChooseGroup(script.group),
        Intent::Capture,
        Intent::ChooseStyle(script.style),
        Intent::StartMagic,
    ];
    for intent in steps {
        driver.handle(intent);
        driver.settle(&mut completions).await;
        check(&driver)?;
    }
    if driver.session().state() != AppState::Result {
        return Err(BoothError::Flow(format!(
            "stopped at {:?}",
            driver.session().state()
        )));
    }

    if let Some(level) = script.upscale {
        driver.handle(Intent::Upscale(level));
        driver.settle(&mut completions).await;
        check(&driver)?;
    }

    driver.handle(Intent::DownloadImage);
    driver.settle(&mut completions).await;
    report(&driver)?;

    if let Some(name) = script.name {
        for intent in [
            Intent::OpenNameEntry,
            Intent::EditName(name),
            Intent::CreateCertificate,
            Intent::DownloadCertificate,
        ] {
            driver.handle(intent);
        }
        driver.settle(&mut completions).await;
        report(&driver)?;
    }

    let state = driver.session().state();
    driver.shutdown();
    Ok(state)
}

fn check(driver: &FlowDriver) -> Result<(), BoothError> {
    let session = driver.session();
    match session.error_message() {
        Some(message) => Err(BoothError::Flow(message.to_string())),
        None => Ok(()),
    }
}

fn report(driver: &FlowDriver) -> Result<(), BoothError> {
    check(driver)?;
    let session = driver.session();
    if let Some(notice) = session.notice() {
        println!("{}", notice.message(session.language()));
    }
    Ok(())
}
