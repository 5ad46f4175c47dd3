use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use elf_booth::booth::{assemble, BoothError};
use elf_booth::cli::{handle_config_action, list_styles, Args, Command};
use elf_booth::config::{default_path, Config};
use elf_booth::console::{run_interactive, run_scripted, Script};
use elf_booth::credentials::ApiKeyStore;

fn init_logging() {
    // log records from the library are bridged into the subscriber
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), BoothError> {
    let config_path = args.config.clone().unwrap_or_else(default_path);
    let mut config = Config::load(Some(&config_path))?;
    args.apply_to(&mut config);

    match args.command {
        Some(Command::Styles) => {
            list_styles(config.ui.language());
            Ok(())
        }
        Some(Command::Config { action }) => {
            handle_config_action(action, &config, &config_path)?;
            Ok(())
        }
        Some(Command::Transform {
            photo,
            style,
            group,
            upscale,
            name,
        }) => {
            config.camera.photo = Some(photo);
            let keys = Arc::new(ApiKeyStore::from_env());
            let (driver, completions) = assemble(&config, keys)?;
            let script = Script {
                style: style.into(),
                group: group.into(),
                upscale: upscale.map(Into::into),
                name,
            };
            let state = run_scripted(driver, completions, script).await?;
            log::info!("Finished in {:?}", state);
            Ok(())
        }
        None => {
            let keys = Arc::new(ApiKeyStore::from_env());
            let (driver, completions) = assemble(&config, Arc::clone(&keys))?;
            run_interactive(driver, completions, keys).await
        }
    }
}

#[tokio::main]
async fn main() {
    // dotenv returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();
    init_logging();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
