use clap::Parser;
use log::*;
use std::path::PathBuf;
use wgkey_cli::commands::{exec_settings_command, genkey, pubkey, verify};
use wgkey_cli::config::{CliCommand, Config, GlobalOptions, KeyArgs};
use wgkey_cli::settings::{default_settings_path, load_or_default, Settings};

fn main() {
    env_logger::init();
    let config: Config = Config::parse();
    let (global_options, command) = config.to_parts();

    let result = match command {
        CliCommand::GenKey { key, format } => {
            effective_settings(&global_options, &key).and_then(|s| Ok(genkey(&s.provisioner(), &key.name, &s.key_dir, format)?))
        }
        CliCommand::PubKey(key) => {
            effective_settings(&global_options, &key).and_then(|s| Ok(pubkey(&s.provisioner(), &key.name, &s.key_dir)?))
        }
        CliCommand::Verify(key) => {
            effective_settings(&global_options, &key).and_then(|s| Ok(verify(&s.provisioner(), &key.name, &s.key_dir)?))
        }
        CliCommand::Settings(cmd) => {
            let path = settings_path(&global_options);
            exec_settings_command(cmd, &path).map_err(anyhow::Error::from)
        }
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("** Error ** \n {err}");
            std::process::exit(1);
        }
    }
}

fn settings_path(options: &GlobalOptions) -> PathBuf {
    options.config_file.as_ref().cloned().unwrap_or_else(default_settings_path)
}

fn effective_settings(options: &GlobalOptions, key: &KeyArgs) -> Result<Settings, anyhow::Error> {
    let path = settings_path(options);
    debug!("Loading settings from {}", path.display());
    let settings = load_or_default(&path)?.with_overrides(key.dir.as_ref(), key.wg_path.as_ref());
    info!("Using key directory {} and key tool {}", settings.key_dir.display(), settings.wg_path.display());
    Ok(settings)
}
