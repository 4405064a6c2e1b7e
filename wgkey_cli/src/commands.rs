use crate::config::{OutputFormat, SettingsCommand};
use crate::error::CliError;
use crate::settings::{load_or_default, Settings};
use libwgkey::{CommandRunner, KeyPair, KeyPaths, KeyProvisioner};
use log::*;
use std::path::Path;

/// Provision the key pair for `name` and render it in the requested format.
pub fn genkey<R: CommandRunner>(
    provisioner: &KeyProvisioner<R>,
    name: &str,
    key_dir: &Path,
    format: OutputFormat,
) -> Result<String, CliError> {
    let pair = provisioner.provision(name, key_dir)?;
    debug!("Key pair ready: {pair}");
    format_key_pair(&pair, format)
}

/// Provision the key pair for `name` and return only the public key.
pub fn pubkey<R: CommandRunner>(provisioner: &KeyProvisioner<R>, name: &str, key_dir: &Path) -> Result<String, CliError> {
    let pair = provisioner.provision(name, key_dir)?;
    Ok(pair.public_key().trim_end().to_string())
}

/// Re-derive and compare the public key of an existing pair. A mismatch is an error.
pub fn verify<R: CommandRunner>(provisioner: &KeyProvisioner<R>, name: &str, key_dir: &Path) -> Result<String, CliError> {
    let paths = KeyPaths::new(key_dir, name);
    if provisioner.verify(name, key_dir)? {
        Ok(format!("{} matches {}", paths.public().display(), paths.private().display()))
    } else {
        Err(CliError::KeyMismatch(paths.public().display().to_string()))
    }
}

pub fn format_key_pair(pair: &KeyPair, format: OutputFormat) -> Result<String, CliError> {
    let text = match format {
        OutputFormat::Text => format!("{}\n{}", pair.private_key().trim_end(), pair.public_key().trim_end()),
        OutputFormat::Yaml => serde_yml::to_string(pair)?.trim_end().to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(pair)?,
    };
    Ok(text)
}

/// Show the effective settings, or write them to `path`.
pub fn exec_settings_command(cmd: SettingsCommand, path: &Path) -> Result<String, CliError> {
    let settings = load_or_default(path)?;
    match cmd {
        SettingsCommand::Show => Ok(serde_yml::to_string(&settings)?.trim_end().to_string()),
        SettingsCommand::Init { dir, wg_path } => {
            let settings: Settings = settings.with_overrides(dir.as_ref(), wg_path.as_ref());
            info!("Saving settings to {}", path.display());
            settings.save(path)?;
            Ok(format!("Settings saved to {}", path.display()))
        }
    }
}
