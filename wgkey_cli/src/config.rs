use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// WireGuard key provisioning.
///
/// Creates `<name>.key` and `<name>.pub` in the key directory with `wg genkey` and `wg pubkey` when they are missing,
/// and prints their contents.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Config {
    /// Path to the settings file. The default is `$HOME/.wgkey/config.yml`.
    #[arg(long = "config-file", short = 'c', env = "WGKEY_CONFIG")]
    pub config_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Ensure the key pair for an interface exists and print it.
    #[command(name = "genkey", alias = "provision")]
    GenKey {
        #[command(flatten)]
        key: KeyArgs,
        /// How to print the key pair.
        #[arg(long = "format", short = 'f', value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Ensure the key pair for an interface exists and print only the public key.
    #[command(name = "pubkey")]
    PubKey(KeyArgs),
    /// Check that the stored public key matches the stored private key.
    #[command(name = "verify", alias = "check")]
    Verify(KeyArgs),
    /// Show or write the settings file.
    #[command(subcommand, name = "config")]
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
pub struct KeyArgs {
    /// The interface name, e.g. `wg0`. It is used verbatim as the key file name.
    pub name: String,
    /// Directory holding the key files. Overrides `key_dir` from the settings file.
    #[arg(long = "dir", short = 'd')]
    pub dir: Option<PathBuf>,
    /// Path to the `wg` binary. Overrides `wg_path` from the settings file.
    #[arg(long = "wg")]
    pub wg_path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the effective settings.
    #[command(name = "show")]
    Show,
    /// Write the effective settings to the settings file, creating it if required.
    #[command(name = "init")]
    Init {
        /// Key directory to store in the settings file.
        #[arg(long = "dir", short = 'd')]
        dir: Option<PathBuf>,
        /// `wg` binary to store in the settings file.
        #[arg(long = "wg")]
        wg_path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Private key on the first line, public key on the second.
    #[default]
    Text,
    Yaml,
    Json,
}

pub struct GlobalOptions {
    pub config_file: Option<PathBuf>,
}

impl Config {
    pub fn to_parts(self) -> (GlobalOptions, CliCommand) {
        let global = GlobalOptions { config_file: self.config_file };
        (global, self.command)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Config::command().debug_assert();
    }

    #[test]
    fn parse_genkey_with_overrides() {
        let config = Config::parse_from(["wgkey", "genkey", "wg0", "--dir", "/tmp/keys", "--wg", "/opt/wg", "-f", "json"]);
        let (global, command) = config.to_parts();
        assert!(global.config_file.is_none());
        match command {
            CliCommand::GenKey { key, format } => {
                assert_eq!(key.name, "wg0");
                assert_eq!(key.dir, Some(PathBuf::from("/tmp/keys")));
                assert_eq!(key.wg_path, Some(PathBuf::from("/opt/wg")));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn genkey_defaults_to_text() {
        let config = Config::parse_from(["wgkey", "-c", "/tmp/wgkey.yml", "provision", "wg1"]);
        assert_eq!(config.config_file, Some(PathBuf::from("/tmp/wgkey.yml")));
        match config.command {
            CliCommand::GenKey { key, format } => {
                assert_eq!(key.name, "wg1");
                assert!(key.dir.is_none());
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_settings_init() {
        let config = Config::parse_from(["wgkey", "config", "init", "--dir", "/srv/wg"]);
        match config.command {
            CliCommand::Settings(SettingsCommand::Init { dir, wg_path }) => {
                assert_eq!(dir, Some(PathBuf::from("/srv/wg")));
                assert!(wg_path.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn name_is_required() {
        assert!(Config::try_parse_from(["wgkey", "verify"]).is_err());
    }
}
