use crate::error::CliError;
use libwgkey::{KeyProvisioner, KeyTool, DEFAULT_KEY_DIR, DEFAULT_WG_PATH};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Values read from `$HOME/.wgkey/config.yml`. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub key_dir: PathBuf,
    pub wg_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self { key_dir: PathBuf::from(DEFAULT_KEY_DIR), wg_path: PathBuf::from(DEFAULT_WG_PATH) }
    }
}

impl Settings {
    pub fn try_load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, CliError> {
        load_settings_file(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        save_settings_file(path, self)
    }

    /// Replace the stored values with any that were given on the command line.
    pub fn with_overrides(mut self, key_dir: Option<&PathBuf>, wg_path: Option<&PathBuf>) -> Self {
        if let Some(dir) = key_dir {
            self.key_dir = dir.clone();
        }
        if let Some(wg) = wg_path {
            self.wg_path = wg.clone();
        }
        self
    }

    pub fn key_tool(&self) -> KeyTool {
        KeyTool::new(&self.wg_path)
    }

    pub fn provisioner(&self) -> KeyProvisioner {
        KeyProvisioner::new(self.key_tool())
    }
}

pub fn default_settings_path() -> PathBuf {
    let mut home = std::env::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.push(".wgkey");
    home.push("config.yml");
    home
}

pub fn load_settings_file<P: AsRef<Path>>(path: Option<P>) -> Result<Settings, CliError> {
    let path = path.map(|p| p.as_ref().to_path_buf()).unwrap_or_else(default_settings_path);
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let settings = serde_yml::from_reader(reader)?;
    Ok(settings)
}

pub fn save_settings_file<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<(), CliError> {
    // Create directory path if required
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_yml::to_writer(writer, settings)?;
    Ok(())
}

/// Load the settings file, falling back to the defaults if it does not exist. Any other failure is an error.
pub fn load_or_default(path: &Path) -> Result<Settings, CliError> {
    match Settings::try_load(Some(path)) {
        Ok(settings) => Ok(settings),
        Err(CliError::IoError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("No settings file found at {}, using defaults", path.display());
            Ok(Settings::default())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let settings = load_or_default(&dir.path().join("config.yml")).expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.key_dir, PathBuf::from("/etc/wireguard"));
        assert_eq!(settings.wg_path, PathBuf::from("/usr/bin/wg"));
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("config.yml");
        let settings = Settings { key_dir: "/srv/wireguard".into(), wg_path: "/opt/wg".into() };
        settings.save(&path).expect("save settings");
        let loaded = load_or_default(&path).expect("load settings");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "key_dir: /srv/wireguard\n").expect("write settings");
        let loaded = load_or_default(&path).expect("load settings");
        assert_eq!(loaded.key_dir, PathBuf::from("/srv/wireguard"));
        assert_eq!(loaded.wg_path, PathBuf::from(DEFAULT_WG_PATH));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "key_dir: [unterminated\n").expect("write settings");
        let err = load_or_default(&path).unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig(_)), "unexpected error: {err}");
    }

    #[test]
    fn command_line_overrides_win() {
        let dir = PathBuf::from("/tmp/keys");
        let settings = Settings::default().with_overrides(Some(&dir), None);
        assert_eq!(settings.key_dir, dir);
        assert_eq!(settings.wg_path, PathBuf::from(DEFAULT_WG_PATH));
        assert_eq!(settings.key_tool().program(), Path::new(DEFAULT_WG_PATH));
    }
}
