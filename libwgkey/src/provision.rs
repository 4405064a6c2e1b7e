use crate::command::{CommandRunner, KeyTool, SystemRunner};
use crate::error::ProvisionError;
use crate::keypair::KeyPair;
use crate::paths::{KeyPaths, DEFAULT_KEY_DIR};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroizing;

/// Makes sure an interface's key files exist, creating them with the external key tool when they don't.
///
/// The files on disk are the only state. Nothing is cached between calls, and no locking is done, so two processes
/// provisioning the same interface at the same time may race.
#[derive(Debug, Clone)]
pub struct KeyProvisioner<R = SystemRunner> {
    tool: KeyTool,
    runner: R,
}

impl KeyProvisioner<SystemRunner> {
    pub fn new(tool: KeyTool) -> Self {
        Self::with_runner(tool, SystemRunner)
    }
}

impl Default for KeyProvisioner<SystemRunner> {
    fn default() -> Self {
        Self::new(KeyTool::default())
    }
}

impl<R: CommandRunner> KeyProvisioner<R> {
    pub fn with_runner(tool: KeyTool, runner: R) -> Self {
        Self { tool, runner }
    }

    pub fn tool(&self) -> &KeyTool {
        &self.tool
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Ensure `<directory>/<name>.key` and `<directory>/<name>.pub` exist and return their contents.
    ///
    /// 1. Both paths are validated before anything is touched (see [`KeyPaths::validate`]).
    /// 2. If the private key is missing, `wg genkey` output is written to it and any existing public key is
    ///    deleted, since it belonged to the old private key.
    /// 3. If the public key is missing, it is derived from the private key file with `wg pubkey`.
    /// 4. Both files are read back in full.
    ///
    /// If derivation fails, the private key stays on disk and the next call only retries the derivation.
    pub fn provision<P: AsRef<Path>>(&self, name: &str, directory: P) -> Result<KeyPair, ProvisionError> {
        let directory = directory.as_ref();
        let paths = KeyPaths::new(directory, name);
        paths.validate()?;
        if self.ensure_private_key(&paths)? {
            info!("Generated new private key for {name} in {}", directory.display());
        }
        if self.ensure_public_key(&paths)? {
            info!("Derived public key for {name} in {}", directory.display());
        }
        let private_key = fs::read_to_string(paths.private())?;
        let public_key = fs::read_to_string(paths.public())?;
        Ok(KeyPair::new(name, directory, private_key, public_key))
    }

    /// [`provision`](Self::provision) in the default key directory, `/etc/wireguard`.
    pub fn provision_default(&self, name: &str) -> Result<KeyPair, ProvisionError> {
        self.provision(name, DEFAULT_KEY_DIR)
    }

    /// Run the derivation command on `private_key` and return its output verbatim.
    pub fn derive_public_key(&self, private_key: &str) -> Result<String, ProvisionError> {
        let public = self.tool.pubkey(&self.runner, private_key.as_bytes())?;
        into_text(public)
    }

    /// Re-derive the public key from the stored private key and compare it with the stored public key.
    ///
    /// Returns `Ok(false)` on a mismatch. Both files must already exist; nothing is written.
    pub fn verify<P: AsRef<Path>>(&self, name: &str, directory: P) -> Result<bool, ProvisionError> {
        let paths = KeyPaths::new(directory, name);
        let private_key = Zeroizing::new(fs::read(paths.private())?);
        let stored = fs::read(paths.public())?;
        let derived = self.tool.pubkey(&self.runner, &private_key)?;
        debug!("Verifying {}: {} stored bytes, {} derived bytes", paths.public().display(), stored.len(), derived.len());
        Ok(derived == stored)
    }

    /// Returns true if a new private key was written.
    fn ensure_private_key(&self, paths: &KeyPaths) -> Result<bool, ProvisionError> {
        if paths.private().exists() {
            debug!("{} exists, keeping it", paths.private().display());
            return Ok(false);
        }
        let private_key = self.tool.genkey(&self.runner)?;
        write_secret(paths.private(), &private_key)?;
        if paths.public().exists() {
            debug!("Removing stale public key {}", paths.public().display());
            fs::remove_file(paths.public())?;
        }
        Ok(true)
    }

    /// Returns true if a new public key was written.
    fn ensure_public_key(&self, paths: &KeyPaths) -> Result<bool, ProvisionError> {
        if paths.public().exists() {
            debug!("{} exists, keeping it", paths.public().display());
            return Ok(false);
        }
        let private_key = Zeroizing::new(fs::read(paths.private())?);
        let public_key = self.tool.pubkey(&self.runner, &private_key)?;
        fs::write(paths.public(), public_key)?;
        Ok(true)
    }
}

/// Create or truncate `path` and write `contents`. New files are only readable by the owner.
fn write_secret(path: &Path, contents: &[u8]) -> Result<(), std::io::Error> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.flush()
}

fn into_text(bytes: Vec<u8>) -> Result<String, ProvisionError> {
    String::from_utf8(bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
