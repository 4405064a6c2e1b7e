use serde::Serialize;
use std::fmt::{Debug, Display};
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

/// The contents of an interface's key files, exactly as they are stored on disk.
///
/// Neither key is parsed. The private key is wiped from memory when the pair is dropped and never shows up in
/// `Debug` output.
#[derive(Serialize, PartialEq, Eq)]
pub struct KeyPair {
    interface: String,
    directory: PathBuf,
    private_key: String,
    public_key: String,
}

impl KeyPair {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(interface: S, directory: P, private_key: String, public_key: String) -> Self {
        Self { interface: interface.into(), directory: directory.into(), private_key, public_key }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Returns `(private, public)`, in that order.
    pub fn keys(&self) -> (&str, &str) {
        (&self.private_key, &self.public_key)
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl Display for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.interface, self.public_key.trim_end())
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("interface", &self.interface)
            .field("directory", &self.directory)
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}
