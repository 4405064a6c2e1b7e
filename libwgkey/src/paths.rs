use crate::error::ProvisionError;
use std::path::{Path, PathBuf};

/// Default directory for WireGuard key files.
pub const DEFAULT_KEY_DIR: &str = "/etc/wireguard";
pub const PRIVATE_KEY_EXT: &str = "key";
pub const PUBLIC_KEY_EXT: &str = "pub";

/// The on-disk location of an interface's key pair: `<dir>/<name>.key` and `<dir>/<name>.pub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    private: PathBuf,
    public: PathBuf,
}

impl KeyPaths {
    /// The interface name is used verbatim.
    pub fn new<P: AsRef<Path>>(directory: P, name: &str) -> Self {
        let directory = directory.as_ref();
        Self {
            private: directory.join(format!("{name}.{PRIVATE_KEY_EXT}")),
            public: directory.join(format!("{name}.{PUBLIC_KEY_EXT}")),
        }
    }

    pub fn private(&self) -> &Path {
        &self.private
    }

    pub fn public(&self) -> &Path {
        &self.public
    }

    /// Check both target paths before anything is touched.
    ///
    /// Each path, private first, must not be an existing directory and its parent directory must be writable.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        for path in [&self.private, &self.public] {
            if path.is_dir() {
                return Err(ProvisionError::InvalidPath(path.clone()));
            }
            let dir = parent_dir(path);
            if !is_writable_dir(dir) {
                return Err(ProvisionError::NotWritable(dir.to_path_buf()));
            }
        }
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Whether files can be created in `dir`. A missing directory is not writable.
///
/// A directory without any write permission bit is rejected even for privileged users; otherwise the decision is
/// left to `faccessat(2)` with `AT_EACCESS`, which checks the effective user and honours ownership, groups and ACLs.
pub fn is_writable_dir(dir: &Path) -> bool {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => !meta.permissions().readonly() && access_writable(dir),
        _ => false,
    }
}

#[cfg(unix)]
fn access_writable(dir: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::faccessat(libc::AT_FDCWD, c_path.as_ptr(), libc::W_OK, libc::AT_EACCESS) == 0 }
}

#[cfg(not(unix))]
fn access_writable(_dir: &Path) -> bool {
    true
}
