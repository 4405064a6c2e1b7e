//! Idempotent provisioning of WireGuard interface keys.
//!
//! [`KeyProvisioner::provision`] makes sure `<dir>/<name>.key` and `<dir>/<name>.pub` exist, generating them with
//! `wg genkey` and `wg pubkey` when they don't, and returns their contents. All key material comes from the external
//! tool; this crate only moves bytes between the tool and the filesystem.
//!
//! ```rust,no_run
//! use libwgkey::{KeyProvisioner, KeyTool};
//!
//! let provisioner = KeyProvisioner::new(KeyTool::new("/usr/bin/wg"));
//! let pair = provisioner.provision("wg0", "/etc/wireguard")?;
//! println!("{}", pair.public_key());
//! # Ok::<(), libwgkey::ProvisionError>(())
//! ```

pub mod command;
pub mod error;
pub mod keypair;
pub mod paths;
pub mod provision;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use command::{CommandOutput, CommandRunner, KeyTool, SystemRunner, DEFAULT_WG_PATH};
pub use error::ProvisionError;
pub use keypair::KeyPair;
pub use paths::{KeyPaths, DEFAULT_KEY_DIR};
pub use provision::KeyProvisioner;
