use libwgkey::ProvisionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    InvalidConfig(#[from] serde_yml::Error),
    #[error("Could not encode output: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    #[error("The public key in {0} does not match its private key")]
    KeyMismatch(String),
}
