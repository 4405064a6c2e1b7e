use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{} is a directory", .0.display())]
    InvalidPath(PathBuf),
    #[error("{} is not writable", .0.display())]
    NotWritable(PathBuf),
    #[error("Error while generating private key with {program} (Exitcode: {}): {output}", fmt_code(.code))]
    KeyGeneration { program: String, code: Option<i32>, output: String },
    #[error("Error while generating pubkey with {program} (Exitcode: {}): {output}", fmt_code(.code))]
    KeyDerivation { program: String, code: Option<i32>, output: String },
    #[error("Could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// The exit code reported by the external tool, if this error came from a failed invocation.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProvisionError::KeyGeneration { code, .. } | ProvisionError::KeyDerivation { code, .. } => *code,
            _ => None,
        }
    }
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "killed by signal".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derivation_error_carries_exit_code() {
        let err = ProvisionError::KeyDerivation {
            program: "/usr/bin/wg".into(),
            code: Some(1),
            output: "Key is not the correct length or format".into(),
        };
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(
            err.to_string(),
            "Error while generating pubkey with /usr/bin/wg (Exitcode: 1): Key is not the correct length or format"
        );
    }

    #[test]
    fn path_errors_name_the_path() {
        let err = ProvisionError::InvalidPath(PathBuf::from("/etc/wireguard/wg0.key"));
        assert_eq!(err.to_string(), "/etc/wireguard/wg0.key is a directory");
        assert_eq!(err.exit_code(), None);
        let err = ProvisionError::NotWritable(PathBuf::from("/etc/wireguard"));
        assert_eq!(err.to_string(), "/etc/wireguard is not writable");
    }

    #[test]
    fn signal_termination_has_no_code() {
        let err = ProvisionError::KeyGeneration { program: "wg".into(), code: None, output: String::new() };
        assert_eq!(err.exit_code(), None);
        assert!(err.to_string().contains("killed by signal"));
    }
}
