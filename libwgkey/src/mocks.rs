//! A scripted stand-in for the `wg` tool.
//!
//! Not intended for production use. [`MockRunner`] answers `genkey` with a numbered fake private key and `pubkey`
//! with a value derived from whatever arrives on stdin, and records every call so tests can assert on how many
//! times the external tool would have been invoked.

use crate::command::{CommandOutput, CommandRunner, KeyTool};
use crate::error::ProvisionError;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

const MOCK_PRIVATE_PREFIX: &str = "private-";

/// A recorded call to the mock tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    GenKey,
    PubKey(Vec<u8>),
    Other(Vec<String>),
}

#[derive(Debug, Default)]
pub struct MockRunner {
    generated: Cell<usize>,
    calls: RefCell<Vec<(PathBuf, Invocation)>>,
    genkey_failure: Option<(i32, String)>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `genkey` call exit with `code`, printing `message` on stderr.
    pub fn fail_genkey<S: Into<String>>(mut self, code: i32, message: S) -> Self {
        self.genkey_failure = Some((code, message.into()));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().iter().map(|(_, inv)| inv.clone()).collect()
    }

    pub fn programs(&self) -> Vec<PathBuf> {
        self.calls.borrow().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// The public key the mock derives for `private_key`, or `None` if the mock would reject it.
    pub fn expected_public_key(private_key: &str) -> Option<String> {
        let trimmed = private_key.trim_end();
        trimmed.starts_with(MOCK_PRIVATE_PREFIX).then(|| format!("public({trimmed})\n"))
    }

    fn genkey(&self) -> CommandOutput {
        if let Some((code, message)) = &self.genkey_failure {
            return CommandOutput { code: Some(*code), stdout: Vec::new(), stderr: message.clone().into_bytes() };
        }
        let n = self.generated.get() + 1;
        self.generated.set(n);
        CommandOutput { code: Some(0), stdout: format!("{MOCK_PRIVATE_PREFIX}{n}\n").into_bytes(), stderr: Vec::new() }
    }

    fn pubkey(&self, stdin: &[u8]) -> CommandOutput {
        let input = String::from_utf8_lossy(stdin);
        match Self::expected_public_key(&input) {
            Some(public) => CommandOutput { code: Some(0), stdout: public.into_bytes(), stderr: Vec::new() },
            None => CommandOutput {
                code: Some(1),
                stdout: Vec::new(),
                stderr: b"Key is not the correct length or format\n".to_vec(),
            },
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &Path, args: &[&str], stdin: Option<&[u8]>) -> Result<CommandOutput, ProvisionError> {
        let (invocation, output) = match (args, stdin) {
            (a, None) if a == KeyTool::GENKEY_ARGS => (Invocation::GenKey, self.genkey()),
            (a, Some(input)) if a == KeyTool::PUBKEY_ARGS => (Invocation::PubKey(input.to_vec()), self.pubkey(input)),
            _ => {
                let args = args.iter().map(|s| s.to_string()).collect();
                let output = CommandOutput { code: Some(64), stdout: Vec::new(), stderr: b"unknown command\n".to_vec() };
                (Invocation::Other(args), output)
            }
        };
        self.calls.borrow_mut().push((program.to_path_buf(), invocation));
        Ok(output)
    }
}
