//! Access to the external key tool.
//!
//! All key material is produced by an external program (normally `wg`). The provisioner never talks to the
//! program directly; it goes through a [`CommandRunner`], which makes it possible to swap the real process
//! invocation for a scripted one in tests.

use crate::error::ProvisionError;
use log::trace;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use zeroize::Zeroizing;

/// Default location of the `wg` binary.
pub const DEFAULT_WG_PATH: &str = "/usr/bin/wg";

/// The captured result of running an external command to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// The exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Standard output followed by standard error, as lossy UTF-8. This is what a shell `2>&1` redirect would show.
    pub fn combined_output(&self) -> String {
        let mut bytes = self.stdout.clone();
        bytes.extend_from_slice(&self.stderr);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Runs a program with an explicit argument list, optionally feeding it data on standard input.
///
/// Implementations must not pass the arguments through a shell.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[&str], stdin: Option<&[u8]>) -> Result<CommandOutput, ProvisionError>;
}

/// A [`CommandRunner`] that spawns real processes and blocks until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str], stdin: Option<&[u8]>) -> Result<CommandOutput, ProvisionError> {
        let spawn_error = |source| ProvisionError::Spawn { program: program.display().to_string(), source };
        trace!("Running {} {}", program.display(), args.join(" "));
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = command.spawn().map_err(spawn_error)?;
        if let Some(input) = stdin {
            // Dropping the handle at the end of the block closes the pipe so the child sees EOF.
            if let Some(mut pipe) = child.stdin.take() {
                match pipe.write_all(input) {
                    // The tool quit without reading all of its input. Its exit status still tells us what went wrong.
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        trace!("{} closed its stdin early", program.display())
                    }
                    result => result?,
                }
            }
        }
        let output = child.wait_with_output()?;
        trace!("{} exited with {:?}", program.display(), output.status.code());
        Ok(CommandOutput { code: output.status.code(), stdout: output.stdout, stderr: output.stderr })
    }
}

/// The external key tool and the two invocations the provisioner needs from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTool {
    program: PathBuf,
}

impl KeyTool {
    pub const GENKEY_ARGS: [&'static str; 1] = ["genkey"];
    pub const PUBKEY_ARGS: [&'static str; 1] = ["pubkey"];

    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Generate a new private key. The tool's standard output is returned verbatim and wiped when dropped.
    pub fn genkey<R: CommandRunner>(&self, runner: &R) -> Result<Zeroizing<Vec<u8>>, ProvisionError> {
        let output = runner.run(&self.program, &Self::GENKEY_ARGS, None)?;
        if !output.success() {
            return Err(ProvisionError::KeyGeneration {
                program: self.program.display().to_string(),
                code: output.code,
                output: output.combined_output(),
            });
        }
        Ok(Zeroizing::new(output.stdout))
    }

    /// Derive the public key for `private_key`. The tool's standard output is returned verbatim.
    pub fn pubkey<R: CommandRunner>(&self, runner: &R, private_key: &[u8]) -> Result<Vec<u8>, ProvisionError> {
        let output = runner.run(&self.program, &Self::PUBKEY_ARGS, Some(private_key))?;
        if !output.success() {
            return Err(ProvisionError::KeyDerivation {
                program: self.program.display().to_string(),
                code: output.code,
                output: output.combined_output(),
            });
        }
        Ok(output.stdout)
    }
}

impl Default for KeyTool {
    fn default() -> Self {
        Self::new(DEFAULT_WG_PATH)
    }
}
