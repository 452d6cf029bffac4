use super::{CommandResult, CommandRunner, Invocation, Privilege};
use crate::ui;
use std::io::{Read, Write};
use std::process::{Command, Output, Stdio};
use std::thread;

/// Runner backed by real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    privilege: Privilege,
}

impl SystemRunner {
    pub fn new(privilege: Privilege) -> Self {
        Self { privilege }
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> CommandResult {
        let argv = self.privilege.argv(invocation);
        if invocation.is_privileged() && self.privilege == Privilege::Sudo {
            ui::verbose(&format!("$ sudo {}", invocation.display()));
        } else {
            ui::verbose(&format!("$ {}", invocation.display()));
        }

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);

        match run_captured(&mut cmd, invocation.input()) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                if output.status.success() {
                    CommandResult::success(stdout)
                } else {
                    ui::verbose(&format!(
                        "  exited with {}",
                        output
                            .status
                            .code()
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "signal".to_string())
                    ));
                    CommandResult {
                        succeeded: false,
                        output: stdout.trim().to_string(),
                        error_text: stderr.trim().to_string(),
                    }
                }
            }
            Err(reason) => CommandResult::failure(format!("{}: {}", argv[0], reason)),
        }
    }
}

/// Run a command to completion, capturing both streams.
///
/// Readers drain stdout/stderr on their own threads so a chatty command can
/// never block on a full pipe while we are still writing its stdin.
fn run_captured(cmd: &mut Command, input: Option<&str>) -> std::io::Result<Output> {
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("Failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("Failed to capture stderr"))?;

    let stdout_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stdout).read_to_end(&mut buf);
        buf
    });
    let stderr_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stderr).read_to_end(&mut buf);
        buf
    });

    if let Some(text) = input
        && let Some(mut stdin) = child.stdin.take()
    {
        // The child may exit before reading everything; that shows up in its status.
        let _ = stdin.write_all(text.as_bytes());
    }

    let status = child.wait()?;
    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}
