//! Privileged command runner
//!
//! Every external operation hostprep performs goes through [`CommandRunner`].
//! Flows describe *what* to run as an [`Invocation`]; whether it is wrapped in
//! `sudo` is decided by the runner's [`Privilege`], so the flows themselves
//! never mention privilege escalation and can be exercised with a fake runner.

mod exec;

pub use exec::SystemRunner;

use serde::Serialize;

/// Outcome of one external command.
///
/// A non-zero exit is not an error at this layer; it is a normal result with
/// `succeeded == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub succeeded: bool,
    pub output: String,
    pub error_text: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            output: output.into().trim().to_string(),
            error_text: String::new(),
        }
    }

    pub fn failure(error_text: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: String::new(),
            error_text: error_text.into().trim().to_string(),
        }
    }

    /// Best text to show an operator when the command failed
    pub fn failure_message(&self) -> &str {
        if self.error_text.is_empty() {
            &self.output
        } else {
            &self.error_text
        }
    }
}

/// How mutating commands gain the rights they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    /// Prefix privileged invocations with `sudo`
    #[default]
    Sudo,
    /// Run everything as the current user (already root, or a container)
    Direct,
}

impl Privilege {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sudo" => Some(Privilege::Sudo),
            "direct" | "none" => Some(Privilege::Direct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::Sudo => "sudo",
            Privilege::Direct => "direct",
        }
    }

    /// Full argv for `invocation` under this privilege mode
    pub fn argv(&self, invocation: &Invocation) -> Vec<String> {
        let mut argv = Vec::with_capacity(invocation.args.len() + 2);
        if invocation.privileged && *self == Privilege::Sudo {
            argv.push("sudo".to_string());
        }
        argv.push(invocation.program.clone());
        argv.extend(invocation.args.iter().cloned());
        argv
    }
}

/// A command to run, independent of how privilege is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    stdin: Option<String>,
    privileged: bool,
    secret_args: Vec<usize>,
}

impl Invocation {
    /// A privileged invocation of `program`
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            stdin: None,
            privileged: true,
            secret_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument that must never appear in logs
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secret_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Feed `input` to the command's standard input
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Run as the invoking user even when the runner escalates
    pub fn unprivileged(mut self) -> Self {
        self.privileged = false;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn input(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    /// Program and arguments as one vector, secrets included
    pub fn command_line(&self) -> Vec<String> {
        let mut argv = vec![self.program.clone()];
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Shell-quoted rendering for logs; secret arguments are masked
    pub fn display(&self) -> String {
        let mut words = vec![self.program.as_str()];
        for (idx, arg) in self.args.iter().enumerate() {
            if self.secret_args.contains(&idx) {
                words.push("********");
            } else {
                words.push(arg.as_str());
            }
        }

        shlex::try_join(words.iter().copied()).unwrap_or_else(|_| words.join(" "))
    }
}

/// Executes invocations synchronously.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> CommandResult;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, invocation: &Invocation) -> CommandResult {
        (**self).run(invocation)
    }
}
