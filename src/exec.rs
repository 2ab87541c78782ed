//! Bounded subprocess execution for git and the workflow launcher.
//!
//! Every external process runs under a fixed wall-clock bound with both
//! output streams captured. Two failure policies coexist:
//!
//! - **Lenient** ([`run`], [`run_shell`]): a non-zero exit is reported
//!   inside the returned [`CommandOutput`]; the caller decides whether to
//!   continue. Used by the refresh sweep, which must attempt every clone.
//! - **Strict** ([`run_checked`]): a non-zero exit logs the captured
//!   stdout for diagnosis and becomes a
//!   [`NightjarError::CommandFailed`], aborting the caller's operation.
//!
//! Spawn failures and timeouts are errors under both policies.

use log::*;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::NightjarError;

/// Wall-clock bound applied to every external process.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured outcome of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Run `program` with `args`, reporting a non-zero exit in the returned
/// output rather than as an error.
pub fn run(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, NightjarError> {
    let rendered = render(program, args);
    let mut command = Command::new(program);
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    run_with_timeout(command, rendered, COMMAND_TIMEOUT)
}

/// Run a full command line through `sh -c`, lenient like [`run`].
pub fn run_shell(
    command_line: &str,
    cwd: Option<&Path>,
) -> Result<CommandOutput, NightjarError> {
    let mut command = Command::new("sh");
    command.args(["-c", command_line]);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    run_with_timeout(command, command_line.to_string(), COMMAND_TIMEOUT)
}

/// Strict variant of [`run`]: a non-zero exit becomes
/// [`NightjarError::CommandFailed`] carrying the command and stderr, after
/// the captured stdout is logged so operators can see what the failing
/// tool printed.
pub fn run_checked(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, NightjarError> {
    let output = run(program, args, cwd)?;

    if !output.success() {
        if !output.stdout.is_empty() {
            error!("{}", output.stdout);
        }
        return Err(NightjarError::CommandFailed {
            command: render(program, args),
            stderr: output.stderr,
        });
    }

    Ok(output)
}

fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn run_with_timeout(
    mut command: Command,
    rendered: String,
    timeout: Duration,
) -> Result<CommandOutput, NightjarError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| {
        NightjarError::CommandIo {
            command: rendered.clone(),
            source,
        }
    })?;

    // Drain both pipes off-thread so a chatty child can't deadlock
    // against a full pipe buffer while we poll for exit.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        let polled =
            child.try_wait().map_err(|source| NightjarError::CommandIo {
                command: rendered.clone(),
                source,
            })?;

        match polled {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(NightjarError::CommandTimedOut {
                    command: rendered,
                    seconds: timeout.as_secs(),
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    Ok(CommandOutput {
        status: status.code(),
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(
    stream: Option<R>,
) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}
