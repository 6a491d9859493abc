//! Shell command execution.
//!
//! Every command runs with captured output and an optional time budget.
//! A command that outlives its budget is killed along with its process
//! group and reported as [`PreflightError::CommandTimedOut`]. The budget
//! also covers anything the command left running with its output pipes
//! open. Ctrl-C kills the group and yields [`PreflightError::Interrupted`].

use crate::error::{PreflightError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::interrupt::interrupt_flag;
use super::platform::{command_flag, default_shell};

/// How often a running child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Shell program (None = platform default).
    pub shell: Option<String>,

    /// Time budget (None = no timeout).
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    fn shell_program(&self) -> &str {
        self.shell.as_deref().unwrap_or(default_shell())
    }

    fn build(&self, shown: &str) -> Command {
        let mut cmd = Command::new(self.shell_program());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        tracing::debug!("Running `{}` with {}", shown, self.shell_program());
        cmd
    }
}

/// Execute a command string through the shell (`<shell> -c <command>`).
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let mut cmd = options.build(command);
    cmd.arg(command_flag(options.shell_program()));
    cmd.arg(command);
    run_captured(cmd, command, options.timeout)
}

/// Execute a script file with the shell (`<shell> <path>`).
pub fn execute_script(script: &Path, options: &CommandOptions) -> Result<CommandResult> {
    let display = script.display().to_string();
    let mut cmd = options.build(&display);
    cmd.arg(script);
    run_captured(cmd, &display, options.timeout)
}

fn run_captured(mut cmd: Command, shown: &str, timeout: Option<Duration>) -> Result<CommandResult> {
    let start = Instant::now();
    let deadline = timeout.map(|limit| start + limit);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    // Own process group, so background jobs can be killed with the shell.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!("Failed to spawn `{}`: {}", shown, e);
        PreflightError::CommandFailed {
            command: shown.to_string(),
            code: None,
        }
    })?;

    let (tx, rx) = mpsc::channel();
    spawn_reader(child.stdout.take(), Stream::Stdout, tx.clone());
    spawn_reader(child.stderr.take(), Stream::Stderr, tx);

    let waited = match wait_until(&mut child, deadline)? {
        Wait::Done(status) => collect_output(&rx, deadline).map(|output| (status, output)),
        Wait::TimedOut => Err(Wait::TimedOut),
        Wait::Interrupted => Err(Wait::Interrupted),
    };

    let (status, (stdout, stderr)) = match waited {
        Ok(done) => done,
        Err(reason) => {
            terminate(&mut child);
            return Err(match reason {
                Wait::Interrupted => PreflightError::Interrupted,
                _ => PreflightError::CommandTimedOut {
                    command: shown.to_string(),
                    seconds: timeout.map(|limit| limit.as_secs()).unwrap_or_default(),
                },
            });
        }
    };
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(status.code(), stdout, stderr, duration))
    }
}

enum Stream {
    Stdout,
    Stderr,
}

enum Wait {
    Done(ExitStatus),
    TimedOut,
    Interrupted,
}

fn spawn_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
    stream: Stream,
    tx: Sender<(Stream, String)>,
) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
}

fn wait_until(child: &mut Child, deadline: Option<Instant>) -> Result<Wait> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Wait::Done(status));
        }
        if interrupt_flag().load(Ordering::SeqCst) {
            return Ok(Wait::Interrupted);
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Ok(Wait::TimedOut);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Wait for both readers. A process left behind by the shell keeps the pipes
/// open, so this is bounded by the same deadline as the shell itself.
fn collect_output(
    rx: &Receiver<(Stream, String)>,
    deadline: Option<Instant>,
) -> std::result::Result<(String, String), Wait> {
    let mut stdout = None;
    let mut stderr = None;
    while stdout.is_none() || stderr.is_none() {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok((Stream::Stdout, text)) => stdout = Some(text),
            Ok((Stream::Stderr, text)) => stderr = Some(text),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if interrupt_flag().load(Ordering::SeqCst) {
                    return Err(Wait::Interrupted);
                }
                if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    return Err(Wait::TimedOut);
                }
            }
        }
    }
    Ok((stdout.unwrap_or_default(), stderr.unwrap_or_default()))
}

/// Kill the shell and everything else in its process group.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: plain syscall on the group this child leads.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}
