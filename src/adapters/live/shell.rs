//! Live shell executor using `std::process::Command`.
//!
//! The command runs in its own process group so that a timeout can take
//! down everything the shell started, not just the shell. Output streams
//! are drained on helper threads into capped buffers.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::GatewayConfig;
use crate::ports::shell::{ShellExecutor, ShellOutput, ShellRequest, TIMEOUT_EXIT_CODE};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_CHUNK: usize = 8 * 1024;

/// Live shell executor that runs commands via the configured shell.
pub struct LiveShellExecutor {
    program: String,
    args: Vec<String>,
    max_output_bytes: usize,
    kill_grace: Duration,
}

impl LiveShellExecutor {
    /// Creates an executor that runs `program args... <command>`.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        max_output_bytes: usize,
        kill_grace: Duration,
    ) -> Self {
        Self { program: program.into(), args, max_output_bytes, kill_grace }
    }

    /// Creates an executor from the shell settings of `config`.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            config.shell.clone(),
            config.shell_args.clone(),
            config.max_output_bytes,
            config.kill_grace(),
        )
    }

    /// Politely stops the process group, then forcibly kills whatever is left.
    fn terminate(&self, child: &mut Child) -> io::Result<ExitStatus> {
        #[cfg(unix)]
        {
            use nix::sys::signal::Signal;

            signal_group(child.id(), Signal::SIGTERM);
            let exited = wait_until(child, Instant::now() + self.kill_grace)?;
            signal_group(child.id(), Signal::SIGKILL);
            match exited {
                Some(status) => Ok(status),
                None => child.wait(),
            }
        }
        #[cfg(not(unix))]
        {
            let _ = self.kill_grace;
            let _ = child.kill();
            child.wait()
        }
    }

    /// Gathers both captured streams. Pipes still held open at the deadline
    /// by background processes get their process group killed.
    fn collect(
        &self,
        rx: &Receiver<(Stream, Captured)>,
        mut pending: usize,
        deadline: Instant,
        leader: u32,
        output: &mut ShellOutput,
    ) {
        let mut killed = output.timed_out;
        while pending > 0 {
            let wait = if killed {
                self.kill_grace
            } else {
                deadline.saturating_duration_since(Instant::now())
            };
            match rx.recv_timeout(wait) {
                Ok((stream, captured)) => {
                    pending -= 1;
                    output.truncated |= captured.truncated;
                    let text = String::from_utf8_lossy(&captured.bytes).into_owned();
                    match stream {
                        Stream::Stdout => output.stdout = text,
                        Stream::Stderr => output.stderr = text,
                    }
                }
                Err(RecvTimeoutError::Timeout) if !killed => {
                    tracing::warn!(leader, "output still open at the deadline, killing process group");
                    #[cfg(unix)]
                    signal_group(leader, nix::sys::signal::Signal::SIGKILL);
                    killed = true;
                }
                Err(_) => {
                    tracing::warn!(pending, "abandoning output held open by an escaped process");
                    break;
                }
            }
        }
    }
}

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, request: &ShellRequest<'_>) -> io::Result<ShellOutput> {
        let deadline = Instant::now() + request.timeout;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(request.command)
            .current_dir(request.working_dir)
            .stdin(Stdio::null());
        if request.capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        tracing::info!(
            shell = %self.program,
            cwd = %request.working_dir.display(),
            timeout_secs = request.timeout.as_secs(),
            "spawning command"
        );
        let mut child = command.spawn()?;

        let (tx, rx) = mpsc::channel();
        let mut pending = 0;
        if let Some(stdout) = child.stdout.take() {
            spawn_capture(stdout, Stream::Stdout, self.max_output_bytes, tx.clone())?;
            pending += 1;
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_capture(stderr, Stream::Stderr, self.max_output_bytes, tx.clone())?;
            pending += 1;
        }
        drop(tx);

        let mut output = ShellOutput::default();
        match wait_until(&mut child, deadline)? {
            Some(status) => output.exit_code = exit_code(status),
            None => {
                tracing::warn!(pid = child.id(), "command timed out, terminating");
                self.terminate(&mut child)?;
                output.timed_out = true;
                output.exit_code = TIMEOUT_EXIT_CODE;
            }
        }

        self.collect(&rx, pending, deadline, child.id(), &mut output);
        if output.truncated {
            tracing::warn!(cap = self.max_output_bytes, "command output truncated");
        }
        tracing::debug!(exit_code = output.exit_code, timed_out = output.timed_out, "command finished");
        Ok(output)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

struct Captured {
    bytes: Vec<u8>,
    truncated: bool,
}

/// Reads `source` to EOF, keeping at most `cap` bytes. Reading continues
/// past the cap so the writer never blocks on a full pipe.
fn capture(mut source: impl Read, cap: usize) -> Captured {
    let mut bytes = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match source.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let room = cap.saturating_sub(bytes.len());
                if n > room {
                    truncated = true;
                }
                bytes.extend_from_slice(&chunk[..n.min(room)]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                tracing::warn!("stopped reading command output: {e}");
                break;
            }
        }
    }
    Captured { bytes, truncated }
}

fn spawn_capture<R>(
    source: R,
    stream: Stream,
    cap: usize,
    tx: Sender<(Stream, Captured)>,
) -> io::Result<()>
where
    R: Read + Send + 'static,
{
    thread::Builder::new().name(format!("filegate-{stream:?}").to_lowercase()).spawn(
        move || {
            let captured = capture(source, cap);
            let _ = tx.send((stream, captured));
        },
    )?;
    Ok(())
}

fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    TIMEOUT_EXIT_CODE
}

#[cfg(unix)]
fn signal_group(leader: u32, signal: nix::sys::signal::Signal) {
    use nix::errno::Errno;
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    let Ok(pgid) = i32::try_from(leader) else {
        return;
    };
    match killpg(Pid::from_raw(pgid), signal) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => tracing::warn!(pgid, ?signal, "failed to signal process group: {e}"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::Path;

    use super::*;

    fn shell() -> LiveShellExecutor {
        LiveShellExecutor::new("/bin/sh", vec!["-c".into()], 1024 * 1024, Duration::from_millis(200))
    }

    fn request(command: &str) -> ShellRequest<'_> {
        ShellRequest {
            command,
            working_dir: Path::new("/"),
            timeout: Duration::from_secs(10),
            capture_output: true,
        }
    }

    #[test]
    fn runs_echo_command() {
        let result = shell().run(&request("echo hello")).unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
        assert!(!result.timed_out);
    }

    #[test]
    fn captures_exit_code() {
        let result = shell().run(&request("exit 42")).unwrap();

        assert_eq!(result.exit_code, 42);
    }

    #[test]
    fn separates_stdout_and_stderr() {
        let result = shell().run(&request("echo out; echo err >&2")).unwrap();

        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[test]
    fn runs_in_requested_directory() {
        let dir = std::env::temp_dir().canonicalize().unwrap();
        let req = ShellRequest { working_dir: &dir, ..request("pwd") };
        let result = shell().run(&req).unwrap();

        assert_eq!(Path::new(result.stdout.trim()).canonicalize().unwrap(), dir);
    }

    #[test]
    fn discards_output_when_capture_is_off() {
        let req = ShellRequest { capture_output: false, ..request("echo noisy; exit 3") };
        let result = shell().run(&req).unwrap();

        assert!(result.stdout.is_empty());
        assert!(result.stderr.is_empty());
        assert_eq!(result.exit_code, 3);
    }

    #[test]
    fn signal_deaths_map_above_128() {
        let result = shell().run(&request("kill -9 $$")).unwrap();

        assert_eq!(result.exit_code, 137);
    }

    #[test]
    fn timeout_kills_and_reports_sentinel() {
        let req = ShellRequest { timeout: Duration::from_secs(1), ..request("sleep 5") };
        let started = Instant::now();
        let result = shell().run(&req).unwrap();

        assert!(result.timed_out);
        assert_eq!(result.exit_code, TIMEOUT_EXIT_CODE);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn output_beyond_cap_is_truncated() {
        let small = LiveShellExecutor::new("/bin/sh", vec!["-c".into()], 1000, Duration::from_millis(200));
        let result = small.run(&request("i=0; while [ $i -lt 500 ]; do echo 0123456789; i=$((i+1)); done")).unwrap();

        assert_eq!(result.stdout.len(), 1000);
        assert!(result.truncated);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn background_holder_of_pipes_is_reaped_at_deadline() {
        let req = ShellRequest {
            timeout: Duration::from_secs(1),
            ..request("sleep 30 & echo started")
        };
        let started = Instant::now();
        let result = shell().run(&req).unwrap();

        assert!(!result.timed_out);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "started\n");
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
