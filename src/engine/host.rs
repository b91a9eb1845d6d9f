use crate::config::Legacy;
use anyhow::{Context, Result, anyhow};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// An application able to open a Word 97-2003 document and hand back its text.
/// Implementations must not leave the application running once the call returns,
/// whatever the outcome.
pub trait WordHost {
    fn paragraphs(&self, input: &Path) -> Result<Vec<String>>;
}

impl<H: WordHost + ?Sized> WordHost for &H {
    fn paragraphs(&self, input: &Path) -> Result<Vec<String>> {
        (**self).paragraphs(input)
    }
}

/// Runs a headless office suite (`soffice --cat` by default) that prints the
/// document's text to stdout, one paragraph per line.
#[derive(Debug, Clone)]
pub struct OfficeHost {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl OfficeHost {
    pub fn new(cfg: &Legacy) -> Self {
        let timeout = if cfg.timeout_seconds > 0 {
            Some(Duration::from_secs(cfg.timeout_seconds))
        } else {
            None
        };
        Self {
            program: resolve_host_program(&cfg.program),
            args: cfg.args.clone(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Asks the host for its version banner; used by `doctor`.
    pub fn version(&self) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--version");
        let out = HostGuard::spawn(&mut cmd)?.wait(self.timeout)?;
        if !out.status.success() {
            return Err(anyhow!(
                "{} --version exited with {}",
                self.program.display(),
                out.status
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}

impl WordHost for OfficeHost {
    fn paragraphs(&self, input: &Path) -> Result<Vec<String>> {
        debug!(
            "office host {} {:?} {} timeout={:?}",
            self.program.display(),
            self.args,
            input.display(),
            self.timeout
        );
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(input);

        let out = HostGuard::spawn(&mut cmd)?.wait(self.timeout)?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(anyhow!(
                "office host failed ({}): {}\n{}",
                out.status,
                self.program.display(),
                stderr.trim()
            ));
        }
        if !out.stderr.is_empty() {
            debug!(
                "office host stderr: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }

        let text = String::from_utf8_lossy(&out.stdout);
        Ok(text.split_inclusive('\n').map(str::to_string).collect())
    }
}

fn resolve_host_program(raw: &str) -> PathBuf {
    if let Ok(env_val) = std::env::var("RESUME_NLU_OFFICE") {
        if !env_val.trim().is_empty() {
            return expand_tilde(env_val.trim());
        }
    }
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        return PathBuf::from("soffice");
    }
    expand_tilde(raw)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[derive(Debug)]
pub struct HostOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Owns a spawned host process. The host runs as the leader of its own
/// process group, so launchers that fork the real application (`soffice`
/// forks `oosplash`, which forks `soffice.bin`) are torn down as a whole.
/// Dropping the guard kills the group and reaps the leader.
#[derive(Debug)]
pub struct HostGuard {
    child: Child,
}

impl HostGuard {
    pub fn spawn(cmd: &mut Command) -> Result<Self> {
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        let child = cmd
            .spawn()
            .with_context(|| format!("spawning host: {:?}", cmd.get_program()))?;
        Ok(Self { child })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Waits for exit while draining stdout/stderr so a chatty host can't
    /// block on a full pipe. Past `timeout` the host is killed and this fails.
    pub fn wait(mut self, timeout: Option<Duration>) -> Result<HostOutput> {
        let stdout_thread = drain(self.child.stdout.take(), "stdout");
        let stderr_thread = drain(self.child.stderr.take(), "stderr");

        let start = Instant::now();
        loop {
            if let Some(status) = self.child.try_wait().with_context(|| "try_wait")? {
                // Anything the leader left behind still holds our pipes.
                self.kill_group();
                return Ok(HostOutput {
                    status,
                    stdout: join(stdout_thread, "stdout")?,
                    stderr: join(stderr_thread, "stderr")?,
                });
            }

            if let Some(limit) = timeout {
                if start.elapsed() > limit {
                    warn!("host process {} timed out after {:?}", self.child.id(), limit);
                    self.kill_group();
                    self.child.wait().with_context(|| "wait after kill")?;
                    let _ = join(stdout_thread, "stdout");
                    let _ = join(stderr_thread, "stderr");
                    return Err(anyhow!("host process exceeded timeout ({:?})", limit));
                }
            }

            std::thread::sleep(Duration::from_millis(50));
        }
    }

    #[cfg(unix)]
    fn kill_group(&mut self) {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let pgid = self.child.id();
        match killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL) {
            Ok(()) => debug!("killed host process group {pgid}"),
            // ESRCH: the group is already empty.
            Err(nix::errno::Errno::ESRCH) => {}
            Err(e) => {
                warn!("killpg {pgid} failed: {e}; killing leader only");
                let _ = self.child.kill();
            }
        }
    }

    #[cfg(not(unix))]
    fn kill_group(&mut self) {
        if self.child.kill().is_ok() {
            debug!("killed host process {}", self.child.id());
        }
    }
}

impl Drop for HostGuard {
    fn drop(&mut self) {
        self.kill_group();
        let _ = self.child.wait();
    }
}

fn drain<R: Read + Send + 'static>(
    reader: Option<R>,
    name: &'static str,
) -> JoinHandle<Result<Vec<u8>>> {
    std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut r) = reader {
            r.read_to_end(&mut buf)
                .with_context(|| format!("read {name}"))?;
        }
        Ok(buf)
    })
}

fn join(handle: JoinHandle<Result<Vec<u8>>>, name: &str) -> Result<Vec<u8>> {
    handle
        .join()
        .map_err(|_| anyhow!("{name} reader thread panicked"))?
}
