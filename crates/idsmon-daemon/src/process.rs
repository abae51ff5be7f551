//! Backend process launcher
//!
//! Spawns the detection backend with the log directory as its only trailing
//! argument, then waits for the readiness token on stdout. A backend that
//! exits or stays silent past the startup timeout is a fatal launch error.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, watch};

use idsmon_core::prelude::*;

/// Line printed by the backend once its WebSocket server is listening.
pub const BACKEND_READY_TOKEN: &str = "BACKEND_READY";

/// Default wait for [`BACKEND_READY_TOKEN`].
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

/// What to run and how long to wait for it
#[derive(Debug, Clone)]
pub struct BackendLaunch {
    pub program: PathBuf,
    /// Arguments placed before the log directory
    pub args: Vec<String>,
    pub log_dir: PathBuf,
    pub startup_timeout: Duration,
}

impl BackendLaunch {
    pub fn new(program: impl Into<PathBuf>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            log_dir: log_dir.into(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }
}

/// A running backend child process.
///
/// The `Child` is owned by a background wait task; this handle keeps a kill
/// channel and an exit-code watch.
pub struct BackendProcess {
    pid: Option<u32>,
    kill_tx: Option<oneshot::Sender<()>>,
    exited: Arc<AtomicBool>,
    exit_rx: watch::Receiver<Option<Option<i32>>>,
}

impl BackendProcess {
    /// Spawn the backend and wait until it reports ready.
    ///
    /// # Errors
    ///
    /// - [`Error::BackendNotFound`] if the program does not exist
    /// - [`Error::ProcessSpawn`] for any other spawn failure
    /// - [`Error::BackendExited`] if it exits before printing the token
    /// - [`Error::BackendTimeout`] if the token does not arrive in time
    pub async fn launch(launch: &BackendLaunch) -> Result<Self> {
        std::fs::create_dir_all(&launch.log_dir)?;

        info!(
            "Launching backend: {} {} {}",
            launch.program.display(),
            launch.args.join(" "),
            launch.log_dir.display()
        );

        let mut child = Command::new(&launch.program)
            .args(&launch.args)
            .arg(&launch.log_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::BackendNotFound {
                        path: launch.program.clone(),
                    }
                } else {
                    Error::process_spawn(e.to_string())
                }
            })?;

        let pid = child.id();
        info!("Backend process started with PID: {:?}", pid);

        let (ready_tx, ready_rx) = oneshot::channel();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::process_spawn("backend stdout was not captured"))?;
        tokio::spawn(stdout_reader(stdout, ready_tx));

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::process_spawn("backend stderr was not captured"))?;
        tokio::spawn(stderr_reader(stderr));

        let exited = Arc::new(AtomicBool::new(false));
        let (exit_tx, exit_rx) = watch::channel(None);
        let (kill_tx, kill_rx) = oneshot::channel();
        tokio::spawn(wait_for_exit(child, kill_rx, exit_tx, Arc::clone(&exited)));

        let mut process = Self {
            pid,
            kill_tx: Some(kill_tx),
            exited,
            exit_rx,
        };

        let timeout = launch.startup_timeout;
        let mut exit_watch = process.exit_rx.clone();
        let outcome = tokio::time::timeout(timeout, async {
            tokio::select! {
                ready = ready_rx => ready.is_ok(),
                _ = exit_watch.wait_for(Option::is_some) => false,
            }
        })
        .await;

        match outcome {
            Ok(true) => {
                info!("Backend reported ready");
                Ok(process)
            }
            Ok(false) => {
                // stdout may close a moment before the exit status is reaped
                let code = process.wait_exit(Duration::from_millis(500)).await;
                process.kill();
                error!("Backend exited before becoming ready (code: {:?})", code);
                Err(Error::BackendExited { code })
            }
            Err(_) => {
                error!("Backend not ready after {:?}, killing it", timeout);
                process.shutdown().await;
                Err(Error::BackendTimeout {
                    secs: timeout.as_secs(),
                })
            }
        }
    }

    /// Kill the backend and wait briefly for it to be reaped.
    pub async fn shutdown(&mut self) {
        if self.has_exited() {
            debug!("Backend already exited");
            return;
        }
        info!("Stopping backend process");
        self.kill();
        if self.wait_exit(Duration::from_secs(2)).await.is_none() && !self.has_exited() {
            warn!("Backend did not exit within 2s of kill");
        }
    }

    fn kill(&mut self) {
        if let Some(tx) = self.kill_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Exit code once reaped, `None` on timeout or signal termination.
    async fn wait_exit(&mut self, limit: Duration) -> Option<i32> {
        let mut rx = self.exit_rx.clone();
        let code = match tokio::time::timeout(limit, rx.wait_for(Option::is_some)).await {
            Ok(Ok(code)) => (*code).flatten(),
            _ => None,
        };
        code
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }

    pub fn id(&self) -> Option<u32> {
        self.pid
    }
}

impl Drop for BackendProcess {
    fn drop(&mut self) {
        if !self.has_exited() {
            debug!("BackendProcess dropped while running, sending kill");
            self.kill();
        }
    }
}

/// Forward stdout to the log and signal the first readiness token.
async fn stdout_reader(stdout: tokio::process::ChildStdout, ready_tx: oneshot::Sender<()>) {
    let mut reader = BufReader::new(stdout).lines();
    let mut ready_tx = Some(ready_tx);

    while let Ok(Some(line)) = reader.next_line().await {
        info!(target: "idsmon::backend", "{}", line);
        if line.contains(BACKEND_READY_TOKEN) {
            if let Some(tx) = ready_tx.take() {
                let _ = tx.send(());
            }
        }
    }

    debug!("backend stdout closed");
}

async fn stderr_reader(stderr: tokio::process::ChildStderr) {
    let mut reader = BufReader::new(stderr).lines();

    while let Ok(Some(line)) = reader.next_line().await {
        warn!(target: "idsmon::backend", "{}", line);
    }

    debug!("backend stderr closed");
}

async fn wait_for_exit(
    mut child: Child,
    kill_rx: oneshot::Receiver<()>,
    exit_tx: watch::Sender<Option<Option<i32>>>,
    exited: Arc<AtomicBool>,
) {
    let code: Option<i32> = tokio::select! {
        result = child.wait() => {
            match result {
                Ok(status) => {
                    info!("Backend exited with status: {:?}", status);
                    status.code()
                }
                Err(e) => {
                    error!("Error waiting for backend: {}", e);
                    None
                }
            }
        }
        _ = kill_rx => {
            if let Err(e) = child.kill().await {
                error!("Failed to kill backend: {}", e);
            }
            match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    error!("Error waiting after kill: {}", e);
                    None
                }
            }
        }
    };

    exited.store(true, Ordering::Release);
    let _ = exit_tx.send(Some(code));
}

/// Resolve a configured backend path against `base` when it is relative.
pub fn resolve_program(program: &Path, base: &Path) -> PathBuf {
    if program.is_absolute() || program.components().count() == 1 {
        program.to_path_buf()
    } else {
        base.join(program)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, log_dir: &Path) -> BackendLaunch {
        // `sh -c SCRIPT NAME LOGDIR` puts the log dir in $1
        BackendLaunch::new("sh", log_dir).with_args(vec![
            "-c".to_string(),
            script.to_string(),
            "idsmon-backend".to_string(),
        ])
    }

    #[tokio::test]
    async fn test_launch_waits_for_ready_token() {
        let dir = tempfile::tempdir().unwrap();
        let launch = sh("echo starting; echo BACKEND_READY; sleep 30", dir.path())
            .with_timeout(Duration::from_secs(5));

        let mut process = BackendProcess::launch(&launch).await.unwrap();
        assert!(!process.has_exited());
        assert!(process.id().is_some());

        process.shutdown().await;
        assert!(process.has_exited());
    }

    #[tokio::test]
    async fn test_launch_receives_log_dir_argument() {
        let dir = tempfile::tempdir().unwrap();
        let launch = sh(
            r#"[ -d "$1" ] && echo BACKEND_READY; sleep 30"#,
            &dir.path().join("logs"),
        )
        .with_timeout(Duration::from_secs(5));

        let mut process = BackendProcess::launch(&launch).await.unwrap();
        process.shutdown().await;
    }

    #[tokio::test]
    async fn test_exit_before_ready_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let launch = sh("echo boom >&2; exit 3", dir.path()).with_timeout(Duration::from_secs(5));

        let err = BackendProcess::launch(&launch).await.err().unwrap();
        assert!(matches!(err, Error::BackendExited { code: Some(3) }), "{err:?}");
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_silent_backend_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let launch = sh("sleep 30", dir.path()).with_timeout(Duration::from_millis(200));

        let err = BackendProcess::launch(&launch).await.err().unwrap();
        assert!(matches!(err, Error::BackendTimeout { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let launch = BackendLaunch::new("/nonexistent/idsmon-backend", dir.path());

        let err = BackendProcess::launch(&launch).await.err().unwrap();
        assert!(matches!(err, Error::BackendNotFound { .. }));
    }

    #[test]
    fn test_resolve_program() {
        let base = Path::new("/opt/ids");
        assert_eq!(
            resolve_program(Path::new("backend/app"), base),
            PathBuf::from("/opt/ids/backend/app")
        );
        assert_eq!(
            resolve_program(Path::new("/usr/bin/app"), base),
            PathBuf::from("/usr/bin/app")
        );
        assert_eq!(resolve_program(Path::new("app"), base), PathBuf::from("app"));
    }
}
