//! External solver invocation.

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::debug;

use super::error::OracleError;
use super::verdict::{SolverKind, Verdict};

/// Something that can answer a problem in the LADR input language.
///
/// Implementations never fail: launch errors, crashes and timeouts are all
/// reported through the returned [`Verdict`].
pub trait Solver: Send + Sync {
    fn kind(&self) -> SolverKind;

    fn solve(&self, problem: &str, timeout: Duration) -> impl Future<Output = Verdict> + Send;
}

/// Runs a solver binary as a child process.
///
/// The problem is written to a temporary file passed as `-f <file>`, and
/// standard output is captured as the verdict source. The file is removed
/// and the child killed on every exit path, including when the returned
/// future is dropped.
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    kind: SolverKind,
    binary: PathBuf,
}

impl ProcessSolver {
    pub fn new(kind: SolverKind, binary: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run(&self, problem: &str, timeout: Duration) -> Result<String, OracleError> {
        let mut input = tempfile::Builder::new()
            .prefix("oracle-")
            .suffix(".in")
            .tempfile()
            .map_err(|e| OracleError::Failed {
                message: format!("failed to create problem file: {e}"),
            })?;
        input
            .write_all(problem.as_bytes())
            .and_then(|()| input.flush())
            .map_err(|e| OracleError::Failed {
                message: format!("failed to write problem file: {e}"),
            })?;

        let child = Command::new(&self.binary)
            .arg("-f")
            .arg(input.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OracleError::Unavailable {
                binary: self.binary.clone(),
                message: e.to_string(),
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(OracleError::Failed {
                    message: e.to_string(),
                });
            }
            // Dropping the wait future drops the child, which kills it
            Err(_) => return Err(OracleError::Timeout { after: timeout }),
        };

        debug!(
            solver = %self.kind,
            status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            "Solver exited"
        );

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Solver for ProcessSolver {
    fn kind(&self) -> SolverKind {
        self.kind
    }

    async fn solve(&self, problem: &str, timeout: Duration) -> Verdict {
        let started = Instant::now();
        match self.run(problem, timeout).await {
            Ok(output) => Verdict::from_output(self.kind, output, started.elapsed()),
            Err(err) => Verdict::from_error(&err, started.elapsed()),
        }
    }
}
