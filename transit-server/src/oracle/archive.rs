//! On-disk archive of solver problems and answers.
//!
//! Each invocation leaves a `.in` file with the problem and a `.out` file
//! with the raw answer, named `{dialect}_{UTC timestamp}_{hash}` where the
//! hash is the first 8 hex characters of the problem's SHA-256.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::encode::Dialect;

#[derive(Debug, Clone)]
pub struct ProblemArchive {
    dir: PathBuf,
}

impl ProblemArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File stem for a problem.
    pub fn stem(dialect: Dialect, problem: &str) -> String {
        let digest = hex::encode(Sha256::digest(problem.as_bytes()));
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
        format!("{dialect}_{timestamp}_{}", &digest[..8])
    }

    /// Save a problem and its answer. Failures are logged, not returned:
    /// archiving never affects the planning result.
    pub async fn save(&self, dialect: Dialect, problem: &str, answer: &str) -> Option<PathBuf> {
        let stem = Self::stem(dialect, problem);
        let input = self.dir.join(format!("{stem}.in"));
        let output = self.dir.join(format!("{stem}.out"));

        let result = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&input, problem).await?;
            tokio::fs::write(&output, answer).await
        }
        .await;

        match result {
            Ok(()) => {
                debug!(path = %input.display(), "Archived solver problem");
                Some(input)
            }
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Failed to archive solver problem");
                None
            }
        }
    }
}
