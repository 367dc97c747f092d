//! Commit source backed by the git binary

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::repository::Result;
use crate::source::CommitSource;
use crate::types::{parse_log_line, CommitRange, CommitRecord};
use chronicle_core::error::GitError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs `git log` / `git show` in a working directory
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    binary: String,
    timeout: Duration,
    date_format: String,
}

impl GitCli {
    /// Create a runner for the repository at `workdir`
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
            binary: "git".to_string(),
            timeout: Duration::from_secs(30),
            date_format: "%d-%m-%Y".to_string(),
        }
    }

    /// Use a different git executable
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Kill git invocations that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// strftime format for per-commit dates
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Arguments for the one-line-per-commit log query
    pub fn log_args(range: &CommitRange) -> Vec<String> {
        let mut args = vec!["log".to_string(), "--format=%H %s".to_string()];
        if let Some(since) = range.since() {
            args.push(format!("--since={} 00:00:00", since.format("%Y-%m-%d")));
        }
        if let Some(until) = range.until() {
            args.push(format!("--until={} 00:00:00", until.format("%Y-%m-%d")));
        }
        args
    }

    /// Arguments for the per-commit date query
    pub fn date_args(&self, hash: &str) -> Vec<String> {
        vec![
            "show".to_string(),
            "-s".to_string(),
            "--format=%cd".to_string(),
            format!("--date=format:{}", self.date_format),
            hash.to_string(),
        ]
    }

    /// Run git `log` for the range and return its raw output
    #[instrument(skip(self), fields(workdir = %self.workdir.display()))]
    pub fn log(&self, range: &CommitRange) -> Result<String> {
        self.run(&Self::log_args(range))
    }

    /// Spawn git, wait up to the timeout and collect stdout.
    ///
    /// stdout and stderr are drained on helper threads so a chatty child
    /// cannot block on a full pipe while we poll for exit.
    fn run(&self, args: &[String]) -> Result<String> {
        let start = Instant::now();
        let command = args.first().cloned().unwrap_or_default();

        let mut child = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GitError::SpawnFailed {
                binary: self.binary.clone(),
                reason: e.to_string(),
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() >= self.timeout {
                // Reap the child; the reader threads finish once the pipes close.
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::Timeout {
                    command,
                    seconds: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            return Err(GitError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        debug!(
            command = %command,
            duration_ms = start.elapsed().as_millis(),
            bytes = stdout.len(),
            "git finished"
        );
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl CommitSource for GitCli {
    fn list_commits(&self, range: &CommitRange) -> Vec<CommitRecord> {
        let output = match self.log(range) {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, %range, "commit history unavailable, treating as empty");
                return Vec::new();
            }
        };

        let mut skipped = 0usize;
        let commits: Vec<CommitRecord> = output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let record = parse_log_line(line);
                if record.is_none() {
                    skipped += 1;
                    debug!(line, "skipping malformed log line");
                }
                record
            })
            .collect();

        info!(%range, count = commits.len(), skipped, "listed commits");
        commits
    }

    fn commit_date(&self, hash: &str) -> Option<String> {
        match self.run(&self.date_args(hash)) {
            Ok(output) => {
                let date = output.trim();
                if date.is_empty() {
                    debug!(hash, "git returned no date");
                    None
                } else {
                    Some(date.to_string())
                }
            }
            Err(e) => {
                warn!(hash, error = %e, "could not look up commit date");
                None
            }
        }
    }
}
