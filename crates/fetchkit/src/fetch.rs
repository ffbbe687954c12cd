//! Streaming downloads with progress reporting.
//!
//! A [`Fetcher`] copies one remote resource into one local file. The HTTP
//! implementation keeps no per-call state, so distinct destinations may be
//! fetched from several threads; the only shared piece is the
//! [`ProgressSink`], whose implementations must serialize their own updates.
//!
//! Use [`MockFetcher`] for testing without network access:
//!
//! ```
//! use fetchkit::fetch::{DownloadTask, Fetcher, MockFetcher};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let fetcher = MockFetcher::new(b"payload".to_vec());
//! let mut task = DownloadTask::new("https://example.com/a.zip", dir.path().join("a.zip"));
//! assert_eq!(fetcher.fetch(&mut task).unwrap(), 7);
//! assert_eq!(fetcher.calls()[0].0, "https://example.com/a.zip");
//! ```

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Maximum download size (the bridge packages are a few hundred MB).
const MAX_BODY_SIZE: u64 = 1024 * 1024 * 1024;

/// Read buffer size for streaming.
const CHUNK_SIZE: usize = 64 * 1024;

const USER_AGENT: &str = concat!("nyxboot/", env!("CARGO_PKG_VERSION"));

/// One download: where from, where to, and how big the server said it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Source URL.
    pub url: String,
    /// Local destination file.
    pub dest: PathBuf,
    /// Declared size from `Content-Length`, 0 when unknown.
    pub expected_size: u64,
}

impl DownloadTask {
    /// Create a task for an explicit destination.
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            expected_size: 0,
        }
    }

    /// Create a task with a collision-free file name `<prefix>-<uuid>.<ext>`
    /// inside `dir`.
    pub fn unique_in(dir: &Path, prefix: &str, extension: &str, url: impl Into<String>) -> Self {
        let name = format!("{prefix}-{}.{extension}", uuid::Uuid::new_v4());
        Self::new(url, dir.join(name))
    }

    /// Remove the downloaded file once it has been consumed.
    ///
    /// A missing file is not an error.
    pub fn discard(self) -> Result<()> {
        match fs::remove_file(&self.dest) {
            Ok(()) => {
                log::debug!("removed {}", self.dest.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&self.dest, e)),
        }
    }
}

/// Receives download progress. Shared across downloads.
pub trait ProgressSink: Send + Sync {
    /// Start tracking one download. `total` is 0 when the size is unknown.
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle>;
}

/// Progress of a single download.
pub trait ProgressHandle: Send {
    /// Record `bytes` more bytes written.
    fn advance(&mut self, bytes: u64);

    /// The download completed.
    fn finish(&mut self);

    /// The download failed.
    fn abandon(&mut self);
}

/// Progress sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&self, _label: &str, _total: u64) -> Box<dyn ProgressHandle> {
        Box::new(NoProgress)
    }
}

impl ProgressHandle for NoProgress {
    fn advance(&mut self, _bytes: u64) {}
    fn finish(&mut self) {}
    fn abandon(&mut self) {}
}

/// Retrieves a remote resource into a local file.
pub trait Fetcher: Send + Sync {
    /// Stream `task.url` into `task.dest`, filling `task.expected_size`.
    ///
    /// Returns the number of bytes written. On failure the partial file is
    /// left in place.
    fn fetch(&self, task: &mut DownloadTask) -> Result<u64>;
}

/// Blocking HTTP(S) fetcher on top of `ureq`.
pub struct HttpFetcher {
    agent: ureq::Agent,
    progress: Arc<dyn ProgressSink>,
}

impl HttpFetcher {
    /// Create a fetcher reporting to `progress`.
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            progress,
        }
    }

    /// Create a fetcher without progress output.
    #[must_use]
    pub fn quiet() -> Self {
        Self::new(Arc::new(NoProgress))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, task: &mut DownloadTask) -> Result<u64> {
        log::info!("fetching {} -> {}", task.url, task.dest.display());

        let mut response = self
            .agent
            .get(&task.url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| Error::from_ureq(&task.url, &task.dest, e))?;

        task.expected_size = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        let file = File::create(&task.dest).map_err(|e| Error::io(&task.dest, e))?;
        let mut writer = BufWriter::new(file);
        let mut reader = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .reader();

        let mut handle = self.progress.start(&task.url, task.expected_size);
        let copied = copy_with_progress(&mut reader, &mut writer, handle.as_mut()).and_then(|n| {
            writer.flush().map_err(CopyError::Write)?;
            Ok(n)
        });

        match copied {
            Ok(written) => {
                handle.finish();
                log::debug!("fetched {written} bytes into {}", task.dest.display());
                Ok(written)
            }
            Err(CopyError::Read(e)) => {
                handle.abandon();
                Err(Error::fetch(&task.url, &task.dest, e.to_string(), None))
            }
            Err(CopyError::Write(e)) => {
                handle.abandon();
                Err(Error::io(&task.dest, e))
            }
        }
    }
}

#[derive(Debug)]
enum CopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Copy `reader` into `writer`, reporting every chunk to `handle`.
///
/// Read errors come from the network, write errors from the disk; callers
/// report them differently.
fn copy_with_progress(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    handle: &mut dyn ProgressHandle,
) -> std::result::Result<u64, CopyError> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(written),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        writer.write_all(&buf[..n]).map_err(CopyError::Write)?;
        written += n as u64;
        handle.advance(n as u64);
    }
}

/// In-memory fetcher for tests: writes a fixed payload and records calls.
#[derive(Debug, Default)]
pub struct MockFetcher {
    payload: Vec<u8>,
    fail: bool,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl MockFetcher {
    /// Fetcher that succeeds with `payload`.
    #[must_use]
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Fetcher whose every call fails like a dropped connection.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Recorded `(url, dest)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, task: &mut DownloadTask) -> Result<u64> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push((task.url.clone(), task.dest.clone())),
            Err(poisoned) => poisoned
                .into_inner()
                .push((task.url.clone(), task.dest.clone())),
        }
        if self.fail {
            return Err(Error::fetch(&task.url, &task.dest, "connection refused", None));
        }
        task.expected_size = self.payload.len() as u64;
        fs::write(&task.dest, &self.payload).map_err(|e| Error::io(&task.dest, e))?;
        Ok(self.payload.len() as u64)
    }
}
