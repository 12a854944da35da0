//! Scratch-directory helpers for tests that touch the filesystem.
//!
//! [`WorkDirFixture`] gives every test its own temporary directory;
//! [`WorkDirEnvironment`] shares one directory across a whole run.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tempfile::TempDir;

use crate::body::Fixture;
use crate::context::{TestContext, TestResult};
use crate::environment::Environment;
use crate::error::Result;

static NAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a fresh directory under the system temp dir whose name starts with
/// `prefix`. The directory is removed when the returned value is dropped.
pub fn create_tmp_dir(prefix: &str) -> Result<TempDir> {
    let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
    tracing::debug!(path = %dir.path().display(), "created work dir");
    Ok(dir)
}

/// Remove `dir` and everything under it. Returns false if it did not exist
/// or could not be removed.
pub fn remove_dir(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    match std::fs::remove_dir_all(dir) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(path = %dir.display(), %error, "failed to remove work dir");
            false
        }
    }
}

/// `prefix` followed by a suffix unique within this process and unlikely to
/// collide across processes
pub fn unique_name(prefix: &str) -> String {
    let count = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or_default();
    format!("{prefix}{:x}{nanos:08x}{count}", std::process::id())
}

/// Fixture owning a temporary directory named after the running test
///
/// Embed it in a larger fixture and delegate `set_up`/`tear_down` to share
/// the behaviour.
#[derive(Debug, Default)]
pub struct WorkDirFixture {
    dir: Option<TempDir>,
}

impl WorkDirFixture {
    /// Directory of the current test; empty before `set_up`
    pub fn work_dir(&self) -> &Path {
        self.dir.as_ref().map_or(Path::new(""), TempDir::path)
    }
}

impl Fixture for WorkDirFixture {
    fn set_up(&mut self, ctx: &mut TestContext) -> TestResult {
        let prefix = format!("{}_", ctx.test_name());
        match create_tmp_dir(&prefix) {
            Ok(dir) => {
                self.dir = Some(dir);
                Ok(())
            }
            Err(error) => ctx.fatal(format!("cannot create work dir: {error}")),
        }
    }

    fn tear_down(&mut self, _ctx: &mut TestContext) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(error) = dir.close() {
                tracing::warn!(path = %path.display(), %error, "failed to remove work dir");
            }
        }
    }
}

/// Shared view of the directory held by a [`WorkDirEnvironment`]
#[derive(Debug, Clone, Default)]
pub struct WorkDirHandle(Rc<RefCell<Option<PathBuf>>>);

impl WorkDirHandle {
    /// Directory path while the environment is set up
    pub fn path(&self) -> Option<PathBuf> {
        self.0.borrow().clone()
    }
}

/// Environment creating one temporary directory for the whole run
#[derive(Debug)]
pub struct WorkDirEnvironment {
    name: String,
    dir: Option<TempDir>,
    handle: WorkDirHandle,
}

impl WorkDirEnvironment {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            dir: None,
            handle: WorkDirHandle::default(),
        }
    }

    /// Handle for test bodies to find the directory once the run has started
    pub fn handle(&self) -> WorkDirHandle {
        self.handle.clone()
    }
}

impl Environment for WorkDirEnvironment {
    fn set_up(&mut self) -> anyhow::Result<()> {
        let prefix = format!("{}_", self.name);
        let dir = create_tmp_dir(&prefix)
            .with_context(|| format!("cannot create work dir for {}", self.name))?;
        *self.handle.0.borrow_mut() = Some(dir.path().to_path_buf());
        self.dir = Some(dir);
        Ok(())
    }

    fn tear_down(&mut self) -> anyhow::Result<()> {
        self.handle.0.borrow_mut().take();
        match self.dir.take() {
            Some(dir) => dir
                .close()
                .with_context(|| format!("cannot remove work dir for {}", self.name)),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
