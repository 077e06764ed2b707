//! JSON-lines collection on local disk.
//!
//! Layout: `<root>/<database>/<collection>.jsonl`, one document per line in
//! store order. Every call reads or writes the file; nothing is cached.
//! Writers and readers serialize through a `<collection>.jsonl.lock` file
//! created with `create_new`, so separate processes do not interleave.
//! The lock records the holder's pid; a lock older than the stale age
//! (60 s by default) is taken to be left over from a crashed writer and is
//! removed.
//! Update and delete rewrite into a temp file and rename it into place.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use shelterdash_core::prelude::{AnimalRecord, Changes, Query};

use crate::error::{Error, Result};
use crate::store::Collection;

const LOCK_POLL: Duration = Duration::from_millis(10);
const STALE_LOCK_AGE: Duration = Duration::from_secs(60);

pub struct JsonlCollection {
    root: PathBuf,
    path: PathBuf,
    lock_path: PathBuf,
    /// Upper bound on waiting for the lock file.
    op_timeout: Duration,
    stale_after: Duration,
}

impl JsonlCollection {
    pub fn new(root: &str, database: &str, collection: &str, op_timeout: Duration) -> Self {
        let root = PathBuf::from(root);
        let path = root.join(database).join(format!("{collection}.jsonl"));
        let lock_path = path.with_extension("jsonl.lock");
        Self {
            root,
            path,
            lock_path,
            op_timeout,
            stale_after: STALE_LOCK_AGE,
        }
    }

    /// Age past which an existing lock file is reclaimed.
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<LockGuard> {
        let started = Instant::now();
        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&self.lock_path)
            {
                Ok(mut file) => {
                    let guard = LockGuard {
                        path: self.lock_path.clone(),
                    };
                    writeln!(file, "{}", std::process::id())?;
                    return Ok(guard);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if self.reclaim_stale_lock()? {
                        continue;
                    }
                    if started.elapsed() >= self.op_timeout {
                        return Err(Error::QueryFailure(format!(
                            "timed out after {} ms waiting for {}",
                            self.op_timeout.as_millis(),
                            self.lock_path.display()
                        )));
                    }
                    thread::sleep(LOCK_POLL);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    // Database directory does not exist yet.
                    self.ensure_dir()?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Remove the lock file if it is older than `stale_after`.
    fn reclaim_stale_lock(&self) -> Result<bool> {
        let modified = match fs::metadata(&self.lock_path).and_then(|m| m.modified()) {
            Ok(t) => t,
            // Released between our open and this check.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age < self.stale_after {
            return Ok(false);
        }

        let holder = fs::read_to_string(&self.lock_path).unwrap_or_default();
        tracing::warn!(
            lock = %self.lock_path.display(),
            holder = holder.trim(),
            age_ms = age.as_millis() as u64,
            "removing stale lock"
        );
        match fs::remove_file(&self.lock_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<AnimalRecord>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: AnimalRecord = serde_json::from_str(&line).map_err(|e| {
                Error::QueryFailure(format!(
                    "{} line {}: {e}",
                    self.path.display(),
                    idx + 1
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn rewrite(&self, records: &[AnimalRecord]) -> Result<()> {
        self.ensure_dir()?;
        let tmp = self.path.with_extension("jsonl.tmp");
        {
            let mut w = BufWriter::new(File::create(&tmp)?);
            for r in records {
                serde_json::to_writer(&mut w, r)?;
                w.write_all(b"\n")?;
            }
            w.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl Collection for JsonlCollection {
    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }

    fn ping(&self) -> Result<()> {
        let meta = fs::metadata(&self.root)?;
        if !meta.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("{} is not a directory", self.root.display()),
            )));
        }
        Ok(())
    }

    fn insert_one(&self, record: AnimalRecord) -> Result<()> {
        let _guard = self.lock()?;
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer(&mut w, &record)?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }

    fn find(&self, query: &Query) -> Result<Vec<AnimalRecord>> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        records.retain(|r| query.matches(r));
        Ok(records)
    }

    fn update_many(&self, query: &Query, changes: &Changes) -> Result<u64> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        let mut modified = 0u64;
        for record in records.iter_mut() {
            if query.matches(record) {
                let (next, changed) = record.with_changes(changes)?;
                if changed {
                    *record = next;
                    modified += 1;
                }
            }
        }
        if modified > 0 {
            self.rewrite(&records)?;
        }
        Ok(modified)
    }

    fn delete_many(&self, query: &Query) -> Result<u64> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|r| !query.matches(r));
        let removed = (before - records.len()) as u64;
        if removed > 0 {
            self.rewrite(&records)?;
        }
        Ok(removed)
    }
}
