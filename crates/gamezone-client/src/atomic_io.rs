//! Atomic file replacement for the session store.
//!
//! Contents go to a hidden temporary file in the same directory, which is
//! then renamed over the target so readers never see a partial document.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::error::StoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_error(path: &Utf8Path, err: &io::Error) -> StoreError {
    StoreError::Write {
        path: PathBuf::from(path.as_str()),
        message: err.to_string(),
    }
}

/// Replace `path` inside `dir` with `contents`.
///
/// # Errors
///
/// Returns [`StoreError::Write`] when `path` is not a plain file name or any
/// filesystem step fails. The temporary file is removed on failure.
pub(crate) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &str) -> Result<(), StoreError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(StoreError::Write {
            path: PathBuf::from(path.as_str()),
            message: "session store path must be a file name".to_owned(),
        });
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    if let Err(err) = write_temp(dir, &tmp_name, contents) {
        drop(dir.remove_file(&tmp_name));
        return Err(write_error(path, &err));
    }
    if let Err(err) = dir.rename(&tmp_name, dir, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(write_error(path, &err));
    }
    // Best-effort directory sync.
    drop(dir.open(".").and_then(|parent| parent.sync_all()));
    Ok(())
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
