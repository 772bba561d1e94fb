//! Filesystem utilities.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::Path;

use anyhow::{Context, Result};

use crate::util::hash::sha256_file;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Copy `src` to `dst` unless `dst` already exists.
///
/// Returns `true` if the file was copied. The destination is opened with
/// create-new semantics so an existing file is never truncated, even if it
/// appears between the check and the copy.
pub fn copy_if_absent(src: &Path, dst: &Path) -> Result<bool> {
    if dst.exists() {
        return Ok(false);
    }

    let mut reader = File::open(src)
        .with_context(|| format!("failed to open template: {}", src.display()))?;

    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }

    let mut writer = match OpenOptions::new().write(true).create_new(true).open(dst) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to create file: {}", dst.display()))
        }
    };

    io::copy(&mut reader, &mut writer).with_context(|| {
        format!("failed to copy {} to {}", src.display(), dst.display())
    })?;

    // Keep the template's permissions.
    if let Ok(meta) = fs::metadata(src) {
        let _ = fs::set_permissions(dst, meta.permissions());
    }

    Ok(true)
}

/// Check whether two files have identical contents.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    let (meta_a, meta_b) = (
        fs::metadata(a).with_context(|| format!("failed to stat {}", a.display()))?,
        fs::metadata(b).with_context(|| format!("failed to stat {}", b.display()))?,
    );
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }
    Ok(sha256_file(a)? == sha256_file(b)?)
}
