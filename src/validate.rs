//! Checks whether a filename can be created inside the output directory.
//!
//! Filename rules differ between platforms and filesystems, so instead of
//! re-implementing them the check creates the file for real and removes it
//! again. If the process dies between the two steps the empty probe file is
//! left behind in the output directory.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Removes the probe file when dropped, whichever way the check exits.
struct ProbeFile {
    path: PathBuf,
}

impl Drop for ProbeFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("could not remove probe file {}: {}", self.path.display(), e);
        }
    }
}

/// Succeeds when a file called `filename` could be created in `dir`.
///
/// Returns [`Error::FileAlreadyExists`] if the name is taken by an existing
/// file and [`Error::InvalidFilename`] for any failure while probing
/// (illegal characters, NUL bytes, length limits, missing permissions).
pub fn ensure_creatable(filename: &str, dir: &Path) -> Result<()> {
    let path = dir.join(filename);

    if path.is_file() {
        return Err(Error::FileAlreadyExists(path));
    }

    let invalid = |source| Error::InvalidFilename {
        name: filename.to_owned(),
        dir: dir.to_path_buf(),
        source,
    };

    // create_new so a file appearing after the check above is never truncated
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(invalid)?;
    let _probe = ProbeFile { path };
    drop(file);

    Ok(())
}
