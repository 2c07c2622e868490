//! Reading the URL list.
//!
//! One URL per line. Blank lines anywhere make the whole file invalid, as
//! they usually mean a truncated or hand-mangled list. A single newline at
//! the very end of the file is not a blank line.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::resolve::{resolve, ResolvedEntry};

/// Reads `path` and returns its lines, trimmed, in file order.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| Error::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let lines: Vec<String> = text.lines().map(|l| l.trim().to_owned()).collect();
    if let Some(blank) = lines.iter().position(String::is_empty) {
        return Err(Error::InputFormat {
            path: path.to_path_buf(),
            line: blank + 1,
        });
    }

    Ok(lines)
}

/// Resolves every URL in the list at `path` against `out_dir`.
///
/// Stops at the first URL that fails to resolve; nothing is returned for the
/// lines before it.
pub fn read_entries(path: &Path, out_dir: &Path) -> Result<Vec<ResolvedEntry>> {
    tracing::info!("Read input-file {}", path.display());
    let urls = read_lines(path)?;
    tracing::info!("...success, {} URLs", urls.len());

    tracing::info!("Check URLs");
    let entries = urls
        .iter()
        .map(|url| resolve(url, out_dir))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!("...success");

    Ok(entries)
}
