//! Turning a raw URL into a download target.
//!
//! This decides which URLs are accepted and which names files are stored
//! under, so it is deliberately strict: relative, scheme-less and host-less
//! URLs are rejected outright.

use std::path::Path;

use crate::error::{Error, Result};
use crate::validate::ensure_creatable;

/// A URL together with the filename it will be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub url: String,
    /// Bare filename; joined with the output directory at download time.
    pub filename: String,
}

/// Raw text components of a URL, before any normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub authority: &'a str,
    pub path: &'a str,
}

/// Splits `url` into scheme, authority and path the way RFC 3986 reads them.
///
/// Components that are absent come back empty; query and fragment are
/// dropped.
pub fn split_url(url: &str) -> UrlParts<'_> {
    let (scheme, rest) = match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => (scheme, rest),
        _ => ("", url),
    };

    let rest = match rest.find(['?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let (authority, path) = match rest.strip_prefix("//") {
        Some(hier) => match hier.find('/') {
            Some(slash) => hier.split_at(slash),
            None => (hier, ""),
        },
        None => ("", rest),
    };

    UrlParts {
        scheme,
        authority,
        path,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse(url: &str) -> Result<UrlParts<'_>> {
    let parts = split_url(url);
    let complete =
        !parts.scheme.is_empty() && !parts.authority.is_empty() && !parts.path.is_empty();

    if !complete || url::Url::parse(url).is_err() {
        return Err(Error::UrlParse {
            url: url.to_owned(),
        });
    }
    Ok(parts)
}

fn infer_filename(url: &str, path: &str, out_dir: &Path) -> Result<String> {
    let filename = path.rsplit('/').next().unwrap_or_default().trim();
    if filename.is_empty() {
        return Err(Error::FilenameInference {
            url: url.to_owned(),
            source: None,
        });
    }

    match ensure_creatable(filename, out_dir) {
        Ok(()) => Ok(filename.to_owned()),
        // the directory already holds this name; that is for the caller to fix
        Err(e @ Error::FileAlreadyExists(_)) => Err(e),
        Err(e) => Err(Error::FilenameInference {
            url: url.to_owned(),
            source: Some(Box::new(e)),
        }),
    }
}

/// Parses `url` and derives a filename that can be created in `out_dir`.
pub fn resolve(url: &str, out_dir: &Path) -> Result<ResolvedEntry> {
    let parts = parse(url)?;
    let filename = infer_filename(url, parts.path, out_dir)?;
    tracing::debug!("{} -> {}", url, filename);

    Ok(ResolvedEntry {
        url: url.to_owned(),
        filename,
    })
}
