//! Error kinds surfaced by every stage of a run.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A file the run depends on (input list, config) does not exist.
    #[error("file \"{}\" does not exist, but needs to", .0.display())]
    MissingFile(PathBuf),

    /// The candidate target already exists in the output directory.
    #[error("file \"{}\" already exists, refusing to overwrite", .0.display())]
    FileAlreadyExists(PathBuf),

    /// Probing creation of the candidate failed.
    #[error("file with name {name:?} could not be created in \"{}\"", .dir.display())]
    InvalidFilename {
        name: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing of config from \"{}\" failed", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config \"{}\" has no [{section}] section", .path.display())]
    ConfigSection { path: PathBuf, section: &'static str },

    #[error("config \"{}\" has no `{key}` key in [{section}]", .path.display())]
    ConfigKey {
        path: PathBuf,
        section: &'static str,
        key: &'static str,
    },

    #[error("could not open input \"{}\"", .path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input \"{}\" line {line} is empty; blank lines are not allowed", .path.display())]
    InputFormat { path: PathBuf, line: usize },

    #[error("URL {url:?} lacks a scheme, host or path")]
    UrlParse { url: String },

    /// No usable filename could be inferred from the URL path.
    #[error("could not infer a valid filename from URL {url:?}")]
    FilenameInference {
        url: String,
        #[source]
        source: Option<Box<Error>>,
    },

    #[error("could not retrieve {url:?} -> \"{}\"", .path.display())]
    Download {
        url: String,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl Error {
    /// Process exit status reported for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingFile(_) => 2,
            Error::FileAlreadyExists(_) => 3,
            Error::InvalidFilename { .. } => 4,
            Error::ConfigParse { .. } => 5,
            Error::ConfigSection { .. } => 6,
            Error::ConfigKey { .. } => 7,
            Error::InputOpen { .. } | Error::InputFormat { .. } => 8,
            Error::FilenameInference { .. } => 9,
            Error::UrlParse { .. } => 10,
            Error::Download { .. } => 11,
            Error::Client(_) => 100,
        }
    }
}
