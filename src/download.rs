use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Proxy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::config::NetworkConfig;
use crate::error::Error;
use crate::resolve::ResolvedEntry;

fn build_client(network: &NetworkConfig) -> Result<Client, Error> {
    let mut builder = Client::builder();
    if let Some(secs) = network.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(proxy) = &network.proxy {
        builder = builder.proxy(Proxy::all(proxy).map_err(Error::Client)?);
    }
    builder.build().map_err(Error::Client)
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:50.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    }
}

/// Fetches resolved entries into the output directory, one at a time.
pub struct Downloader {
    client: Client,
    out_dir: PathBuf,
    verbose: bool,
}

impl Downloader {
    pub fn new(out_dir: &Path, verbose: bool, network: &NetworkConfig) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(network)?,
            out_dir: out_dir.to_path_buf(),
            verbose,
        })
    }

    /// Download every entry in list order, stopping at the first failure.
    pub async fn download_all(&self, entries: Vec<ResolvedEntry>) -> Result<(), Error> {
        let total = entries.len();
        for (i, entry) in entries.into_iter().enumerate() {
            tracing::debug!("entry {}/{}", i + 1, total);
            self.download(entry).await?;
        }
        Ok(())
    }

    /// Download a single entry to `out_dir/filename`.
    pub async fn download(&self, entry: ResolvedEntry) -> Result<(), Error> {
        let path = self.out_dir.join(&entry.filename);
        tracing::info!("Download {:?} -> \"{}\"", entry.url, path.display());

        match self.fetch(&entry.url, &path).await {
            Ok(bytes) => {
                tracing::info!("...success ({} bytes)", bytes);
                Ok(())
            }
            Err(source) => Err(Error::Download {
                url: entry.url,
                path,
                source,
            }),
        }
    }

    async fn fetch(&self, url: &str, path: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("server returned an error")?;

        let pb = if self.verbose {
            progress_bar(response.content_length())
        } else {
            ProgressBar::hidden()
        };

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await
            .with_context(|| format!("failed to create {}", path.display()))?;

        // stream downloading
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("failed to read response body")?;
            file.write_all(&chunk).await.context("failed to write file")?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }

        pb.finish_and_clear();
        file.sync_all().await.context("failed to sync file")?;

        Ok(downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(url: String, filename: &str) -> ResolvedEntry {
        ResolvedEntry {
            url,
            filename: filename.to_owned(),
        }
    }

    #[tokio::test]
    async fn downloads_every_entry() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/a/file1.jpg")
            .with_body("first")
            .create_async()
            .await;
        let second = server
            .mock("GET", "/b/file2.gif")
            .with_body("second")
            .create_async()
            .await;

        let out = TempDir::new().unwrap();
        let downloader = Downloader::new(out.path(), false, &NetworkConfig::default()).unwrap();
        downloader
            .download_all(vec![
                entry(format!("{}/a/file1.jpg", server.url()), "file1.jpg"),
                entry(format!("{}/b/file2.gif", server.url()), "file2.gif"),
            ])
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(std::fs::read(out.path().join("file1.jpg")).unwrap(), b"first");
        assert_eq!(std::fs::read(out.path().join("file2.gif")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn http_error_stops_the_run() {
        let mut server = mockito::Server::new_async().await;
        let missing = server
            .mock("GET", "/missing.jpg")
            .with_status(404)
            .create_async()
            .await;
        let never = server
            .mock("GET", "/after.jpg")
            .with_body("x")
            .expect(0)
            .create_async()
            .await;

        let out = TempDir::new().unwrap();
        let downloader = Downloader::new(out.path(), true, &NetworkConfig::default()).unwrap();
        let url = format!("{}/missing.jpg", server.url());
        let err = downloader
            .download_all(vec![
                entry(url.clone(), "missing.jpg"),
                entry(format!("{}/after.jpg", server.url()), "after.jpg"),
            ])
            .await
            .unwrap_err();

        match err {
            Error::Download { url: u, path, .. } => {
                assert_eq!(u, url);
                assert_eq!(path, out.path().join("missing.jpg"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        missing.assert_async().await;
        never.assert_async().await;
        assert!(!out.path().join("after.jpg").exists());
    }

    #[tokio::test]
    async fn unwritable_destination_is_a_download_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/a.jpg")
            .with_body("data")
            .create_async()
            .await;

        let out = TempDir::new().unwrap();
        let gone = out.path().join("no-such-dir");
        let downloader = Downloader::new(&gone, false, &NetworkConfig::default()).unwrap();
        let err = downloader
            .download(entry(format!("{}/a.jpg", server.url()), "a.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Download { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_download_error() {
        let out = TempDir::new().unwrap();
        let network = NetworkConfig {
            timeout_secs: Some(5),
            proxy: None,
        };
        let downloader = Downloader::new(out.path(), false, &network).unwrap();
        // port 9 (discard) is closed on loopback
        let err = downloader
            .download(entry("http://127.0.0.1:9/a.jpg".into(), "a.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Download { .. }));
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn bad_proxy_fails_client_build() {
        let network = NetworkConfig {
            timeout_secs: None,
            proxy: Some("http://[::1".into()),
        };
        let err = Downloader::new(Path::new("."), false, &network).err().unwrap();
        assert!(matches!(err, Error::Client(_)));
    }
}
