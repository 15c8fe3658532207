//! Tatoeba exports fetching.
//!
//! Each [Dataset] maps to an archive under the exports base URL and to the table
//! it decompresses to. [Fetcher::ensure_local] makes the table available in the cache folder:
//!
//! 1. an already decompressed table is used as is (no checksum, no network),
//! 2. else an already downloaded archive is decompressed,
//! 3. else the archive is downloaded, then decompressed.
//!
//! There is a single attempt per archive. Failures abort the run,
//! and re-running picks up from whatever made it to the cache.
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use url::Url;

use crate::decompress;
use crate::error::Error;
use crate::io::part_path;
use crate::progress;

pub const BASE_URL: &str = "https://downloads.tatoeba.org/exports/";

/// A Tatoeba export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    /// Every sentence of every language.
    Sentences,
    /// Sentences of a single language.
    LanguageSentences(String),
    /// Every translation link.
    Links,
    /// Links from sentences in `from` to sentences in `to`.
    LanguageLinks { from: String, to: String },
    /// Sentences having at least one recording.
    AudioIndex,
    Tags,
}

impl Dataset {
    /// Archive location, relative to the exports base URL.
    pub fn archive_path(&self) -> String {
        match self {
            Dataset::LanguageSentences(lang) => {
                format!("per_language/{lang}/{}", self.archive_name())
            }
            Dataset::LanguageLinks { from, .. } => {
                format!("per_language/{from}/{}", self.archive_name())
            }
            _ => self.archive_name(),
        }
    }

    pub fn archive_name(&self) -> String {
        match self {
            Dataset::Sentences | Dataset::Links | Dataset::AudioIndex | Dataset::Tags => {
                format!("{}.tar.bz2", self.stem())
            }
            Dataset::LanguageSentences(_) | Dataset::LanguageLinks { .. } => {
                format!("{}.bz2", self.table_name())
            }
        }
    }

    /// Name of the decompressed table.
    pub fn table_name(&self) -> String {
        match self {
            Dataset::LanguageSentences(_) | Dataset::LanguageLinks { .. } => {
                format!("{}.tsv", self.stem())
            }
            _ => format!("{}.csv", self.stem()),
        }
    }

    fn stem(&self) -> String {
        match self {
            Dataset::Sentences => "sentences".to_string(),
            Dataset::LanguageSentences(lang) => format!("{lang}_sentences"),
            Dataset::Links => "links".to_string(),
            Dataset::LanguageLinks { from, to } => format!("{from}-{to}_links"),
            Dataset::AudioIndex => "sentences_with_audio".to_string(),
            Dataset::Tags => "tags".to_string(),
        }
    }
}

/// Check that `code` can be part of a cache file name.
///
/// Any other code is accepted: languages unknown to Tatoeba give empty decks.
pub fn check_language(code: &str) -> Result<(), Error> {
    if code.is_empty() || code.contains(['/', '\\']) || code.contains("..") {
        return Err(Error::Language(code.to_string()));
    }
    Ok(())
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stem())
    }
}

/// Holds the cache location and the http client that will make the requests.
pub struct Fetcher {
    cache: PathBuf,
    base_url: Url,
    client: Client,
}

impl Fetcher {
    /// Fetcher for the official Tatoeba exports.
    pub fn new(cache: &Path, timeout: Duration) -> Result<Self, Error> {
        Self::with_base_url(cache, BASE_URL, timeout)
    }

    /// Fetcher for a mirror of the Tatoeba exports.
    ///
    /// `timeout` bounds every wait on the server: connecting, getting the response
    /// and each read of the body. Full exports are several gigabytes, so a slow but
    /// steady transfer is never cut, while a stalled one is.
    pub fn with_base_url(cache: &Path, base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        // without a trailing slash, joining would replace the last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            cache: cache.to_path_buf(),
            base_url,
            client,
        })
    }

    pub fn url(&self, dataset: &Dataset) -> Result<Url, Error> {
        Ok(self.base_url.join(&dataset.archive_path())?)
    }

    /// Make sure that the table of `dataset` is in the cache folder, and return its path.
    pub fn ensure_local(&self, dataset: &Dataset) -> Result<PathBuf, Error> {
        let table = self.cache.join(dataset.table_name());
        if table.is_file() {
            debug!("{}: using cached table {:?}", dataset, table);
            return Ok(table);
        }

        std::fs::create_dir_all(&self.cache)?;

        let archive = self.cache.join(dataset.archive_name());
        if archive.is_file() {
            info!("{}: using cached archive {:?}", dataset, archive);
        } else {
            let url = self.url(dataset)?;
            self.download(&url, &archive)?;
        }

        decompress::extract(&archive, &table)?;
        Ok(table)
    }

    /// Stream `url` into `dst`.
    fn download(&self, url: &Url, dst: &Path) -> Result<u64, Error> {
        info!("downloading {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::download(url, e))?;

        let name = dst
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bar = progress::bytes(response.content_length(), &name);

        let part = part_path(dst);
        let mut out = BufWriter::new(File::create(&part)?);
        let copied = std::io::copy(&mut bar.wrap_read(response), &mut out)
            .and_then(|nb_bytes| out.flush().map(|_| nb_bytes));
        drop(out);
        bar.finish_and_clear();

        match copied {
            Ok(nb_bytes) => {
                std::fs::rename(&part, dst)?;
                info!("downloaded {} ({} bytes)", url, nb_bytes);
                Ok(nb_bytes)
            }
            Err(e) => {
                std::fs::remove_file(&part)?;
                Err(Error::download(url, e))
            }
        }
    }
}
