//! Error enum
use std::fmt;

use crate::corpus::SentenceId;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// A required archive could not be fetched. Aborts the run.
    Download {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A language code that can't be used in file names.
    Language(String),
    /// A dataset does not look like what we expect. Aborts the run.
    Format {
        dataset: String,
        reason: String,
    },
    /// Audio for a single sentence could not be obtained.
    /// The pipeline drops the affected cards and carries on.
    MissingAudio {
        sentence_id: SentenceId,
        reason: String,
    },
    Http(reqwest::Error),
    Csv(csv::Error),
    Url(url::ParseError),
    Custom(String),
}

impl Error {
    pub fn download(
        url: &url::Url,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Download {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn format(dataset: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Format {
            dataset: dataset.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_audio(sentence_id: SentenceId, reason: impl Into<String>) -> Self {
        Error::MissingAudio {
            sentence_id,
            reason: reason.into(),
        }
    }

    /// `true` for errors that must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::MissingAudio { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Download { url, source } => write!(f, "could not download {url}: {source}"),
            Error::Format { dataset, reason } => write!(f, "malformed dataset {dataset}: {reason}"),
            Error::Language(code) => write!(f, "invalid language code {code:?}"),
            Error::MissingAudio {
                sentence_id,
                reason,
            } => write!(f, "no audio for sentence {sentence_id}: {reason}"),
            Error::Http(e) => write!(f, "http client error: {e}"),
            Error::Csv(e) => write!(f, "csv error: {e}"),
            Error::Url(e) => write!(f, "invalid url: {e}"),
            Error::Custom(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Download { source, .. } => Some(&**source),
            Error::Http(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Url(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Error {
        Error::Custom(format!("could not build worker pool: {e}"))
    }
}
