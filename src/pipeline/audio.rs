//! Audio materialization.
//!
//! Each card's target sentence audio ends up in the audio folder as `<sentence id>.mp3`,
//! either copied from a local folder of recordings or downloaded from Tatoeba.
//!
//! A non-empty file already present under that name is never fetched again.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use url::Url;

use crate::corpus::{AudioRecord, Card, Sentence};
use crate::error::Error;
use crate::io::{is_present, part_path};

/// Download location of recordings that have an audio id.
pub const AUDIO_URL: &str = "https://tatoeba.org/audio/download/";
/// Download location of recordings from older exports, which lack an audio id.
pub const LEGACY_AUDIO_URL: &str = "https://audio.tatoeba.org/sentences/";

pub enum AudioSource {
    /// A folder holding `<sentence id>.mp3` files.
    Local(PathBuf),
    /// Per-sentence download.
    Remote {
        client: Client,
        audio_url: Url,
        legacy_audio_url: Url,
    },
}

impl AudioSource {
    pub fn remote(timeout: Duration) -> Result<Self, Error> {
        Self::remote_with_urls(AUDIO_URL, LEGACY_AUDIO_URL, timeout)
    }

    pub fn remote_with_urls(
        audio_url: &str,
        legacy_audio_url: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(AudioSource::Remote {
            client,
            audio_url: Url::parse(audio_url)?,
            legacy_audio_url: Url::parse(legacy_audio_url)?,
        })
    }
}

/// Recording location for `sentence`.
fn recording_url(
    audio_url: &Url,
    legacy_audio_url: &Url,
    sentence: &Sentence,
    record: &AudioRecord,
) -> Result<Url, Error> {
    let url = match record.audio_id {
        Some(audio_id) => audio_url.join(&audio_id.to_string())?,
        None => legacy_audio_url.join(&format!("{}/{}.mp3", sentence.lang, sentence.id))?,
    };
    Ok(url)
}

pub struct AudioMaterializer {
    dst: PathBuf,
    source: AudioSource,
}

impl AudioMaterializer {
    /// Create the materializer, creating `dst` if needed.
    pub fn new(dst: &Path, source: AudioSource) -> Result<Self, Error> {
        std::fs::create_dir_all(dst)?;
        Ok(Self {
            dst: dst.to_path_buf(),
            source,
        })
    }

    pub fn destination(&self, card: &Card) -> PathBuf {
        self.dst.join(card.audio_filename())
    }

    /// Make the audio of `card`'s target sentence available in the audio folder.
    ///
    /// Failing to get the audio is reported as [Error::MissingAudio].
    /// Other errors come from writing into the audio folder.
    pub fn materialize(&self, card: &Card) -> Result<PathBuf, Error> {
        let dst = self.destination(card);
        if is_present(&dst) {
            debug!("{}: audio already present", card.target.id);
            return Ok(dst);
        }

        match &self.source {
            AudioSource::Local(src) => self.copy(card, &src.join(card.audio_filename()), &dst)?,
            AudioSource::Remote {
                client,
                audio_url,
                legacy_audio_url,
            } => {
                let mut last_error = Error::missing_audio(card.target.id, "no recording");
                let mut fetched = false;

                // first recording that works wins
                for record in card.audio {
                    let url = recording_url(audio_url, legacy_audio_url, card.target, record)?;
                    match self.fetch(card, client, &url, &dst) {
                        Ok(()) => {
                            fetched = true;
                            break;
                        }
                        Err(e @ Error::MissingAudio { .. }) => {
                            debug!("{}", e);
                            last_error = e;
                        }
                        Err(e) => return Err(e),
                    }
                }

                if !fetched {
                    return Err(last_error);
                }
            }
        }

        Ok(dst)
    }

    fn copy(&self, card: &Card, src: &Path, dst: &Path) -> Result<(), Error> {
        if !is_present(src) {
            return Err(Error::missing_audio(
                card.target.id,
                format!("{:?} is missing or empty", src),
            ));
        }

        let mut input =
            File::open(src).map_err(|e| Error::missing_audio(card.target.id, e.to_string()))?;
        let part = part_path(dst);
        let mut out = BufWriter::new(File::create(&part)?);
        std::io::copy(&mut input, &mut out)?;
        out.flush()?;
        drop(out);

        std::fs::rename(&part, dst)?;
        Ok(())
    }

    fn fetch(&self, card: &Card, client: &Client, url: &Url, dst: &Path) -> Result<(), Error> {
        debug!("{}: fetching {}", card.target.id, url);
        let missing = |e: reqwest::Error| Error::missing_audio(card.target.id, format!("{url}: {e}"));

        let mut response = client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(missing)?;

        let part = part_path(dst);
        let mut out = BufWriter::new(File::create(&part)?);
        let copied = response.copy_to(&mut out);
        out.flush()?;
        drop(out);

        match copied {
            Ok(0) => {
                std::fs::remove_file(&part)?;
                Err(Error::missing_audio(
                    card.target.id,
                    format!("{url}: empty response"),
                ))
            }
            Ok(_) => {
                std::fs::rename(&part, dst)?;
                Ok(())
            }
            Err(e) => {
                std::fs::remove_file(&part)?;
                Err(missing(e))
            }
        }
    }
}
