//! Deck generation pipeline
//!
//! Builds an Anki deck for learning a target language from a base language.
//!
//! # Processing
//! 1. The exports are made available in the cache folder (see [crate::download]).
//! 1. Sentences of both languages are loaded, then links, recordings and tags
//!   of target sentences only.
//! 1. Sentences are paired (see [super::join]).
//! 1. Audio is materialized for every paired target sentence, in parallel.
//!   Sentences whose audio can't be obtained are logged and their cards dropped.
//! 1. Remaining cards are written, in pairing order.
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use itertools::Itertools;
use log::{info, warn};
use rayon::prelude::*;

use super::audio::{AudioMaterializer, AudioSource};
use super::join::join;
use super::pipeline::Pipeline;
use crate::cli::TatoebaAnki;
use crate::corpus::{Card, SentenceId, Sentences};
use crate::download::{check_language, Dataset, Fetcher, BASE_URL};
use crate::error::Error;
use crate::io::{load_audio_index, load_links, load_sentences, load_tags, DeckWriter, TagFormat};
use crate::progress;

/// Deck generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckConfig {
    /// Language to learn.
    pub target: String,
    /// Language of the translations.
    pub base: String,
    pub output: PathBuf,
    /// Where exports are downloaded and decompressed.
    pub cache: PathBuf,
    pub exports_url: String,
    /// Use per-language exports rather than the full ones.
    pub per_language: bool,
    /// Copy recordings from there rather than downloading them.
    pub audio_dir: Option<PathBuf>,
    /// Number of parallel audio fetches.
    pub workers: usize,
    pub timeout: Duration,
    pub tag_format: TagFormat,
}

impl DeckConfig {
    pub fn new(target: &str, base: &str) -> Self {
        Self {
            target: target.to_string(),
            base: base.to_string(),
            output: PathBuf::from("output"),
            cache: PathBuf::from("csv"),
            exports_url: BASE_URL.to_string(),
            per_language: false,
            audio_dir: None,
            workers: 4,
            timeout: Duration::from_secs(60),
            tag_format: TagFormat::default(),
        }
    }

    /// `<output>/<target>_from_<base>.csv`
    pub fn deck_path(&self) -> PathBuf {
        self.output
            .join(format!("{}_from_{}.csv", self.target, self.base))
    }

    /// `<output>/audio`
    pub fn audio_path(&self) -> PathBuf {
        self.output.join("audio")
    }
}

impl From<TatoebaAnki> for DeckConfig {
    fn from(opt: TatoebaAnki) -> Self {
        Self {
            target: opt.target,
            base: opt.base,
            output: opt.output,
            cache: opt.cache,
            exports_url: opt.exports_url,
            per_language: opt.per_language,
            audio_dir: opt.audio_dir,
            workers: opt.workers,
            timeout: Duration::from_secs(opt.timeout),
            tag_format: opt.tag_format,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub deck: PathBuf,
    pub audio: PathBuf,
    /// Rows written to the deck.
    pub cards: usize,
    /// Cards dropped because their audio could not be obtained.
    pub dropped_cards: usize,
    /// Target sentences whose audio could not be obtained.
    pub missing_audio: usize,
}

pub struct Deck {
    config: DeckConfig,
}

impl Deck {
    pub fn new(config: DeckConfig) -> Self {
        Self { config }
    }

    fn sentence_datasets(&self) -> Vec<Dataset> {
        let c = &self.config;
        if c.per_language {
            [&c.target, &c.base]
                .into_iter()
                .unique()
                .map(|lang| Dataset::LanguageSentences(lang.clone()))
                .collect()
        } else {
            vec![Dataset::Sentences]
        }
    }

    fn links_dataset(&self) -> Dataset {
        let c = &self.config;
        if c.per_language {
            Dataset::LanguageLinks {
                from: c.target.clone(),
                to: c.base.clone(),
            }
        } else {
            Dataset::Links
        }
    }

    /// Get the audio of each target sentence of `cards`.
    /// Returns the ids of sentences that have no audio.
    fn materialize(&self, cards: &[Card]) -> Result<HashSet<SentenceId>, Error> {
        let c = &self.config;
        let source = match &c.audio_dir {
            Some(dir) => AudioSource::Local(dir.clone()),
            None => AudioSource::remote(c.timeout)?,
        };
        let materializer = AudioMaterializer::new(&c.audio_path(), source)?;

        // cards are sorted by target: one job per target sentence
        let jobs: Vec<&Card> = cards
            .iter()
            .dedup_by(|a, b| a.target.id == b.target.id)
            .collect();
        info!(
            "materializing audio of {} sentences using {} workers",
            jobs.len(),
            c.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(c.workers.max(1))
            .build()?;
        let bar = progress::items(jobs.len() as u64, "audio");
        let results: Result<Vec<Option<SentenceId>>, Error> = pool.install(|| {
            jobs.par_iter()
                .map(|card| {
                    let res = match materializer.materialize(card) {
                        Ok(_) => Ok(None),
                        Err(e) if !e.is_fatal() => {
                            warn!("{}", e);
                            Ok(Some(card.target.id))
                        }
                        Err(e) => Err(e),
                    };
                    bar.inc(1);
                    res
                })
                .collect()
        });
        bar.finish_and_clear();

        Ok(results?.into_iter().flatten().collect())
    }
}

impl Pipeline<Summary> for Deck {
    fn run(&self) -> Result<Summary, Error> {
        let c = &self.config;
        check_language(&c.target)?;
        check_language(&c.base)?;
        info!("building a {} deck from {}", c.target, c.base);

        // get every table first so that download failures happen early
        let fetcher = Fetcher::with_base_url(&c.cache, &c.exports_url, c.timeout)?;
        let sentence_paths = self
            .sentence_datasets()
            .iter()
            .map(|dataset| fetcher.ensure_local(dataset))
            .collect::<Result<Vec<_>, Error>>()?;
        let links_path = fetcher.ensure_local(&self.links_dataset())?;
        let audio_path = fetcher.ensure_local(&Dataset::AudioIndex)?;
        let tags_path = fetcher.ensure_local(&Dataset::Tags)?;

        let mut sentences = Sentences::new();
        for path in &sentence_paths {
            sentences.extend(load_sentences(path, &[c.target.as_str(), c.base.as_str()])?);
        }

        let in_lang = |lang: &str| -> HashSet<SentenceId> {
            sentences
                .values()
                .filter(|s| s.lang == lang)
                .map(|s| s.id)
                .collect()
        };
        let target_ids = in_lang(c.target.as_str());
        let base_ids = in_lang(c.base.as_str());
        info!(
            "{} {} sentences, {} {} sentences",
            target_ids.len(),
            c.target,
            base_ids.len(),
            c.base
        );

        let links = load_links(&links_path, |link| {
            target_ids.contains(&link.sentence_id) && base_ids.contains(&link.translation_id)
        })?;
        let audio = load_audio_index(&audio_path, |id| target_ids.contains(&id))?;
        let tags = load_tags(&tags_path, |id| target_ids.contains(&id))?;

        let cards: Vec<Card> = join(&c.target, &c.base, &sentences, &links, &audio, &tags).collect();
        info!("{} candidate cards", cards.len());

        let missing = self.materialize(&cards)?;
        let kept: Vec<&Card> = cards
            .iter()
            .filter(|card| !missing.contains(&card.target.id))
            .collect();

        std::fs::create_dir_all(&c.output)?;
        let deck = c.deck_path();
        let nb_cards = DeckWriter::new(c.tag_format).write(kept, &deck)?;

        let summary = Summary {
            deck,
            audio: c.audio_path(),
            cards: nb_cards,
            dropped_cards: cards.len() - nb_cards,
            missing_audio: missing.len(),
        };

        if summary.missing_audio > 0 {
            warn!(
                "dropped {} cards: no audio for {} sentences",
                summary.dropped_cards, summary.missing_audio
            );
        }
        info!("wrote {} cards to {:?}", summary.cards, summary.deck);
        Ok(summary)
    }
}
