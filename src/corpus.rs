//! Corpus entities.
//!
//! Everything here is loaded once from the Tatoeba exports and never mutated.
//! Multi-valued relations (links, recordings, tags) are kept as
//! `id -> Vec<_>` multimaps.
use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

/// Tatoeba sentence identifier.
pub type SentenceId = u64;

pub type Sentences = HashMap<SentenceId, Sentence>;
pub type Links = HashMap<SentenceId, Vec<SentenceId>>;
pub type AudioIndex = HashMap<SentenceId, Vec<AudioRecord>>;
pub type Tags = HashMap<SentenceId, Vec<String>>;

/// A sentence, as found in `sentences.csv`.
///
/// `lang` is `\N` for sentences whose language has not been set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sentence {
    pub id: SentenceId,
    pub lang: String,
    pub text: String,
}

impl Sentence {
    pub fn new(id: SentenceId, lang: &str, text: &str) -> Self {
        Self {
            id,
            lang: lang.to_string(),
            text: text.to_string(),
        }
    }
}

/// `translation_id` is a translation of `sentence_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub sentence_id: SentenceId,
    pub translation_id: SentenceId,
}

/// A recording of a sentence.
///
/// Older exports do not carry `audio_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRecord {
    pub sentence_id: SentenceId,
    pub audio_id: Option<u64>,
    pub username: String,
    pub license: String,
    pub attribution_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub sentence_id: SentenceId,
    pub name: String,
}

/// One deck row: a target sentence, one of its translations, its recordings and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<'a> {
    pub target: &'a Sentence,
    pub base: &'a Sentence,
    pub audio: &'a [AudioRecord],
    pub tags: BTreeSet<&'a str>,
}

impl<'a> Card<'a> {
    /// Name of the audio file in the output audio directory.
    pub fn audio_filename(&self) -> String {
        format!("{}.mp3", self.target.id)
    }

    /// Anki embedded media reference.
    pub fn sound_tag(&self) -> String {
        format!("[sound:{}]", self.audio_filename())
    }
}
