//! Column layouts of the Tatoeba exports.
use csv::StringRecord;
use itertools::Itertools;
use serde::de::DeserializeOwned;

use crate::corpus::{AudioRecord, Link, Sentence, SentenceId, Tag};

/// Tatoeba's marker for missing values.
const NULL: &str = "\\N";

/// A row type of a Tatoeba table.
pub trait Table: Sized {
    const NAME: &'static str;

    /// Number of columns of a well-formed row.
    const COLUMNS: usize;

    /// The last column is free text, and may contain the delimiter.
    const TRAILING_TEXT: bool = false;

    fn accepts(len: usize) -> bool {
        len == Self::COLUMNS
    }

    /// Build a row from a record that has an accepted length.
    fn from_record(record: &StringRecord) -> Option<Self>;

    /// Build a row from a raw record, or `None` if it is malformed.
    fn parse(record: &StringRecord) -> Option<Self> {
        if Self::accepts(record.len()) {
            Self::from_record(record)
        } else if Self::TRAILING_TEXT && record.len() > Self::COLUMNS {
            // tabs in the free text split it into several fields: glue them back.
            let mut fixed: StringRecord = record.iter().take(Self::COLUMNS - 1).collect();
            fixed.push_field(&record.iter().skip(Self::COLUMNS - 1).join("\t"));
            Self::from_record(&fixed)
        } else {
            None
        }
    }
}

fn deserialize<T: DeserializeOwned>(record: &StringRecord) -> Option<T> {
    record.deserialize(None).ok()
}

fn nullable(field: &str) -> String {
    if field == NULL {
        String::new()
    } else {
        field.to_string()
    }
}

impl Table for Sentence {
    const NAME: &'static str = "sentences";
    const COLUMNS: usize = 3;
    const TRAILING_TEXT: bool = true;

    fn from_record(record: &StringRecord) -> Option<Self> {
        deserialize(record)
    }
}

impl Table for Link {
    const NAME: &'static str = "links";
    const COLUMNS: usize = 2;

    fn from_record(record: &StringRecord) -> Option<Self> {
        deserialize(record)
    }
}

impl Table for Tag {
    const NAME: &'static str = "tags";
    const COLUMNS: usize = 2;
    const TRAILING_TEXT: bool = true;

    fn from_record(record: &StringRecord) -> Option<Self> {
        deserialize(record)
    }
}

/// `sentences_with_audio.csv` comes in two layouts:
/// `sentence_id, audio_id, username, license, attribution_url`
/// and the older `sentence_id, username, license, attribution_url`.
impl Table for AudioRecord {
    const NAME: &'static str = "sentences_with_audio";
    const COLUMNS: usize = 5;

    fn accepts(len: usize) -> bool {
        len == Self::COLUMNS || len == Self::COLUMNS - 1
    }

    fn from_record(record: &StringRecord) -> Option<Self> {
        let (sentence_id, audio_id, username, license, attribution_url) = if record.len() == 5 {
            deserialize::<(SentenceId, u64, String, String, String)>(record)
                .map(|(s, a, u, l, at)| (s, Some(a), u, l, at))?
        } else {
            deserialize::<(SentenceId, String, String, String)>(record)
                .map(|(s, u, l, at)| (s, None, u, l, at))?
        };

        Some(AudioRecord {
            sentence_id,
            audio_id,
            username: nullable(&username),
            license: nullable(&license),
            attribution_url: nullable(&attribution_url),
        })
    }
}
