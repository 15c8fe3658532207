//! Anki-importable deck table.
use std::path::Path;

use log::debug;
use serde::Serialize;

use super::TagFormat;
use crate::corpus::Card;
use crate::error::Error;

#[derive(Debug, Serialize)]
struct DeckRow<'a> {
    target: &'a str,
    base: &'a str,
    audio: String,
    tags: String,
}

/// Writes cards to a tab-separated file, one row per card, in the order they are given.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeckWriter {
    tag_format: TagFormat,
}

impl DeckWriter {
    pub fn new(tag_format: TagFormat) -> Self {
        Self { tag_format }
    }

    /// Write `cards` to `dst`, replacing any existing file.
    /// Returns the number of rows written.
    pub fn write<'c, 'a: 'c>(
        &self,
        cards: impl IntoIterator<Item = &'c Card<'a>>,
        dst: &Path,
    ) -> Result<usize, Error> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(dst)?;

        let mut nb_rows = 0;
        for card in cards {
            out.serialize(DeckRow {
                target: &card.target.text,
                base: &card.base.text,
                audio: card.sound_tag(),
                tags: self.tag_format.render(&card.tags),
            })?;
            nb_rows += 1;
        }
        out.flush()?;

        debug!("wrote {} rows to {:?}", nb_rows, dst);
        Ok(nb_rows)
    }
}
