//! Sentence pair joining.
//!
//! Cards are produced for every (target, base) pair where:
//! - the target sentence is written in the target language and has at least one recording,
//! - a link goes from the target sentence to the base sentence,
//! - the base sentence is written in the base language.
//!
//! A target sentence with several translations yields one card per translation.
//! Cards are ordered by target id, then by base id.
use std::collections::BTreeSet;

use itertools::Itertools;

use crate::corpus::{AudioIndex, Card, Links, Sentences, Tags};

pub fn join<'a>(
    target_lang: &'a str,
    base_lang: &'a str,
    sentences: &'a Sentences,
    links: &'a Links,
    audio: &'a AudioIndex,
    tags: &'a Tags,
) -> impl Iterator<Item = Card<'a>> + 'a {
    sentences
        .values()
        .filter(move |sentence| sentence.lang == target_lang)
        .filter_map(move |sentence| {
            audio
                .get(&sentence.id)
                .filter(|recordings| !recordings.is_empty())
                .map(|recordings| (sentence, recordings.as_slice()))
        })
        .sorted_by_key(|(target, _)| target.id)
        .flat_map(move |(target, recordings)| {
            let target_tags: BTreeSet<&str> = tags
                .get(&target.id)
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();

            links
                .get(&target.id)
                .into_iter()
                .flatten()
                .filter_map(move |id| sentences.get(id))
                .filter(move |base| base.lang == base_lang)
                .sorted_by_key(|base| base.id)
                .dedup_by(|a, b| a.id == b.id)
                .map(move |base| Card {
                    target,
                    base,
                    audio: recordings,
                    tags: target_tags.clone(),
                })
        })
}
