//! # tatoeba-anki
//!
//! Builds [Anki](https://apps.ankiweb.net) decks from [Tatoeba](https://tatoeba.org) sentence pairs,
//! keeping only sentences that have been recorded by a native speaker.
//!
//! The crate can be used both as a tool, or as a lib to integrate
//! the fetching and joining of Tatoeba exports into other projects.
//!
//! ## Getting started
//!
//! ```sh
//! tatoeba-anki --target deu --base eng
//! ```
//!
//! writes `output/deu_from_eng.csv` and the recordings in `output/audio/`.
//! The csv can be imported in Anki (File → Import, tab-separated),
//! and the contents of `output/audio/` copied to the Anki media collection folder.
pub mod cli;
pub mod corpus;
pub mod decompress;
pub mod download;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod progress;

#[cfg(test)]
pub(crate) mod testing;
