/*!
# IO utilities

Loading of Tatoeba tables and writing of decks.

Files that are produced in several steps (downloads, decompressed tables, audio files)
are first written to a `.part` sibling and renamed once complete,
so that a file present under its final name is always a complete one.
!*/
pub mod reader;
pub mod writer;

use std::path::{Path, PathBuf};

pub use reader::{load_audio_index, load_links, load_sentences, load_tags};
pub use writer::{DeckWriter, TagFormat};

/// `foo/bar.csv` -> `foo/bar.csv.part`
pub(crate) fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// `true` if `path` is a non-empty regular file.
pub(crate) fn is_present(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
