/*! Tatoeba table loading.

Tatoeba exports are tab-separated, header-less and unquoted (a `"` in a sentence is a literal quote).

Malformed rows are skipped and counted. A table where most rows are malformed is
most likely not the table we think it is (format change, truncated archive), and is rejected.

Loaders take a predicate deciding which well-formed rows are kept,
so that only the part of the corpus relevant to a language pair ends up in memory.
!*/
mod tables;

use std::fs::File;
use std::path::Path;

use log::{debug, info};

pub use tables::Table;

use crate::corpus::{AudioIndex, AudioRecord, Link, Links, Sentence, SentenceId, Sentences, Tag, Tags};
use crate::error::Error;

/// Number of malformed rows that get logged individually.
const LOGGED_SKIPS: u64 = 10;

/// Row counts of a loaded table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub total: u64,
    pub skipped: u64,
}

impl LoadStats {
    /// More than half of the rows are malformed.
    fn implausible(&self) -> bool {
        self.total > 0 && self.skipped * 2 > self.total
    }
}

fn open(path: &Path) -> Result<csv::Reader<File>, Error> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_path(path)?;
    Ok(reader)
}

/// Parse each row of the table at `path` as an `R`, passing well-formed rows to `visit`.
pub fn load_table<R: Table>(path: &Path, mut visit: impl FnMut(R)) -> Result<LoadStats, Error> {
    debug!("loading {} from {:?}", R::NAME, path);
    let mut reader = open(path)?;
    let mut record = csv::StringRecord::new();
    let mut stats = LoadStats::default();

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => (),
            Ok(false) => break,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                stats.total += 1;
                stats.skipped += 1;
                debug!("{}: skipping invalid utf-8 row: {}", R::NAME, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        stats.total += 1;
        match R::parse(&record) {
            Some(row) => visit(row),
            None => {
                stats.skipped += 1;
                if stats.skipped <= LOGGED_SKIPS {
                    debug!(
                        "{}: skipping malformed row {:?} (line {})",
                        R::NAME,
                        record,
                        record.position().map(|p| p.line()).unwrap_or_default()
                    );
                }
            }
        }
    }

    info!(
        "{}: read {} rows, skipped {}",
        R::NAME,
        stats.total,
        stats.skipped
    );

    if stats.implausible() {
        return Err(Error::format(
            path.display().to_string(),
            format!(
                "{}/{} rows are not valid {} rows",
                stats.skipped,
                stats.total,
                R::NAME
            ),
        ));
    }

    Ok(stats)
}

/// Load sentences written in one of `languages`, or every sentence if `languages` is empty.
pub fn load_sentences(path: &Path, languages: &[&str]) -> Result<Sentences, Error> {
    let mut sentences = Sentences::new();
    load_table(path, |sentence: Sentence| {
        if languages.is_empty() || languages.contains(&sentence.lang.as_str()) {
            sentences.insert(sentence.id, sentence);
        }
    })?;
    Ok(sentences)
}

pub fn load_links(path: &Path, keep: impl Fn(&Link) -> bool) -> Result<Links, Error> {
    let mut links = Links::new();
    load_table(path, |link: Link| {
        if keep(&link) {
            links
                .entry(link.sentence_id)
                .or_default()
                .push(link.translation_id);
        }
    })?;
    Ok(links)
}

/// Recordings are kept in file order.
pub fn load_audio_index(
    path: &Path,
    keep: impl Fn(SentenceId) -> bool,
) -> Result<AudioIndex, Error> {
    let mut index = AudioIndex::new();
    load_table(path, |record: AudioRecord| {
        if keep(record.sentence_id) {
            index.entry(record.sentence_id).or_default().push(record);
        }
    })?;
    Ok(index)
}

pub fn load_tags(path: &Path, keep: impl Fn(SentenceId) -> bool) -> Result<Tags, Error> {
    let mut tags = Tags::new();
    load_table(path, |tag: Tag| {
        if keep(tag.sentence_id) {
            tags.entry(tag.sentence_id).or_default().push(tag.name);
        }
    })?;
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn table(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn sentences_by_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = table(
            &dir,
            "sentences.csv",
            "1\tdeu\tIch komme.\n2\teng\tI'm coming.\n3\tfra\tJ'arrive.\n4\t\\N\t???\n",
        );

        let sentences = load_sentences(&path, &["deu", "eng"]).unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[&1].text, "Ich komme.");
        assert_eq!(sentences[&2].lang, "eng");

        let all = load_sentences(&path, &[]).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn quotes_are_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = table(
            &dir,
            "sentences.csv",
            "5\teng\t\"Hi,\" he said.\n6\teng\tShe said \"no\n",
        );

        let sentences = load_sentences(&path, &["eng"]).unwrap();
        assert_eq!(sentences[&5].text, "\"Hi,\" he said.");
        assert_eq!(sentences[&6].text, "She said \"no");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = table(&dir, "links.csv", "1\t2\n1\t3\nbroken\n2\t1\n");

        let mut seen = 0;
        let stats = load_table(&path, |_: Link| seen += 1).unwrap();
        assert_eq!(
            stats,
            LoadStats {
                total: 4,
                skipped: 1
            }
        );
        assert_eq!(seen, 3);
    }

    #[test]
    fn mostly_malformed_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // a sentences table handed over as links
        let path = table(&dir, "links.csv", "1\tdeu\tIch komme.\n2\teng\tI'm coming.\n3\t4\n");

        let res = load_links(&path, |_| true);
        assert!(matches!(res, Err(Error::Format { .. })));
    }

    #[test]
    fn empty_table_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let path = table(&dir, "tags.csv", "");

        let tags = load_tags(&path, |_| true).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn missing_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_tags(&dir.path().join("nope.csv"), |_| true);
        assert!(res.is_err());
    }

    #[test]
    fn links_multimap() {
        let dir = tempfile::tempdir().unwrap();
        let path = table(&dir, "links.csv", "1\t2\n1\t3\n2\t1\n3\t1\n");

        let links = load_links(&path, |l| l.sentence_id == 1).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[&1], vec![2, 3]);
    }

    #[test]
    fn audio_index_keeps_every_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = table(
            &dir,
            "sentences_with_audio.csv",
            "1\t10\talice\tCC BY 4.0\t\\N\n1\t11\tbob\t\\N\t\\N\n2\t12\tcarol\tCC0\t\\N\n",
        );

        let index = load_audio_index(&path, |id| id == 1).unwrap();
        let ids: Vec<_> = index[&1].iter().map(|r| r.audio_id).collect();
        assert_eq!(ids, vec![Some(10), Some(11)]);
        assert!(!index.contains_key(&2));
    }

    #[test]
    fn tags_multimap() {
        let dir = tempfile::tempdir().unwrap();
        let path = table(&dir, "tags.csv", "1\tidiom\n1\tby Mark Twain\n2\tOK\n");

        let tags = load_tags(&path, |_| true).unwrap();
        assert_eq!(tags[&1], vec!["idiom", "by Mark Twain"]);
        assert_eq!(tags[&2], vec!["OK"]);
    }
}
