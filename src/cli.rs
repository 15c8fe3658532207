//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use crate::download::{check_language, BASE_URL};
use crate::error::Error;
use crate::io::TagFormat;

fn language(code: &str) -> Result<String, Error> {
    check_language(code)?;
    Ok(code.to_string())
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tatoeba-anki",
    about = "Build an Anki deck with audio from Tatoeba sentence pairs."
)]
/// Deck generation command and parameters.
///
/// ```sh
/// USAGE:
///     tatoeba-anki [FLAGS] [OPTIONS] --base <base> --target <target>
///
/// FLAGS:
///     -h, --help            Prints help information
///         --per-language    use per-language exports (smaller downloads)
///     -V, --version         Prints version information
///
/// OPTIONS:
///         --audio-dir <audio-dir>        folder of <sentence id>.mp3 files to copy audio from
///     -b, --base <base>                  language you already know (e.g. eng)
///     -c, --cache <cache>                exports download folder [default: csv]
///         --exports-url <exports-url>    base URL of the Tatoeba exports
///     -o, --output <output>              output folder [default: output]
///         --tag-format <tag-format>      tags column format [default: anki]
///     -t, --target <target>              language you want to learn (e.g. jpn)
///         --timeout <timeout>            http timeout, in seconds [default: 60]
///     -w, --workers <workers>            number of parallel audio downloads [default: 4]
/// ```
pub struct TatoebaAnki {
    #[structopt(
        short = "t",
        long = "target",
        parse(try_from_str = language),
        help = "language you want to learn (ISO 639-3, e.g. jpn)"
    )]
    pub target: String,
    #[structopt(
        short = "b",
        long = "base",
        parse(try_from_str = language),
        help = "language you already know (ISO 639-3, e.g. eng)"
    )]
    pub base: String,
    #[structopt(
        parse(from_os_str),
        short = "o",
        long = "output",
        help = "output folder",
        default_value = "output"
    )]
    pub output: PathBuf,
    #[structopt(
        parse(from_os_str),
        short = "c",
        long = "cache",
        help = "exports download folder",
        default_value = "csv"
    )]
    pub cache: PathBuf,
    #[structopt(
        long = "exports-url",
        help = "base URL of the Tatoeba exports",
        default_value = BASE_URL
    )]
    pub exports_url: String,
    #[structopt(long = "per-language", help = "use per-language exports (smaller downloads)")]
    pub per_language: bool,
    #[structopt(
        parse(from_os_str),
        long = "audio-dir",
        help = "folder of <sentence id>.mp3 files to copy audio from, instead of downloading"
    )]
    pub audio_dir: Option<PathBuf>,
    #[structopt(
        short = "w",
        long = "workers",
        help = "number of parallel audio downloads",
        default_value = "4"
    )]
    pub workers: usize,
    #[structopt(long = "timeout", help = "http timeout, in seconds", default_value = "60")]
    pub timeout: u64,
    #[structopt(
        long = "tag-format",
        help = "tags column format",
        possible_values = &["anki", "html"],
        case_insensitive = true,
        default_value = "anki"
    )]
    pub tag_format: TagFormat,
}
