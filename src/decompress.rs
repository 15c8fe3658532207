//! Archive decompression.
//!
//! Tatoeba publishes its full exports as single-file `.tar.bz2` archives and
//! its per-language exports as plain `.bz2` files.
//! Gzip is supported too, for mirrors that recompress them.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use log::{debug, info};

use crate::error::Error;
use crate::io::part_path;

/// Decompress `archive` into `dst`.
///
/// Tarballs are searched for a member having the same file name as `dst`.
pub fn extract(archive: &Path, dst: &Path) -> Result<(), Error> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Custom(format!("invalid archive name: {:?}", archive)))?;

    info!("extracting {:?} to {:?}", archive, dst);
    let src = BufReader::new(File::open(archive)?);

    if name.ends_with(".tar.bz2") {
        extract_member(MultiBzDecoder::new(src), archive, dst)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_member(MultiGzDecoder::new(src), archive, dst)
    } else if name.ends_with(".bz2") {
        write_atomically(&mut MultiBzDecoder::new(src), dst)
    } else if name.ends_with(".gz") {
        write_atomically(&mut MultiGzDecoder::new(src), dst)
    } else {
        Err(Error::format(name, "unknown archive extension"))
    }
}

fn extract_member<R: Read>(decoder: R, archive: &Path, dst: &Path) -> Result<(), Error> {
    let member = dst
        .file_name()
        .ok_or_else(|| Error::Custom(format!("invalid destination: {:?}", dst)))?;

    let mut tarball = tar::Archive::new(decoder);
    for entry in tarball.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        debug!("{:?}: found member {:?}", archive, path);

        if path.file_name() == Some(member) {
            return write_atomically(&mut entry, dst);
        }
    }

    Err(Error::format(
        archive.display().to_string(),
        format!("archive has no member named {:?}", member),
    ))
}

/// Copy `src` into `dst` through a `.part` file.
fn write_atomically(src: &mut impl Read, dst: &Path) -> Result<(), Error> {
    let part = part_path(dst);
    let mut out = BufWriter::new(File::create(&part)?);
    let nb_bytes = std::io::copy(src, &mut out)?;
    out.flush()?;
    drop(out);

    std::fs::rename(&part, dst)?;
    debug!("wrote {} bytes to {:?}", nb_bytes, dst);
    Ok(())
}
