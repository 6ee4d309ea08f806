use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::ArchiveError;

/// Size of each decompressed chunk written to the output.
const CHUNK_SIZE: usize = 4096;

/// Decompress the gzip stream at `source` into the single file `output`.
///
/// Concatenated gzip members are decoded one after another into the same
/// output, as zlib does. The output file is left in place if decoding fails
/// part way.
pub(super) fn extract(source: &Path, output: &Path) -> Result<u64, ArchiveError> {
    let input = File::open(source).map_err(|e| ArchiveError::OpenFailed {
        format: "gzip",
        path: source.to_path_buf(),
        source: e.into(),
    })?;

    copy_chunks(MultiGzDecoder::new(input), output).map_err(|e| ArchiveError::ExtractFailed {
        path: source.to_path_buf(),
        source: e.into(),
    })
}

fn copy_chunks<R: Read>(mut reader: R, output: &Path) -> io::Result<u64> {
    let mut writer = BufWriter::new(File::create(output)?);
    let mut buf = [0u8; CHUNK_SIZE];
    let mut written = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        written += n as u64;
    }

    writer.flush()?;
    log::debug!("Wrote {} bytes to {}", written, output.display());
    Ok(written)
}
