use crate::error::{Error, Result};

use std::io::{self, SeekFrom};
use std::path::Path;

use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Reads the lines covered by the last `max_bytes` bytes of `path`.
///
/// A missing file yields an empty list: absence of history is the normal
/// case for a brand-new source. When the read starts mid-file the first
/// line is dropped, since the seek may have landed mid-line. Undecodable
/// byte sequences are replaced, never an error.
///
/// # Errors
///
/// Returns [`Error::Read`] for any failure other than absence; callers
/// treat that as "no history available" and continue.
pub async fn read_tail(path: &Path, max_bytes: u64) -> Result<Vec<String>> {
    let read_err = |source: io::Error| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = match fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(read_err(source)),
    };

    let len = file.metadata().await.map_err(read_err)?.len();
    let offset = len.saturating_sub(max_bytes);
    if offset > 0 {
        file.seek(SeekFrom::Start(offset)).await.map_err(read_err)?;
    }

    let mut buf = Vec::with_capacity(usize::try_from(len - offset).unwrap_or(0));
    file.read_to_end(&mut buf).await.map_err(read_err)?;

    let text = String::from_utf8_lossy(&buf);
    let skip_partial = usize::from(offset > 0);
    Ok(text.lines().skip(skip_partial).map(String::from).collect())
}
