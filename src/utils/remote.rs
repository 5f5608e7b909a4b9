use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Checks the provided URL to determine if it is a remote or local URL.
/// The current implementation is a heuristic, and may not cover all cases.
pub(crate) fn is_remote_url<T: AsRef<str>>(p: T) -> bool {
    let pr = p.as_ref();
    pr.starts_with("www.") || pr.starts_with("http://") || pr.starts_with("https://")
}

/// The last non-empty path segment of `url`, ignoring any query or fragment.
pub(crate) fn url_file_name(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    // the first segment is the host
    let (_, rest) = path.split_once('/')?;
    rest.rsplit('/').find(|s| !s.is_empty())
}

/// Downloads `url` into `dest`. The body is streamed into a temporary file
/// next to `dest`, which replaces `dest` only once the transfer completes.
pub(crate) fn download_to_file<T: AsRef<str>>(url: T, dest: &Path) -> Result<()> {
    let url = url.as_ref();
    let dir = match dest.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };

    debug!("requesting {}", url);
    let resp = ureq::get(url)
        .call()
        .with_context(|| format!("request for {} failed", url))?;

    let tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("could not create a temporary file in {}", dir.display()))?;
    {
        let mut reader = resp.into_body().into_reader();
        let mut w = BufWriter::new(tmp.as_file());
        std::io::copy(&mut reader, &mut w)
            .with_context(|| format!("transfer of {} was interrupted", url))?;
        w.flush()?;
    }
    tmp.persist(dest)
        .with_context(|| format!("could not move the download to {}", dest.display()))?;
    Ok(())
}

/// Like [`download_to_file`], and returns the BLAKE3 hash of what was written.
pub(crate) fn download_to_file_compute_hash<T: AsRef<str>>(
    url: T,
    dest: &Path,
) -> Result<blake3::Hash> {
    download_to_file(url.as_ref(), dest)?;
    let mut hasher = blake3::Hasher::new();
    hasher
        .update_mmap(dest)
        .with_context(|| format!("could not hash {}", dest.display()))?;
    let hash = hasher.finalize();
    info!("{} has Blake3 hash {}", dest.display(), hash);
    Ok(hash)
}
