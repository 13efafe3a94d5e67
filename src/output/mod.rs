//! Writing the finished document to disk.
//!
//! The write is confirmed with an fsync plus a metadata check instead of
//! polling for the file to appear; a write that cannot be confirmed fails
//! with [`TranscriptError::PersistFailed`].

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::sanitize_filename;
use crate::{Result, TranscriptError};

/// Resolve the output filename stem.
///
/// Priority: explicit override, then video title, then video id; each
/// candidate passes through filename sanitization and the first non-empty
/// result wins.
pub fn resolve_filename(explicit: Option<&str>, title: Option<&str>, video_id: &str) -> String {
    explicit
        .map(sanitize_filename)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            title
                .map(sanitize_filename)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| sanitize_filename(video_id))
}

/// Write the document body as `{stem}.md` under `dir` and confirm the write
/// landed. Returns the full output path.
pub async fn save_document(body: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}.md", stem));
    tracing::info!("Saving transcript to {}", path.display());

    if !dir.as_os_str().is_empty() {
        fs_err::create_dir_all(dir)
            .map_err(|e| TranscriptError::PersistFailed(e.to_string()))?;
    }

    let mut file = fs_err::File::create(&path)
        .map_err(|e| TranscriptError::PersistFailed(e.to_string()))?;
    file.write_all(body.as_bytes())
        .map_err(|e| TranscriptError::PersistFailed(e.to_string()))?;
    file.sync_all()
        .map_err(|e| TranscriptError::PersistFailed(e.to_string()))?;

    fs_err::metadata(&path)
        .map_err(|e| TranscriptError::PersistFailed(e.to_string()))?;

    tracing::info!("Transcript successfully saved to {}", path.display());
    Ok(path)
}

/// Open a file with the platform's default application. Failure is logged,
/// never fatal.
pub async fn open_file(path: &Path) {
    use tokio::process::Command;

    tracing::info!("Opening {}", path.display());

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", ""]).arg(path).spawn()
    } else {
        Command::new("xdg-open").arg(path).spawn()
    };

    if let Err(e) = result {
        tracing::error!("Could not open {}: {}", path.display(), e);
    }
}
