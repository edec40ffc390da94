//! Model artifact bootstrap: the ONNX export is fetched on first run and
//! reused from disk afterwards.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model file {} is missing and MODEL_URL is not set", .0.display())]
    Missing(PathBuf),
    #[error("model download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Makes sure the model file exists, fetching it when a URL is configured.
/// A file already on disk is used as-is, whatever its origin.
pub async fn ensure_model(path: &Path, url: Option<&str>) -> Result<(), ArtifactError> {
    if path.exists() {
        log::info!("Using cached model at {}", path.display());
        return Ok(());
    }

    let url = url.ok_or_else(|| ArtifactError::Missing(path.to_path_buf()))?;
    log::info!(
        "Model not found at {}, downloading from {}",
        path.display(),
        url
    );

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    // Stage into a sibling temp file; a partial download must never sit at
    // the final path where the next start would treat it as cached.
    let staging = path.with_extension("download");
    std::fs::write(&staging, &bytes)?;
    std::fs::rename(&staging, path)?;

    log::info!("Downloaded model ({} bytes) to {}", bytes.len(), path.display());
    Ok(())
}
