//! Payment screenshot storage
//!
//! Files land under `<upload dir>/screenshots/` with a random name; the
//! ledger only ever stores the public reference returned by [`ScreenshotStore::save`].

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};

/// Maximum screenshot size (5MB)
pub const MAX_SCREENSHOT_BYTES: usize = 5 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const SCREENSHOT_DIR: &str = "screenshots";
const PUBLIC_PREFIX: &str = "/uploads/screenshots/";

pub struct ScreenshotStore {
    root: PathBuf,
}

impl ScreenshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served at `/uploads`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> LedgerResult<String> {
        let ext = validate_screenshot(original_name, data)?;

        let dir = self.root.join(SCREENSHOT_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        tokio::fs::write(dir.join(&filename), data).await?;

        tracing::info!(filename = %filename, size = data.len(), "screenshot stored");
        Ok(format!("{PUBLIC_PREFIX}{filename}"))
    }

    /// Removes a screenshot whose contribution was never recorded.
    pub async fn discard(&self, reference: &str) {
        let Some(filename) = reference.strip_prefix(PUBLIC_PREFIX) else {
            return;
        };
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return;
        }

        let path = self.root.join(SCREENSHOT_DIR).join(filename);
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = ?path, error = %err, "failed to discard orphaned screenshot");
        }
    }
}

fn validate_screenshot(original_name: Option<&str>, data: &[u8]) -> LedgerResult<String> {
    if data.is_empty() {
        return Err(LedgerError::validation("Payment screenshot is empty"));
    }
    if data.len() > MAX_SCREENSHOT_BYTES {
        return Err(LedgerError::validation(format!(
            "Screenshot too large. Maximum size is {}MB",
            MAX_SCREENSHOT_BYTES / 1024 / 1024
        )));
    }

    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(LedgerError::validation(format!(
            "Unsupported screenshot format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    Ok(ext)
}
