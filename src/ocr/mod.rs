pub mod preprocess;
pub mod tesseract;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::OcrConfig;
use crate::platform::MediaPayload;

/// Text recognition over an image file on disk.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// `languages` is a `+`-joined list of language packs, e.g. `ind+eng`.
    async fn recognize(&self, image: &Path, languages: &str) -> Result<String>;
}

/// Turns downloaded image payloads into text.
///
/// Each call writes the (optionally enhanced) image to a uniquely named
/// temp file that is removed when the call returns, whatever the outcome.
pub struct OcrAdapter {
    engine: Arc<dyn OcrEngine>,
    config: OcrConfig,
}

impl OcrAdapter {
    pub fn new(engine: Arc<dyn OcrEngine>, config: OcrConfig) -> Self {
        Self { engine, config }
    }

    /// Recognize the text in an image. Returns `Ok(None)` when the result is
    /// too short to be usable; engine failures are returned as errors.
    pub async fn extract_text(&self, payload: &MediaPayload) -> Result<Option<String>> {
        if !payload.mime_type.starts_with("image/") {
            bail!("Media type {} is not an image", payload.mime_type);
        }

        let (bytes, extension) = self.prepare(payload).await;
        let prefix = format!(
            "invite-{}-{}-",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple()
        );
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(extension)
            .tempfile_in(&self.config.temp_dir)
            .with_context(|| {
                format!(
                    "Failed to create temp file in {}",
                    self.config.temp_dir.display()
                )
            })?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .context("Failed to write image for OCR")?;

        let text = self
            .engine
            .recognize(file.path(), &self.config.languages)
            .await
            .context("OCR failed")?;
        drop(file);

        let text = text.trim();
        let chars = text.chars().count();
        if chars < self.config.min_text_chars {
            debug!(
                chars,
                min = self.config.min_text_chars,
                "OCR output too short to use"
            );
            return Ok(None);
        }
        debug!(chars, "OCR produced text");
        Ok(Some(text.to_string()))
    }

    /// Enhanced PNG bytes, or the original bytes when enhancement is off or fails.
    async fn prepare(&self, payload: &MediaPayload) -> (Vec<u8>, &'static str) {
        let original = || (payload.bytes.clone(), extension_for(&payload.mime_type));
        if !self.config.preprocess {
            return original();
        }

        let bytes = payload.bytes.clone();
        let contrast = self.config.contrast;
        match tokio::task::spawn_blocking(move || preprocess::enhance(&bytes, contrast)).await {
            Ok(Ok(enhanced)) => (enhanced, ".png"),
            Ok(Err(e)) => {
                warn!("Image preprocessing failed, using original: {:#}", e);
                original()
            }
            Err(e) => {
                warn!("Image preprocessing task failed, using original: {}", e);
                original()
            }
        }
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/png" => ".png",
        "image/webp" => ".webp",
        "image/tiff" => ".tif",
        "image/bmp" => ".bmp",
        _ => ".img",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records the file it was given and what was in it.
    struct FakeEngine {
        reply: Result<String, String>,
        seen: Mutex<Option<(PathBuf, Vec<u8>)>>,
    }

    impl FakeEngine {
        fn returning(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("engine crashed".to_string()),
                seen: Mutex::new(None),
            })
        }

        fn seen(&self) -> (PathBuf, Vec<u8>) {
            self.seen.lock().unwrap().clone().expect("engine was not called")
        }
    }

    #[async_trait]
    impl OcrEngine for FakeEngine {
        async fn recognize(&self, image: &Path, _languages: &str) -> Result<String> {
            let bytes = std::fs::read(image)?;
            *self.seen.lock().unwrap() = Some((image.to_path_buf(), bytes));
            self.reply.clone().map_err(anyhow::Error::msg)
        }
    }

    fn config(dir: &Path, preprocess: bool) -> OcrConfig {
        OcrConfig {
            preprocess,
            temp_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    fn payload(bytes: &[u8]) -> MediaPayload {
        MediaPayload {
            bytes: bytes.to_vec(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_text_returned_and_temp_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FakeEngine::returning("  Undangan *Rapat RT* Hari : Senin  \n");
        let adapter = OcrAdapter::new(engine.clone(), config(dir.path(), false));

        let text = adapter.extract_text(&payload(b"jpeg-bytes")).await.unwrap();
        assert_eq!(text.as_deref(), Some("Undangan *Rapat RT* Hari : Senin"));

        let (path, bytes) = engine.seen();
        assert_eq!(bytes, b"jpeg-bytes");
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("invite-"));
        assert!(!path.exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_short_text_is_not_usable() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = OcrAdapter::new(FakeEngine::returning("Rapat"), config(dir.path(), false));
        assert_eq!(adapter.extract_text(&payload(b"x")).await.unwrap(), None);
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_engine_failure_propagates_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = OcrAdapter::new(FakeEngine::failing(), config(dir.path(), false));
        let err = adapter.extract_text(&payload(b"x")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("engine crashed"));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_preprocessing_failure_falls_back_to_original() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FakeEngine::returning("Undangan rapat koordinasi warga RT 05");
        let adapter = OcrAdapter::new(engine.clone(), config(dir.path(), true));

        let text = adapter.extract_text(&payload(b"not really a jpeg")).await.unwrap();
        assert!(text.is_some());
        let (path, bytes) = engine.seen();
        assert_eq!(bytes, b"not really a jpeg");
        assert_eq!(path.extension().unwrap(), "jpg");
    }

    #[tokio::test]
    async fn test_non_image_media_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = OcrAdapter::new(FakeEngine::returning("text"), config(dir.path(), false));
        let pdf = MediaPayload {
            bytes: vec![1, 2, 3],
            mime_type: "application/pdf".to_string(),
        };
        assert!(adapter.extract_text(&pdf).await.is_err());
    }
}
