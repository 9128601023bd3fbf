//! Optical character recognition over uploaded images.
//!
//! The engine is an external `tesseract` executable; its output is read back
//! from stdout.

use std::{
    path::{Path, PathBuf},
    process::ExitStatus,
    string::FromUtf8Error,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

pub const LANGUAGE_ENGLISH: &str = "eng";

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to launch OCR engine: {0}")]
    Launch(#[source] std::io::Error),

    #[error("OCR engine exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: Box<str> },

    #[error("OCR output is not valid UTF-8: {0}")]
    InvalidOutput(#[from] FromUtf8Error),
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognized text of the image at `image`, possibly empty.
    async fn recognize(&self, image: &Path, language: &str) -> Result<String, OcrError>;
}

pub struct Tesseract {
    binary: PathBuf,
}

impl Tesseract {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for Tesseract {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl OcrEngine for Tesseract {
    async fn recognize(&self, image: &Path, language: &str) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            // No form feed after the page text.
            .arg("-c")
            .arg("page_separator=")
            .output()
            .await
            .map_err(OcrError::Launch)?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().into(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_image_and_language_to_engine() {
        // `echo` stands in for the engine and prints the arguments it received.
        let engine = Tesseract::new("echo");
        let text = engine
            .recognize(Path::new("uploads/scan.png"), LANGUAGE_ENGLISH)
            .await
            .unwrap();
        assert_eq!(text, "uploads/scan.png stdout -l eng -c page_separator=\n");
    }

    #[tokio::test]
    async fn missing_engine_is_a_launch_error() {
        let engine = Tesseract::new("/nonexistent/bin/tesseract");
        let result = engine.recognize(Path::new("scan.png"), LANGUAGE_ENGLISH).await;
        assert!(matches!(result, Err(OcrError::Launch(_))));
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_failure() {
        let engine = Tesseract::new("false");
        let result = engine.recognize(Path::new("scan.png"), LANGUAGE_ENGLISH).await;
        assert!(matches!(result, Err(OcrError::Failed { .. })));
    }
}
