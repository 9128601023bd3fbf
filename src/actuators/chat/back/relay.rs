use std::{path::PathBuf, sync::Arc};

use uuid::Uuid;

use crate::{
    actuators::chat::dto::ChatRequest,
    denylist::{Denylist, REFUSAL},
    infer::{Completion, normalize},
    interaction_log::{InteractionLog, InteractionRecord},
    ocr::{LANGUAGE_ENGLISH, OcrEngine},
    service::{self, CoercibleResult},
};

pub const OCR_SEPARATOR: &str = "\n\n[Extracted text from image]:\n";

/// Per-request pipeline: OCR, denylist screening, upstream completion and
/// interaction logging, strictly in that order.
pub struct Relay {
    completion: Arc<dyn Completion>,
    ocr: Arc<dyn OcrEngine>,
    log: Arc<dyn InteractionLog>,
    denylist: Denylist,
    site: Box<str>,
    upload_dir: PathBuf,
}

impl Relay {
    pub fn new(
        completion: Arc<dyn Completion>,
        ocr: Arc<dyn OcrEngine>,
        log: Arc<dyn InteractionLog>,
    ) -> Self {
        Self {
            completion,
            ocr,
            log,
            denylist: Denylist::default(),
            site: "A".into(),
            upload_dir: "uploads".into(),
        }
    }

    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    pub fn with_site(mut self, site: &str) -> Self {
        self.site = site.into();
        self
    }

    pub fn with_upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }

    pub async fn handle(&self, request: ChatRequest, ip: &str) -> service::Result<Box<str>> {
        let mut message = String::from(request.text.unwrap_or_default());

        if let Some(image) = request.image {
            let ocr_text = self.recognize(&image).await?;
            if !ocr_text.trim().is_empty() {
                message.push_str(OCR_SEPARATOR);
                message.push_str(&ocr_text);
            }
        }

        let answer = if let Some(phrase) = self.denylist.find(&message) {
            tracing::info!("Blocked message from {:?} matching {:?}", ip, phrase);
            Box::from(REFUSAL)
        } else {
            let reply = self.completion.complete(&message).await?;
            tracing::debug!(
                "API response: {}",
                serde_json::to_string_pretty(&reply).unwrap_or_default()
            );
            normalize(&reply)
        };

        self.record(ip, &message, &answer).await;
        Ok(answer)
    }

    async fn recognize(&self, image: &[u8]) -> service::Result<String> {
        tokio::fs::create_dir_all(&self.upload_dir).await.into_service_result()?;
        let path = self.upload_dir.join(Uuid::new_v4().simple().to_string());
        tokio::fs::write(&path, image).await.into_service_result()?;

        tracing::info!("Running OCR on uploaded image: {}", path.display());
        let result = self.ocr.recognize(&path, LANGUAGE_ENGLISH).await;

        if let Err(error) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Failed to remove upload {}: {}", path.display(), error);
        }

        let text = result?;
        tracing::debug!("OCR result: {}", text);
        Ok(text)
    }

    // A failed write is reported to the operator but never fails the request.
    async fn record(&self, ip: &str, input: &str, output: &str) {
        let record = InteractionRecord::now(&self.site, ip, input, output);
        if let Err(error) = self.log.append(&record).await {
            tracing::error!("Failed to log interaction: {}", error);
        }
    }
}
