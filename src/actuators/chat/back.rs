use std::{net::SocketAddr, path::Path, sync::Arc};

mod handlers;
mod relay;

pub use handlers::build_router;
pub use relay::{OCR_SEPARATOR, Relay};

use crate::{
    config::back_shared,
    infer::Client,
    interaction_log::CsvFileLog,
    ocr::Tesseract,
};

impl Relay {
    pub fn from_env() -> Self {
        Relay::new(
            Arc::new(Client::from_env()),
            Arc::new(Tesseract::new(back_shared::TESSERACT_BIN.as_path())),
            Arc::new(CsvFileLog::new(back_shared::INTERACTION_LOG_PATH.as_path())),
        )
        .with_site(&back_shared::SITE_TAG)
        .with_upload_dir(back_shared::UPLOAD_DIR.as_path())
    }
}

pub async fn serve(relay: Relay, port: u16, public_dir: &Path) -> anyhow::Result<()> {
    let router = build_router(Arc::new(relay), public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Study relay running on http://localhost:{}", port);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
