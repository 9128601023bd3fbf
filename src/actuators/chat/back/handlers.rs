use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::{
    Json, Router,
    extract::{ConnectInfo, DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{Method, header},
    routing::post,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use super::relay::Relay;
use crate::{
    actuators::chat::dto::{ChatRequest, ChatResponse, JsonChatRequest},
    service,
};

/// Cap on JSON bodies. Multipart uploads are not limited.
const JSON_BODY_LIMIT: usize = 8 * 1024 * 1024;
const FORWARDED_FOR: &str = "x-forwarded-for";

pub fn build_router(state: Arc<Relay>, public_dir: &Path) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // Build router
    Router::new()
        .route("/chat", post(chat_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(state)
}

pub async fn chat_handler(
    State(relay): State<Arc<Relay>>,
    request: Request,
) -> service::Result<Json<ChatResponse>> {
    let ip = client_ip(&request);
    let chat_request = read_chat_request(request).await?;
    let answer = relay.handle(chat_request, &ip).await?;
    Ok(Json(ChatResponse::success(answer)))
}

/// Forwarded-for header as sent, else the peer address, else empty.
fn client_ip(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        && !forwarded.is_empty()
    {
        return forwarded.to_owned();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

async fn read_chat_request(request: Request) -> service::Result<ChatRequest> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(service::Error::bad_request)?;
        read_multipart(multipart).await
    } else if content_type.starts_with("application/json") {
        let bytes = axum::body::to_bytes(request.into_body(), JSON_BODY_LIMIT)
            .await
            .map_err(service::Error::bad_request)?;
        let Json(body) =
            Json::<JsonChatRequest>::from_bytes(&bytes).map_err(service::Error::bad_request)?;
        Ok(body.into())
    } else {
        Ok(ChatRequest::default())
    }
}

async fn read_multipart(mut multipart: Multipart) -> service::Result<ChatRequest> {
    let mut chat_request = ChatRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(service::Error::bad_request)?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("text") => {
                let text = field.text().await.map_err(service::Error::bad_request)?;
                chat_request.text = Some(text.into());
            },
            // Only file parts count as an upload; a plain `image` value is ignored.
            Some("image") if field.file_name().is_some() => {
                let image = field.bytes().await.map_err(service::Error::bad_request)?;
                chat_request.image = Some(image);
            },
            _ => {},
        }
    }

    Ok(chat_request)
}
