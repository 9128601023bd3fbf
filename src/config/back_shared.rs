use once_cell::sync::Lazy;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8787;

pub static PORT: Lazy<u16> = Lazy::new(|| port_from(env::var("PORT").ok().as_deref()));

// An empty PORT counts as unset.
fn port_from(value: Option<&str>) -> u16 {
    match value.map(str::trim) {
        Some(port) if !port.is_empty() => port.parse().expect("PORT must be a valid port number"),
        _ => DEFAULT_PORT,
    }
}

pub static SITE_TAG: Lazy<Box<str>> = Lazy::new(|| {
    env::var("SITE_TAG")
        .unwrap_or_else(|_| "A".into())
        .into_boxed_str()
});

pub static INTERACTION_LOG_PATH: Lazy<PathBuf> = Lazy::new(|| {
    env::var("INTERACTION_LOG_PATH")
        .unwrap_or_else(|_| "interaction_logs.csv".into())
        .into()
});

pub static UPLOAD_DIR: Lazy<PathBuf> = Lazy::new(|| {
    env::var("UPLOAD_DIR")
        .unwrap_or_else(|_| "uploads".into())
        .into()
});

pub static PUBLIC_DIR: Lazy<PathBuf> = Lazy::new(|| {
    env::var("PUBLIC_DIR")
        .unwrap_or_else(|_| "public".into())
        .into()
});

pub static TESSERACT_BIN: Lazy<PathBuf> = Lazy::new(|| {
    env::var("TESSERACT_BIN")
        .unwrap_or_else(|_| "tesseract".into())
        .into()
});

pub fn validate() {
    // Trigger the lazy statics to force panics early
    let _ = *PORT;
    let _ = &*SITE_TAG;
    let _ = &*INTERACTION_LOG_PATH;
    let _ = &*UPLOAD_DIR;
    let _ = &*PUBLIC_DIR;
    let _ = &*TESSERACT_BIN;
}
