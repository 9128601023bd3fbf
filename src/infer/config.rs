use once_cell::sync::Lazy;
use std::env;

pub static PROXY_KEY: Lazy<Box<str>> = Lazy::new(|| {
    env::var("PROXY_KEY")
        .unwrap_or_else(|_| {
            tracing::warn!("PROXY_KEY is not set, upstream requests will not be authorized");
            String::new()
        })
        .into_boxed_str()
});

pub static UPSTREAM_BASE_URL: Lazy<Box<str>> = Lazy::new(|| {
    env::var("UPSTREAM_BASE_URL")
        .unwrap_or_else(|_| "https://www.chataiapi.com/v1".into())
        .into_boxed_str()
});

pub static UPSTREAM_MODEL: Lazy<Box<str>> = Lazy::new(|| {
    env::var("UPSTREAM_MODEL")
        .unwrap_or_else(|_| "gemini-2.5-flash".into())
        .into_boxed_str()
});

pub static MAX_OUTPUT_TOKENS: Lazy<u32> = Lazy::new(|| {
    env::var("MAX_OUTPUT_TOKENS")
        .unwrap_or_else(|_| "600".into())
        .parse()
        .expect("MAX_OUTPUT_TOKENS must be a positive integer")
});

pub fn validate() {
    // Trigger the lazy statics to force panics early
    let _ = &*PROXY_KEY;
    let _ = &*UPSTREAM_BASE_URL;
    let _ = &*UPSTREAM_MODEL;
    let _ = *MAX_OUTPUT_TOKENS;
}
