use std::env;

use once_cell::sync::Lazy;
use tracing::Level;

pub static MYMEMORY_URL: Lazy<String> = Lazy::new(|| {
    env::var("MYMEMORY_URL").unwrap_or_else(|_| "https://api.mymemory.translated.net/get".to_string())
});

/// Contact address sent as `de`, which raises MyMemory's free daily quota.
pub static MYMEMORY_EMAIL: Lazy<Option<String>> =
    Lazy::new(|| env::var("MYMEMORY_EMAIL").ok().filter(|email| !email.is_empty()));

pub static SOURCE_LANG: Lazy<String> =
    Lazy::new(|| env::var("SOURCE_LANG").unwrap_or_else(|_| "pt".to_string()));

pub static TARGET_LANG: Lazy<String> =
    Lazy::new(|| env::var("TARGET_LANG").unwrap_or_else(|_| "en".to_string()));

pub static LOG_LEVEL: Lazy<Level> = Lazy::new(|| {
    env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(Level::DEBUG)
});

pub static LOG_DIR: Lazy<String> =
    Lazy::new(|| env::var("LOG_DIR").unwrap_or_else(|_| ".".to_string()));
