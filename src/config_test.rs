use super::*;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

const KEYS: [&str; 10] = [
    "PORT",
    "DATABASE_URL",
    "SNIPPET_STORE_PATH",
    "AUTOSAVE_DEBOUNCE_MS",
    "GOOGLE_PLACES_API_KEY",
    "PLACES_BASE_URL",
    "INSTAGRAM_BASE_URL",
    "HTTP_REQUEST_TIMEOUT_SECS",
    "HTTP_CONNECT_TIMEOUT_SECS",
    "WIDGETHUB_TEST_VALUE",
];

/// # Safety
/// Callers must hold [`env_guard`]; no other test reads these keys.
unsafe fn clear_env() {
    for key in KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn from_env_uses_defaults() {
    let _guard = env_guard();
    unsafe { clear_env() };

    let cfg = Config::from_env();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.database_url, None);
    assert_eq!(cfg.snippet_store_path, PathBuf::from(DEFAULT_SNIPPET_STORE_PATH));
    assert_eq!(cfg.autosave_debounce(), Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS));
    assert_eq!(cfg.places_api_key, None);
    assert_eq!(cfg.places_base_url, DEFAULT_PLACES_BASE_URL);
    assert_eq!(cfg.instagram_base_url, DEFAULT_INSTAGRAM_BASE_URL);
    assert_eq!(
        cfg.http,
        HttpTimeouts {
            request_secs: DEFAULT_HTTP_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
        }
    );
}

#[test]
fn from_env_reads_overrides() {
    let _guard = env_guard();
    unsafe {
        clear_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("DATABASE_URL", "postgres://localhost/widgethub");
        std::env::set_var("SNIPPET_STORE_PATH", "/tmp/snippets.json");
        std::env::set_var("AUTOSAVE_DEBOUNCE_MS", "250");
        std::env::set_var("GOOGLE_PLACES_API_KEY", " key ");
        std::env::set_var("PLACES_BASE_URL", "http://places.test/");
        std::env::set_var("HTTP_REQUEST_TIMEOUT_SECS", "3");
    }

    let cfg = Config::from_env();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/widgethub"));
    assert_eq!(cfg.snippet_store_path, PathBuf::from("/tmp/snippets.json"));
    assert_eq!(cfg.autosave_debounce_ms, 250);
    assert_eq!(cfg.places_api_key.as_deref(), Some("key"));
    assert_eq!(cfg.places_base_url, "http://places.test");
    assert_eq!(cfg.http.request_secs, 3);
    assert_eq!(cfg.http.connect_secs, DEFAULT_HTTP_CONNECT_TIMEOUT_SECS);

    unsafe { clear_env() };
}

#[test]
fn blank_values_count_as_unset() {
    let _guard = env_guard();
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "   ");
        std::env::set_var("PORT", "not-a-port");
    }

    let cfg = Config::from_env();
    assert_eq!(cfg.database_url, None);
    assert_eq!(cfg.port, DEFAULT_PORT);

    unsafe { clear_env() };
}

#[test]
fn env_parse_falls_back_on_garbage() {
    let _guard = env_guard();
    unsafe {
        clear_env();
        std::env::set_var("WIDGETHUB_TEST_VALUE", "12x");
    }
    assert_eq!(env_parse("WIDGETHUB_TEST_VALUE", 7_u32), 7);
    unsafe { clear_env() };
}
