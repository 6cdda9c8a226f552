use std::collections::HashMap;
use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Key-value backend a wallet-session store persists into.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String, max_age: Duration);
    fn remove(&mut self, key: &str);
}

/// Browser cookies of the current request. Writes are collected in the jar
/// and sent back with the response.
#[derive(Debug, Clone, Default)]
pub struct CookieStorage {
    jar: CookieJar,
    secure: bool,
}

impl CookieStorage {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl SessionStorage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|c| c.value().to_string())
    }

    fn set(&mut self, key: &str, value: String, max_age: Duration) {
        // Readable from scripts: the front-end reads the wallet session directly.
        let cookie = Cookie::build((key.to_string(), value))
            .path("/")
            .max_age(time::Duration::seconds(max_age.as_secs() as i64))
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .http_only(false);
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(cookie);
    }

    fn remove(&mut self, key: &str) {
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.remove(Cookie::build((key.to_string(), "")).path("/"));
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String, _max_age: Duration) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
