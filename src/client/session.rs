//! Session state for the recipe client.
//!
//! The session is a tab-scoped key/value store holding the credential issued
//! at login and the admin role flag. Login itself happens elsewhere; this
//! module only reads, seeds and clears the stored values.

use std::collections::HashMap;

/// Storage key holding the bearer credential.
pub const AUTH_TOKEN_KEY: &str = "auth-token";
/// Storage key holding `"true"` for administrators. Absent otherwise.
pub const IS_ADMIN_KEY: &str = "is-admin";

/// Key/value session store, lifetime = login to logout.
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    items: HashMap<String, String>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a storage pre-populated the way a successful login leaves it.
    pub fn logged_in(token: impl Into<String>, is_admin: bool) -> Self {
        let mut storage = Self::new();
        storage.set_item(AUTH_TOKEN_KEY, token);
        if is_admin {
            storage.set_item(IS_ADMIN_KEY, "true");
        }
        storage
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) {
        self.items.insert(key.to_string(), value.into());
    }

    pub fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.get_item(AUTH_TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.get_item(IS_ADMIN_KEY) == Some("true")
    }

    /// Short, log-safe prefix of the stored token.
    pub fn token_preview(&self) -> Option<String> {
        self.auth_token()
            .map(|t| format!("{}...", &t[..t.char_indices().nth(10).map_or(t.len(), |(i, _)| i)]))
    }

    /// Drops both session keys, returning to the logged-out state.
    pub fn clear_credentials(&mut self) {
        self.remove_item(AUTH_TOKEN_KEY);
        self.remove_item(IS_ADMIN_KEY);
    }
}
