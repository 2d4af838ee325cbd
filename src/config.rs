//! Runtime configuration, read from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::client::session::{SessionStorage, AUTH_TOKEN_KEY, IS_ADMIN_KEY};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_LOGIN_PAGE: &str = "../login/login-page.html";
pub const DEFAULT_LOGOUT_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base address, without a trailing slash
    pub base_url: String,
    /// Where the view navigates after a successful logout
    pub login_page: String,
    /// Pause between clearing the session and navigating away
    pub logout_redirect_delay: Duration,
    /// Per-request timeout applied by the HTTP client
    pub request_timeout: Duration,
    /// Send the bearer header on `PUT /recipes/{id}`
    pub update_sends_auth: bool,
    /// Credential seeded into session storage at startup
    pub auth_token: Option<String>,
    /// Admin flag seeded into session storage at startup
    pub is_admin: bool,
    /// Listen address for the MCP SSE transport
    pub bind_addr: SocketAddr,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_page: DEFAULT_LOGIN_PAGE.to_string(),
            logout_redirect_delay: DEFAULT_LOGOUT_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            update_sends_auth: false,
            auth_token: None,
            is_admin: false,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, falling back to
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("RECIPE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Some(page) = lookup("RECIPE_LOGIN_PAGE") {
            config.login_page = page;
        }

        if let Some(raw) = lookup("RECIPE_LOGOUT_DELAY_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("RECIPE_LOGOUT_DELAY_MS is not a number: {raw}"))?;
            config.logout_redirect_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("RECIPE_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("RECIPE_REQUEST_TIMEOUT_SECS is not a number: {raw}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("RECIPE_UPDATE_SENDS_AUTH") {
            config.update_sends_auth = parse_bool("RECIPE_UPDATE_SENDS_AUTH", &raw)?;
        }

        config.auth_token = lookup("RECIPE_AUTH_TOKEN").filter(|t| !t.trim().is_empty());

        if let Some(raw) = lookup("RECIPE_IS_ADMIN") {
            config.is_admin = parse_bool("RECIPE_IS_ADMIN", &raw)?;
        }

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind}"))?;

        Ok(config)
    }

    /// Session storage as the page finds it on load.
    pub fn initial_session(&self) -> SessionStorage {
        let mut session = SessionStorage::new();
        if let Some(token) = &self.auth_token {
            session.set_item(AUTH_TOKEN_KEY, token);
        }
        // The admin flag does not depend on the token being present.
        if self.is_admin {
            session.set_item(IS_ADMIN_KEY, "true");
        }
        session
    }
}

fn parse_bool(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{key} must be a boolean, got: {raw}"),
    }
}
