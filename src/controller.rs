//! # Recipe page controller
//!
//! Translates user commands into backend calls and reflects the outcome in a
//! [`RecipeView`]. The controller owns the [`RecipeStore`] and a shared
//! [`Lifecycle`] handle: [`RecipeController::init`] corresponds to page load
//! and [`RecipeController::teardown`] to page unload.
//!
//! ## Failure handling
//!
//! Validation failures, failed name lookups and transport/HTTP errors all end
//! the same way: one alert, the command is abandoned, and the rendered list is
//! left as it was. Nothing is retried. Requests cut short by teardown are
//! logged and otherwise ignored.
//!
//! ## Ordering
//!
//! A mutating command refreshes the list only after its own request has been
//! accepted, so the rendered list always reflects the mutation.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, RecipeApi, RecipePayload, SessionStorage};
use crate::config::ClientConfig;
use crate::store::{self, RecipeStore};
use crate::view::RecipeView;

const CREATE_FIELDS_MISSING: &str = "Please enter both recipe name and instructions.";
const UPDATE_FIELDS_MISSING: &str = "Please enter both recipe name and updated instructions.";
const RECIPE_NOT_FOUND: &str = "Recipe not found.";

/// Shared handle on the page lifetime.
///
/// Every clone sees the same token, including after [`RecipeController::init`]
/// re-arms it, so a front end can cancel in-flight commands without waiting
/// for whatever lock guards the controller.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    current: Arc<Mutex<CancellationToken>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for the command about to start.
    pub fn token(&self) -> CancellationToken {
        self.lock().clone()
    }

    pub fn cancel(&self) {
        self.lock().cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().is_cancelled()
    }

    fn rearm(&self) {
        let mut current = self.lock();
        if current.is_cancelled() {
            *current = CancellationToken::new();
        }
    }

    fn lock(&self) -> MutexGuard<'_, CancellationToken> {
        // The guarded token has no invariant a panic could break.
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct RecipeController<V> {
    api: RecipeApi,
    store: RecipeStore,
    view: V,
    login_page: String,
    logout_redirect_delay: Duration,
    lifecycle: Lifecycle,
}

impl<V: RecipeView> RecipeController<V> {
    pub fn new(api: RecipeApi, session: SessionStorage, view: V, config: &ClientConfig) -> Self {
        Self {
            api,
            store: RecipeStore::new(session),
            view,
            login_page: config.login_page.clone(),
            logout_redirect_delay: config.logout_redirect_delay,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Builds the API client and seeds the session from `config`.
    pub fn from_config(config: &ClientConfig, view: V) -> Result<Self, ClientError> {
        let api = RecipeApi::from_config(config)?;
        Ok(Self::new(api, config.initial_session(), view, config))
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// Handle cancelled by [`RecipeController::teardown`]; clone it to tear
    /// the page down from outside the controller.
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle.is_cancelled()
    }

    /// Page load: show the controls the session allows, then fetch the list.
    pub async fn init(&mut self) {
        self.lifecycle.rearm();

        let session = self.store.session();
        let logged_in = session.is_authenticated();
        let is_admin = session.is_admin();
        tracing::info!(logged_in, is_admin, "Initializing recipe page");

        self.view.set_logout_visible(logged_in);
        self.view.set_admin_link_visible(is_admin);

        self.list().await;
    }

    /// Page unload: abandons every in-flight and future request.
    pub fn teardown(&self) {
        tracing::info!("Tearing down recipe page");
        self.lifecycle.cancel();
    }

    /// Fetches the full list, replacing the cache and re-rendering on success.
    pub async fn list(&mut self) -> bool {
        self.fetch_and_render(None, "Failed to fetch recipes").await
    }

    pub async fn on_search(&mut self, query: &str) {
        let query = query.trim();
        let name = (!query.is_empty()).then_some(query);
        self.fetch_and_render(name, "Search failed").await;
    }

    pub async fn on_create(&mut self, name: &str, instructions: &str) {
        let Some(payload) = RecipePayload::from_inputs(name, instructions) else {
            self.view.alert(CREATE_FIELDS_MISSING);
            return;
        };

        tracing::debug!("Creating recipe '{}'", payload.name);
        let cancel = self.lifecycle.token();
        let result = self
            .api
            .create_recipe(payload, self.store.session(), &cancel)
            .await;

        match result {
            Ok(()) => {
                self.list().await;
                self.view.clear_create_inputs();
            }
            Err(e) => self.report(e, |e| status_or_detail(e, "Failed to add recipe.")),
        }
    }

    /// Resolves the target id against a fresh list rather than the cache.
    pub async fn on_update(&mut self, name: &str, instructions: &str) {
        let Some(payload) = RecipePayload::from_inputs(name, instructions) else {
            self.view.alert(UPDATE_FIELDS_MISSING);
            return;
        };

        let cancel = self.lifecycle.token();
        let latest = self
            .api
            .list_recipes(None, self.store.session(), &cancel)
            .await;
        let latest = match latest {
            Ok(recipes) => recipes,
            Err(e) => {
                self.report(e, |e| status_or_detail(e, "Failed to fetch recipes."));
                return;
            }
        };

        let Some(target) = store::find_by_name(&latest, &payload.name) else {
            tracing::debug!("No recipe named '{}' to update", payload.name);
            self.view.alert(RECIPE_NOT_FOUND);
            return;
        };
        let id = target.id.clone();

        tracing::debug!("Updating recipe {} ('{}')", id, payload.name);
        let result = self
            .api
            .update_recipe(id, payload, self.store.session(), &cancel)
            .await;

        match result {
            Ok(()) => {
                self.list().await;
                self.view.clear_update_inputs();
            }
            Err(e) => self.report(e, |e| status_or_detail(e, "Failed to update recipe.")),
        }
    }

    /// Resolves the target id against the cached list; no fetch happens first.
    pub async fn on_delete(&mut self, name: &str) {
        let name = name.trim();
        let Some(target) = self.store.find_by_name(name) else {
            tracing::debug!("No cached recipe named '{}' to delete", name);
            self.view.alert(RECIPE_NOT_FOUND);
            return;
        };
        let id = target.id.clone();

        tracing::debug!("Deleting recipe {} ('{}')", id, name);
        let cancel = self.lifecycle.token();
        let result = self
            .api
            .delete_recipe(id, self.store.session(), &cancel)
            .await;

        match result {
            Ok(()) => {
                self.list().await;
            }
            Err(e) => self.report(e, |e| status_or_detail(e, "Error deleting recipe.")),
        }
    }

    pub async fn on_logout(&mut self) {
        let cancel = self.lifecycle.token();
        let result = self.api.logout(self.store.session(), &cancel).await;

        match result {
            Ok(()) => {
                self.store.session_mut().clear_credentials();
                tracing::info!("Logged out, redirecting to {}", self.login_page);

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("Logout redirect abandoned by teardown");
                        return;
                    }
                    _ = tokio::time::sleep(self.logout_redirect_delay) => {}
                }

                self.view.navigate(&self.login_page);
            }
            Err(e) => self.report(e, |e| {
                if e.is_status() {
                    "Failed to log out!".to_string()
                } else {
                    format!("Logout error: {}", e)
                }
            }),
        }
    }

    async fn fetch_and_render(&mut self, name: Option<&str>, failure: &str) -> bool {
        let cancel = self.lifecycle.token();
        let result = self
            .api
            .list_recipes(name, self.store.session(), &cancel)
            .await;

        match result {
            Ok(recipes) => {
                self.store.replace(recipes);
                self.view.render_list(self.store.recipes());
                true
            }
            Err(e) => {
                self.report(e, |e| format!("{}: {}", failure, e));
                false
            }
        }
    }

    fn report<F>(&mut self, error: ClientError, message: F)
    where
        F: FnOnce(&ClientError) -> String,
    {
        if matches!(error, ClientError::Cancelled) {
            tracing::debug!("Command abandoned after teardown");
            return;
        }

        if matches!(error, ClientError::NotAuthenticated) {
            tracing::warn!(
                "Recipe command refused without a request: no {} stored",
                crate::client::session::AUTH_TOKEN_KEY
            );
        } else {
            tracing::warn!("Recipe command failed: {}", error);
        }
        self.view.alert(&message(&error));
    }
}

fn status_or_detail(error: &ClientError, status_message: &str) -> String {
    if error.is_status() {
        status_message.to_string()
    } else {
        error.to_string()
    }
}
