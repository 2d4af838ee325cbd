//! # Recipe HTTP Client
//!
//! Direct HTTP access to the recipe backend: listing and searching recipes,
//! creating, updating and deleting them by id, and signing out.
//!
//! ## Modules
//!
//! - [`client`] - reqwest executor with one method per backend call
//! - [`error`] - [`ClientError`], the failure taxonomy shared by every call
//! - [`request`] - [`ApiRequest`], each backend call as a plain value
//! - [`session`] - tab-scoped session storage holding the bearer token
//! - [`types`] - recipe records and request payloads
//!
//! ## Quick Start
//!
//! ```no_run
//! use recipe_client::client::{RecipeApi, SessionStorage};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = RecipeApi::new("http://localhost:8081".to_string());
//! let session = SessionStorage::logged_in("token", false);
//!
//! let recipes = api.list_recipes(Some("soup"), &session, &CancellationToken::new()).await?;
//! println!("Found {} recipes", recipes.len());
//! # Ok(())
//! # }
//! ```

#[allow(clippy::module_inception)]
pub mod client;
pub mod error;
pub mod request;
pub mod session;
pub mod types;

pub use client::RecipeApi;
pub use error::ClientError;
pub use request::{ApiRequest, AuthPolicy};
pub use session::SessionStorage;
pub use types::*;
