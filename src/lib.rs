//! # Recipe Client Library
//!
//! A client for a recipe management backend. It turns user commands (search,
//! create, update, delete, logout) into REST calls and reflects the results in
//! whatever UI implements [`view::RecipeView`].
//!
//! ## Layers
//!
//! - [`client`] - HTTP access to the backend and session storage
//! - [`store`] - cached recipe list and session, owned by the controller
//! - [`controller`] - command handlers with an `init`/`teardown` lifecycle
//! - [`view`] - the UI boundary, plus a recording implementation
//! - [`server`] - an MCP server exposing every command as a tool
//!
//! ## Quick Start
//!
//! ```no_run
//! use recipe_client::{ClientConfig, RecipeController, TranscriptView};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::new("http://localhost:8081");
//! let mut controller = RecipeController::from_config(&config, TranscriptView::new())?;
//!
//! controller.init().await;
//! controller.on_create("Soup", "Boil").await;
//! controller.teardown();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod server;
pub mod store;
pub mod view;

pub use client::RecipeApi;
pub use config::ClientConfig;
pub use controller::{Lifecycle, RecipeController};
pub use server::RecipeMcpServer;
pub use view::{RecipeView, TranscriptView};
