//! Type definitions for the recipe API.
//!
//! The backend owns every [`Recipe`]; the client only ever holds read-only
//! copies of the last list it fetched.
//!
//! ## API Compatibility
//!
//! - [`RecipeId`] is opaque: the backend may send it as a JSON number or a
//!   string, and the client only ever echoes it back in a URL path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque recipe identifier assigned by the backend.
///
/// The backend may use JSON numbers or strings; either is echoed back
/// unchanged, both in JSON and in `/recipes/{id}` paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeId::Number(n) => write!(f, "{}", n),
            RecipeId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        RecipeId::Number(id)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        RecipeId::Text(id.to_string())
    }
}

/// A recipe record as returned by `GET /recipes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Backend-assigned identifier
    pub id: RecipeId,
    /// Recipe name, matched exactly (case-sensitive) by update and delete
    pub name: String,
    /// Free-text cooking instructions
    pub instructions: String,
}

impl Recipe {
    /// Text shown for this recipe in the rendered list.
    pub fn display_line(&self) -> String {
        format!("{} {}", self.name, self.instructions)
    }
}

/// Request body for `POST /recipes` and `PUT /recipes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePayload {
    pub name: String,
    pub instructions: String,
}

impl RecipePayload {
    /// Trims both fields, returning `None` when either ends up empty.
    pub fn from_inputs(name: &str, instructions: &str) -> Option<Self> {
        let name = name.trim();
        let instructions = instructions.trim();

        if name.is_empty() || instructions.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            instructions: instructions.to_string(),
        })
    }
}
