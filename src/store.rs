//! Client-side state owned by the controller.

use crate::client::session::SessionStorage;
use crate::client::types::Recipe;

/// The last successfully fetched recipe list plus the session.
///
/// The list is only ever replaced wholesale, never patched in place.
#[derive(Debug, Default)]
pub struct RecipeStore {
    recipes: Vec<Recipe>,
    session: SessionStorage,
}

impl RecipeStore {
    pub fn new(session: SessionStorage) -> Self {
        Self {
            recipes: Vec::new(),
            session,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn replace(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
    }

    /// Exact, case-sensitive name lookup against the cached snapshot.
    pub fn find_by_name(&self, name: &str) -> Option<&Recipe> {
        find_by_name(&self.recipes, name)
    }

    pub fn session(&self) -> &SessionStorage {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStorage {
        &mut self.session
    }
}

/// First recipe whose name equals `name` exactly.
pub fn find_by_name<'a>(recipes: &'a [Recipe], name: &str) -> Option<&'a Recipe> {
    recipes.iter().find(|r| r.name == name)
}
