//! The UI boundary.
//!
//! [`RecipeView`] is everything the controller is allowed to do to the page:
//! rebuild the list, raise a blocking message, reset form inputs, toggle the
//! logout and admin controls, and navigate away. Any front end implements it;
//! [`TranscriptView`] records the calls instead of drawing anything.

use serde::Serialize;

use crate::client::types::{Recipe, RecipeId};

pub trait RecipeView {
    /// Clears the list container and rebuilds it from `recipes`, in order.
    fn render_list(&mut self, recipes: &[Recipe]);

    /// Blocking, user-visible message.
    fn alert(&mut self, message: &str);

    fn clear_create_inputs(&mut self);

    fn clear_update_inputs(&mut self);

    fn set_logout_visible(&mut self, visible: bool);

    fn set_admin_link_visible(&mut self, visible: bool);

    fn navigate(&mut self, target: &str);
}

/// One rendered list entry: the text shown plus the id it carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedItem {
    pub id: RecipeId,
    pub text: String,
}

impl From<&Recipe> for RenderedItem {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            text: recipe.display_line(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent {
    Rendered { items: Vec<RenderedItem> },
    Alert { message: String },
    CreateInputsCleared,
    UpdateInputsCleared,
    LogoutVisibility { visible: bool },
    AdminLinkVisibility { visible: bool },
    Navigated { target: String },
}

/// A view that keeps the current page state in memory and logs every call.
#[derive(Debug, Clone, Default)]
pub struct TranscriptView {
    items: Vec<RenderedItem>,
    events: Vec<ViewEvent>,
    logout_visible: bool,
    admin_link_visible: bool,
    location: Option<String>,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items currently shown in the list container.
    pub fn items(&self) -> &[RenderedItem] {
        &self.items
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Takes the events recorded since the last drain.
    pub fn drain(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Alert { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn logout_visible(&self) -> bool {
        self.logout_visible
    }

    pub fn admin_link_visible(&self) -> bool {
        self.admin_link_visible
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl RecipeView for TranscriptView {
    fn render_list(&mut self, recipes: &[Recipe]) {
        self.items = recipes.iter().map(RenderedItem::from).collect();
        self.events.push(ViewEvent::Rendered {
            items: self.items.clone(),
        });
    }

    fn alert(&mut self, message: &str) {
        self.events.push(ViewEvent::Alert {
            message: message.to_string(),
        });
    }

    fn clear_create_inputs(&mut self) {
        self.events.push(ViewEvent::CreateInputsCleared);
    }

    fn clear_update_inputs(&mut self) {
        self.events.push(ViewEvent::UpdateInputsCleared);
    }

    fn set_logout_visible(&mut self, visible: bool) {
        self.logout_visible = visible;
        self.events.push(ViewEvent::LogoutVisibility { visible });
    }

    fn set_admin_link_visible(&mut self, visible: bool) {
        self.admin_link_visible = visible;
        self.events.push(ViewEvent::AdminLinkVisibility { visible });
    }

    fn navigate(&mut self, target: &str) {
        self.location = Some(target.to_string());
        self.events.push(ViewEvent::Navigated {
            target: target.to_string(),
        });
    }
}
