//! Backend calls as first-class values.
//!
//! Every interaction with the recipe backend is described by an [`ApiRequest`]
//! before anything touches the network, so a caller can inspect, log, dedupe
//! or cancel it independently of how it is eventually sent.

use reqwest::Method;

use crate::client::types::{RecipeId, RecipePayload};

/// Whether a request carries the `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Never sent.
    None,
    /// Sent when a token is stored, omitted otherwise.
    Optional,
    /// Must be sent; the request fails locally without a stored token.
    Required,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    /// `GET /recipes`, optionally filtered by a name substring.
    List { name: Option<String> },
    /// `POST /recipes`
    Create(RecipePayload),
    /// `PUT /recipes/{id}`
    Update { id: RecipeId, payload: RecipePayload },
    /// `DELETE /recipes/{id}`
    Delete(RecipeId),
    /// `POST /logout`
    Logout,
}

impl ApiRequest {
    pub fn method(&self) -> Method {
        match self {
            ApiRequest::List { .. } => Method::GET,
            ApiRequest::Create(_) | ApiRequest::Logout => Method::POST,
            ApiRequest::Update { .. } => Method::PUT,
            ApiRequest::Delete(_) => Method::DELETE,
        }
    }

    pub fn path(&self) -> String {
        match self {
            ApiRequest::List { .. } | ApiRequest::Create(_) => "/recipes".to_string(),
            ApiRequest::Update { id, .. } | ApiRequest::Delete(id) => {
                format!("/recipes/{}", urlencoding::encode(&id.to_string()))
            }
            ApiRequest::Logout => "/logout".to_string(),
        }
    }

    /// Encoded query string, without the leading `?`.
    pub fn query(&self) -> Option<String> {
        match self {
            ApiRequest::List { name: Some(name) } => {
                Some(format!("name={}", urlencoding::encode(name)))
            }
            _ => None,
        }
    }

    /// Bearer policy for this request.
    ///
    /// Updates are sent without credentials unless `update_sends_auth` is set.
    pub fn auth_policy(&self, update_sends_auth: bool) -> AuthPolicy {
        match self {
            ApiRequest::List { .. } => AuthPolicy::Optional,
            ApiRequest::Create(_) | ApiRequest::Delete(_) | ApiRequest::Logout => {
                AuthPolicy::Required
            }
            ApiRequest::Update { .. } if update_sends_auth => AuthPolicy::Required,
            ApiRequest::Update { .. } => AuthPolicy::None,
        }
    }

    pub fn body(&self) -> Option<&RecipePayload> {
        match self {
            ApiRequest::Create(payload) | ApiRequest::Update { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Human-readable name used in logs and status errors.
    pub fn action(&self) -> &'static str {
        match self {
            ApiRequest::List { name: Some(_) } => "Search recipes",
            ApiRequest::List { name: None } => "Fetch recipes",
            ApiRequest::Create(_) => "Add recipe",
            ApiRequest::Update { .. } => "Update recipe",
            ApiRequest::Delete(_) => "Delete recipe",
            ApiRequest::Logout => "Logout",
        }
    }

    /// Logout only counts a literal 200 as success; everything else any 2xx.
    pub fn accepts(&self, status: reqwest::StatusCode) -> bool {
        match self {
            ApiRequest::Logout => status == reqwest::StatusCode::OK,
            _ => status.is_success(),
        }
    }
}
