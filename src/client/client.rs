use reqwest::{Client, Response};
use tokio_util::sync::CancellationToken;

use crate::client::{
    error::ClientError,
    request::{ApiRequest, AuthPolicy},
    session::SessionStorage,
    types::*,
};
use crate::config::ClientConfig;

pub struct RecipeApi {
    base_url: String,
    client: Client,
    update_sends_auth: bool,
}

impl RecipeApi {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            update_sends_auth: false,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            update_sends_auth: config.update_sends_auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, request: &ApiRequest) -> String {
        let mut url = format!("{}{}", self.base_url, request.path());
        if let Some(query) = request.query() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    fn auth_header(&self, request: &ApiRequest, session: &SessionStorage) -> Result<Option<String>, ClientError> {
        let policy = request.auth_policy(self.update_sends_auth);
        match (policy, session.auth_token()) {
            (AuthPolicy::None, _) | (AuthPolicy::Optional, None) => Ok(None),
            (_, Some(token)) => {
                tracing::debug!("Using authentication token: {}", session.token_preview().unwrap_or_default());
                Ok(Some(format!("Bearer {}", token)))
            }
            (AuthPolicy::Required, None) => {
                tracing::error!("{} requires a bearer token but none is stored", request.action());
                Err(ClientError::NotAuthenticated)
            }
        }
    }

    /// Sends `request` and returns the accepted response.
    ///
    /// Resolves to [`ClientError::Cancelled`] as soon as `cancel` fires, even
    /// while the request is still in flight.
    pub async fn execute(
        &self,
        request: &ApiRequest,
        session: &SessionStorage,
        cancel: &CancellationToken,
    ) -> Result<Response, ClientError> {
        let auth_header = self.auth_header(request, session)?;
        let url = self.url_for(request);

        tracing::debug!("{} {}", request.method(), url);

        let mut builder = self.client.request(request.method(), &url);
        if let Some(header) = auth_header {
            builder = builder.header("Authorization", header);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("{} cancelled before completion", request.action());
                return Err(ClientError::Cancelled);
            }
            sent = builder.send() => sent.map_err(|e| {
                tracing::error!("Network error during {}: {}", request.action(), e);
                ClientError::Transport(e)
            })?,
        };

        let status = response.status();
        tracing::debug!("{} response status: {}", request.action(), status);

        if !request.accepts(status) {
            tracing::warn!("{} failed with status {}", request.action(), status);
            return Err(ClientError::Status {
                action: request.action(),
                status,
            });
        }

        Ok(response)
    }

    // Recipe operations
    pub async fn list_recipes(
        &self,
        name: Option<&str>,
        session: &SessionStorage,
        cancel: &CancellationToken,
    ) -> Result<Vec<Recipe>, ClientError> {
        let request = ApiRequest::List {
            name: name.map(str::to_string),
        };
        let response = self.execute(&request, session, cancel).await?;

        let recipes: Vec<Recipe> = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            body = response.json() => body.map_err(|e| {
                tracing::error!("Failed to parse recipe list: {}", e);
                ClientError::Decode(e)
            })?,
        };

        tracing::debug!("Successfully retrieved {} recipes", recipes.len());
        Ok(recipes)
    }

    pub async fn create_recipe(
        &self,
        payload: RecipePayload,
        session: &SessionStorage,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        self.execute(&ApiRequest::Create(payload), session, cancel).await?;
        Ok(())
    }

    pub async fn update_recipe(
        &self,
        id: RecipeId,
        payload: RecipePayload,
        session: &SessionStorage,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        self.execute(&ApiRequest::Update { id, payload }, session, cancel).await?;
        Ok(())
    }

    pub async fn delete_recipe(
        &self,
        id: RecipeId,
        session: &SessionStorage,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        self.execute(&ApiRequest::Delete(id), session, cancel).await?;
        Ok(())
    }

    // Session operations
    pub async fn logout(&self, session: &SessionStorage, cancel: &CancellationToken) -> Result<(), ClientError> {
        self.execute(&ApiRequest::Logout, session, cancel).await?;
        Ok(())
    }
}
