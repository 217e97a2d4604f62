//! HTTP client for the routines API

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use routine_core::{RemoteResult, RemoteStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    Exercise, ExerciseCreate, ExerciseUpdate, Routine, RoutineCreate, RoutineDetail,
    RoutinePage, RoutineUpdate,
};
use std::time::Duration;
use tracing::debug;

/// Page size requested when walking the routine listing (server maximum)
const LIST_PAGE_SIZE: u32 = 100;

/// HTTP client for making requests to the routines API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Absolute URL of an API path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "API request");
        let request = self.client.request(method, &url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request, discarding the confirmation body
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::handle_response::<Value>(response).await?;
        Ok(())
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(error_from_status(status, &text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Map a failed response to a [`ClientError`]
///
/// The server reports failures as `{"detail": ...}`; the detail becomes the
/// message, falling back to the raw body and then to the status line.
pub fn error_from_status(status: StatusCode, body: &str) -> ClientError {
    let message = error_detail(body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status.to_string()
        } else {
            body.trim().to_string()
        }
    });

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(message)
        }
        _ => ClientError::Internal(message),
    }
}

fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        // Field validation errors arrive as a list of objects
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}

// ========== Routines API ==========

#[async_trait]
impl RemoteStore for HttpClient {
    async fn create_routine(&self, payload: &RoutineCreate) -> RemoteResult<Routine> {
        Ok(self.post("rutinas", payload).await?)
    }

    async fn list_routines(&self) -> RemoteResult<Vec<Routine>> {
        let mut routines = Vec::new();
        let mut page = 1u32;
        loop {
            let listing: RoutinePage = self
                .get_with_query("rutinas", &[("page", page), ("limit", LIST_PAGE_SIZE)])
                .await?;
            let done = !listing.pagination.has_next || listing.routines.is_empty();
            routines.extend(listing.routines);
            if done {
                return Ok(routines);
            }
            page += 1;
        }
    }

    async fn search_routines(&self, name: &str) -> RemoteResult<Vec<Routine>> {
        Ok(self.get_with_query("rutinas/buscar", &[("nombre", name)]).await?)
    }

    async fn update_routine(&self, id: i64, payload: &RoutineUpdate) -> RemoteResult<Routine> {
        Ok(self.put(&format!("rutinas/{id}"), payload).await?)
    }

    async fn delete_routine(&self, id: i64) -> RemoteResult<()> {
        Ok(self.delete(&format!("rutinas/{id}")).await?)
    }

    async fn get_routine_detail(&self, id: i64) -> RemoteResult<RoutineDetail> {
        Ok(self.get(&format!("rutinas/{id}/detalle")).await?)
    }

    async fn create_exercise(&self, payload: &ExerciseCreate) -> RemoteResult<Exercise> {
        Ok(self.post("ejercicios", payload).await?)
    }

    async fn update_exercise(&self, id: i64, payload: &ExerciseUpdate) -> RemoteResult<Exercise> {
        Ok(self.put(&format!("ejercicios/{id}"), payload).await?)
    }

    async fn delete_exercise(&self, id: i64) -> RemoteResult<()> {
        Ok(self.delete(&format!("ejercicios/{id}")).await?)
    }
}
