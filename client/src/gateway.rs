use crate::auth::NoAuth;
use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::error::ClientError;
use dossier_protocol::envelope::Envelope;
use dossier_protocol::envelope::Paginated;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Typed client for the archive backend. One instance serves any number of
/// concurrent calls; calls share nothing beyond the connection pool and the
/// credential provider.
pub struct Client {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
    auth: Arc<dyn TokenProvider>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_auth(config, Arc::new(NoAuth))
    }

    pub fn with_auth(
        config: ClientConfig,
        auth: Arc<dyn TokenProvider>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("dossier/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config, auth })
    }

    /// Attaches the bearer credential if the provider has one.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status,
                message: status_error_message(&body, status),
            });
        }
        let envelope: Envelope<T> = response.json().await?;
        if !envelope.is_success() {
            return Err(ClientError::Api {
                code: envelope.error_code,
                message: envelope.message,
            });
        }
        Ok(envelope)
    }

    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = self.config.endpoint(path)?;
        debug!("GET {url}");
        let envelope = self.fetch_envelope::<T>(self.http.get(url)).await?;
        require_data(envelope)
    }

    pub(crate) async fn get_paginated<T, Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Paginated<T>, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let url = self.config.endpoint(path)?;
        debug!("GET {url}");
        let envelope = self
            .fetch_envelope::<Vec<T>>(self.http.get(url).query(query))
            .await?;
        Ok(Paginated {
            items: envelope.data.unwrap_or_default(),
            page: envelope.page,
            meta: envelope.meta,
        })
    }

    /// POST expecting a paginated envelope. The backend reads every
    /// parameter from the URL query string; the request body stays empty.
    pub(crate) async fn post_paginated<T, Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Paginated<T>, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let url = self.config.endpoint(path)?;
        debug!("POST {url}");
        let envelope = self
            .fetch_envelope::<Vec<T>>(self.http.post(url).query(query))
            .await?;
        Ok(Paginated {
            items: envelope.data.unwrap_or_default(),
            page: envelope.page,
            meta: envelope.meta,
        })
    }

    pub(crate) async fn delete_ok(&self, path: &str) -> Result<(), ClientError> {
        let url = self.config.endpoint(path)?;
        debug!("DELETE {url}");
        self.fetch_envelope::<Value>(self.http.delete(url)).await?;
        Ok(())
    }
}

fn require_data<T>(envelope: Envelope<T>) -> Result<T, ClientError> {
    match envelope.data {
        Some(data) => Ok(data),
        None => Err(ClientError::Api {
            code: envelope.error_code,
            message: "success envelope carried no data".to_string(),
        }),
    }
}

/// Human-readable message for a failed HTTP exchange: a JSON `detail` field
/// wins, then a JSON `message`, then the status line's canonical reason.
pub(crate) fn status_error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message"] {
            if let Some(message) = value.get(key).and_then(Value::as_str)
                && !message.is_empty()
            {
                return message.to_string();
            }
        }
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
