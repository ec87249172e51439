//! JSON-over-HTTP clients for the identity and trip services.
//!
//! Failures are classified into [`RemoteError`]:
//! - connection, transport and decode failures → `Unavailable`
//! - `404 Not Found` → `NotFound`
//! - any other non-success status → `Rejected`
//!
//! No retries are attempted. A request timeout is only applied when one is
//! configured; otherwise a slow peer delays the caller indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use common::wire::{CreateTripResponse, ErrorBody};
use common::{Trip, TripDetails, TripId, User, UserId};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{IdentityClient, TripClient};
use crate::error::RemoteError;

fn build_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Unavailable(err.to_string())
}

/// Decodes a success body, or classifies the failure status.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Unavailable(format!("malformed response: {e}")));
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };

    if status == StatusCode::NOT_FOUND {
        Err(RemoteError::NotFound(message))
    } else {
        Err(RemoteError::Rejected(format!("{status}: {message}")))
    }
}

/// Identity service client.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    client: Client,
    base_url: String,
}

impl HttpIdentityClient {
    /// Creates a client for the identity service at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_user(&self, user_id: UserId) -> Result<User, RemoteError> {
        let response = self
            .client
            .get(format!("{}/users/{}", self.base_url, user_id))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

/// Trip service client.
#[derive(Debug, Clone)]
pub struct HttpTripClient {
    client: Client,
    base_url: String,
}

impl HttpTripClient {
    /// Creates a client for the trip service at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TripClient for HttpTripClient {
    #[tracing::instrument(skip(self, details), fields(base_url = %self.base_url))]
    async fn create_trip(&self, details: &TripDetails) -> Result<TripId, RemoteError> {
        let response = self
            .client
            .post(format!("{}/trips", self.base_url))
            .json(details)
            .send()
            .await
            .map_err(transport_error)?;

        let created: CreateTripResponse = read_json(response).await?;
        Ok(created.trip_id)
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_trip(&self, trip_id: TripId) -> Result<Trip, RemoteError> {
        let response = self
            .client
            .get(format!("{}/trips/{}", self.base_url, trip_id))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let client = HttpIdentityClient::new("http://localhost:50051/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:50051");
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        // Reserve a port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpTripClient::new(format!("http://{addr}"), Some(Duration::from_secs(2))).unwrap();

        let result = client.get_trip(TripId::new(1)).await;
        assert!(matches!(result, Err(RemoteError::Unavailable(_))));
    }
}
