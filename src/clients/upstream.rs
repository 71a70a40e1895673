//! Calls from one service to a sibling service.
//!
//! The caller's bearer token is forwarded unchanged, every call is bounded
//! by a fixed timeout and nothing is retried. Any transport failure or
//! non-2xx answer becomes an [`UpstreamError`], which handlers report as
//! 503 through `AppError::upstream`.

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

use crate::metrics::track_upstream_request;

pub const UNIVERSITY_SERVICE: &str = "university";
pub const EMPLOYMENT_SERVICE: &str = "employment";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} service url is invalid")]
    InvalidUrl { service: &'static str },
    #[error("{service} service is unavailable")]
    Unreachable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} service answered with status {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
    },
    #[error("{service} service returned an unexpected body")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// `base` with `segments` appended, each percent-encoded as one path segment.
///
/// Index numbers such as `RA-12/2021` contain slashes and must not be
/// spliced into a path verbatim.
pub fn endpoint(
    service: &'static str,
    base: &str,
    segments: &[&str],
) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(base).map_err(|_| UpstreamError::InvalidUrl { service })?;
    url.path_segments_mut()
        .map_err(|_| UpstreamError::InvalidUrl { service })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// `GET url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        token: &str,
    ) -> Result<T, UpstreamError> {
        self.send(service, self.client.get(url).bearer_auth(token))
            .await
    }

    /// `GET url` with a tighter timeout than the client default.
    pub async fn get_json_with_timeout<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<T, UpstreamError> {
        self.send(
            service,
            self.client.get(url).bearer_auth(token).timeout(timeout),
        )
        .await
    }

    /// `GET url?query` and decode the JSON body.
    pub async fn get_json_with_query<T, Q>(
        &self,
        service: &'static str,
        url: &str,
        token: &str,
        query: &Q,
    ) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(service, self.client.get(url).query(query).bearer_auth(token))
            .await
    }

    /// `POST url` with a JSON body and decode the JSON answer.
    pub async fn post_json<B, T>(
        &self,
        service: &'static str,
        url: &str,
        token: &str,
        body: &B,
    ) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(service, self.client.post(url).bearer_auth(token).json(body))
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        service: &'static str,
        request: RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let start = Instant::now();
        let result = Self::execute(service, request).await;
        track_upstream_request(service, result.is_ok(), start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            warn!(service, error = %e, "upstream call failed");
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        service: &'static str,
        request: RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Unreachable { service, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { service, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| UpstreamError::Decode { service, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let client = UpstreamClient::new(Duration::from_millis(500)).unwrap();
        let result: Result<serde_json::Value, _> = client
            .get_json("university", "http://127.0.0.1:9/api/v1/university/students", "t")
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, UpstreamError::Unreachable { .. }));
        assert_eq!(err.to_string(), "university service is unavailable");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = endpoint(
            UNIVERSITY_SERVICE,
            "http://university:8081/",
            &["api", "v1", "university", "students", "verify-graduation", "RA-12/2021"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://university:8081/api/v1/university/students/verify-graduation/RA-12%2F2021"
        );
    }

    #[test]
    fn test_endpoint_rejects_garbage_base() {
        let err = endpoint(EMPLOYMENT_SERVICE, "not a url", &["x"]).unwrap_err();
        assert_eq!(err.to_string(), "employment service url is invalid");
    }

    #[test]
    fn test_status_error_message_names_service() {
        let err = UpstreamError::Status {
            service: "employment",
            status: StatusCode::BAD_GATEWAY,
        };
        assert!(err.to_string().starts_with("employment service answered"));
    }
}
