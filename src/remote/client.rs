//! Remote inventory caller.
//!
//! # Responsibilities
//! - Perform the actual network call to the inventory service
//! - Classify failures (connection error, non-2xx status, bad body)
//! - Stay policy-free: breaker/retry/timeout wrap this from outside

use axum::body::Body;
use axum::http::Request;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::config::InventoryConfig;
use crate::failure::RemoteFailure;

/// Upper bound on a stock response body. Inventory answers are short
/// strings; anything larger is treated as malformed.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// The opaque remote-call seam the pipelines are built around.
///
/// Production uses [`HttpInventoryClient`]; tests substitute scripted
/// implementations.
#[async_trait::async_trait]
pub trait InventoryCall: Send + Sync + 'static {
    /// Fetch the stock description for a product, or a classified failure.
    async fn fetch_stock(&self, product_id: &str) -> Result<String, RemoteFailure>;
}

/// HTTP client for the remote inventory service.
pub struct HttpInventoryClient {
    client: Client<HttpConnector, Body>,
    base_url: Url,
}

impl HttpInventoryClient {
    /// Create a client targeting the configured inventory endpoint.
    pub fn new(config: &InventoryConfig) -> Result<Self, url::ParseError> {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self { client, base_url })
    }

    fn product_uri(&self, product_id: &str) -> Result<String, RemoteFailure> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteFailure::Connection("inventory base URL cannot take a path".into()))?
            .push(product_id);
        Ok(url.to_string())
    }
}

#[async_trait::async_trait]
impl InventoryCall for HttpInventoryClient {
    async fn fetch_stock(&self, product_id: &str) -> Result<String, RemoteFailure> {
        let uri = self.product_uri(product_id)?;

        let request = Request::builder()
            .method("GET")
            .uri(uri.as_str())
            .header("user-agent", "inventory-gateway")
            .body(Body::empty())
            .map_err(|e| RemoteFailure::Connection(e.to_string()))?;

        tracing::debug!(product_id = %product_id, uri = %uri, "Calling inventory service");

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| RemoteFailure::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(product_id = %product_id, status = %status, "Inventory service returned error status");
            return Err(RemoteFailure::Status(status.as_u16()));
        }

        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_BODY_BYTES)
            .await
            .map_err(|e| RemoteFailure::Malformed(e.to_string()))?;

        String::from_utf8(bytes.to_vec()).map_err(|e| RemoteFailure::Malformed(e.to_string()))
    }
}
