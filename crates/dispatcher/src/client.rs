//! HttpDeliveryClient - outbound POST over reqwest
//!
//! Per-request timeouts only; there is no retry policy. A failed delivery
//! is surfaced to the caller and the record is re-offered at the next
//! scheduled sweep.

use tracing::{debug, instrument};

use contracts::{ContractError, DeliveryClient, DeliveryRequest, DeliveryStatus};

use crate::error::DispatchError;

/// Delivery client backed by a shared reqwest connection pool.
#[derive(Debug, Clone)]
pub struct HttpDeliveryClient {
    client: reqwest::Client,
}

impl HttpDeliveryClient {
    /// Create a new HttpDeliveryClient.
    pub fn new() -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DispatchError::client_build(e.to_string()))?;
        Ok(Self { client })
    }
}

impl DeliveryClient for HttpDeliveryClient {
    #[instrument(name = "delivery_post_json", skip(self, request), fields(url = %request.url))]
    async fn post_json(&self, request: DeliveryRequest) -> Result<DeliveryStatus, ContractError> {
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .json(&request.body);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ContractError::delivery(&request.url, e.to_string()))?;

        let status = DeliveryStatus {
            code: response.status().as_u16(),
        };
        debug!(code = status.code, "Collector responded");
        Ok(status)
    }
}
