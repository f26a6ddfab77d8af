//! DeliveryClient trait - outbound transport seam
//!
//! Lets dispatch logic be exercised without a network: tests count calls
//! through a recording implementation.

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::ContractError;

/// One outbound POST.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Value,
    pub timeout: Duration,
}

/// Collector response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStatus {
    pub code: u16,
}

impl DeliveryStatus {
    /// Collectors acknowledge with 200 or 201; anything else is a failure.
    pub fn is_success(self) -> bool {
        matches!(self.code, 200 | 201)
    }
}

/// Outbound HTTP seam.
#[trait_variant::make(DeliveryClient: Send)]
pub trait LocalDeliveryClient {
    /// POST a JSON body.
    ///
    /// # Errors
    /// Network-level failures (connect, timeout) return an error; a
    /// non-2xx response is a normal `DeliveryStatus`, judged by the caller.
    async fn post_json(&self, request: DeliveryRequest) -> Result<DeliveryStatus, ContractError>;
}
