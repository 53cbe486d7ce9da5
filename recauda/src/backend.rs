//! Submission boundary.
//!
//! Wizards and the seller editor hand their payloads to a [`Backend`]. The
//! only implementation shipped is [`SimulatedBackend`], which waits a fixed
//! delay and answers with generated ids.

use crate::types::{BuyerId, EventId, EventType, SellerId};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use recauda_core::environment::IdGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Submission failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The request was understood and refused
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// One item of a food sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Item name
    pub name: String,
    /// Unit price
    pub price: f64,
}

/// Payload of the create-event wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Raffle or food sale
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Display name
    pub name: String,
    /// Price of one number (raffles)
    pub number_price: Option<f64>,
    /// Numbers on offer; `None` when adjusted automatically
    pub total_numbers: Option<u32>,
    /// Let the total follow the sellers' assignments (raffles)
    pub auto_adjust: bool,
    /// Prize descriptions in draw order (raffles)
    pub prizes: Vec<String>,
    /// Items on sale (food sales)
    pub food_items: Vec<FoodItem>,
    /// First selling day
    pub start_date: NaiveDate,
    /// Last selling day
    pub end_date: NaiveDate,
}

/// How a seller's numbers are picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum NumberAssignment {
    /// The system picks the next free numbers
    Automatic,
    /// An explicit inclusive range
    Manual {
        /// First number
        from: u32,
        /// Last number
        to: u32,
    },
}

/// Payload of the add-seller wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeller {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Phone, digits only
    pub phone: String,
    /// Numbers handed to the seller
    pub quantity: u32,
    /// How the numbers are picked
    pub assignment: NumberAssignment,
}

/// Payload of the register-sale wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    /// Event the sale belongs to
    pub event_id: EventId,
    /// Buyer's given name
    pub first_name: String,
    /// Buyer's family name
    pub last_name: String,
    /// Buyer's phone, digits only
    pub phone: String,
    /// Numbers or portions sold
    pub quantity: u32,
    /// Whether the buyer already paid
    pub paid: bool,
}

/// Edit of a seller's contact data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerUpdate {
    /// Seller being edited
    pub seller_id: SellerId,
    /// New given name
    pub first_name: String,
    /// New family name
    pub last_name: String,
    /// New phone
    pub phone: String,
}

/// The future API, as seen from the state layer
pub trait Backend: Send + Sync {
    /// Create an event
    fn create_event(&self, event: NewEvent) -> BoxFuture<'static, Result<EventId, BackendError>>;

    /// Onboard a seller
    fn create_seller(&self, seller: NewSeller) -> BoxFuture<'static, Result<SellerId, BackendError>>;

    /// Record a sale
    fn register_sale(&self, sale: NewSale) -> BoxFuture<'static, Result<BuyerId, BackendError>>;

    /// Save a seller edit
    fn update_seller(&self, update: SellerUpdate) -> BoxFuture<'static, Result<(), BackendError>>;
}

/// Ids from random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Stand-in backend: waits `delay`, then succeeds with a fresh id, or fails
/// with the configured error
#[derive(Clone)]
pub struct SimulatedBackend {
    delay: Duration,
    ids: Arc<dyn IdGenerator>,
    failure: Option<BackendError>,
}

impl SimulatedBackend {
    /// Succeeding backend with UUID ids
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self::with_ids(delay, Arc::new(UuidGenerator))
    }

    /// Succeeding backend with custom ids
    #[must_use]
    pub fn with_ids(delay: Duration, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            delay,
            ids,
            failure: None,
        }
    }

    /// Make every call fail with `error` after the delay
    #[must_use]
    pub fn failing(mut self, error: BackendError) -> Self {
        self.failure = Some(error);
        self
    }

    fn respond<T>(&self, operation: &'static str, ok: T) -> BoxFuture<'static, Result<T, BackendError>>
    where
        T: Send + 'static,
    {
        let delay = self.delay;
        let failure = self.failure.clone();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            match failure {
                Some(error) => {
                    tracing::warn!(operation, %error, "Simulated submission failed");
                    Err(error)
                },
                None => {
                    tracing::info!(operation, "Simulated submission succeeded");
                    Ok(ok)
                },
            }
        })
    }
}

impl std::fmt::Debug for SimulatedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedBackend")
            .field("delay", &self.delay)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl Backend for SimulatedBackend {
    fn create_event(&self, event: NewEvent) -> BoxFuture<'static, Result<EventId, BackendError>> {
        tracing::debug!(name = %event.name, kind = ?event.event_type, "create_event");
        self.respond("create_event", EventId::new(self.ids.next_id()))
    }

    fn create_seller(&self, seller: NewSeller) -> BoxFuture<'static, Result<SellerId, BackendError>> {
        tracing::debug!(quantity = seller.quantity, "create_seller");
        self.respond("create_seller", SellerId::new(self.ids.next_id()))
    }

    fn register_sale(&self, sale: NewSale) -> BoxFuture<'static, Result<BuyerId, BackendError>> {
        tracing::debug!(event = %sale.event_id, quantity = sale.quantity, "register_sale");
        self.respond("register_sale", BuyerId::new(self.ids.next_id()))
    }

    fn update_seller(&self, update: SellerUpdate) -> BoxFuture<'static, Result<(), BackendError>> {
        tracing::debug!(seller = %update.seller_id, "update_seller");
        self.respond("update_seller", ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recauda_testing::SequentialIdGenerator;

    fn sale() -> NewSale {
        NewSale {
            event_id: EventId::new("1"),
            first_name: "Ana".to_string(),
            last_name: "Paz".to_string(),
            phone: "3584123456".to_string(),
            quantity: 2,
            paid: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_backend_waits_then_returns_id() {
        let backend = SimulatedBackend::with_ids(
            Duration::from_millis(1500),
            Arc::new(SequentialIdGenerator::new("buyer")),
        );
        let start = tokio::time::Instant::now();

        let id = backend.register_sale(sale()).await;

        assert_eq!(id, Ok(BuyerId::new("buyer-1")));
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn failing_backend_reports_error() {
        let backend = SimulatedBackend::new(Duration::from_millis(10))
            .failing(BackendError::Unavailable("sin conexión".to_string()));

        let result = backend
            .update_seller(SellerUpdate {
                seller_id: SellerId::new("1"),
                first_name: "María".to_string(),
                last_name: "González".to_string(),
                phone: "3584123456".to_string(),
            })
            .await;

        assert_eq!(result, Err(BackendError::Unavailable("sin conexión".to_string())));
    }

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn manual_assignment_serialises_with_mode_tag() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(NumberAssignment::Manual { from: 1, to: 10 })?;
        assert_eq!(json, serde_json::json!({ "mode": "manual", "from": 1, "to": 10 }));
        Ok(())
    }
}
