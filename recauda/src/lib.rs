//! # Recauda
//!
//! Headless UI state layer for a fundraising-event tool (raffles and food
//! sales).
//!
//! Every screen is a reducer over explicit state, so a UI binding (terminal,
//! WASM front end, native toolkit) only renders the view-models exposed here
//! and forwards user intents as actions:
//!
//! - [`views`]: pure derived-view engine (search/status/event filtering,
//!   checkbox eligibility, aggregates)
//! - [`selection`]: selected row ids and the applicable bulk action
//! - [`wizard`]: linear multi-step forms with per-step validation and a
//!   simulated submit
//! - [`snackbar`]: transient notification with a two-phase disappearance
//! - [`screens`]: list, detail, login and account screens built from the above
//!
//! ## Example
//!
//! ```
//! use recauda::seed::Catalog;
//! use recauda::views::{EventIndex, ListFilter, ListPolicy, SellerIndex, visible_rows};
//!
//! let catalog = Catalog::demo();
//! let events = EventIndex::new(&catalog.events);
//! let sellers = SellerIndex::new(&catalog.sellers);
//!
//! let filter = ListFilter::default().with_search("gonz");
//! let rows = visible_rows(&catalog.sellers, &events, &sellers, &filter, ListPolicy::SELLERS);
//! assert_eq!(rows.len(), 1);
//! ```

pub mod backend;
pub mod config;
pub mod receipts;
pub mod routes;
pub mod screens;
pub mod seed;
pub mod selection;
pub mod snackbar;
pub mod types;
pub mod validation;
pub mod views;
pub mod wizard;

pub use backend::{Backend, BackendError, SimulatedBackend};
pub use config::{Config, ConfigError};
pub use seed::{Catalog, CatalogError};
pub use types::{Buyer, BuyerId, EntityStatus, Event, EventId, EventStatus, EventType, Seller, SellerId};
pub use validation::{Field, FieldErrors, ValidationError};
