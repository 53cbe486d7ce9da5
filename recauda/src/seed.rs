//! Seed data and integrity checks.
//!
//! Collections are tolerated as they come: an oversold event or an id that
//! resolves to nothing never fails a view. [`Catalog::integrity_report`]
//! lists those findings so they can be logged instead.

use crate::screens::event_detail::SalesEntry;
use crate::types::{Buyer, BuyerId, EntityStatus, Event, EventId, EventStatus, EventType, Seller, SellerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Seed loading failures
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed JSON or wrong shape
    #[error("Invalid catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something inconsistent in a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IntegrityIssue {
    /// More numbers sold than offered
    Oversold {
        /// Event
        event: EventId,
        /// Sold
        sold: u32,
        /// Offered
        total: u32,
    },
    /// A seller or buyer lists an event that does not exist
    DanglingEvent {
        /// Who lists it
        owner: String,
        /// Missing event
        event: EventId,
    },
    /// A buyer points at a seller that does not exist
    DanglingSeller {
        /// Buyer
        buyer: BuyerId,
        /// Missing seller
        seller: SellerId,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oversold { event, sold, total } => {
                write!(f, "event {event} sold {sold} of {total} numbers")
            },
            Self::DanglingEvent { owner, event } => write!(f, "{owner} lists unknown event {event}"),
            Self::DanglingSeller { buyer, seller } => {
                write!(f, "buyer {buyer} points at unknown seller {seller}")
            },
        }
    }
}

/// Events, sellers and buyers loaded together
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Events
    pub events: Vec<Event>,
    /// Sellers
    pub sellers: Vec<Seller>,
    /// Buyers
    pub buyers: Vec<Buyer>,
}

impl Catalog {
    /// Parse a catalog from JSON (camelCase fields).
    ///
    /// # Errors
    ///
    /// [`CatalogError::Json`] when the text is not a valid catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every inconsistency, in collection order
    #[must_use]
    pub fn integrity_report(&self) -> Vec<IntegrityIssue> {
        let event_ids: HashSet<&EventId> = self.events.iter().map(|event| &event.id).collect();
        let seller_ids: HashSet<&SellerId> = self.sellers.iter().map(|seller| &seller.id).collect();
        let mut issues = Vec::new();

        for event in self.events.iter().filter(|event| event.is_oversold()) {
            issues.push(IntegrityIssue::Oversold {
                event: event.id.clone(),
                sold: event.sold_numbers,
                total: event.total_numbers,
            });
        }

        let mut dangling_events = |owner: String, assigned: &[EventId]| {
            for event in assigned.iter().filter(|id| !event_ids.contains(id)) {
                issues.push(IntegrityIssue::DanglingEvent {
                    owner: owner.clone(),
                    event: event.clone(),
                });
            }
        };
        for seller in &self.sellers {
            dangling_events(format!("seller {}", seller.id), &seller.assigned_events);
        }
        for buyer in &self.buyers {
            dangling_events(format!("buyer {}", buyer.id), &buyer.assigned_events);
        }

        for buyer in self.buyers.iter().filter(|buyer| !seller_ids.contains(&buyer.seller_id)) {
            issues.push(IntegrityIssue::DanglingSeller {
                buyer: buyer.id.clone(),
                seller: buyer.seller_id.clone(),
            });
        }
        issues
    }

    /// Log every inconsistency at warn level; returns how many there were
    pub fn log_integrity(&self) -> usize {
        let issues = self.integrity_report();
        for issue in &issues {
            tracing::warn!(%issue, "Catalog inconsistency");
        }
        issues.len()
    }

    /// Demo data set
    #[must_use]
    pub fn demo() -> Self {
        Self {
            events: demo_events(),
            sellers: demo_sellers(),
            buyers: demo_buyers(),
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn ids(raw: &[&str]) -> Vec<EventId> {
    raw.iter().map(|id| EventId::new(*id)).collect()
}

fn demo_events() -> Vec<Event> {
    let event = |id: &str, name: &str, event_type, status, end_date, total_numbers, sold_numbers| Event {
        id: EventId::new(id),
        name: name.to_string(),
        event_type,
        status,
        end_date,
        total_numbers,
        sold_numbers,
    };
    vec![
        event(
            "1",
            "Rifa día del niño del G.S. General Deheza",
            EventType::Raffle,
            EventStatus::Active,
            date(2024, 12, 25),
            800,
            640,
        ),
        event(
            "2",
            "Venta de comida - Fiesta de fin de año",
            EventType::FoodSale,
            EventStatus::Active,
            date(2024, 12, 31),
            500,
            320,
        ),
        event(
            "3",
            "Sorteo especial - Día de la madre",
            EventType::Raffle,
            EventStatus::Completed,
            date(2024, 5, 12),
            600,
            600,
        ),
        event(
            "4",
            "Bingo benéfico",
            EventType::Raffle,
            EventStatus::Inactive,
            date(2024, 11, 30),
            300,
            120,
        ),
    ]
}

fn demo_sellers() -> Vec<Seller> {
    let seller = |id: &str, first: &str, last: &str, phone: &str, email: &str, status, events: &[&str], sold, day| {
        Seller {
            id: SellerId::new(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            status,
            events_assigned: u32::try_from(events.len()).unwrap_or_default(),
            assigned_events: ids(events),
            total_sold: sold,
            last_activity: date(2024, 1, day),
        }
    };
    vec![
        seller("1", "María", "González", "3584123456", "maria.gonzalez@email.com", EntityStatus::Active, &["1", "2", "3"], 45, 15),
        seller("2", "Carlos", "Rodríguez", "3584987654", "carlos.rodriguez@email.com", EntityStatus::Active, &["1", "2"], 32, 14),
        seller("3", "Ana", "Martínez", "3584555666", "ana.martinez@email.com", EntityStatus::Inactive, &["3"], 18, 10),
        seller("4", "Luis", "Fernández", "3584777888", "luis.fernandez@email.com", EntityStatus::Active, &["1", "2", "3", "4"], 67, 16),
        seller("5", "Sofía", "López", "3584999000", "sofia.lopez@email.com", EntityStatus::Active, &["1", "4"], 29, 13),
    ]
}

#[allow(clippy::too_many_arguments)]
fn buyer(
    id: &str,
    first: &str,
    last: &str,
    seller: (&str, &str),
    phone: &str,
    status: EntityStatus,
    events: &[&str],
    bought: u32,
    delivered: Option<bool>,
) -> Buyer {
    Buyer {
        id: BuyerId::new(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        seller_id: SellerId::new(seller.0),
        seller_name: seller.1.to_string(),
        phone: phone.to_string(),
        email: format!("{}.{}@email.com", first.to_lowercase(), last.to_lowercase()),
        status,
        events_assigned: u32::try_from(events.len()).unwrap_or_default(),
        assigned_events: ids(events),
        total_bought: bought,
        last_activity: date(2024, 1, 12),
        is_delivered: delivered,
    }
}

fn demo_buyers() -> Vec<Buyer> {
    let maria = ("1", "María González");
    let carlos = ("2", "Carlos Rodríguez");
    let ana = ("3", "Ana Martínez");
    let luis = ("4", "Luis Fernández");
    let sofia = ("5", "Sofía López");
    vec![
        buyer("1", "Lucía", "Benítez", maria, "3584111222", EntityStatus::Active, &["1"], 3, None),
        buyer("2", "Martín", "Suárez", carlos, "3584222333", EntityStatus::Inactive, &["1"], 1, None),
        buyer("3", "Valentina", "Ríos", maria, "3584333444", EntityStatus::Active, &["2"], 4, Some(false)),
        buyer("4", "Diego", "Acosta", luis, "3584444555", EntityStatus::Active, &["2"], 2, Some(true)),
        buyer("5", "Camila", "Herrera", sofia, "3584555777", EntityStatus::Active, &["2", "1"], 6, Some(false)),
        buyer("6", "Joaquín", "Molina", ana, "3584666888", EntityStatus::Active, &["3"], 2, None),
        buyer("7", "Florencia", "Castro", sofia, "3584777999", EntityStatus::Active, &["4"], 5, None),
        buyer("8", "Tomás", "Ortiz", ("9", "Pedro Giménez"), "3584888000", EntityStatus::Active, &["1"], 2, None),
    ]
}

/// Collected and pending lines of the event detail ledger
#[must_use]
pub fn sales_ledger() -> (Vec<SalesEntry>, Vec<SalesEntry>) {
    let collected = [
        "Jacob Jones",
        "Jerome Bell",
        "Ronald Richards",
        "Savannah Nguyen",
        "Cameron Williamson",
        "Robert Fox",
        "Darrell Steward",
    ]
    .into_iter()
    .zip(1..)
    .map(|(name, id)| SalesEntry {
        id,
        name: name.to_string(),
        sold: 10,
        total: 10,
        amount: 8000,
    })
    .collect();

    let pending = [(5, 5000), (3, 3000), (6, 6000)]
        .into_iter()
        .zip(8..)
        .map(|((sold, amount), id)| SalesEntry {
            id,
            name: "Nombre Apellido".to_string(),
            sold,
            total: 10,
            amount,
        })
        .collect();

    (collected, pending)
}
