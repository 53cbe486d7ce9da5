//! Domain model: events, sellers and buyers.
//!
//! Field names serialize in camelCase, the shape a backend would supply.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from any string
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of an [`Event`]
    EventId
);
string_id!(
    /// Identifier of a [`Seller`]
    SellerId
);
string_id!(
    /// Identifier of a [`Buyer`]
    BuyerId
);

/// Kind of fundraising event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Numbered tickets drawn for prizes
    Raffle,
    /// Food items sold and later delivered
    FoodSale,
}

impl EventType {
    /// User-facing label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Raffle => "Rifa",
            Self::FoodSale => "Venta de comida",
        }
    }
}

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Selling
    Active,
    /// Paused ("blocked" in some data sets)
    #[serde(alias = "blocked")]
    Inactive,
    /// Finished
    Completed,
    /// Called off
    Cancelled,
}

impl EventStatus {
    /// User-facing label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "ACTIVO",
            Self::Inactive => "BLOQUEADO",
            Self::Completed => "FINALIZADO",
            Self::Cancelled => "CANCELADO",
        }
    }
}

/// Status of a seller or buyer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    /// Enabled
    #[default]
    Active,
    /// Disabled; never selectable
    Inactive,
}

impl EntityStatus {
    /// The other status
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// True for [`EntityStatus::Active`]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// User-facing label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "ACTIVO",
            Self::Inactive => "INACTIVO",
        }
    }
}

/// A raffle or food sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Identifier
    pub id: EventId,
    /// Display name
    pub name: String,
    /// Raffle or food sale
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Lifecycle status
    pub status: EventStatus,
    /// Last selling day
    pub end_date: NaiveDate,
    /// Numbers (or portions) on offer
    pub total_numbers: u32,
    /// Numbers sold so far; may exceed `total_numbers` in inconsistent data
    pub sold_numbers: u32,
}

impl Event {
    /// True when the event is currently selling
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    /// Sold ratio as a rounded percentage, clamped to 100
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        percentage(self.sold_numbers, self.total_numbers)
    }

    /// True when more numbers were sold than exist
    #[must_use]
    pub const fn is_oversold(&self) -> bool {
        self.sold_numbers > self.total_numbers
    }
}

/// `part / whole` as a rounded percentage in `0..=100`; zero when `whole` is zero.
#[must_use]
pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let rounded = (u64::from(part) * 200 + u64::from(whole)) / (u64::from(whole) * 2);
    u32::try_from(rounded.min(100)).unwrap_or(100)
}

/// A person selling numbers on behalf of the organisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    /// Identifier
    pub id: SellerId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Phone as entered
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Enabled or disabled
    pub status: EntityStatus,
    /// Denormalised count of assigned events
    #[serde(default)]
    pub events_assigned: u32,
    /// Events this seller sells for, in assignment order
    pub assigned_events: Vec<EventId>,
    /// Numbers sold across events
    pub total_sold: u32,
    /// Day of last activity
    pub last_activity: NaiveDate,
}

impl Seller {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A person who bought numbers or food from a seller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    /// Identifier
    pub id: BuyerId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Seller who registered the sale
    pub seller_id: SellerId,
    /// Denormalised seller name, used when `seller_id` does not resolve
    pub seller_name: String,
    /// Phone as entered
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Enabled or disabled
    pub status: EntityStatus,
    /// Denormalised count of assigned events
    #[serde(default)]
    pub events_assigned: u32,
    /// Events this buyer bought for, in purchase order
    pub assigned_events: Vec<EventId>,
    /// Numbers (or portions) bought
    pub total_bought: u32,
    /// Day of last activity
    pub last_activity: NaiveDate,
    /// Food-sale delivery flag; absent for raffles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_delivered: Option<bool>,
}

impl Buyer {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// True only when the delivery flag is set and true
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.is_delivered == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_and_clamps() {
        assert_eq!(percentage(640, 800), 80);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(700, 600), 100);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn entity_status_toggles() {
        assert_eq!(EntityStatus::Active.toggled(), EntityStatus::Inactive);
        assert!(EntityStatus::Inactive.toggled().is_active());
    }

    #[test]
    fn event_status_accepts_blocked_alias() -> Result<(), serde_json::Error> {
        let status: EventStatus = serde_json::from_str("\"blocked\"")?;
        assert_eq!(status, EventStatus::Inactive);
        assert_eq!(serde_json::to_string(&EventType::FoodSale)?, "\"food_sale\"");
        Ok(())
    }

    #[test]
    fn buyer_json_uses_camel_case() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": "b1", "firstName": "Ana", "lastName": "Paz",
            "sellerId": "1", "sellerName": "María González",
            "phone": "3584000000", "email": "ana.paz@email.com",
            "status": "active", "assignedEvents": ["2"],
            "totalBought": 3, "lastActivity": "2024-01-12", "isDelivered": true
        }"#;
        let buyer: Buyer = serde_json::from_str(json)?;
        assert_eq!(buyer.id.as_str(), "b1");
        assert_eq!(buyer.events_assigned, 0);
        assert!(buyer.is_delivered());
        Ok(())
    }
}
