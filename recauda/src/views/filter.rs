//! Row filtering for the people lists and the home event list.

use super::{EventIndex, Listed, SellerIndex, search_event};
use crate::types::{EntityStatus, Event, EventId, EventStatus};
use serde::{Deserialize, Serialize};

/// Status dropdown of a people list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// No status restriction
    #[default]
    All,
    /// Only enabled rows
    Active,
    /// Only disabled rows
    Inactive,
}

impl StatusFilter {
    /// True when `status` passes
    #[must_use]
    pub const fn matches(self, status: EntityStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => matches!(status, EntityStatus::Active),
            Self::Inactive => matches!(status, EntityStatus::Inactive),
        }
    }
}

/// Event dropdown of a people list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventFilter {
    /// The "all events" sentinel
    #[default]
    All,
    /// One specific event
    Event(EventId),
}

/// Search text plus both dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilter {
    /// Free text, matched case-insensitively (phones raw)
    pub search: String,
    /// Status dropdown
    pub status: StatusFilter,
    /// Event dropdown
    pub event: EventFilter,
}

impl ListFilter {
    /// Replace the search text
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Replace the status dropdown
    #[must_use]
    pub const fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Replace the event dropdown
    #[must_use]
    pub fn with_event(mut self, event: EventFilter) -> Self {
        self.event = event;
        self
    }
}

/// Meaning of [`EventFilter::All`] for a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllEvents {
    /// The sentinel does not restrict rows
    ShowAll,
    /// The sentinel hides every row
    ShowNone,
}

/// How a list interprets its filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPolicy {
    /// Hide rows without at least one active assigned event
    pub require_active_event: bool,
    /// Meaning of the "all events" sentinel
    pub all_events: AllEvents,
}

impl ListPolicy {
    /// Sellers list: every seller is listed
    pub const SELLERS: Self = Self {
        require_active_event: false,
        all_events: AllEvents::ShowAll,
    };

    /// Buyers list: only buyers tied to a running event
    pub const BUYERS: Self = Self {
        require_active_event: true,
        all_events: AllEvents::ShowAll,
    };
}

/// Search predicate.
///
/// `needle` must already be lowercased; `raw` is the search as typed and is
/// used for the phone.
pub fn matches_search<T: Listed>(
    row: &T,
    needle: &str,
    raw: &str,
    events: &EventIndex<'_>,
    sellers: &SellerIndex<'_>,
) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |text: &str| text.to_lowercase().contains(needle);

    if contains(row.first_name())
        || contains(row.last_name())
        || row.phone().contains(raw)
        || contains(row.email())
    {
        return true;
    }

    if let Some((seller_id, stored_name)) = row.seller_ref() {
        let seller_matches = match sellers.get(seller_id) {
            Some(seller) => contains(&seller.first_name) || contains(&seller.last_name),
            None => contains(stored_name),
        };
        if seller_matches {
            return true;
        }
    }

    search_event(row, events).is_some_and(|event| contains(&event.name))
}

/// Event predicate, including the active-event gate of the policy
pub fn matches_event<T: Listed>(
    row: &T,
    events: &EventIndex<'_>,
    filter: &EventFilter,
    policy: ListPolicy,
) -> bool {
    if policy.require_active_event && !events.has_active_event(row.assigned_events()) {
        return false;
    }
    match filter {
        EventFilter::All => policy.all_events == AllEvents::ShowAll,
        EventFilter::Event(wanted) => row
            .assigned_events()
            .iter()
            .any(|id| id == wanted && events.active(id).is_some()),
    }
}

/// Conjunction of the search, status and event predicates
pub fn is_visible<T: Listed>(
    row: &T,
    events: &EventIndex<'_>,
    sellers: &SellerIndex<'_>,
    filter: &ListFilter,
    policy: ListPolicy,
) -> bool {
    let needle = filter.search.to_lowercase();
    visible_with(row, &needle, events, sellers, filter, policy)
}

fn visible_with<T: Listed>(
    row: &T,
    needle: &str,
    events: &EventIndex<'_>,
    sellers: &SellerIndex<'_>,
    filter: &ListFilter,
    policy: ListPolicy,
) -> bool {
    matches_event(row, events, &filter.event, policy)
        && filter.status.matches(row.status())
        && matches_search(row, needle, &filter.search, events, sellers)
}

/// Rows passing every filter, in collection order
pub fn visible_rows<'r, T: Listed>(
    rows: &'r [T],
    events: &EventIndex<'_>,
    sellers: &SellerIndex<'_>,
    filter: &ListFilter,
    policy: ListPolicy,
) -> Vec<&'r T> {
    let needle = filter.search.to_lowercase();
    rows.iter()
        .filter(|row| visible_with(*row, &needle, events, sellers, filter, policy))
        .collect()
}

/// Status dropdown of the home event list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventStatusFilter {
    /// Every status
    #[default]
    All,
    /// One status
    Only(EventStatus),
}

/// Filters of the home event list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventListFilter {
    /// Case-insensitive substring of the event name
    pub search: String,
    /// Status dropdown
    pub status: EventStatusFilter,
}

/// Events passing the home filters, in collection order
#[must_use]
pub fn visible_events<'e>(events: &'e [Event], filter: &EventListFilter) -> Vec<&'e Event> {
    let needle = filter.search.to_lowercase();
    events
        .iter()
        .filter(|event| match filter.status {
            EventStatusFilter::All => true,
            EventStatusFilter::Only(status) => event.status == status,
        })
        .filter(|event| needle.is_empty() || event.name.to_lowercase().contains(&needle))
        .collect()
}
