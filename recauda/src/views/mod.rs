//! Derived-view engine.
//!
//! Pure functions from `(rows, events, sellers, filter)` to the rows a list
//! screen shows, which of them can be ticked, and the counts around them.
//! Nothing here holds state, so recomputing on every read is always correct.
//!
//! Ids are resolved through [`EventIndex`] and [`SellerIndex`]. A dangling id
//! simply resolves to `None`; it never fails a computation.

use crate::types::{Buyer, EntityStatus, Event, EventId, Seller, SellerId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub mod eligibility;
pub mod filter;
pub mod summary;

pub use eligibility::{EligibilityRule, checkbox_visible, is_selectable, selectable_ids};
pub use filter::{
    AllEvents, EventFilter, EventListFilter, EventStatusFilter, ListFilter, ListPolicy,
    StatusFilter, is_visible, matches_event, matches_search, visible_events, visible_rows,
};
pub use summary::{EventCounts, ListSummary};

/// A row of a people list (sellers or buyers)
pub trait Listed {
    /// Row identifier
    type Id: Clone + Eq + Hash + Ord + Debug;

    /// Row identifier
    fn id(&self) -> &Self::Id;
    /// Given name
    fn first_name(&self) -> &str;
    /// Family name
    fn last_name(&self) -> &str;
    /// Phone as entered
    fn phone(&self) -> &str;
    /// Contact email
    fn email(&self) -> &str;
    /// Enabled or disabled
    fn status(&self) -> EntityStatus;
    /// Assigned event ids, in assignment order
    fn assigned_events(&self) -> &[EventId];

    /// The seller behind the row, with the denormalised fallback name
    fn seller_ref(&self) -> Option<(&SellerId, &str)> {
        None
    }
}

impl Listed for Seller {
    type Id = SellerId;

    fn id(&self) -> &SellerId {
        &self.id
    }
    fn first_name(&self) -> &str {
        &self.first_name
    }
    fn last_name(&self) -> &str {
        &self.last_name
    }
    fn phone(&self) -> &str {
        &self.phone
    }
    fn email(&self) -> &str {
        &self.email
    }
    fn status(&self) -> EntityStatus {
        self.status
    }
    fn assigned_events(&self) -> &[EventId] {
        &self.assigned_events
    }
}

impl Listed for Buyer {
    type Id = crate::types::BuyerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
    fn first_name(&self) -> &str {
        &self.first_name
    }
    fn last_name(&self) -> &str {
        &self.last_name
    }
    fn phone(&self) -> &str {
        &self.phone
    }
    fn email(&self) -> &str {
        &self.email
    }
    fn status(&self) -> EntityStatus {
        self.status
    }
    fn assigned_events(&self) -> &[EventId] {
        &self.assigned_events
    }
    fn seller_ref(&self) -> Option<(&SellerId, &str)> {
        Some((&self.seller_id, &self.seller_name))
    }
}

/// Event lookup by id
#[derive(Debug, Clone)]
pub struct EventIndex<'a> {
    events: &'a [Event],
    by_id: HashMap<&'a EventId, &'a Event>,
}

impl<'a> EventIndex<'a> {
    /// Index a collection; on duplicate ids the first event wins
    #[must_use]
    pub fn new(events: &'a [Event]) -> Self {
        let mut by_id = HashMap::with_capacity(events.len());
        for event in events {
            by_id.entry(&event.id).or_insert(event);
        }
        Self { events, by_id }
    }

    /// Resolve an id
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&'a Event> {
        self.by_id.get(id).copied()
    }

    /// Resolve an id, only if the event is active
    #[must_use]
    pub fn active(&self, id: &EventId) -> Option<&'a Event> {
        self.get(id).filter(|event| event.is_active())
    }

    /// True when any of `assigned` resolves to an active event
    #[must_use]
    pub fn has_active_event(&self, assigned: &[EventId]) -> bool {
        assigned.iter().any(|id| self.active(id).is_some())
    }

    /// The first of `assigned` that resolves to an active event
    #[must_use]
    pub fn first_active(&self, assigned: &[EventId]) -> Option<&'a Event> {
        assigned.iter().find_map(|id| self.active(id))
    }

    /// Active events in collection order
    pub fn active_events(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.events.iter().filter(|event| event.is_active())
    }

    /// Every indexed event in collection order
    #[must_use]
    pub const fn all(&self) -> &'a [Event] {
        self.events
    }
}

/// Seller lookup by id
#[derive(Debug, Clone)]
pub struct SellerIndex<'a> {
    by_id: HashMap<&'a SellerId, &'a Seller>,
}

impl<'a> SellerIndex<'a> {
    /// Index a collection; on duplicate ids the first seller wins
    #[must_use]
    pub fn new(sellers: &'a [Seller]) -> Self {
        let mut by_id = HashMap::with_capacity(sellers.len());
        for seller in sellers {
            by_id.entry(&seller.id).or_insert(seller);
        }
        Self { by_id }
    }

    /// Resolve an id
    #[must_use]
    pub fn get(&self, id: &SellerId) -> Option<&'a Seller> {
        self.by_id.get(id).copied()
    }
}

/// The event a row is searched and shown under.
///
/// Only the first assigned id counts, and only while that event is active.
/// Later assignments are deliberately ignored.
#[must_use]
pub fn search_event<'a, T: Listed>(row: &T, events: &EventIndex<'a>) -> Option<&'a Event> {
    row.assigned_events()
        .first()
        .and_then(|id| events.active(id))
}

/// The event column of a row.
///
/// With a specific event filtered, that event (if active); otherwise the
/// row's first active assignment.
#[must_use]
pub fn display_event<'a, T: Listed>(
    row: &T,
    events: &EventIndex<'a>,
    filter: &EventFilter,
) -> Option<&'a Event> {
    match filter {
        EventFilter::Event(id) => events.active(id),
        EventFilter::All => events.first_active(row.assigned_events()),
    }
}

/// Name of the seller behind a buyer row, falling back to the stored name
#[must_use]
pub fn seller_display_name<T: Listed>(row: &T, sellers: &SellerIndex<'_>) -> Option<String> {
    let (id, fallback) = row.seller_ref()?;
    Some(
        sellers
            .get(id)
            .map_or_else(|| fallback.to_string(), Seller::full_name),
    )
}
