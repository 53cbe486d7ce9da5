//! Row selection and the bulk action it enables.

use crate::types::{Buyer, BuyerId, EventType};
use crate::views::{EventFilter, EventIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Ticked row ids, in the order they were ticked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection<Id> {
    ids: Vec<Id>,
}

impl<Id> Default for Selection<Id> {
    fn default() -> Self {
        Self { ids: Vec::new() }
    }
}

impl<Id: Clone + Eq + Hash> Selection<Id> {
    /// Empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present
    pub fn toggle(&mut self, id: Id) {
        if let Some(pos) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Membership test
    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    /// Untick everything
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Untick one id; returns whether it was ticked
    pub fn remove(&mut self, id: &Id) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        before != self.ids.len()
    }

    /// Keep only ids passing `keep`
    pub fn retain(&mut self, keep: impl FnMut(&Id) -> bool) {
        self.ids.retain(keep);
    }

    /// Ticked ids in tick order
    #[must_use]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Number of ticked ids
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is ticked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when the selection equals `eligible` as a set.
    ///
    /// An empty eligible set is never covered, so the header checkbox stays
    /// unchecked when there is nothing to tick.
    #[must_use]
    pub fn covers(&self, eligible: &[Id]) -> bool {
        if eligible.is_empty() {
            return false;
        }
        let selected: HashSet<&Id> = self.ids.iter().collect();
        let wanted: HashSet<&Id> = eligible.iter().collect();
        selected == wanted
    }

    /// Header checkbox: clear when already covering `eligible`, otherwise
    /// select exactly `eligible`
    pub fn select_all(&mut self, eligible: &[Id]) {
        if self.covers(eligible) {
            self.ids.clear();
        } else {
            let mut seen = HashSet::with_capacity(eligible.len());
            self.ids = eligible
                .iter()
                .filter(|id| seen.insert(*id))
                .cloned()
                .collect();
        }
    }
}

/// Event type deciding the buyers bulk action.
///
/// The first ticked buyer decides: its first assigned event that is active
/// and passes the event filter. Mixed selections are not reconciled.
#[must_use]
pub fn selection_kind(
    selection: &Selection<BuyerId>,
    buyers: &[Buyer],
    events: &EventIndex<'_>,
    event_filter: &EventFilter,
) -> Option<EventType> {
    let first = selection.ids().first()?;
    let buyer = buyers.iter().find(|buyer| &buyer.id == first)?;
    buyer
        .assigned_events
        .iter()
        .filter(|id| match event_filter {
            EventFilter::All => true,
            EventFilter::Event(wanted) => *id == wanted,
        })
        .find_map(|id| events.active(id))
        .map(|event| event.event_type)
}

/// True when the selection is non-empty and every ticked buyer is delivered
#[must_use]
pub fn all_selected_delivered(selection: &Selection<BuyerId>, buyers: &[Buyer]) -> bool {
    !selection.is_empty()
        && selection.ids().iter().all(|id| {
            buyers
                .iter()
                .find(|buyer| &buyer.id == id)
                .is_some_and(Buyer::is_delivered)
        })
}

/// The one bulk action offered for a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BulkAction {
    /// Print raffle receipts
    PrintReceipts,
    /// Set the delivery flag of food-sale buyers
    MarkDelivered {
        /// Value the action will write
        delivered: bool,
    },
    /// Assign sellers to an event
    AssignToEvent,
}

/// Bulk action for the buyers list
#[must_use]
pub fn buyer_bulk_action(
    selection: &Selection<BuyerId>,
    buyers: &[Buyer],
    events: &EventIndex<'_>,
    event_filter: &EventFilter,
) -> Option<BulkAction> {
    match selection_kind(selection, buyers, events, event_filter)? {
        EventType::Raffle => Some(BulkAction::PrintReceipts),
        EventType::FoodSale => Some(BulkAction::MarkDelivered {
            delivered: !all_selected_delivered(selection, buyers),
        }),
    }
}

/// Bulk action for the sellers list
#[must_use]
pub fn seller_bulk_action<Id: Clone + Eq + Hash>(selection: &Selection<Id>) -> Option<BulkAction> {
    (!selection.is_empty()).then_some(BulkAction::AssignToEvent)
}
