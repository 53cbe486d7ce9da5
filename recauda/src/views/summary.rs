//! Aggregate counts shown above the lists.

use super::Listed;
use crate::types::{EntityStatus, Event, EventStatus};
use serde::Serialize;

/// Counts for a people list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ListSummary {
    /// Rows in the collection
    pub total: usize,
    /// Rows passing the filters
    pub visible: usize,
    /// Visible active rows
    pub active: usize,
    /// Visible inactive rows
    pub inactive: usize,
    /// Visible rows that can be ticked
    pub selectable: usize,
}

impl ListSummary {
    /// Summarise `visible` rows out of `total`
    #[must_use]
    pub fn of<T: Listed>(total: usize, visible: &[&T], selectable: usize) -> Self {
        let active = visible
            .iter()
            .filter(|row| row.status() == EntityStatus::Active)
            .count();
        Self {
            total,
            visible: visible.len(),
            active,
            inactive: visible.len() - active,
            selectable,
        }
    }
}

/// Events per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EventCounts {
    /// All events
    pub total: usize,
    /// Selling
    pub active: usize,
    /// Paused
    pub inactive: usize,
    /// Finished
    pub completed: usize,
    /// Called off
    pub cancelled: usize,
}

impl EventCounts {
    /// Count a collection
    pub fn of<'e>(events: impl IntoIterator<Item = &'e Event>) -> Self {
        events.into_iter().fold(Self::default(), |mut counts, event| {
            counts.total += 1;
            match event.status {
                EventStatus::Active => counts.active += 1,
                EventStatus::Inactive => counts.inactive += 1,
                EventStatus::Completed => counts.completed += 1,
                EventStatus::Cancelled => counts.cancelled += 1,
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;
    use crate::views::fixtures::*;

    #[test]
    fn list_summary_splits_by_status() {
        let rows = [
            seller("1", "Ana", EntityStatus::Active, &[]),
            seller("2", "Beto", EntityStatus::Inactive, &[]),
        ];
        let visible: Vec<_> = rows.iter().collect();
        let summary = ListSummary::of(5, &visible, 1);

        assert_eq!(
            summary,
            ListSummary {
                total: 5,
                visible: 2,
                active: 1,
                inactive: 1,
                selectable: 1,
            }
        );
    }

    #[test]
    fn event_counts_cover_every_status() {
        let events = [
            event("1", EventType::Raffle, EventStatus::Active),
            event("2", EventType::Raffle, EventStatus::Active),
            event("3", EventType::FoodSale, EventStatus::Cancelled),
            event("4", EventType::FoodSale, EventStatus::Completed),
        ];
        let counts = EventCounts::of(&events);
        assert_eq!((counts.total, counts.active, counts.completed, counts.cancelled), (4, 2, 1, 1));
        assert_eq!(counts.inactive, 0);
    }
}
