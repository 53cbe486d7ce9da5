//! Checkbox eligibility: which visible rows a bulk action may tick.

use super::{EventFilter, EventIndex, Listed};
use crate::types::{EntityStatus, EventType};

/// Which events make a row eligible for the list's bulk action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityRule {
    /// Every row shows a checkbox (sellers list)
    Unrestricted,
    /// Any active event qualifies (buyers list)
    AnyActiveEvent,
    /// Only active events of one type qualify (receipt printing)
    ActiveEventOfType(EventType),
}

impl EligibilityRule {
    fn accepts(self, event_type: EventType) -> bool {
        match self {
            Self::Unrestricted | Self::AnyActiveEvent => true,
            Self::ActiveEventOfType(wanted) => wanted == event_type,
        }
    }
}

/// Whether the row gets a checkbox under the current event filter.
///
/// With a specific event filtered, that event must be assigned to the row,
/// active, and accepted by the rule. Otherwise any active assigned event the
/// rule accepts will do.
pub fn checkbox_visible<T: Listed>(
    row: &T,
    events: &EventIndex<'_>,
    event_filter: &EventFilter,
    rule: EligibilityRule,
) -> bool {
    if rule == EligibilityRule::Unrestricted {
        return true;
    }
    match event_filter {
        EventFilter::Event(id) => {
            row.assigned_events().contains(id)
                && events
                    .active(id)
                    .is_some_and(|event| rule.accepts(event.event_type))
        },
        EventFilter::All => row
            .assigned_events()
            .iter()
            .filter_map(|id| events.active(id))
            .any(|event| rule.accepts(event.event_type)),
    }
}

/// Checkbox visible and the row itself active
pub fn is_selectable<T: Listed>(
    row: &T,
    events: &EventIndex<'_>,
    event_filter: &EventFilter,
    rule: EligibilityRule,
) -> bool {
    row.status() == EntityStatus::Active && checkbox_visible(row, events, event_filter, rule)
}

/// Ids of the selectable rows among `visible`, in order
pub fn selectable_ids<T: Listed>(
    visible: &[&T],
    events: &EventIndex<'_>,
    event_filter: &EventFilter,
    rule: EligibilityRule,
) -> Vec<T::Id> {
    visible
        .iter()
        .filter(|row| is_selectable(**row, events, event_filter, rule))
        .map(|row| row.id().clone())
        .collect()
}
