//! Buyers list.
//!
//! Only buyers tied to at least one active event are listed. The event
//! dropdown starts on the first active event. Ticked buyers drive one bulk
//! action, decided by the first ticked buyer's event type: raffles print
//! receipts, food sales toggle the delivery flag.
//!
//! Changing the event filter keeps the selection as is, including buyers the
//! new filter hides. Such a selection may have no bulk action until the
//! filter is changed back or the selection is cleared.

use crate::receipts::{ReceiptPrinter, printing_message};
use crate::selection::{BulkAction, Selection, buyer_bulk_action};
use crate::snackbar::{Notice, SnackbarAction, SnackbarReducer, SnackbarState, SnackbarTimings};
use crate::types::{Buyer, BuyerId, EntityStatus, Event, EventId, Seller};
use crate::views::{
    EligibilityRule, EventFilter, EventIndex, ListFilter, ListPolicy, ListSummary, SellerIndex,
    StatusFilter, checkbox_visible, display_event, is_selectable, seller_display_name,
    selectable_ids, visible_rows,
};
use recauda_core::composition::reduce_scoped;
use recauda_core::{Effect, Reducer, SmallVec, async_effect, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Buyers are tickable on any active event; the bulk action adapts to its type
pub const ELIGIBILITY: EligibilityRule = EligibilityRule::AnyActiveEvent;

/// Buyers screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyersState {
    /// Every buyer
    pub buyers: Vec<Buyer>,
    /// Every event
    pub events: Vec<Event>,
    /// Every seller, for the seller column and search
    pub sellers: Vec<Seller>,
    /// Search and dropdowns
    pub filter: ListFilter,
    /// Ticked buyers
    pub selection: Selection<BuyerId>,
    /// Notification area
    pub snackbar: SnackbarState,
}

impl BuyersState {
    /// Screen over the given data, filtered on the first active event
    #[must_use]
    pub fn new(buyers: Vec<Buyer>, events: Vec<Event>, sellers: Vec<Seller>) -> Self {
        let event = events
            .iter()
            .find(|event| event.is_active())
            .map_or(EventFilter::All, |event| EventFilter::Event(event.id.clone()));
        Self {
            buyers,
            events,
            sellers,
            filter: ListFilter::default().with_event(event),
            selection: Selection::new(),
            snackbar: SnackbarState::default(),
        }
    }

    /// Ids the header checkbox would tick
    #[must_use]
    pub fn eligible(&self) -> Vec<BuyerId> {
        let events = EventIndex::new(&self.events);
        let sellers = SellerIndex::new(&self.sellers);
        let visible = visible_rows(&self.buyers, &events, &sellers, &self.filter, ListPolicy::BUYERS);
        selectable_ids(&visible, &events, &self.filter.event, ELIGIBILITY)
    }

    /// Bulk action offered for the current selection
    #[must_use]
    pub fn bulk_action(&self) -> Option<BulkAction> {
        let events = EventIndex::new(&self.events);
        buyer_bulk_action(&self.selection, &self.buyers, &events, &self.filter.event)
    }

    /// Everything the screen renders
    #[must_use]
    pub fn view(&self) -> BuyersView {
        let events = EventIndex::new(&self.events);
        let sellers = SellerIndex::new(&self.sellers);
        let visible = visible_rows(&self.buyers, &events, &sellers, &self.filter, ListPolicy::BUYERS);
        let eligible = selectable_ids(&visible, &events, &self.filter.event, ELIGIBILITY);

        let rows = visible
            .iter()
            .map(|buyer| BuyerRow {
                id: buyer.id.clone(),
                name: buyer.full_name(),
                phone: buyer.phone.clone(),
                email: buyer.email.clone(),
                status: buyer.status,
                seller: seller_display_name(*buyer, &sellers),
                event: display_event(*buyer, &events, &self.filter.event).map(|event| event.name.clone()),
                total_bought: buyer.total_bought,
                delivered: buyer.is_delivered(),
                checkbox: checkbox_visible(*buyer, &events, &self.filter.event, ELIGIBILITY),
                selectable: is_selectable(*buyer, &events, &self.filter.event, ELIGIBILITY),
                selected: self.selection.contains(&buyer.id),
            })
            .collect();

        BuyersView {
            rows,
            summary: ListSummary::of(self.buyers.len(), &visible, eligible.len()),
            bulk_action: buyer_bulk_action(&self.selection, &self.buyers, &events, &self.filter.event),
            all_selected: self.selection.covers(&eligible),
            selected: self.selection.len(),
            event_options: events
                .active_events()
                .map(|event| (event.id.clone(), event.name.clone()))
                .collect(),
        }
    }
}

/// One rendered buyer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyerRow {
    /// Buyer id
    pub id: BuyerId,
    /// "First Last"
    pub name: String,
    /// Phone as entered
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Enabled or disabled
    pub status: EntityStatus,
    /// Seller column
    pub seller: Option<String>,
    /// Event column
    pub event: Option<String>,
    /// Numbers or portions bought
    pub total_bought: u32,
    /// Delivery badge
    pub delivered: bool,
    /// A checkbox is drawn
    pub checkbox: bool,
    /// The checkbox is enabled
    pub selectable: bool,
    /// The checkbox is ticked
    pub selected: bool,
}

/// Buyers view-model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyersView {
    /// Visible rows in collection order
    pub rows: Vec<BuyerRow>,
    /// Counts above the table
    pub summary: ListSummary,
    /// Bulk action bar
    pub bulk_action: Option<BulkAction>,
    /// Header checkbox ticked
    pub all_selected: bool,
    /// Ticked rows
    pub selected: usize,
    /// Event dropdown entries
    pub event_options: Vec<(EventId, String)>,
}

/// Buyers screen inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyersAction {
    /// Search box
    SearchChanged(String),
    /// Status dropdown
    StatusFilterChanged(StatusFilter),
    /// Event dropdown
    EventFilterChanged(EventFilter),
    /// Row checkbox
    ToggleRow(BuyerId),
    /// Header checkbox
    ToggleSelectAll,
    /// Cancel the bulk action bar
    ClearSelection,
    /// Enable or disable a buyer
    ToggleStatus(BuyerId),
    /// Raffle bulk action
    PrintReceipts,
    /// Food-sale bulk action
    SetDelivered(bool),
    /// Notification area
    Snackbar(SnackbarAction),
}

/// Buyers screen collaborators
#[derive(Clone)]
pub struct BuyersEnvironment {
    /// Receipt output
    pub printer: Arc<dyn ReceiptPrinter>,
    /// Notice durations
    pub timings: SnackbarTimings,
}

impl BuyersEnvironment {
    /// Bundle collaborators
    #[must_use]
    pub fn new(printer: Arc<dyn ReceiptPrinter>, timings: SnackbarTimings) -> Self {
        Self { printer, timings }
    }
}

/// Buyers screen reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct BuyersReducer {
    snackbar: SnackbarReducer,
}

impl BuyersReducer {
    /// Reducer whose snackbar animates for `timings.close_animation`
    #[must_use]
    pub const fn new(timings: &SnackbarTimings) -> Self {
        Self {
            snackbar: SnackbarReducer::from_timings(timings),
        }
    }
}

impl Reducer for BuyersReducer {
    type State = BuyersState;
    type Action = BuyersAction;
    type Environment = BuyersEnvironment;

    fn reduce(
        &self,
        state: &mut BuyersState,
        action: BuyersAction,
        env: &BuyersEnvironment,
    ) -> SmallVec<[Effect<BuyersAction>; 4]> {
        match action {
            BuyersAction::SearchChanged(search) => {
                state.filter.search = search;
                SmallVec::new()
            },
            BuyersAction::StatusFilterChanged(status) => {
                state.filter.status = status;
                SmallVec::new()
            },
            BuyersAction::EventFilterChanged(event) => {
                state.filter.event = event;
                SmallVec::new()
            },
            BuyersAction::ToggleRow(id) => {
                if state.selection.contains(&id) || state.eligible().contains(&id) {
                    state.selection.toggle(id);
                } else {
                    tracing::debug!(%id, "Ignoring tick on a buyer that cannot be selected");
                }
                SmallVec::new()
            },
            BuyersAction::ToggleSelectAll => {
                let eligible = state.eligible();
                state.selection.select_all(&eligible);
                tracing::debug!(selected = state.selection.len(), "Select all toggled");
                SmallVec::new()
            },
            BuyersAction::ClearSelection => {
                state.selection.clear();
                SmallVec::new()
            },
            BuyersAction::ToggleStatus(id) => {
                let Some(buyer) = state.buyers.iter_mut().find(|buyer| buyer.id == id) else {
                    tracing::warn!(%id, "Status toggle for unknown buyer");
                    return SmallVec::new();
                };
                buyer.status = buyer.status.toggled();
                if !buyer.status.is_active() && state.selection.remove(&id) {
                    tracing::debug!(%id, "Disabled buyer evicted from selection");
                }
                SmallVec::new()
            },
            BuyersAction::PrintReceipts => {
                if state.bulk_action() != Some(BulkAction::PrintReceipts) {
                    tracing::warn!("Print requested without a raffle selection");
                    return SmallVec::new();
                }
                let printer = Arc::clone(&env.printer);
                let ids = state.selection.ids().to_vec();
                let timings = env.timings;
                smallvec![async_effect! {
                    let count = printer.print(&ids);
                    Some(BuyersAction::Snackbar(
                        timings.show(Notice::success(printing_message(count)))
                    ))
                }]
            },
            BuyersAction::SetDelivered(delivered) => {
                if !matches!(state.bulk_action(), Some(BulkAction::MarkDelivered { .. })) {
                    tracing::warn!("Delivery flag requested without a food-sale selection");
                    return SmallVec::new();
                }
                for buyer in &mut state.buyers {
                    if state.selection.contains(&buyer.id) {
                        buyer.is_delivered = Some(delivered);
                    }
                }
                tracing::debug!(count = state.selection.len(), delivered, "Delivery flag set");
                state.selection.clear();
                SmallVec::new()
            },
            BuyersAction::Snackbar(action) => {
                reduce_scoped(&self.snackbar, &mut state.snackbar, action, &(), BuyersAction::Snackbar)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventStatus, EventType};
    use crate::views::fixtures::*;
    use recauda_testing::{ReducerTest, assertions};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPrinter {
        printed: Mutex<Vec<BuyerId>>,
    }

    impl ReceiptPrinter for RecordingPrinter {
        fn print(&self, buyers: &[BuyerId]) -> usize {
            if let Ok(mut printed) = self.printed.lock() {
                printed.extend_from_slice(buyers);
            }
            buyers.len()
        }
    }

    fn env() -> BuyersEnvironment {
        BuyersEnvironment::new(Arc::new(RecordingPrinter::default()), SnackbarTimings::default())
    }

    fn id(value: &str) -> BuyerId {
        BuyerId::new(value)
    }

    fn state() -> BuyersState {
        BuyersState::new(
            vec![
                buyer("1", "s1", EntityStatus::Active, &["R1"]),
                buyer("2", "s1", EntityStatus::Inactive, &["R1"]),
                buyer("3", "s2", EntityStatus::Active, &["F1"]),
                buyer("4", "s2", EntityStatus::Active, &["F1", "R1"]),
                buyer("5", "s1", EntityStatus::Active, &["OLD"]),
            ],
            vec![
                event("OLD", EventType::Raffle, EventStatus::Completed),
                event("R1", EventType::Raffle, EventStatus::Active),
                event("F1", EventType::FoodSale, EventStatus::Active),
            ],
            vec![seller("s1", "María", EntityStatus::Active, &["R1"])],
        )
    }

    #[test]
    fn starts_on_first_active_event() {
        let state = state();
        assert_eq!(state.filter.event, EventFilter::Event(EventId::new("R1")));
        let view = state.view();
        let ids: Vec<_> = view.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "4"]);
        assert_eq!(view.summary.selectable, 2);
        assert_eq!(view.event_options.len(), 2);
    }

    #[test]
    fn all_events_still_hides_buyers_without_active_event() {
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .when_action(BuyersAction::EventFilterChanged(EventFilter::All))
            .then_state(|state| {
                let view = state.view();
                assert_eq!(view.rows.len(), 4);
                assert!(view.rows.iter().all(|row| row.id.as_str() != "5"));
            })
            .run();
    }

    #[test]
    fn event_filter_change_keeps_hidden_ticks() {
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .given_actions([BuyersAction::ToggleRow(id("1"))])
            .when_action(BuyersAction::EventFilterChanged(EventFilter::Event(EventId::new("F1"))))
            .then_state(|state| {
                assert_eq!(state.selection.ids(), &[id("1")]);
                assert!(state.view().rows.iter().all(|row| row.id != id("1")));
                assert_eq!(state.bulk_action(), None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn seller_column_resolves_or_falls_back() {
        let view = state().view();
        assert_eq!(view.rows[0].seller.as_deref(), Some("María Pérez"));
        let state = BuyersState {
            filter: ListFilter::default().with_event(EventFilter::Event(EventId::new("F1"))),
            ..state()
        };
        assert_eq!(state.view().rows[0].seller.as_deref(), Some("Vendedor Guardado"));
    }

    #[test]
    fn inactive_rows_cannot_be_ticked() {
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .when_action(BuyersAction::ToggleRow(id("2")))
            .then_state(|state| assert!(state.selection.is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn select_all_twice_clears() {
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .given_actions([BuyersAction::ToggleSelectAll])
            .when_action(BuyersAction::ToggleSelectAll)
            .then_state(|state| assert!(state.selection.is_empty()))
            .run();

        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .when_action(BuyersAction::ToggleSelectAll)
            .then_state(|state| {
                assert_eq!(state.selection.ids(), &[id("1"), id("4")]);
                assert!(state.view().all_selected);
            })
            .run();
    }

    #[test]
    fn disabling_a_ticked_buyer_evicts_it() {
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .given_actions([BuyersAction::ToggleRow(id("1")), BuyersAction::ToggleRow(id("4"))])
            .when_action(BuyersAction::ToggleStatus(id("1")))
            .then_state(|state| {
                assert_eq!(state.selection.ids(), &[id("4")]);
                assert_eq!(state.buyers[0].status, EntityStatus::Inactive);
            })
            .run();
    }

    #[test]
    fn raffle_selection_prints_receipts() {
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .given_actions([BuyersAction::ToggleRow(id("1"))])
            .when_action(BuyersAction::PrintReceipts)
            .then_state(|state| {
                assert_eq!(state.bulk_action(), Some(BulkAction::PrintReceipts));
                assert_eq!(state.selection.len(), 1);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn food_sale_selection_sets_delivery_and_clears() {
        let state = BuyersState {
            filter: ListFilter::default().with_event(EventFilter::Event(EventId::new("F1"))),
            ..state()
        };
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state)
            .given_actions([BuyersAction::ToggleRow(id("3")), BuyersAction::ToggleRow(id("4"))])
            .when_action(BuyersAction::SetDelivered(true))
            .then_state(|state| {
                assert!(state.selection.is_empty());
                assert!(state.buyers[2].is_delivered());
                assert!(state.buyers[3].is_delivered());
                assert!(!state.buyers[0].is_delivered());
            })
            .run();
    }

    #[test]
    fn delivered_selection_offers_unmarking() {
        let mut state = BuyersState {
            filter: ListFilter::default().with_event(EventFilter::Event(EventId::new("F1"))),
            ..state()
        };
        state.buyers[2].is_delivered = Some(true);
        state.selection.toggle(id("3"));
        assert_eq!(state.bulk_action(), Some(BulkAction::MarkDelivered { delivered: false }));
    }

    #[test]
    fn print_without_raffle_selection_is_ignored() {
        ReducerTest::new(BuyersReducer::default())
            .with_env(env())
            .given_state(state())
            .when_action(BuyersAction::PrintReceipts)
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
