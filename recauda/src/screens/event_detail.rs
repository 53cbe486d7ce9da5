//! Event detail: money collected and pending per seller, plus the
//! assign-numbers modal.

use super::events::EventCard;
use super::navigate;
use crate::backend::NumberAssignment;
use crate::routes;
use crate::types::{Event, percentage};
use crate::validation::FieldErrors;
use crate::wizard::{AssignmentEdit, AssignmentForm};
use recauda_core::environment::Navigator;
use recauda_core::{Effect, Reducer, SmallVec, smallvec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One seller's line in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesEntry {
    /// Line id; names are not unique
    pub id: u32,
    /// Seller name
    pub name: String,
    /// Numbers sold
    pub sold: u32,
    /// Numbers handed to the seller
    pub total: u32,
    /// Money, in whole pesos
    pub amount: u64,
}

impl SalesEntry {
    /// Sold share, rounded
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.sold, self.total)
    }
}

/// Ledger tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LedgerTab {
    /// "Dinero cobrado"
    #[default]
    Collected,
    /// "Dinero por cobrar"
    Pending,
}

impl LedgerTab {
    /// Tab title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Collected => "Dinero cobrado",
            Self::Pending => "Dinero por cobrar",
        }
    }

    /// Footer label
    #[must_use]
    pub const fn total_label(self) -> &'static str {
        match self {
            Self::Collected => "TOTAL COBRADO",
            Self::Pending => "TOTAL POR COBRAR",
        }
    }
}

/// Footer of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LedgerTotals {
    /// Numbers sold
    pub sold: u32,
    /// Numbers handed out
    pub numbers: u32,
    /// Money
    pub amount: u64,
    /// `sold / numbers`, rounded
    pub percentage: u32,
}

impl LedgerTotals {
    /// Sum entries
    pub fn of<'e>(entries: impl IntoIterator<Item = &'e SalesEntry>) -> Self {
        let mut totals = entries.into_iter().fold(Self::default(), |mut totals, entry| {
            totals.sold = totals.sold.saturating_add(entry.sold);
            totals.numbers = totals.numbers.saturating_add(entry.total);
            totals.amount = totals.amount.saturating_add(entry.amount);
            totals
        });
        totals.percentage = percentage(totals.sold, totals.numbers);
        totals
    }
}

/// Open assign-numbers modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignNumbersModal {
    /// Sellers receiving numbers
    pub sellers: Vec<String>,
    /// Quantity and numbering
    pub form: AssignmentForm,
    /// Errors of the last confirm
    pub errors: FieldErrors,
}

impl AssignNumbersModal {
    /// "Vendedor: X" or "N vendedores seleccionados"
    #[must_use]
    pub fn heading(&self) -> String {
        match self.sellers.as_slice() {
            [only] => format!("Vendedor: {only}"),
            sellers => format!("{} vendedores seleccionados", sellers.len()),
        }
    }
}

/// A confirmed number assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberGrant {
    /// Sellers receiving numbers
    pub sellers: Vec<String>,
    /// Numbers per seller
    pub quantity: u32,
    /// Numbering
    pub assignment: NumberAssignment,
}

/// Event detail state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetailState {
    /// Event on display, if it resolved
    pub event: Option<Event>,
    /// Money already collected
    pub collected: Vec<SalesEntry>,
    /// Money still to collect
    pub pending: Vec<SalesEntry>,
    /// Visible tab
    pub tab: LedgerTab,
    /// Case-insensitive seller name filter
    pub search: String,
    /// Assign-numbers modal
    pub assign: Option<AssignNumbersModal>,
    /// Assignments confirmed on this screen
    pub grants: Vec<NumberGrant>,
}

impl EventDetailState {
    /// Detail of `event` over a ledger
    #[must_use]
    pub fn new(event: Option<Event>, collected: Vec<SalesEntry>, pending: Vec<SalesEntry>) -> Self {
        Self {
            event,
            collected,
            pending,
            tab: LedgerTab::Collected,
            search: String::new(),
            assign: None,
            grants: Vec::new(),
        }
    }

    fn entries(&self) -> &[SalesEntry] {
        match self.tab {
            LedgerTab::Collected => &self.collected,
            LedgerTab::Pending => &self.pending,
        }
    }

    /// Everything the screen renders
    #[must_use]
    pub fn view(&self) -> EventDetailView {
        let needle = self.search.to_lowercase();
        let entries: Vec<SalesEntry> = self
            .entries()
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        EventDetailView {
            card: self.event.as_ref().map(EventCard::of),
            tab: self.tab,
            totals: LedgerTotals::of(&entries),
            total_label: self.tab.total_label(),
            entries,
            modal_heading: self.assign.as_ref().map(AssignNumbersModal::heading),
        }
    }
}

/// Event detail view-model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetailView {
    /// Header card
    pub card: Option<EventCard>,
    /// Visible tab
    pub tab: LedgerTab,
    /// Lines of the tab passing the search
    pub entries: Vec<SalesEntry>,
    /// Footer over `entries`
    pub totals: LedgerTotals,
    /// Footer label
    pub total_label: &'static str,
    /// Heading of the open modal
    pub modal_heading: Option<String>,
}

/// Event detail inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetailAction {
    /// Switch tab
    SelectTab(LedgerTab),
    /// Search box
    SearchChanged(String),
    /// Move a pending line to collected
    MarkCollected(u32),
    /// Open the assign-numbers modal for sellers
    OpenAssignNumbers(Vec<String>),
    /// Edit the modal form
    AssignEdit(AssignmentEdit),
    /// The modal's quantity input lost focus
    AssignBlur,
    /// Validate and record the assignment
    ConfirmAssign,
    /// Close the modal
    CloseAssign,
    /// "Volver a Mis eventos"
    BackToEvents,
}

/// Event detail reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDetailReducer;

impl Reducer for EventDetailReducer {
    type State = EventDetailState;
    type Action = EventDetailAction;
    type Environment = Arc<dyn Navigator>;

    fn reduce(
        &self,
        state: &mut EventDetailState,
        action: EventDetailAction,
        navigator: &Arc<dyn Navigator>,
    ) -> SmallVec<[Effect<EventDetailAction>; 4]> {
        match action {
            EventDetailAction::SelectTab(tab) => state.tab = tab,
            EventDetailAction::SearchChanged(search) => state.search = search,
            EventDetailAction::MarkCollected(id) => {
                match state.pending.iter().position(|entry| entry.id == id) {
                    Some(pos) => {
                        let entry = state.pending.remove(pos);
                        tracing::info!(id, amount = entry.amount, "Marked as collected");
                        state.collected.push(entry);
                    },
                    None => tracing::warn!(id, "No pending line to collect"),
                }
            },
            EventDetailAction::OpenAssignNumbers(sellers) => {
                if sellers.is_empty() {
                    tracing::debug!("Assign numbers needs at least one seller");
                } else {
                    state.assign = Some(AssignNumbersModal {
                        sellers,
                        form: AssignmentForm::default(),
                        errors: FieldErrors::new(),
                    });
                }
            },
            EventDetailAction::AssignEdit(edit) => {
                if let Some(modal) = state.assign.as_mut() {
                    if let Some(field) = modal.form.apply(edit) {
                        modal.errors.clear(field);
                    }
                }
            },
            EventDetailAction::AssignBlur => {
                if let Some(modal) = state.assign.as_mut() {
                    modal.form.blur();
                }
            },
            EventDetailAction::ConfirmAssign => {
                let Some(modal) = state.assign.as_mut() else {
                    return SmallVec::new();
                };
                modal.form.blur();
                modal.errors = modal.form.validate();
                if !modal.errors.is_empty() {
                    return SmallVec::new();
                }
                if let Some(assignment) = modal.form.assignment() {
                    let grant = NumberGrant {
                        sellers: std::mem::take(&mut modal.sellers),
                        quantity: modal.form.effective_quantity(),
                        assignment,
                    };
                    tracing::info!(sellers = grant.sellers.len(), quantity = grant.quantity, "Numbers assigned");
                    state.grants.push(grant);
                }
                state.assign = None;
            },
            EventDetailAction::CloseAssign => state.assign = None,
            EventDetailAction::BackToEvents => return smallvec![navigate(navigator, routes::HOME)],
        }
        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::validation::Field;
    use recauda_testing::{RecordingNavigator, ReducerTest, assertions};

    fn navigator() -> Arc<dyn Navigator> {
        Arc::new(RecordingNavigator::new())
    }

    fn state() -> EventDetailState {
        let (collected, pending) = seed::sales_ledger();
        EventDetailState::new(None, collected, pending)
    }

    #[test]
    fn collected_tab_totals() {
        let view = state().view();
        assert_eq!(view.entries.len(), 7);
        assert_eq!(
            view.totals,
            LedgerTotals { sold: 70, numbers: 70, amount: 56_000, percentage: 100 }
        );
        assert_eq!(view.total_label, "TOTAL COBRADO");
    }

    #[test]
    fn pending_tab_totals_follow_search() {
        ReducerTest::new(EventDetailReducer)
            .with_env(navigator())
            .given_state(state())
            .given_actions([EventDetailAction::SelectTab(LedgerTab::Pending)])
            .when_action(EventDetailAction::SearchChanged("NOMBRE".into()))
            .then_state(|state| {
                let view = state.view();
                assert_eq!(view.entries.len(), 3);
                assert_eq!(view.totals.sold, 14);
                assert_eq!(view.totals.amount, 14_000);
                assert_eq!(view.totals.percentage, 47);
            })
            .run();
    }

    #[test]
    fn mark_collected_moves_the_line() {
        let first_pending = state().pending[0].id;
        ReducerTest::new(EventDetailReducer)
            .with_env(navigator())
            .given_state(state())
            .when_action(EventDetailAction::MarkCollected(first_pending))
            .then_state(|state| {
                assert_eq!(state.pending.len(), 2);
                assert_eq!(state.collected.len(), 8);
                assert_eq!(state.collected[7].sold, 5);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn modal_heading_depends_on_seller_count() {
        let mut state = state();
        let _ = EventDetailReducer.reduce(
            &mut state,
            EventDetailAction::OpenAssignNumbers(vec!["Jacob Jones".into()]),
            &navigator(),
        );
        assert_eq!(state.view().modal_heading.as_deref(), Some("Vendedor: Jacob Jones"));

        let _ = EventDetailReducer.reduce(
            &mut state,
            EventDetailAction::OpenAssignNumbers(vec!["A".into(), "B".into(), "C".into()]),
            &navigator(),
        );
        assert_eq!(state.view().modal_heading.as_deref(), Some("3 vendedores seleccionados"));
    }

    #[test]
    fn manual_range_is_validated_before_granting() {
        ReducerTest::new(EventDetailReducer)
            .with_env(navigator())
            .given_state(state())
            .given_actions([
                EventDetailAction::OpenAssignNumbers(vec!["Robert Fox".into()]),
                EventDetailAction::AssignEdit(AssignmentEdit::AutoAssign(false)),
                EventDetailAction::AssignEdit(AssignmentEdit::FromNumber("20".into())),
            ])
            .when_action(EventDetailAction::ConfirmAssign)
            .then_state(|state| {
                let modal = state.assign.as_ref();
                assert!(modal.is_some_and(|m| m.errors.get(Field::ToNumber).is_some()));
                assert!(state.grants.is_empty());
            })
            .run();
    }

    #[test]
    fn confirmed_assignment_is_recorded() {
        ReducerTest::new(EventDetailReducer)
            .with_env(navigator())
            .given_state(state())
            .given_actions([
                EventDetailAction::OpenAssignNumbers(vec!["Robert Fox".into()]),
                EventDetailAction::AssignEdit(AssignmentEdit::QuantityInput(String::new())),
            ])
            .when_action(EventDetailAction::ConfirmAssign)
            .then_state(|state| {
                assert!(state.assign.is_none());
                assert_eq!(
                    state.grants,
                    [NumberGrant {
                        sellers: vec!["Robert Fox".into()],
                        quantity: 1,
                        assignment: NumberAssignment::Automatic,
                    }]
                );
            })
            .run();
    }
}
