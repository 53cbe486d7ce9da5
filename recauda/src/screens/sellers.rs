//! Sellers list.
//!
//! Every seller is listed; only active ones can be ticked. A selection opens
//! the assign-to-event modal. Contact data is edited in a modal that saves
//! through the [`Backend`] and reports the outcome on the snackbar.

use super::navigate;
use crate::backend::{Backend, BackendError, SellerUpdate};
use crate::routes;
use crate::selection::{BulkAction, Selection, seller_bulk_action};
use crate::snackbar::{Notice, SnackbarAction, SnackbarReducer, SnackbarState, SnackbarTimings};
use crate::types::{EntityStatus, Event, EventId, Seller, SellerId};
use crate::validation::{Field, FieldErrors, require};
use crate::views::{
    EligibilityRule, EventFilter, EventIndex, ListFilter, ListPolicy, ListSummary, SellerIndex,
    StatusFilter, is_selectable, selectable_ids, visible_rows,
};
use crate::wizard::add_seller::{FIRST_NAME_REQUIRED, LAST_NAME_REQUIRED, PHONE_REQUIRED};
use chrono::NaiveDate;
use recauda_core::composition::reduce_scoped;
use recauda_core::environment::Navigator;
use recauda_core::{Effect, Reducer, SmallVec, async_effect, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Snackbar text after a saved edit
pub const EDIT_SAVED: &str = "Vendedor editado con éxito";
/// Snackbar text after a failed edit
pub const EDIT_FAILED: &str = "No se pudieron realizar los cambios. Intente nuevamente en unos minutos";

/// Contact-data modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerEdit {
    /// Seller being edited
    pub seller_id: SellerId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Phone
    pub phone: String,
    /// Errors of the last save attempt
    pub errors: FieldErrors,
    /// Waiting for the backend
    pub saving: bool,
}

impl SellerEdit {
    fn of(seller: &Seller) -> Self {
        Self {
            seller_id: seller.id.clone(),
            first_name: seller.first_name.clone(),
            last_name: seller.last_name.clone(),
            phone: seller.phone.clone(),
            errors: FieldErrors::new(),
            saving: false,
        }
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(Field::FirstName, require(&self.first_name, FIRST_NAME_REQUIRED));
        errors.check(Field::LastName, require(&self.last_name, LAST_NAME_REQUIRED));
        errors.check(Field::Phone, require(&self.phone, PHONE_REQUIRED));
        errors
    }

    fn update(&self) -> SellerUpdate {
        SellerUpdate {
            seller_id: self.seller_id.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

/// Sellers screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellersState {
    /// Every seller
    pub sellers: Vec<Seller>,
    /// Every event, for the event column and the assignment modal
    pub events: Vec<Event>,
    /// Search and status dropdown; the event dropdown is not offered
    pub filter: ListFilter,
    /// Ticked sellers
    pub selection: Selection<SellerId>,
    /// Assign-to-event modal open
    pub assignment_open: bool,
    /// Contact-data modal
    pub edit: Option<SellerEdit>,
    /// Notification area
    pub snackbar: SnackbarState,
}

impl SellersState {
    /// Screen over the given data
    #[must_use]
    pub fn new(sellers: Vec<Seller>, events: Vec<Event>) -> Self {
        Self {
            sellers,
            events,
            filter: ListFilter::default(),
            selection: Selection::new(),
            assignment_open: false,
            edit: None,
            snackbar: SnackbarState::default(),
        }
    }

    /// Ids the header checkbox would tick
    #[must_use]
    pub fn eligible(&self) -> Vec<SellerId> {
        let events = EventIndex::new(&self.events);
        let none = SellerIndex::new(&[]);
        let visible = visible_rows(&self.sellers, &events, &none, &self.filter, ListPolicy::SELLERS);
        selectable_ids(&visible, &events, &EventFilter::All, EligibilityRule::Unrestricted)
    }

    /// Everything the screen renders
    #[must_use]
    pub fn view(&self) -> SellersView {
        let events = EventIndex::new(&self.events);
        let none = SellerIndex::new(&[]);
        let visible = visible_rows(&self.sellers, &events, &none, &self.filter, ListPolicy::SELLERS);
        let eligible = selectable_ids(&visible, &events, &EventFilter::All, EligibilityRule::Unrestricted);

        let rows = visible
            .iter()
            .map(|seller| SellerRow {
                id: seller.id.clone(),
                name: seller.full_name(),
                phone: seller.phone.clone(),
                email: seller.email.clone(),
                status: seller.status,
                events: seller
                    .assigned_events
                    .iter()
                    .filter_map(|id| events.get(id))
                    .map(|event| event.name.clone())
                    .collect(),
                total_sold: seller.total_sold,
                last_activity: seller.last_activity,
                selectable: is_selectable(*seller, &events, &EventFilter::All, EligibilityRule::Unrestricted),
                selected: self.selection.contains(&seller.id),
            })
            .collect();

        SellersView {
            rows,
            summary: ListSummary::of(self.sellers.len(), &visible, eligible.len()),
            bulk_action: seller_bulk_action(&self.selection),
            all_selected: self.selection.covers(&eligible),
            selected: self.selection.len(),
            assignment_targets: if self.assignment_open {
                events
                    .active_events()
                    .map(|event| (event.id.clone(), event.name.clone()))
                    .collect()
            } else {
                Vec::new()
            },
        }
    }
}

/// One rendered seller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerRow {
    /// Seller id
    pub id: SellerId,
    /// "First Last"
    pub name: String,
    /// Phone as entered
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Enabled or disabled
    pub status: EntityStatus,
    /// Names of the assigned events that resolve
    pub events: Vec<String>,
    /// Numbers sold
    pub total_sold: u32,
    /// Day of last activity
    pub last_activity: NaiveDate,
    /// The checkbox is enabled
    pub selectable: bool,
    /// The checkbox is ticked
    pub selected: bool,
}

/// Sellers view-model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellersView {
    /// Visible rows in collection order
    pub rows: Vec<SellerRow>,
    /// Counts above the table
    pub summary: ListSummary,
    /// Bulk action bar
    pub bulk_action: Option<BulkAction>,
    /// Header checkbox ticked
    pub all_selected: bool,
    /// Ticked rows
    pub selected: usize,
    /// Events listed by the open assignment modal
    pub assignment_targets: Vec<(EventId, String)>,
}

/// Sellers screen inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SellersAction {
    /// Search box
    SearchChanged(String),
    /// Status dropdown
    StatusFilterChanged(StatusFilter),
    /// Row checkbox
    ToggleRow(SellerId),
    /// Header checkbox
    ToggleSelectAll,
    /// Cancel the bulk action bar
    ClearSelection,
    /// Enable or disable a seller
    ToggleStatus(SellerId),
    /// Open the assign-to-event modal
    OpenAssignment,
    /// Close the modal without assigning
    CloseAssignment,
    /// Assign the selection to an existing event
    AssignToExistingEvent(EventId),
    /// Assign the selection to an event yet to be created
    AssignToNewEvent,
    /// Open the contact-data modal
    BeginEdit(SellerId),
    /// Type in the contact-data modal
    EditField {
        /// `FirstName`, `LastName` or `Phone`
        field: Field,
        /// New text
        value: String,
    },
    /// Validate and save the edit
    SaveEdit,
    /// Save outcome
    EditSaved(Result<SellerUpdate, BackendError>),
    /// Close the contact-data modal
    CancelEdit,
    /// Open the add-seller wizard
    AddSeller,
    /// Notification area
    Snackbar(SnackbarAction),
}

/// Sellers screen collaborators
#[derive(Clone)]
pub struct SellersEnvironment {
    /// Router
    pub navigator: Arc<dyn Navigator>,
    /// Save target for edits
    pub backend: Arc<dyn Backend>,
    /// Notice durations
    pub timings: SnackbarTimings,
}

impl SellersEnvironment {
    /// Bundle collaborators
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>, backend: Arc<dyn Backend>, timings: SnackbarTimings) -> Self {
        Self {
            navigator,
            backend,
            timings,
        }
    }
}

/// Sellers screen reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct SellersReducer {
    snackbar: SnackbarReducer,
}

impl SellersReducer {
    /// Reducer whose snackbar animates for `timings.close_animation`
    #[must_use]
    pub const fn new(timings: &SnackbarTimings) -> Self {
        Self {
            snackbar: SnackbarReducer::from_timings(timings),
        }
    }

    fn notify(
        &self,
        state: &mut SellersState,
        notice: Notice,
        env: &SellersEnvironment,
    ) -> SmallVec<[Effect<SellersAction>; 4]> {
        reduce_scoped(
            &self.snackbar,
            &mut state.snackbar,
            env.timings.show(notice),
            &(),
            SellersAction::Snackbar,
        )
    }
}

impl Reducer for SellersReducer {
    type State = SellersState;
    type Action = SellersAction;
    type Environment = SellersEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut SellersState,
        action: SellersAction,
        env: &SellersEnvironment,
    ) -> SmallVec<[Effect<SellersAction>; 4]> {
        match action {
            SellersAction::SearchChanged(search) => {
                state.filter.search = search;
                SmallVec::new()
            },
            SellersAction::StatusFilterChanged(status) => {
                state.filter.status = status;
                SmallVec::new()
            },
            SellersAction::ToggleRow(id) => {
                if state.selection.contains(&id) || state.eligible().contains(&id) {
                    state.selection.toggle(id);
                } else {
                    tracing::debug!(%id, "Ignoring tick on a seller that cannot be selected");
                }
                SmallVec::new()
            },
            SellersAction::ToggleSelectAll => {
                let eligible = state.eligible();
                state.selection.select_all(&eligible);
                SmallVec::new()
            },
            SellersAction::ClearSelection => {
                state.selection.clear();
                SmallVec::new()
            },
            SellersAction::ToggleStatus(id) => {
                let Some(seller) = state.sellers.iter_mut().find(|seller| seller.id == id) else {
                    tracing::warn!(%id, "Status toggle for unknown seller");
                    return SmallVec::new();
                };
                seller.status = seller.status.toggled();
                if !seller.status.is_active() && state.selection.remove(&id) {
                    tracing::debug!(%id, "Disabled seller evicted from selection");
                }
                SmallVec::new()
            },
            SellersAction::OpenAssignment => {
                state.assignment_open = !state.selection.is_empty();
                SmallVec::new()
            },
            SellersAction::CloseAssignment => {
                state.assignment_open = false;
                SmallVec::new()
            },
            SellersAction::AssignToExistingEvent(event_id) => {
                if !state.assignment_open {
                    return SmallVec::new();
                }
                if !state.events.iter().any(|event| event.id == event_id && event.is_active()) {
                    tracing::warn!(event = %event_id, "Assignment to an unknown or inactive event");
                    return SmallVec::new();
                }
                for seller in &mut state.sellers {
                    if state.selection.contains(&seller.id) && !seller.assigned_events.contains(&event_id) {
                        seller.assigned_events.push(event_id.clone());
                        seller.events_assigned = u32::try_from(seller.assigned_events.len()).unwrap_or(u32::MAX);
                    }
                }
                tracing::info!(event = %event_id, sellers = state.selection.len(), "Sellers assigned");
                state.selection.clear();
                state.assignment_open = false;
                SmallVec::new()
            },
            SellersAction::AssignToNewEvent => {
                if !state.assignment_open {
                    return SmallVec::new();
                }
                tracing::info!(sellers = state.selection.len(), "Assigning sellers to a new event");
                state.selection.clear();
                state.assignment_open = false;
                smallvec![navigate(&env.navigator, routes::CREATE_EVENT)]
            },
            SellersAction::BeginEdit(id) => {
                if state.edit.as_ref().is_some_and(|edit| edit.saving) {
                    return SmallVec::new();
                }
                match state.sellers.iter().find(|seller| seller.id == id) {
                    Some(seller) => state.edit = Some(SellerEdit::of(seller)),
                    None => tracing::warn!(%id, "Edit for unknown seller"),
                }
                SmallVec::new()
            },
            SellersAction::EditField { field, value } => {
                let Some(edit) = state.edit.as_mut().filter(|edit| !edit.saving) else {
                    return SmallVec::new();
                };
                match field {
                    Field::FirstName => edit.first_name = value,
                    Field::LastName => edit.last_name = value,
                    Field::Phone => edit.phone = value,
                    other => {
                        tracing::warn!(field = ?other, "Field not in the seller edit form");
                        return SmallVec::new();
                    },
                }
                edit.errors.clear(field);
                SmallVec::new()
            },
            SellersAction::SaveEdit => {
                let Some(edit) = state.edit.as_mut().filter(|edit| !edit.saving) else {
                    return SmallVec::new();
                };
                edit.errors = edit.validate();
                if !edit.errors.is_empty() {
                    return SmallVec::new();
                }
                edit.saving = true;
                let update = edit.update();
                let saving = env.backend.update_seller(update.clone());
                smallvec![async_effect! {
                    Some(SellersAction::EditSaved(saving.await.map(|()| update)))
                }]
            },
            SellersAction::EditSaved(result) => {
                state.edit = None;
                match result {
                    Ok(update) => {
                        if let Some(seller) = state.sellers.iter_mut().find(|s| s.id == update.seller_id) {
                            seller.first_name = update.first_name;
                            seller.last_name = update.last_name;
                            seller.phone = update.phone;
                        }
                        self.notify(state, Notice::success(EDIT_SAVED), env)
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Seller edit failed");
                        self.notify(state, Notice::error(EDIT_FAILED), env)
                    },
                }
            },
            SellersAction::CancelEdit => {
                if state.edit.as_ref().is_some_and(|edit| edit.saving) {
                    return SmallVec::new();
                }
                state.edit = None;
                SmallVec::new()
            },
            SellersAction::AddSeller => smallvec![navigate(&env.navigator, routes::ADD_SELLER)],
            SellersAction::Snackbar(action) => {
                reduce_scoped(&self.snackbar, &mut state.snackbar, action, &(), SellersAction::Snackbar)
            },
        }
    }
}
