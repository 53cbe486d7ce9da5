//! Events home: one card per event, with search and a status dropdown.

use super::navigate;
use crate::routes;
use crate::types::{Event, EventId, EventStatus, EventType};
use crate::views::{EventCounts, EventListFilter, EventStatusFilter, visible_events};
use chrono::NaiveDate;
use recauda_core::environment::Navigator;
use recauda_core::{Effect, Reducer, SmallVec, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// What pressing a card does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CardAction {
    /// Open the event detail
    OpenDetail,
    /// A paused event needs sellers before it can sell
    AddSellers,
}

impl CardAction {
    const fn for_status(status: EventStatus) -> Self {
        match status {
            EventStatus::Inactive => Self::AddSellers,
            EventStatus::Active | EventStatus::Completed | EventStatus::Cancelled => Self::OpenDetail,
        }
    }
}

/// One rendered event card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCard {
    /// Event id
    pub id: EventId,
    /// Display name
    pub name: String,
    /// Raffle or food sale
    pub event_type: EventType,
    /// Lifecycle status
    pub status: EventStatus,
    /// Status badge text
    pub status_label: &'static str,
    /// Last selling day
    pub end_date: NaiveDate,
    /// Numbers sold
    pub sold: u32,
    /// Numbers on offer
    pub total: u32,
    /// Progress bar, clamped to 100
    pub progress: u32,
    /// Sold more than offered
    pub oversold: bool,
    /// Card button
    pub action: CardAction,
}

impl EventCard {
    pub(crate) fn of(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            event_type: event.event_type,
            status: event.status,
            status_label: event.status.label(),
            end_date: event.end_date,
            sold: event.sold_numbers,
            total: event.total_numbers,
            progress: event.progress_percent(),
            oversold: event.is_oversold(),
            action: CardAction::for_status(event.status),
        }
    }
}

/// Events home view-model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventsView {
    /// Cards passing the filters, in collection order
    pub cards: Vec<EventCard>,
    /// Counts over every event, independent of the filters
    pub counts: EventCounts,
    /// Show the empty state instead of cards
    pub empty: bool,
}

/// Events home state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventsState {
    /// Every event
    pub events: Vec<Event>,
    /// Search and status dropdown
    pub filter: EventListFilter,
}

impl EventsState {
    /// Home over the given events
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            filter: EventListFilter::default(),
        }
    }

    /// Everything the screen renders
    #[must_use]
    pub fn view(&self) -> EventsView {
        let cards: Vec<EventCard> = visible_events(&self.events, &self.filter)
            .into_iter()
            .map(EventCard::of)
            .collect();
        EventsView {
            empty: cards.is_empty(),
            cards,
            counts: EventCounts::of(&self.events),
        }
    }
}

/// Events home inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventsAction {
    /// Search box
    SearchChanged(String),
    /// Status dropdown
    StatusFilterChanged(EventStatusFilter),
    /// "Crear evento" button
    CreateEvent,
    /// Card button
    CardPressed(EventId),
}

/// Events home reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct EventsReducer;

impl Reducer for EventsReducer {
    type State = EventsState;
    type Action = EventsAction;
    type Environment = Arc<dyn Navigator>;

    fn reduce(
        &self,
        state: &mut EventsState,
        action: EventsAction,
        navigator: &Arc<dyn Navigator>,
    ) -> SmallVec<[Effect<EventsAction>; 4]> {
        match action {
            EventsAction::SearchChanged(search) => {
                state.filter.search = search;
                SmallVec::new()
            },
            EventsAction::StatusFilterChanged(status) => {
                state.filter.status = status;
                SmallVec::new()
            },
            EventsAction::CreateEvent => smallvec![navigate(navigator, routes::CREATE_EVENT)],
            EventsAction::CardPressed(id) => {
                let Some(event) = state.events.iter().find(|event| event.id == id) else {
                    tracing::warn!(%id, "Card pressed for unknown event");
                    return SmallVec::new();
                };
                match CardAction::for_status(event.status) {
                    CardAction::OpenDetail => smallvec![navigate(navigator, routes::event_detail(id.as_str()))],
                    CardAction::AddSellers => smallvec![navigate(navigator, routes::ADD_SELLER)],
                }
            },
        }
    }
}
