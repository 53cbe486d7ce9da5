//! Screen reducers.
//!
//! Each screen owns its slice of data plus the transient UI state around it
//! (filters, selection, modals, snackbar) and exposes a view-model computed
//! on read. A UI binding only renders the view-model and sends actions.

use recauda_core::Effect;
use recauda_core::environment::Navigator;
use std::sync::Arc;

pub mod buyers;
pub mod create_account;
pub mod event_detail;
pub mod events;
pub mod login;
pub mod sellers;

pub use buyers::{BuyersAction, BuyersEnvironment, BuyersReducer, BuyersState, BuyersView};
pub use create_account::{CreateAccountAction, CreateAccountReducer, CreateAccountState};
pub use event_detail::{EventDetailAction, EventDetailReducer, EventDetailState, EventDetailView};
pub use events::{EventsAction, EventsReducer, EventsState, EventsView};
pub use login::{LoginAction, LoginReducer, LoginState};
pub use sellers::{SellersAction, SellersEnvironment, SellersReducer, SellersState, SellersView};

/// Effect pushing `path` on the navigator
pub(crate) fn navigate<A>(navigator: &Arc<dyn Navigator>, path: impl Into<String>) -> Effect<A>
where
    A: Send + 'static,
{
    let navigator = Arc::clone(navigator);
    let path = path.into();
    Effect::fire_and_forget(move || navigator.push(&path))
}
