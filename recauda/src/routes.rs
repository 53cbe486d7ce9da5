//! Navigation paths and a logging navigator.

use recauda_core::environment::Navigator;

/// Events home
pub const HOME: &str = "/";
/// Login form
pub const LOGIN: &str = "/login";
/// Account creation
pub const CREATE_ACCOUNT: &str = "/create-account";
/// Create-event wizard
pub const CREATE_EVENT: &str = "/create-event";
/// Add-seller wizard
pub const ADD_SELLER: &str = "/add-seller";
/// Sellers list
pub const SELLERS_LIST: &str = "/sellers-list";
/// Buyers list
pub const BUYERS_LIST: &str = "/buyers-list";
/// Event detail
pub const EVENT_DETAIL: &str = "/event-detail";

/// Event detail path for one event
#[must_use]
pub fn event_detail(event_id: &str) -> String {
    format!("{EVENT_DETAIL}?id={event_id}")
}

/// Navigator that logs requests instead of routing (demo binary)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn push(&self, path: &str) {
        tracing::info!(path, "Navigate");
    }

    fn back(&self) {
        tracing::info!("Navigate back");
    }
}
