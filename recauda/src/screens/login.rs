//! Login form. There is no authentication yet: a non-empty phone logs in.

use super::navigate;
use crate::routes;
use crate::validation::{Field, FieldErrors, REQUIRED, require};
use recauda_core::environment::Navigator;
use recauda_core::{Effect, Reducer, SmallVec, smallvec};
use std::sync::Arc;

/// Login state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginState {
    /// Phone as typed
    pub phone: String,
    /// Errors of the last submit
    pub errors: FieldErrors,
}

/// Login inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    /// Phone typed
    PhoneChanged(String),
    /// Form submitted
    Submit,
    /// "Crear cuenta" link
    CreateAccount,
}

/// Login reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginReducer;

impl Reducer for LoginReducer {
    type State = LoginState;
    type Action = LoginAction;
    type Environment = Arc<dyn Navigator>;

    fn reduce(
        &self,
        state: &mut LoginState,
        action: LoginAction,
        navigator: &Arc<dyn Navigator>,
    ) -> SmallVec<[Effect<LoginAction>; 4]> {
        match action {
            LoginAction::PhoneChanged(phone) => {
                state.phone = phone;
                state.errors.clear(Field::Phone);
                SmallVec::new()
            },
            LoginAction::Submit => {
                state.errors = FieldErrors::new();
                state.errors.check(Field::Phone, require(&state.phone, REQUIRED));
                if state.errors.is_empty() {
                    tracing::info!("Logged in");
                    smallvec![navigate(navigator, routes::HOME)]
                } else {
                    SmallVec::new()
                }
            },
            LoginAction::CreateAccount => smallvec![navigate(navigator, routes::CREATE_ACCOUNT)],
        }
    }
}
