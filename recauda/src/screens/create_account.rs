//! Account form reached from the login screen.
//!
//! Organisation, name and phone are all required. Nothing is sent anywhere:
//! a valid submit only raises the confirmation.

use super::navigate;
use crate::routes;
use crate::validation::{Field, FieldErrors, REQUIRED, require};
use recauda_core::environment::Navigator;
use recauda_core::{Effect, Reducer, SmallVec, smallvec};
use std::sync::Arc;

/// Shown after a valid submit
pub const ACCOUNT_SUBMITTED: &str = "Formulario enviado correctamente";

/// Account form state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateAccountState {
    /// Organisation name
    pub organization: String,
    /// Holder's name
    pub name: String,
    /// Phone, without the leading 0 and 15
    pub phone: String,
    /// Errors of the last submit
    pub errors: FieldErrors,
    /// Confirmation of the last valid submit
    pub confirmation: Option<&'static str>,
}

/// Account form inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateAccountAction {
    /// Organisation typed
    OrganizationChanged(String),
    /// Name typed
    NameChanged(String),
    /// Phone typed
    PhoneChanged(String),
    /// "Ingresar" pressed
    Submit,
    /// Back to the login form
    BackToLogin,
}

/// Account form reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateAccountReducer;

impl CreateAccountReducer {
    fn touched(state: &mut CreateAccountState, field: Field) {
        state.errors.clear(field);
        state.confirmation = None;
    }
}

impl Reducer for CreateAccountReducer {
    type State = CreateAccountState;
    type Action = CreateAccountAction;
    type Environment = Arc<dyn Navigator>;

    fn reduce(
        &self,
        state: &mut CreateAccountState,
        action: CreateAccountAction,
        navigator: &Arc<dyn Navigator>,
    ) -> SmallVec<[Effect<CreateAccountAction>; 4]> {
        match action {
            CreateAccountAction::OrganizationChanged(value) => {
                state.organization = value;
                Self::touched(state, Field::Organization);
                SmallVec::new()
            },
            CreateAccountAction::NameChanged(value) => {
                state.name = value;
                Self::touched(state, Field::FullName);
                SmallVec::new()
            },
            CreateAccountAction::PhoneChanged(value) => {
                state.phone = value;
                Self::touched(state, Field::Phone);
                SmallVec::new()
            },
            CreateAccountAction::Submit => {
                let mut errors = FieldErrors::new();
                errors.check(Field::Organization, require(&state.organization, REQUIRED));
                errors.check(Field::FullName, require(&state.name, REQUIRED));
                errors.check(Field::Phone, require(&state.phone, REQUIRED));
                if errors.is_empty() {
                    tracing::info!(organization = %state.organization.trim(), "Account form submitted");
                    state.confirmation = Some(ACCOUNT_SUBMITTED);
                } else {
                    state.confirmation = None;
                }
                state.errors = errors;
                SmallVec::new()
            },
            CreateAccountAction::BackToLogin => smallvec![navigate(navigator, routes::LOGIN)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recauda_testing::{RecordingNavigator, ReducerTest, assertions};

    fn navigator() -> Arc<dyn Navigator> {
        Arc::new(RecordingNavigator::new())
    }

    fn filled() -> Vec<CreateAccountAction> {
        vec![
            CreateAccountAction::OrganizationChanged("Club Deportivo San Martín".into()),
            CreateAccountAction::NameChanged("María González".into()),
            CreateAccountAction::PhoneChanged("3584129488".into()),
        ]
    }

    #[test]
    fn every_blank_field_is_flagged() {
        ReducerTest::new(CreateAccountReducer)
            .with_env(navigator())
            .given_state(CreateAccountState::default())
            .given_actions([CreateAccountAction::NameChanged("  ".into())])
            .when_action(CreateAccountAction::Submit)
            .then_state(|state| {
                for field in [Field::Organization, Field::FullName, Field::Phone] {
                    assert_eq!(state.errors.message(field).as_deref(), Some(REQUIRED));
                }
                assert!(state.confirmation.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn only_missing_fields_are_flagged() {
        ReducerTest::new(CreateAccountReducer)
            .with_env(navigator())
            .given_state(CreateAccountState::default())
            .given_actions([CreateAccountAction::PhoneChanged("3584129488".into())])
            .when_action(CreateAccountAction::Submit)
            .then_state(|state| {
                assert!(state.errors.get(Field::Organization).is_some());
                assert!(state.errors.get(Field::FullName).is_some());
                assert!(state.errors.get(Field::Phone).is_none());
            })
            .run();
    }

    #[test]
    fn typing_clears_only_that_field() {
        ReducerTest::new(CreateAccountReducer)
            .with_env(navigator())
            .given_state(CreateAccountState::default())
            .given_actions([CreateAccountAction::Submit])
            .when_action(CreateAccountAction::OrganizationChanged("C".into()))
            .then_state(|state| {
                assert!(state.errors.get(Field::Organization).is_none());
                assert!(state.errors.get(Field::FullName).is_some());
                assert!(state.errors.get(Field::Phone).is_some());
            })
            .run();
    }

    #[test]
    fn complete_form_is_confirmed() {
        ReducerTest::new(CreateAccountReducer)
            .with_env(navigator())
            .given_state(CreateAccountState::default())
            .given_actions(filled())
            .when_action(CreateAccountAction::Submit)
            .then_state(|state| {
                assert!(state.errors.is_empty());
                assert_eq!(state.confirmation, Some(ACCOUNT_SUBMITTED));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn editing_after_confirmation_hides_it() {
        let mut actions = filled();
        actions.push(CreateAccountAction::Submit);

        ReducerTest::new(CreateAccountReducer)
            .with_env(navigator())
            .given_state(CreateAccountState::default())
            .given_actions(actions)
            .when_action(CreateAccountAction::PhoneChanged("358412948".into()))
            .then_state(|state| {
                assert!(state.confirmation.is_none());
                assert_eq!(state.phone, "358412948");
            })
            .run();
    }

    #[tokio::test]
    async fn back_goes_to_login() {
        let recorder = Arc::new(RecordingNavigator::new());
        let navigator: Arc<dyn Navigator> = recorder.clone();
        let mut state = CreateAccountState::default();

        let effects = CreateAccountReducer.reduce(&mut state, CreateAccountAction::BackToLogin, &navigator);
        for effect in effects {
            if let Effect::Future(navigation) = effect {
                let _ = navigation.await;
            }
        }

        assert_eq!(recorder.pushed(), [routes::LOGIN]);
    }
}
