//! The generic wizard state machine.
//!
//! `step` runs from 1 to [`WizardFlow::total_steps`]. The working `form` is
//! what the current step edits; `draft` accumulates every validated step.
//! Moving between steps always re-populates `form` from `draft`, so values
//! entered on an earlier step survive a round trip.

use crate::backend::{Backend, BackendError};
use crate::validation::{Field, FieldErrors, ValidationRules};
use futures::future::BoxFuture;
use recauda_core::environment::Navigator;
use recauda_core::{Effect, Reducer, SmallVec, async_effect, smallvec};
use std::fmt::Debug;
use std::sync::Arc;

/// What distinguishes one wizard from another
pub trait WizardFlow: Clone + Send + Sync + 'static {
    /// Everything the wizard collects
    type Form: Clone + Debug + PartialEq + Send + Sync + 'static;
    /// User edits of the working form
    type Edit: Clone + Debug + Send + 'static;
    /// What gets submitted
    type Payload: Debug + Send + 'static;

    /// Step titles, one per step
    fn step_titles(&self) -> &'static [&'static str];

    /// Number of steps
    fn total_steps(&self) -> usize {
        self.step_titles().len()
    }

    /// Empty form
    fn initial_form(&self) -> Self::Form;

    /// Apply an edit; returns the fields whose errors the edit invalidates
    fn apply_edit(&self, form: &mut Self::Form, edit: Self::Edit) -> Vec<Field>;

    /// The quantity input lost focus
    fn blur_quantity(&self, _form: &mut Self::Form) {}

    /// Errors of one step of `form`
    fn validate(&self, step: usize, form: &Self::Form, rules: &ValidationRules) -> FieldErrors;

    /// Copy the fields owned by `step` from `form` into `draft`
    fn commit(&self, step: usize, form: &Self::Form, draft: &mut Self::Form);

    /// Typed payload of a completed draft
    fn payload(&self, draft: &Self::Form) -> Option<Self::Payload>;

    /// Submit the payload; resolves to the created entity's id
    fn submit(
        &self,
        backend: &dyn Backend,
        payload: Self::Payload,
    ) -> BoxFuture<'static, Result<String, BackendError>>;

    /// Where "finish" leads after a successful submit
    fn finish_route(&self) -> &'static str;
}

/// Lifecycle of a wizard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WizardPhase {
    /// Filling in steps
    #[default]
    Editing,
    /// Waiting for the backend; inputs are locked
    Submitting,
    /// Success screen
    Completed {
        /// Id returned by the backend
        created_id: String,
    },
}

/// Wizard state
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState<Form> {
    /// Current step, starting at 1
    pub step: usize,
    /// Accumulated validated data
    pub draft: Form,
    /// Working copy edited by the current step
    pub form: Form,
    /// Errors of the last failed validation
    pub errors: FieldErrors,
    /// Lifecycle
    pub phase: WizardPhase,
    /// Message of the last failed submit
    pub last_error: Option<String>,
}

impl<Form: Clone> WizardState<Form> {
    /// Fresh wizard at step 1
    #[must_use]
    pub fn new(initial: Form) -> Self {
        Self {
            step: 1,
            draft: initial.clone(),
            form: initial,
            errors: FieldErrors::new(),
            phase: WizardPhase::Editing,
            last_error: None,
        }
    }

    /// True while waiting for the backend
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == WizardPhase::Submitting
    }

    /// Id of the created entity once completed
    #[must_use]
    pub fn created_id(&self) -> Option<&str> {
        match &self.phase {
            WizardPhase::Completed { created_id } => Some(created_id),
            WizardPhase::Editing | WizardPhase::Submitting => None,
        }
    }
}

/// Wizard inputs
#[derive(Debug, Clone)]
pub enum WizardAction<Edit> {
    /// Edit the working form
    Edit(Edit),
    /// The quantity input lost focus
    BlurQuantity,
    /// Validate the current step and advance
    Continue,
    /// Previous step, or leave the wizard from step 1
    Back,
    /// Validate the last step and submit
    Confirm,
    /// Submit outcome
    Submitted(Result<String, BackendError>),
    /// "Add another": start over with an empty draft
    Restart,
    /// Leave the success screen
    Finish,
    /// Discard everything and leave
    Close,
}

/// Wizard collaborators
#[derive(Clone)]
pub struct WizardEnvironment {
    /// Router
    pub navigator: Arc<dyn Navigator>,
    /// Submission target
    pub backend: Arc<dyn Backend>,
    /// Form thresholds
    pub rules: ValidationRules,
}

impl WizardEnvironment {
    /// Bundle collaborators
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>, backend: Arc<dyn Backend>, rules: ValidationRules) -> Self {
        Self {
            navigator,
            backend,
            rules,
        }
    }
}

/// Reducer running a [`WizardFlow`]
#[derive(Debug, Clone)]
pub struct WizardReducer<F> {
    flow: F,
}

impl<F: WizardFlow> WizardReducer<F> {
    /// Reducer for `flow`
    #[must_use]
    pub const fn new(flow: F) -> Self {
        Self { flow }
    }

    /// The flow
    #[must_use]
    pub const fn flow(&self) -> &F {
        &self.flow
    }

    /// Fresh state for the flow
    #[must_use]
    pub fn initial_state(&self) -> WizardState<F::Form> {
        WizardState::new(self.flow.initial_form())
    }

    /// Title of the state's current step
    #[must_use]
    pub fn step_title(&self, state: &WizardState<F::Form>) -> &'static str {
        self.flow
            .step_titles()
            .get(state.step.saturating_sub(1))
            .copied()
            .unwrap_or_default()
    }

    fn navigate_back(env: &WizardEnvironment) -> Effect<WizardAction<F::Edit>> {
        let navigator = Arc::clone(&env.navigator);
        Effect::fire_and_forget(move || navigator.back())
    }

    fn navigate_to(env: &WizardEnvironment, path: &'static str) -> Effect<WizardAction<F::Edit>> {
        let navigator = Arc::clone(&env.navigator);
        Effect::fire_and_forget(move || navigator.push(path))
    }
}

impl<F: WizardFlow> Reducer for WizardReducer<F> {
    type State = WizardState<F::Form>;
    type Action = WizardAction<F::Edit>;
    type Environment = WizardEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &WizardEnvironment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let total = self.flow.total_steps();

        if state.is_submitting() && !matches!(action, WizardAction::Submitted(_)) {
            tracing::debug!(?action, "Ignoring input while submitting");
            return SmallVec::new();
        }

        match action {
            WizardAction::Edit(edit) => {
                if state.phase != WizardPhase::Editing {
                    return SmallVec::new();
                }
                for field in self.flow.apply_edit(&mut state.form, edit) {
                    state.errors.clear(field);
                }
                SmallVec::new()
            },

            WizardAction::BlurQuantity => {
                self.flow.blur_quantity(&mut state.form);
                SmallVec::new()
            },

            WizardAction::Continue => {
                if state.phase != WizardPhase::Editing || state.step >= total {
                    tracing::debug!(step = state.step, "Continue ignored");
                    return SmallVec::new();
                }
                let errors = self.flow.validate(state.step, &state.form, &env.rules);
                if !errors.is_empty() {
                    tracing::debug!(step = state.step, rejected = errors.len(), "Step rejected");
                    state.errors = errors;
                    return SmallVec::new();
                }
                self.flow.commit(state.step, &state.form, &mut state.draft);
                state.step += 1;
                state.form = state.draft.clone();
                state.errors = FieldErrors::new();
                tracing::debug!(step = state.step, "Advanced");
                SmallVec::new()
            },

            WizardAction::Back => {
                if state.step <= 1 {
                    return smallvec![Self::navigate_back(env)];
                }
                state.step -= 1;
                state.form = state.draft.clone();
                state.errors = FieldErrors::new();
                state.last_error = None;
                SmallVec::new()
            },

            WizardAction::Confirm => {
                if state.phase != WizardPhase::Editing || state.step != total {
                    tracing::debug!(step = state.step, "Confirm ignored");
                    return SmallVec::new();
                }
                let errors = self.flow.validate(state.step, &state.form, &env.rules);
                if !errors.is_empty() {
                    state.errors = errors;
                    return SmallVec::new();
                }
                self.flow.commit(state.step, &state.form, &mut state.draft);

                let Some(payload) = self.flow.payload(&state.draft) else {
                    tracing::warn!("Draft incomplete at confirmation");
                    state.last_error = Some("Faltan datos para completar la operación".to_string());
                    return SmallVec::new();
                };

                state.phase = WizardPhase::Submitting;
                state.last_error = None;
                tracing::info!(?payload, "Submitting");

                let submission = self.flow.submit(env.backend.as_ref(), payload);
                smallvec![async_effect! {
                    Some(WizardAction::Submitted(submission.await))
                }]
            },

            WizardAction::Submitted(result) => {
                if !state.is_submitting() {
                    tracing::warn!("Submit result without a pending submit");
                    return SmallVec::new();
                }
                match result {
                    Ok(created_id) => {
                        tracing::info!(%created_id, "Submit succeeded");
                        state.phase = WizardPhase::Completed { created_id };
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Submit failed");
                        state.phase = WizardPhase::Editing;
                        state.last_error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },

            WizardAction::Restart => {
                *state = WizardState::new(self.flow.initial_form());
                SmallVec::new()
            },

            WizardAction::Finish => {
                if state.created_id().is_none() {
                    return SmallVec::new();
                }
                let route = self.flow.finish_route();
                smallvec![Self::navigate_to(env, route)]
            },

            WizardAction::Close => {
                *state = WizardState::new(self.flow.initial_form());
                smallvec![Self::navigate_back(env)]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;
    use crate::validation::{REQUIRED, ValidationError, require};
    use recauda_testing::{NavigationRecord, RecordingNavigator, ReducerTest, assertions};
    use std::time::Duration;

    /// Two-step flow: a name, then a confirmation
    #[derive(Debug, Clone)]
    struct NameFlow;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct NameForm {
        name: String,
        note: String,
    }

    #[derive(Debug, Clone)]
    enum NameEdit {
        Name(String),
        Note(String),
    }

    impl WizardFlow for NameFlow {
        type Form = NameForm;
        type Edit = NameEdit;
        type Payload = String;

        fn step_titles(&self) -> &'static [&'static str] {
            &["Nombre", "Confirmar"]
        }

        fn initial_form(&self) -> NameForm {
            NameForm::default()
        }

        fn apply_edit(&self, form: &mut NameForm, edit: NameEdit) -> Vec<Field> {
            match edit {
                NameEdit::Name(name) => {
                    form.name = name;
                    vec![Field::FirstName]
                },
                NameEdit::Note(note) => {
                    form.note = note;
                    Vec::new()
                },
            }
        }

        fn validate(&self, step: usize, form: &NameForm, _rules: &ValidationRules) -> FieldErrors {
            let mut errors = FieldErrors::new();
            if step == 1 {
                errors.check(Field::FirstName, require(&form.name, REQUIRED));
            }
            errors
        }

        fn commit(&self, step: usize, form: &NameForm, draft: &mut NameForm) {
            match step {
                1 => draft.name.clone_from(&form.name),
                _ => draft.note.clone_from(&form.note),
            }
        }

        fn payload(&self, draft: &NameForm) -> Option<String> {
            Some(draft.name.clone())
        }

        fn submit(
            &self,
            _backend: &dyn Backend,
            payload: String,
        ) -> BoxFuture<'static, Result<String, BackendError>> {
            Box::pin(async move { Ok(format!("id-{payload}")) })
        }

        fn finish_route(&self) -> &'static str {
            "/done"
        }
    }

    fn env_with(navigator: Arc<RecordingNavigator>) -> WizardEnvironment {
        WizardEnvironment::new(
            navigator,
            Arc::new(SimulatedBackend::new(Duration::from_millis(1))),
            ValidationRules::default(),
        )
    }

    fn env() -> WizardEnvironment {
        env_with(Arc::new(RecordingNavigator::new()))
    }

    fn reducer() -> WizardReducer<NameFlow> {
        WizardReducer::new(NameFlow)
    }

    #[test]
    fn continue_with_errors_stays_on_step() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(reducer().initial_state())
            .when_action(WizardAction::Continue)
            .then_state(|state| {
                assert_eq!(state.step, 1);
                assert_eq!(
                    state.errors.get(Field::FirstName),
                    Some(&ValidationError::Required(REQUIRED))
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(reducer().initial_state())
            .given_actions([WizardAction::Continue])
            .when_action(WizardAction::Edit(NameEdit::Name("Ana".into())))
            .then_state(|state| assert!(state.errors.is_empty()))
            .run();
    }

    #[test]
    fn continue_commits_and_back_restores() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(reducer().initial_state())
            .given_actions([
                WizardAction::Edit(NameEdit::Name("Ana".into())),
                WizardAction::Continue,
                WizardAction::Edit(NameEdit::Name("changed on step 2".into())),
            ])
            .when_action(WizardAction::Back)
            .then_state(|state| {
                assert_eq!(state.step, 1);
                assert_eq!(state.form.name, "Ana");
                assert_eq!(state.draft.name, "Ana");
            })
            .run();
    }

    #[test]
    fn back_from_first_step_exits() {
        let navigator = Arc::new(RecordingNavigator::new());
        let mut state = reducer().initial_state();
        let effects = reducer().reduce(&mut state, WizardAction::Back, &env_with(navigator.clone()));

        assert_eq!(state.step, 1);
        assertions::assert_has_future_effect(&effects);
    }

    #[test]
    fn confirm_only_on_last_step() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(reducer().initial_state())
            .when_action(WizardAction::Confirm)
            .then_state(|state| assert_eq!(state.phase, WizardPhase::Editing))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn duplicate_confirm_is_ignored_while_submitting() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(reducer().initial_state())
            .given_actions([
                WizardAction::Edit(NameEdit::Name("Ana".into())),
                WizardAction::Continue,
                WizardAction::Confirm,
            ])
            .when_action(WizardAction::Confirm)
            .then_state(|state| assert!(state.is_submitting()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failed_submit_returns_to_editing() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(reducer().initial_state())
            .given_actions([
                WizardAction::Edit(NameEdit::Name("Ana".into())),
                WizardAction::Continue,
                WizardAction::Confirm,
            ])
            .when_action(WizardAction::Submitted(Err(BackendError::Unavailable("caído".into()))))
            .then_state(|state| {
                assert_eq!(state.phase, WizardPhase::Editing);
                assert_eq!(state.step, 2);
                assert_eq!(state.last_error.as_deref(), Some("Unavailable: caído"));
            })
            .run();
    }

    #[tokio::test]
    async fn confirm_future_reports_backend_result() {
        let mut state = reducer().initial_state();
        let env = env();
        for action in [
            WizardAction::Edit(NameEdit::Name("Ana".into())),
            WizardAction::Continue,
            WizardAction::Edit(NameEdit::Note("ok".into())),
        ] {
            let _ = reducer().reduce(&mut state, action, &env);
        }

        let mut effects = reducer().reduce(&mut state, WizardAction::Confirm, &env);
        assert_eq!(state.draft.note, "ok");

        let Some(Effect::Future(submission)) = effects.pop() else {
            panic!("expected a submit future");
        };
        let Some(WizardAction::Submitted(result)) = submission.await else {
            panic!("expected a Submitted action");
        };
        assert_eq!(result, Ok("id-Ana".to_string()));
    }

    #[tokio::test]
    async fn finish_navigates_after_success() {
        let navigator = Arc::new(RecordingNavigator::new());
        let env = env_with(navigator.clone());
        let mut state = reducer().initial_state();
        state.phase = WizardPhase::Completed {
            created_id: "id-Ana".to_string(),
        };

        let mut effects = reducer().reduce(&mut state, WizardAction::Finish, &env);
        let Some(Effect::Future(navigation)) = effects.pop() else {
            panic!("expected a navigation effect");
        };
        assert!(navigation.await.is_none());
        assert_eq!(navigator.last(), Some(NavigationRecord::Push("/done".to_string())));
    }

    #[test]
    fn restart_resets_everything() {
        let mut state = reducer().initial_state();
        state.step = 2;
        state.draft.name = "Ana".to_string();
        state.phase = WizardPhase::Completed {
            created_id: "x".to_string(),
        };

        let _ = reducer().reduce(&mut state, WizardAction::Restart, &env());
        assert_eq!(state, reducer().initial_state());
        assert_eq!(reducer().step_title(&state), "Nombre");
    }
}
