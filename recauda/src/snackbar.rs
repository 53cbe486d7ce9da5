//! Transient notification with a two-phase disappearance.
//!
//! `Hidden → Visible → Closing → Hidden`. Both timers run under one
//! cancellable effect group, so showing a new notice restarts them and
//! disposing the owning store stops them.

use recauda_core::{Effect, EffectId, Reducer, SmallVec, cancellable, delay, smallvec};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Effect group of the snackbar timers
pub const SNACKBAR_TIMERS: EffectId = EffectId::from_static("snackbar");

/// Visual phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnackbarPhase {
    /// Nothing shown
    #[default]
    Hidden,
    /// Fully shown
    Visible,
    /// Playing the closing animation
    Closing,
}

/// Success or failure styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// What the snackbar says
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Styling
    pub kind: NoticeKind,
    /// Text
    pub message: String,
}

impl Notice {
    /// Success notice
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Error notice
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Display durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnackbarTimings {
    /// Total time a success notice stays up
    pub success: Duration,
    /// Total time an error notice stays up
    pub error: Duration,
    /// Length of the closing animation, included in the totals above
    pub close_animation: Duration,
}

impl Default for SnackbarTimings {
    fn default() -> Self {
        Self {
            success: Duration::from_millis(3000),
            error: Duration::from_millis(5000),
            close_animation: Duration::from_millis(300),
        }
    }
}

impl SnackbarTimings {
    /// Total duration for a notice kind
    #[must_use]
    pub const fn duration_for(&self, kind: NoticeKind) -> Duration {
        match kind {
            NoticeKind::Success => self.success,
            NoticeKind::Error => self.error,
        }
    }

    /// `Show` action for a notice with its kind's duration
    #[must_use]
    pub fn show(&self, notice: Notice) -> SnackbarAction {
        let duration = self.duration_for(notice.kind);
        SnackbarAction::Show { notice, duration }
    }
}

/// Snackbar state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnackbarState {
    /// Visual phase
    pub phase: SnackbarPhase,
    /// Notice on screen, if any
    pub notice: Option<Notice>,
    /// Bumped on every show/dismiss; timer actions from older generations are stale
    pub generation: u64,
}

impl SnackbarState {
    /// True while anything is on screen
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.phase != SnackbarPhase::Hidden
    }
}

/// Snackbar inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnackbarAction {
    /// Show `notice` for `duration`, replacing whatever is shown
    Show {
        /// Notice to show
        notice: Notice,
        /// Total time on screen, closing animation included
        duration: Duration,
    },
    /// Close early (user clicked the close button)
    Dismiss,
    /// Timer: start the closing animation
    BeginClosing {
        /// Generation the timer was scheduled for
        generation: u64,
    },
    /// Timer: hide
    Hide {
        /// Generation the timer was scheduled for
        generation: u64,
    },
    /// Owning view unmounts
    Dispose,
}

/// Reducer driving [`SnackbarState`]
#[derive(Debug, Clone, Copy)]
pub struct SnackbarReducer {
    close_animation: Duration,
}

impl SnackbarReducer {
    /// Reducer with the given closing animation length
    #[must_use]
    pub const fn new(close_animation: Duration) -> Self {
        Self { close_animation }
    }

    /// Reducer using the animation length of `timings`
    #[must_use]
    pub const fn from_timings(timings: &SnackbarTimings) -> Self {
        Self::new(timings.close_animation)
    }
}

impl Default for SnackbarReducer {
    fn default() -> Self {
        Self::from_timings(&SnackbarTimings::default())
    }
}

impl Reducer for SnackbarReducer {
    type State = SnackbarState;
    type Action = SnackbarAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut SnackbarState,
        action: SnackbarAction,
        _env: &(),
    ) -> SmallVec<[Effect<SnackbarAction>; 4]> {
        match action {
            SnackbarAction::Show { notice, duration } => {
                state.generation += 1;
                state.phase = SnackbarPhase::Visible;
                state.notice = Some(notice);
                let generation = state.generation;
                tracing::debug!(generation, ?duration, "Snackbar shown");

                smallvec![cancellable! {
                    id: SNACKBAR_TIMERS,
                    effects: [
                        delay! {
                            duration: duration.saturating_sub(self.close_animation),
                            action: SnackbarAction::BeginClosing { generation }
                        },
                        delay! {
                            duration: duration,
                            action: SnackbarAction::Hide { generation }
                        },
                    ]
                }]
            },
            SnackbarAction::Dismiss => {
                if state.phase == SnackbarPhase::Hidden {
                    return SmallVec::new();
                }
                state.generation += 1;
                state.phase = SnackbarPhase::Closing;
                let generation = state.generation;

                smallvec![cancellable! {
                    id: SNACKBAR_TIMERS,
                    effects: [delay! {
                        duration: self.close_animation,
                        action: SnackbarAction::Hide { generation }
                    }]
                }]
            },
            SnackbarAction::BeginClosing { generation } => {
                if generation == state.generation && state.phase == SnackbarPhase::Visible {
                    state.phase = SnackbarPhase::Closing;
                } else {
                    tracing::trace!(generation, "Ignoring stale closing timer");
                }
                SmallVec::new()
            },
            SnackbarAction::Hide { generation } => {
                if generation == state.generation {
                    state.phase = SnackbarPhase::Hidden;
                    state.notice = None;
                } else {
                    tracing::trace!(generation, "Ignoring stale hide timer");
                }
                SmallVec::new()
            },
            SnackbarAction::Dispose => {
                state.generation += 1;
                state.phase = SnackbarPhase::Hidden;
                state.notice = None;
                smallvec![Effect::Cancel(SNACKBAR_TIMERS)]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recauda_testing::{ReducerTest, assertions};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn show_schedules_closing_and_hide() {
        ReducerTest::new(SnackbarReducer::default())
            .with_env(())
            .given_state(SnackbarState::default())
            .when_action(SnackbarAction::Show {
                notice: Notice::success("Vendedor editado con éxito"),
                duration: ms(3000),
            })
            .then_state(|state| {
                assert_eq!(state.phase, SnackbarPhase::Visible);
                assert_eq!(state.generation, 1);
            })
            .then_effects(|effects| {
                assertions::assert_has_cancellable(effects, &SNACKBAR_TIMERS);
                assertions::assert_has_delay(effects, ms(2700), |a| {
                    *a == SnackbarAction::BeginClosing { generation: 1 }
                });
                assertions::assert_has_delay(effects, ms(3000), |a| {
                    *a == SnackbarAction::Hide { generation: 1 }
                });
            })
            .run();
    }

    #[test]
    fn stale_timers_are_ignored_after_reshow() {
        let notice = Notice::error("No se pudieron realizar los cambios");
        ReducerTest::new(SnackbarReducer::default())
            .with_env(())
            .given_state(SnackbarState::default())
            .given_actions([
                SnackbarAction::Show { notice: notice.clone(), duration: ms(3000) },
                SnackbarAction::Show { notice, duration: ms(5000) },
            ])
            .when_action(SnackbarAction::Hide { generation: 1 })
            .then_state(|state| {
                assert_eq!(state.phase, SnackbarPhase::Visible);
                assert!(state.notice.is_some());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn dismiss_closes_then_hides() {
        ReducerTest::new(SnackbarReducer::default())
            .with_env(())
            .given_state(SnackbarState::default())
            .given_actions([SnackbarAction::Show {
                notice: Notice::success("ok"),
                duration: ms(3000),
            }])
            .when_action(SnackbarAction::Dismiss)
            .then_state(|state| assert_eq!(state.phase, SnackbarPhase::Closing))
            .then_effects(|effects| {
                assertions::assert_has_delay(effects, ms(300), |a| {
                    *a == SnackbarAction::Hide { generation: 2 }
                });
            })
            .run();
    }

    #[test]
    fn dismiss_when_hidden_does_nothing() {
        ReducerTest::new(SnackbarReducer::default())
            .with_env(())
            .given_state(SnackbarState::default())
            .when_action(SnackbarAction::Dismiss)
            .then_state(|state| assert_eq!(*state, SnackbarState::default()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn dispose_cancels_timers() {
        ReducerTest::new(SnackbarReducer::default())
            .with_env(())
            .given_state(SnackbarState::default())
            .given_actions([SnackbarAction::Show {
                notice: Notice::success("ok"),
                duration: ms(3000),
            }])
            .when_action(SnackbarAction::Dispose)
            .then_state(|state| assert!(!state.is_shown()))
            .then_effects(|effects| assertions::assert_cancels(effects, &SNACKBAR_TIMERS))
            .run();
    }

    #[test]
    fn timings_pick_duration_by_kind() {
        let timings = SnackbarTimings::default();
        assert_eq!(
            timings.show(Notice::error("x")),
            SnackbarAction::Show { notice: Notice::error("x"), duration: ms(5000) }
        );
    }
}
