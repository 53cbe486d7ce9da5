//! Reducer composition utilities
//!
//! Screens own child components (a snackbar, a selection) that have their own
//! reducers and action types. This module embeds a child reducer into a parent:
//!
//! - **`lift_effects`**: Rewrite child effects so they feed parent actions back
//! - **`reduce_scoped`**: Run a child reducer on a slice of parent state
//!
//! # Examples
//!
//! ```
//! use recauda_core::{Effect, Reducer, SmallVec, smallvec};
//! use recauda_core::composition::reduce_scoped;
//!
//! #[derive(Clone, Default)]
//! struct BadgeState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum BadgeAction {
//!     Bump,
//! }
//!
//! struct BadgeReducer;
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut BadgeState, _action: BadgeAction, _env: &()) -> SmallVec<[Effect<BadgeAction>; 4]> {
//!         state.count += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ScreenAction {
//!     Badge(BadgeAction),
//! }
//!
//! #[derive(Default)]
//! struct ScreenState {
//!     badge: BadgeState,
//! }
//!
//! let mut screen = ScreenState::default();
//! let effects = reduce_scoped(&BadgeReducer, &mut screen.badge, BadgeAction::Bump, &(), ScreenAction::Badge);
//! assert_eq!(screen.badge.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Rewrites every effect so the actions it produces are embedded with `embed`.
#[must_use]
pub fn lift_effects<A, B, F>(effects: SmallVec<[Effect<A>; 4]>, embed: F) -> SmallVec<[Effect<B>; 4]>
where
    A: Send + 'static,
    B: Send + 'static,
    F: Fn(A) -> B + Clone + Send + Sync + 'static,
{
    effects
        .into_iter()
        .map(|effect| effect.map(embed.clone()))
        .collect()
}

/// Runs `reducer` on a child slice of state and lifts its effects into the
/// parent action type.
///
/// The child state is borrowed in place, so no clone/write-back is needed.
pub fn reduce_scoped<R, B, F>(
    reducer: &R,
    state: &mut R::State,
    action: R::Action,
    env: &R::Environment,
    embed: F,
) -> SmallVec<[Effect<B>; 4]>
where
    R: Reducer,
    R::Action: Send + 'static,
    B: Send + 'static,
    F: Fn(R::Action) -> B + Clone + Send + Sync + 'static,
{
    lift_effects(reducer.reduce(state, action, env), embed)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::smallvec;
    use std::time::Duration;

    #[derive(Clone, Debug, Default)]
    struct SubState {
        value: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum SubAction {
        Add(i32),
        Later,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Sub(SubAction),
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SubAction::Add(n) => {
                    state.value += n;
                    smallvec![Effect::Delay {
                        duration: Duration::from_millis(10),
                        action: Box::new(SubAction::Later),
                    }]
                },
                SubAction::Later => SmallVec::new(),
            }
        }
    }

    #[derive(Clone, Debug, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[test]
    fn test_reduce_scoped_updates_only_child() {
        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        let effects = reduce_scoped(
            &SubReducer,
            &mut state.sub,
            SubAction::Add(3),
            &(),
            ParentAction::Sub,
        );

        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test");
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Delay { action, .. } => {
                assert_eq!(**action, ParentAction::Sub(SubAction::Later));
            },
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn test_lift_effects_preserves_count() {
        let effects: SmallVec<[Effect<SubAction>; 4]> = smallvec![Effect::None, Effect::None];
        let lifted = lift_effects(effects, ParentAction::Sub);
        assert_eq!(lifted.len(), 2);
        assert!(lifted.iter().all(Effect::is_none));
    }
}
