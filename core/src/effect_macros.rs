//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants, particularly
//! for timers and cancellable groups.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use recauda_core::async_effect;
///
/// async_effect! {
///     let result = backend.create_event(payload).await;
///     Some(WizardAction::Submitted(result))
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use recauda_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(2700),
///     action: SnackbarAction::BeginClosing
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Cancellable` running the listed effects in parallel
///
/// # Example
///
/// ```rust,ignore
/// use recauda_core::cancellable;
///
/// cancellable! {
///     id: SNACKBAR_TIMERS,
///     effects: [closing_timer, hide_timer]
/// }
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        effects: [$($effect:expr),* $(,)?]
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::effect::Effect::Parallel(
                ::std::vec![$($effect),*]
            )),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        AsyncResult { value: i32 },
        TimeoutExpired,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TestAction::TimeoutExpired
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_cancellable_macro() {
        let effect = cancellable! {
            id: EffectId::from_static("timers"),
            effects: [
                delay! { duration: Duration::from_millis(1), action: TestAction::TimeoutExpired },
                delay! { duration: Duration::from_millis(2), action: TestAction::TimeoutExpired },
            ]
        };

        assert!(matches!(
            effect,
            Effect::Cancellable { ref id, ref effect }
                if id.as_str() == "timers" && matches!(**effect, Effect::Parallel(ref v) if v.len() == 2)
        ));
    }
}
