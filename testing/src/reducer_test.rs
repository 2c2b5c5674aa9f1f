//! Given/When/Then harness for reducers
//!
//! A reducer test never touches the runtime: it feeds actions straight into
//! `reduce` and inspects the final state and the effect descriptions that the
//! last action returned.

#![allow(clippy::module_name_repetitions)]

use octomarket_core::{effect::Effect, reducer::Reducer};

type Check<T> = Box<dyn FnOnce(&T)>;
type EffectsCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Builder for one reducer scenario
///
/// # Example
///
/// ```ignore
/// use octomarket_testing::{ReducerTest, assertions};
///
/// ReducerTest::new(FormReducer::new())
///     .with_env(MockEnvironment::in_memory())
///     .given_state(FormState::login())
///     .when_action(FormAction::Submit)
///     .then_state(|form| {
///         assert_eq!(form.error_message.as_deref(), Some("Email is required."));
///     })
///     .then_effects(|effects| assertions::assert_no_effects(effects))
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    given: Option<S>,
    script: Vec<A>,
    state_checks: Vec<Check<S>>,
    effect_checks: Vec<EffectsCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a scenario for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            given: None,
            script: Vec::new(),
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Environment handed to every `reduce` call
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// Starting state
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.given = Some(state);
        self
    }

    /// Append one action to the script
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.script.push(action);
        self
    }

    /// Append several actions to the script, in order
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.script.extend(actions);
        self
    }

    /// Check the state left after the whole script
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Check the effects returned by the script's last action
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Reduce the script and run every check
    ///
    /// # Panics
    ///
    /// Panics when the state, environment or script is missing, or when a
    /// check fails.
    #[allow(clippy::panic, clippy::expect_used)]
    pub fn run(self) {
        let Self {
            reducer,
            env,
            given,
            script,
            state_checks,
            effect_checks,
        } = self;

        let env = env.expect("call with_env() before run()");
        let mut state = given.expect("call given_state() before run()");
        assert!(!script.is_empty(), "call when_action() before run()");

        let last = script
            .into_iter()
            .fold(Vec::new(), |_, action| reducer.reduce(&mut state, action, &env).into_vec());

        state_checks.into_iter().for_each(|check| check(&state));
        effect_checks.into_iter().for_each(|check| check(&last));
    }
}

/// Helper assertions for effects
///
/// Nested `Parallel`, `Sequential` and `Cancellable` effects are searched
/// recursively.
pub mod assertions {
    use octomarket_core::effect::{Effect, EffectId};
    use std::time::Duration;

    fn visit<'a, A>(effects: &'a [Effect<A>], f: &mut dyn FnMut(&'a Effect<A>, Option<EffectId>)) {
        fn walk<'a, A>(
            effect: &'a Effect<A>,
            id: Option<EffectId>,
            f: &mut dyn FnMut(&'a Effect<A>, Option<EffectId>),
        ) {
            f(effect, id);
            match effect {
                Effect::Parallel(inner) | Effect::Sequential(inner) => {
                    for e in inner {
                        walk(e, id, f);
                    }
                },
                Effect::Cancellable { id, effect } => walk(effect, Some(*id), f),
                _ => {},
            }
        }
        for effect in effects {
            walk(effect, None, f);
        }
    }

    /// Every `Delay` in `effects` as `(cancellation id, duration, action)`
    #[must_use]
    pub fn delayed_actions<A>(effects: &[Effect<A>]) -> Vec<(Option<EffectId>, Duration, &A)> {
        let mut found = Vec::new();
        visit(effects, &mut |effect, id| {
            if let Effect::Delay { duration, action } = effect {
                found.push((id, *duration, action.as_ref()));
            }
        });
        found
    }

    /// Every id named by an `Effect::Cancel` in `effects`
    #[must_use]
    pub fn cancelled_ids<A>(effects: &[Effect<A>]) -> Vec<EffectId> {
        let mut found = Vec::new();
        visit(effects, &mut |effect, _| {
            if let Effect::Cancel(id) = effect {
                found.push(*id);
            }
        });
        found
    }

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        let mut found = false;
        visit(effects, &mut |effect, _| {
            found |= matches!(effect, Effect::Future(_));
        });
        assert!(found, "Expected at least one Future effect, but none found");
    }

    /// Assert that a timer for `action` is scheduled after `duration`
    ///
    /// # Panics
    ///
    /// Panics if no matching `Delay` effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_delayed<A>(effects: &[Effect<A>], duration: Duration, action: &A)
    where
        A: PartialEq + std::fmt::Debug,
    {
        let delays = delayed_actions(effects);
        assert!(
            delays.iter().any(|(_, d, a)| *d == duration && *a == action),
            "Expected {action:?} after {duration:?}, found delays {delays:?}"
        );
    }

    /// Assert that `id` is cancelled by these effects
    ///
    /// # Panics
    ///
    /// Panics if no `Effect::Cancel(id)` is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_cancels<A>(effects: &[Effect<A>], id: EffectId) {
        let ids = cancelled_ids(effects);
        assert!(
            ids.contains(&id),
            "Expected Cancel({id}), found cancels {ids:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octomarket_core::effect::{Effect, EffectId};
    use octomarket_core::reducer::Reducer;
    use octomarket_core::{SmallVec, smallvec};
    use std::time::Duration;

    const HIDE: EffectId = EffectId::new("banner.hide");

    #[derive(Debug, Default)]
    struct Banner {
        shown: u32,
        visible: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum BannerAction {
        Show,
        Close,
        Hide,
    }

    struct BannerReducer;

    impl Reducer for BannerReducer {
        type State = Banner;
        type Action = BannerAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Banner,
            action: BannerAction,
            _env: &(),
        ) -> SmallVec<[Effect<BannerAction>; 4]> {
            match action {
                BannerAction::Show => {
                    state.shown += 1;
                    state.visible = true;
                    smallvec![
                        Effect::Delay {
                            duration: Duration::from_millis(1800),
                            action: Box::new(BannerAction::Hide),
                        }
                        .cancellable(HIDE)
                    ]
                },
                BannerAction::Close => {
                    state.visible = false;
                    smallvec![Effect::Cancel(HIDE)]
                },
                BannerAction::Hide => {
                    state.visible = false;
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[test]
    fn test_script_runs_in_order() {
        ReducerTest::new(BannerReducer)
            .with_env(())
            .given_state(Banner::default())
            .when_actions([BannerAction::Show, BannerAction::Hide, BannerAction::Show])
            .then_state(|banner| {
                assert_eq!(banner.shown, 2);
                assert!(banner.visible);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_delayed(effects, Duration::from_millis(1800), &BannerAction::Hide);
            })
            .run();
    }

    #[test]
    fn test_effects_come_from_last_action() {
        ReducerTest::new(BannerReducer)
            .with_env(())
            .given_state(Banner::default())
            .when_action(BannerAction::Show)
            .when_action(BannerAction::Close)
            .then_state(|banner| assert!(!banner.visible))
            .then_effects(|effects| {
                assertions::assert_cancels(effects, HIDE);
                assert!(assertions::delayed_actions(effects).is_empty());
            })
            .run();
    }

    #[test]
    fn test_delay_reports_its_cancellation_id() {
        let mut banner = Banner::default();
        let effects = BannerReducer.reduce(&mut banner, BannerAction::Show, &());

        let delays = assertions::delayed_actions(&effects);
        assert_eq!(delays, vec![(Some(HIDE), Duration::from_millis(1800), &BannerAction::Hide)]);
    }

    #[test]
    fn test_none_counts_as_no_effect() {
        assertions::assert_no_effects::<BannerAction>(&[Effect::None, Effect::None]);
        assertions::assert_no_effects::<BannerAction>(&[]);
        assertions::assert_effects_count(&[Effect::<BannerAction>::None], 1);
    }
}
