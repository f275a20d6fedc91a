//! # Cinema Tickets Runtime
//!
//! Runtime implementation for reducers defined against `cinema-tickets-core`.
//!
//! ## Core Components
//!
//! - **Store**: Owns a reducer and its environment and drives one dispatch at a time
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//!
//! Everything runs on the caller's thread. An action produced by an effect is
//! reduced (and its own effects executed) before the next sibling effect runs,
//! so `Effect::Sequential` gives a strict happens-before ordering across
//! collaborator calls.
//!
//! ## Example
//!
//! ```ignore
//! use cinema_tickets_runtime::Store;
//!
//! let store = Store::new(PurchaseReducer::new(), environment);
//!
//! let mut state = PurchaseState::new();
//! store.send(&mut state, PurchaseAction::PurchaseTickets { account_id, lines });
//! ```

use cinema_tickets_core::{effect::Effect, reducer::Reducer};

/// Store module - the runtime coordinator
pub mod store {
    use super::{Effect, Reducer};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store holds:
    /// 1. Reducer (business logic)
    /// 2. Environment (injected dependencies)
    ///
    /// State is owned by the caller and passed to every [`Store::send`], so a
    /// single store can serve many independent, call-scoped states.
    ///
    /// # Type Parameters
    ///
    /// - `R`: Reducer implementation
    pub struct Store<R>
    where
        R: Reducer,
    {
        reducer: R,
        environment: R::Environment,
    }

    impl<R> Clone for Store<R>
    where
        R: Reducer + Clone,
        R::Environment: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
            }
        }
    }

    impl<R> Store<R>
    where
        R: Reducer,
        R::Action: std::fmt::Debug,
    {
        /// Create a new store with a reducer and its environment
        #[must_use]
        pub const fn new(reducer: R, environment: R::Environment) -> Self {
            Self {
                reducer,
                environment,
            }
        }

        /// Send an action through the reducer and run every resulting effect
        ///
        /// Returns once the action and all actions fed back by its effects
        /// have been reduced. The return value is the number of actions
        /// reduced, including the initial one.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub fn send(&self, state: &mut R::State, action: R::Action) -> usize {
            metrics::counter!("store.actions.sent").increment(1);
            self.dispatch(state, action)
        }

        fn dispatch(&self, state: &mut R::State, action: R::Action) -> usize {
            tracing::trace!(?action, "Reducing action");
            let effects = self.reducer.reduce(state, action, &self.environment);

            let mut reduced = 1;
            for effect in effects {
                reduced += self.execute_effect(state, effect);
            }
            reduced
        }

        /// Execute one effect, reducing any action it feeds back
        ///
        /// Returns the number of actions reduced as a consequence.
        fn execute_effect(&self, state: &mut R::State, effect: Effect<R::Action>) -> usize {
            metrics::counter!("store.effects.executed", "type" => effect.kind()).increment(1);

            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    0
                },
                Effect::Call(call) => {
                    tracing::trace!("Executing Effect::Call");
                    match call() {
                        Some(action) => {
                            tracing::trace!("Effect::Call produced an action, feeding back");
                            self.dispatch(state, action)
                        },
                        None => {
                            tracing::trace!("Effect::Call completed with no action");
                            0
                        },
                    }
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    effects
                        .into_iter()
                        .map(|effect| self.execute_effect(state, effect))
                        .sum()
                },
            }
        }
    }
}

pub use store::Store;
