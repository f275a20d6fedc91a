//! # Cinema Tickets Core
//!
//! Core traits and types for the cinema ticket purchase service.
//!
//! Business logic is written as reducers: pure functions that validate an
//! action, update call-scoped state and describe the side effects to perform.
//! The runtime crate executes those effects and feeds their resulting actions
//! back into the reducer.
//!
//! ## Core Concepts
//!
//! - **State**: Call-scoped domain state
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected collaborators via traits
//!
//! ## Example
//!
//! ```ignore
//! use cinema_tickets_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for PurchaseReducer {
//!     type State = PurchaseState;
//!     type Action = PurchaseAction;
//!     type Environment = PurchaseEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PurchaseState,
//!         action: PurchaseAction,
//!         env: &PurchaseEnvironment,
//!     ) -> SmallVec<[Effect<PurchaseAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Error types shared by collaborators and input parsing
pub mod error;

/// Domain value types: accounts, ticket categories and request lines
pub mod types;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. A reducer returns them and the runtime
/// decides when to run them.
pub mod effect {
    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Synchronous call into a collaborator
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        /// before the next effect runs.
        Call(Box<dyn FnOnce() -> Option<Action> + Send>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Call(_) => write!(f, "Effect::Call(<closure>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap a synchronous collaborator call
        #[must_use]
        pub fn call<F>(f: F) -> Effect<Action>
        where
            F: FnOnce() -> Option<Action> + Send + 'static,
        {
            Effect::Call(Box::new(f))
        }

        /// Short label for logs and metrics
        #[must_use]
        pub const fn kind(&self) -> &'static str {
            match self {
                Effect::None => "none",
                Effect::Sequential(_) => "sequential",
                Effect::Call(_) => "call",
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Both collaborators are external services: the purchase logic depends on
/// them but never implements them. Implementations are injected once, at
/// construction, and shared read-only for the component's lifetime.
pub mod environment {
    use crate::error::CollaboratorError;
    use crate::types::AccountId;

    /// Payment gateway that charges an account
    ///
    /// # Examples
    ///
    /// ```
    /// use cinema_tickets_core::environment::TicketPaymentService;
    /// use cinema_tickets_core::error::CollaboratorError;
    /// use cinema_tickets_core::types::AccountId;
    ///
    /// struct AlwaysPays;
    ///
    /// impl TicketPaymentService for AlwaysPays {
    ///     fn make_payment(&self, _account_id: AccountId, _amount: u32) -> Result<(), CollaboratorError> {
    ///         Ok(())
    ///     }
    /// }
    /// ```
    pub trait TicketPaymentService: Send + Sync {
        /// Charge `amount` to the account
        ///
        /// # Errors
        ///
        /// Returns [`CollaboratorError`] when the gateway considers the
        /// purchase invalid and refuses to take payment.
        fn make_payment(&self, account_id: AccountId, amount: u32) -> Result<(), CollaboratorError>;
    }

    /// Seat booking service
    pub trait SeatReservationService: Send + Sync {
        /// Reserve `seats` seats for the account
        fn reserve_seats(&self, account_id: AccountId, seats: u32);
    }
}
