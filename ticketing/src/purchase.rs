//! Purchase reducer.
//!
//! One purchase call is one small saga over call-scoped state:
//!
//! ```text
//! PurchaseTickets ──validate──► PurchaseRejected            (no side effects)
//!        │
//!        └─► make_payment ──► PaymentDeclined               (no reservation)
//!                  │
//!                  └─► PaymentCollected ─► reserve_seats ─► SeatsReserved
//! ```
//!
//! The reservation effect is only ever built while reducing
//! `PaymentCollected`, so seats cannot be reserved for an unpaid purchase.

use crate::error::PurchaseError;
use crate::tally::TicketTally;
use cinema_tickets_core::{
    effect::Effect,
    environment::{SeatReservationService, TicketPaymentService},
    reducer::Reducer,
    types::{AccountId, TicketRequestLine},
    smallvec, SmallVec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for a purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseAction {
    // Commands
    /// Buy tickets for an account
    PurchaseTickets {
        /// Purchasing account
        account_id: AccountId,
        /// Requested ticket lines, in submission order
        lines: Vec<TicketRequestLine>,
    },

    // Events
    /// Request refused before any side effect
    PurchaseRejected {
        /// Why
        error: PurchaseError,
    },

    /// Payment gateway took the money
    PaymentCollected {
        /// Charged account
        account_id: AccountId,
        /// Amount charged
        amount: u32,
        /// Seats still to reserve
        seats: u32,
    },

    /// Payment gateway refused the charge
    PaymentDeclined {
        /// Account that was not charged
        account_id: AccountId,
        /// Amount that was attempted
        amount: u32,
        /// Gateway's reason
        reason: String,
    },

    /// Seats were reserved
    SeatsReserved {
        /// Account holding the seats
        account_id: AccountId,
        /// Seats reserved
        seats: u32,
    },
}

// ============================================================================
// State
// ============================================================================

/// Where a purchase call currently is
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseStatus {
    /// Nothing submitted yet
    #[default]
    Pending,
    /// Request accepted, payment requested
    AwaitingPayment {
        /// Amount being charged
        amount: u32,
        /// Seats to reserve once paid
        seats: u32,
    },
    /// Paid, reservation requested
    AwaitingReservation {
        /// Amount charged
        amount: u32,
        /// Seats being reserved
        seats: u32,
    },
    /// Paid and seated
    Completed {
        /// Amount charged
        amount: u32,
        /// Seats reserved
        seats: u32,
    },
    /// Refused; terminal
    Rejected(PurchaseError),
}

/// Call-scoped purchase state
///
/// Built fresh for every purchase and dropped when the call returns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseState {
    /// Current status
    pub status: PurchaseStatus,
}

impl PurchaseState {
    /// Creates an empty, pending state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the purchase was refused
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self.status, PurchaseStatus::Rejected(_))
    }

    /// True once payment and reservation both happened
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, PurchaseStatus::Completed { .. })
    }

    /// Final result of the call
    ///
    /// # Errors
    ///
    /// The rejection reason, or [`PurchaseError::Incomplete`] if the purchase
    /// has not reached a final state.
    pub fn outcome(&self) -> Result<(), PurchaseError> {
        match &self.status {
            PurchaseStatus::Completed { .. } => Ok(()),
            PurchaseStatus::Rejected(error) => Err(error.clone()),
            PurchaseStatus::Pending
            | PurchaseStatus::AwaitingPayment { .. }
            | PurchaseStatus::AwaitingReservation { .. } => Err(PurchaseError::Incomplete),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Collaborators a purchase delegates to
#[derive(Clone)]
pub struct PurchaseEnvironment {
    /// Payment gateway
    pub payments: Arc<dyn TicketPaymentService>,
    /// Seat booking service
    pub seats: Arc<dyn SeatReservationService>,
}

impl PurchaseEnvironment {
    /// Creates a new `PurchaseEnvironment`
    #[must_use]
    pub fn new(
        payments: Arc<dyn TicketPaymentService>,
        seats: Arc<dyn SeatReservationService>,
    ) -> Self {
        Self { payments, seats }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for ticket purchases
#[derive(Clone, Debug, Default)]
pub struct PurchaseReducer;

impl PurchaseReducer {
    /// Creates a new `PurchaseReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a `PurchaseTickets` command and totals it
    fn validate_purchase(lines: &[TicketRequestLine]) -> Result<TicketTally, PurchaseError> {
        if lines.is_empty() {
            tracing::warn!("Purchase request has no ticket lines");
            return Err(PurchaseError::EmptyRequest);
        }

        let tally = TicketTally::from_lines(lines);
        tracing::info!(
            total = tally.total(),
            adults = tally.adults,
            children = tally.children,
            infants = tally.infants,
            "Total tickets in purchase request"
        );

        if let Err(error) = tally.validate() {
            tracing::warn!(
                total = tally.total(),
                adults = tally.adults,
                children = tally.children,
                infants = tally.infants,
                reason = error.reason(),
                "Purchase request breaks a ticket rule"
            );
            return Err(error);
        }

        Ok(tally)
    }

    /// Applies an event to state
    fn apply_event(state: &mut PurchaseState, action: &PurchaseAction) {
        match action {
            PurchaseAction::PurchaseRejected { error } => {
                state.status = PurchaseStatus::Rejected(error.clone());
            },
            PurchaseAction::PaymentCollected { amount, seats, .. } => {
                state.status = PurchaseStatus::AwaitingReservation {
                    amount: *amount,
                    seats: *seats,
                };
            },
            PurchaseAction::PaymentDeclined { reason, .. } => {
                state.status = PurchaseStatus::Rejected(PurchaseError::PaymentFailed {
                    reason: reason.clone(),
                });
            },
            PurchaseAction::SeatsReserved { seats, .. } => {
                if let PurchaseStatus::AwaitingReservation { amount, .. } = state.status {
                    state.status = PurchaseStatus::Completed {
                        amount,
                        seats: *seats,
                    };
                }
            },
            // Commands are not applied to state
            PurchaseAction::PurchaseTickets { .. } => {},
        }
    }

    fn collect_payment(
        env: &PurchaseEnvironment,
        account_id: AccountId,
        amount: u32,
        seats: u32,
    ) -> Effect<PurchaseAction> {
        let payments = Arc::clone(&env.payments);
        Effect::call(move || {
            Some(match payments.make_payment(account_id, amount) {
                Ok(()) => PurchaseAction::PaymentCollected {
                    account_id,
                    amount,
                    seats,
                },
                Err(error) => PurchaseAction::PaymentDeclined {
                    account_id,
                    amount,
                    reason: error.reason,
                },
            })
        })
    }

    fn reserve_seats(
        env: &PurchaseEnvironment,
        account_id: AccountId,
        seats: u32,
    ) -> Effect<PurchaseAction> {
        let reservations = Arc::clone(&env.seats);
        Effect::call(move || {
            reservations.reserve_seats(account_id, seats);
            Some(PurchaseAction::SeatsReserved { account_id, seats })
        })
    }
}

impl Reducer for PurchaseReducer {
    type State = PurchaseState;
    type Action = PurchaseAction;
    type Environment = PurchaseEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            PurchaseAction::PurchaseTickets { account_id, lines } => {
                if state.status != PurchaseStatus::Pending {
                    tracing::warn!(%account_id, "Purchase state already used, ignoring request");
                    return SmallVec::new();
                }

                let tally = match Self::validate_purchase(&lines) {
                    Ok(tally) => tally,
                    Err(error) => {
                        Self::apply_event(state, &PurchaseAction::PurchaseRejected { error });
                        return SmallVec::new();
                    },
                };

                let amount = tally.price();
                let seats = tally.seats();
                state.status = PurchaseStatus::AwaitingPayment { amount, seats };

                smallvec![Self::collect_payment(env, account_id, amount, seats)]
            },

            // ========== Events ==========
            PurchaseAction::PaymentCollected {
                account_id,
                amount,
                seats,
            } => {
                if !matches!(state.status, PurchaseStatus::AwaitingPayment { .. }) {
                    tracing::warn!(%account_id, "Unexpected payment confirmation, ignoring");
                    return SmallVec::new();
                }

                tracing::info!(%account_id, amount, "Payment successful");
                Self::apply_event(state, &action);

                smallvec![Self::reserve_seats(env, account_id, seats)]
            },

            PurchaseAction::PaymentDeclined {
                account_id,
                amount,
                ref reason,
            } => {
                if !matches!(state.status, PurchaseStatus::AwaitingPayment { .. }) {
                    tracing::warn!(%account_id, "Unexpected payment decline, ignoring");
                    return SmallVec::new();
                }

                tracing::error!(%account_id, amount, %reason, "Payment failed");
                Self::apply_event(state, &action);
                SmallVec::new()
            },

            PurchaseAction::SeatsReserved { account_id, seats } => {
                if !matches!(state.status, PurchaseStatus::AwaitingReservation { .. }) {
                    tracing::warn!(%account_id, seats, "Unexpected seat reservation, ignoring");
                    return SmallVec::new();
                }

                tracing::info!(%account_id, seats, "Seats reserved");
                Self::apply_event(state, &action);
                SmallVec::new()
            },

            PurchaseAction::PurchaseRejected { ref error } => {
                // Only a request still being validated can be refused
                if state.status != PurchaseStatus::Pending {
                    tracing::warn!(reason = error.reason(), "Unexpected rejection, ignoring");
                    return SmallVec::new();
                }

                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinema_tickets_testing::{
        assertions, test_account, CallLog, CollaboratorCall, RecordingPaymentService,
        RecordingSeatReservationService, ReducerTest, RejectingPaymentService,
    };

    fn create_test_env(log: &CallLog) -> PurchaseEnvironment {
        PurchaseEnvironment::new(
            Arc::new(RecordingPaymentService::new(log.clone())),
            Arc::new(RecordingSeatReservationService::new(log.clone())),
        )
    }

    #[test]
    fn test_valid_purchase_requests_payment_only() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState::new())
            .when_action(PurchaseAction::PurchaseTickets {
                account_id: test_account(),
                lines: vec![TicketRequestLine::adults(2), TicketRequestLine::children(1)],
            })
            .then_state(|state| {
                assert_eq!(
                    state.status,
                    PurchaseStatus::AwaitingPayment { amount: 50, seats: 3 }
                );
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert_eq!(assertions::count_calls(effects), 1);
            })
            .then_calls(&log, |calls| {
                assert_eq!(
                    calls,
                    [CollaboratorCall::Payment {
                        account_id: test_account(),
                        amount: 50
                    }]
                );
            })
            .then_feedback(|actions| {
                assert_eq!(
                    actions,
                    [PurchaseAction::PaymentCollected {
                        account_id: test_account(),
                        amount: 50,
                        seats: 3
                    }]
                );
            })
            .run();
    }

    #[test]
    fn test_empty_request_is_rejected_without_effects() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState::new())
            .when_action(PurchaseAction::PurchaseTickets {
                account_id: test_account(),
                lines: vec![],
            })
            .then_state(|state| {
                assert_eq!(state.outcome(), Err(PurchaseError::EmptyRequest));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_rule_violation_is_rejected_without_effects() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState::new())
            .when_action(PurchaseAction::PurchaseTickets {
                account_id: test_account(),
                lines: vec![TicketRequestLine::adults(21)],
            })
            .then_state(|state| {
                assert!(state.is_rejected());
                assert_eq!(state.outcome().unwrap_err().reason(), "ticket limit exceeded");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_payment_collected_requests_reservation() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState {
                status: PurchaseStatus::AwaitingPayment { amount: 40, seats: 2 },
            })
            .when_action(PurchaseAction::PaymentCollected {
                account_id: test_account(),
                amount: 40,
                seats: 2,
            })
            .then_state(|state| {
                assert_eq!(
                    state.status,
                    PurchaseStatus::AwaitingReservation { amount: 40, seats: 2 }
                );
            })
            .then_effects(assertions::assert_has_call_effect)
            .then_calls(&log, |calls| {
                assert_eq!(
                    calls,
                    [CollaboratorCall::Reservation {
                        account_id: test_account(),
                        seats: 2
                    }]
                );
            })
            .run();
    }

    #[test]
    fn test_declined_payment_feeds_back_decline() {
        let log = CallLog::new();
        let env = PurchaseEnvironment::new(
            Arc::new(RejectingPaymentService::new(log.clone())),
            Arc::new(RecordingSeatReservationService::new(log.clone())),
        );

        ReducerTest::new(PurchaseReducer::new())
            .with_env(env)
            .given_state(PurchaseState::new())
            .when_action(PurchaseAction::PurchaseTickets {
                account_id: test_account(),
                lines: vec![TicketRequestLine::adults(1)],
            })
            .then_feedback(|actions| {
                assert!(matches!(
                    actions,
                    [PurchaseAction::PaymentDeclined { amount: 20, .. }]
                ));
            })
            .then_calls(&log, |calls| {
                assert_eq!(calls.len(), 1);
                assert!(matches!(calls[0], CollaboratorCall::Payment { amount: 20, .. }));
            })
            .run();
    }

    #[test]
    fn test_unexpected_payment_confirmation_is_ignored() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState::new())
            .when_action(PurchaseAction::PaymentCollected {
                account_id: test_account(),
                amount: 40,
                seats: 2,
            })
            .then_state(|state| {
                assert_eq!(state.status, PurchaseStatus::Pending);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_payment_declined_is_terminal() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState {
                status: PurchaseStatus::AwaitingPayment { amount: 20, seats: 1 },
            })
            .when_action(PurchaseAction::PaymentDeclined {
                account_id: test_account(),
                amount: 20,
                reason: "card declined".to_string(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.outcome(),
                    Err(PurchaseError::PaymentFailed {
                        reason: "card declined".to_string()
                    })
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_seats_reserved_completes_purchase() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState {
                status: PurchaseStatus::AwaitingReservation { amount: 50, seats: 3 },
            })
            .when_action(PurchaseAction::SeatsReserved {
                account_id: test_account(),
                seats: 3,
            })
            .then_state(|state| {
                assert!(state.is_completed());
                assert_eq!(state.status, PurchaseStatus::Completed { amount: 50, seats: 3 });
                assert_eq!(state.outcome(), Ok(()));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_used_state_ignores_second_request() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState {
                status: PurchaseStatus::Completed { amount: 20, seats: 1 },
            })
            .when_action(PurchaseAction::PurchaseTickets {
                account_id: test_account(),
                lines: vec![TicketRequestLine::adults(1)],
            })
            .then_state(|state| {
                assert_eq!(state.status, PurchaseStatus::Completed { amount: 20, seats: 1 });
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_seats_reserved_before_payment_is_ignored() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState::new())
            .when_action(PurchaseAction::SeatsReserved {
                account_id: test_account(),
                seats: 5,
            })
            .then_state(|state| {
                assert_eq!(state.status, PurchaseStatus::Pending);
                assert_eq!(state.outcome(), Err(PurchaseError::Incomplete));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_seats_reserved_while_awaiting_payment_is_ignored() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState {
                status: PurchaseStatus::AwaitingPayment { amount: 20, seats: 1 },
            })
            .when_action(PurchaseAction::SeatsReserved {
                account_id: test_account(),
                seats: 1,
            })
            .then_state(|state| {
                assert_eq!(state.status, PurchaseStatus::AwaitingPayment { amount: 20, seats: 1 });
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_late_payment_decline_keeps_completed_purchase() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState {
                status: PurchaseStatus::Completed { amount: 20, seats: 1 },
            })
            .when_action(PurchaseAction::PaymentDeclined {
                account_id: test_account(),
                amount: 20,
                reason: "late".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.status, PurchaseStatus::Completed { amount: 20, seats: 1 });
                assert_eq!(state.outcome(), Ok(()));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_rejection_after_payment_is_ignored() {
        let log = CallLog::new();

        ReducerTest::new(PurchaseReducer::new())
            .with_env(create_test_env(&log))
            .given_state(PurchaseState {
                status: PurchaseStatus::AwaitingReservation { amount: 20, seats: 1 },
            })
            .when_action(PurchaseAction::PurchaseRejected {
                error: PurchaseError::AdultTicketRequired,
            })
            .then_state(|state| {
                assert_eq!(
                    state.status,
                    PurchaseStatus::AwaitingReservation { amount: 20, seats: 1 }
                );
            })
            .then_effects(assertions::assert_no_effects)
            .then_calls(&log, |calls| assert!(calls.is_empty()))
            .run();
    }

    #[test]
    fn test_in_progress_outcome_is_incomplete() {
        let state = PurchaseState {
            status: PurchaseStatus::AwaitingPayment { amount: 20, seats: 1 },
        };
        assert_eq!(state.outcome(), Err(PurchaseError::Incomplete));
    }
}
