//! Caller-facing ticket purchase API.

use crate::error::PurchaseError;
use crate::purchase::{PurchaseAction, PurchaseEnvironment, PurchaseReducer, PurchaseState};
use cinema_tickets_core::environment::{SeatReservationService, TicketPaymentService};
use cinema_tickets_core::types::{AccountId, TicketRequestLine};
use cinema_tickets_runtime::Store;
use std::sync::Arc;

/// Buys cinema tickets for an account
///
/// Holds nothing but the two injected collaborators; each purchase runs
/// against its own fresh state. Cloning is cheap and clones share the
/// collaborators.
#[derive(Clone)]
pub struct TicketService {
    store: Store<PurchaseReducer>,
}

impl TicketService {
    /// Creates a service delegating to the given payment and seat services
    #[must_use]
    pub fn new(
        payments: Arc<dyn TicketPaymentService>,
        seats: Arc<dyn SeatReservationService>,
    ) -> Self {
        Self::with_environment(PurchaseEnvironment::new(payments, seats))
    }

    /// Creates a service from a prepared environment
    #[must_use]
    pub const fn with_environment(environment: PurchaseEnvironment) -> Self {
        Self {
            store: Store::new(PurchaseReducer::new(), environment),
        }
    }

    /// Validate, price and pay for a ticket request, then reserve seats
    ///
    /// On success the account has been charged exactly once and the seats
    /// reserved exactly once, in that order. Neither the price nor the seat
    /// count is returned.
    ///
    /// # Errors
    ///
    /// - [`PurchaseError::EmptyRequest`] when `lines` is empty
    /// - [`PurchaseError::TicketLimitExceeded`] for more than 20 tickets
    /// - [`PurchaseError::AdultTicketRequired`] when no adult ticket is requested
    /// - [`PurchaseError::PaymentFailed`] when the gateway refuses the charge;
    ///   no seats are reserved in that case
    ///
    /// Validation failures happen before either collaborator is called.
    #[tracing::instrument(skip_all, fields(%account_id, lines = lines.len()))]
    pub fn purchase_tickets(
        &self,
        account_id: AccountId,
        lines: &[TicketRequestLine],
    ) -> Result<(), PurchaseError> {
        let mut state = PurchaseState::new();
        self.store.send(
            &mut state,
            PurchaseAction::PurchaseTickets {
                account_id,
                lines: lines.to_vec(),
            },
        );

        let outcome = state.outcome();
        match &outcome {
            Ok(()) => {
                metrics::counter!("cinema_tickets.purchases.completed").increment(1);
            },
            Err(error) => {
                metrics::counter!(
                    "cinema_tickets.purchases.rejected",
                    "kind" => error.kind().as_str()
                )
                .increment(1);
                tracing::debug!(reason = error.reason(), "Purchase rejected");
            },
        }
        outcome
    }
}
