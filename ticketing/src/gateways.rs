//! In-process gateways for development and the command-line tool.
//!
//! Real payment and seat booking providers live outside this crate. These
//! stand-ins log every call and succeed, except that the payment gateway can
//! be told to decline specific accounts so the failure path can be exercised.

use cinema_tickets_core::environment::{SeatReservationService, TicketPaymentService};
use cinema_tickets_core::error::CollaboratorError;
use cinema_tickets_core::types::AccountId;
use std::collections::HashSet;
use std::sync::Arc;

/// Payment gateway that logs charges instead of taking money
#[derive(Clone, Debug, Default)]
pub struct LoggingPaymentGateway {
    declined_accounts: HashSet<AccountId>,
}

impl LoggingPaymentGateway {
    /// Creates a gateway that accepts every charge
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway that declines charges for the given accounts
    #[must_use]
    pub fn declining(accounts: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            declined_accounts: accounts.into_iter().collect(),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn TicketPaymentService> {
        Arc::new(self)
    }
}

impl TicketPaymentService for LoggingPaymentGateway {
    fn make_payment(&self, account_id: AccountId, amount: u32) -> Result<(), CollaboratorError> {
        if self.declined_accounts.contains(&account_id) {
            tracing::info!(%account_id, amount, "Payment declined by gateway");
            return Err(CollaboratorError::new(format!(
                "account {account_id} is not allowed to pay"
            )));
        }

        tracing::info!(%account_id, amount, "Payment taken");
        Ok(())
    }
}

/// Seat booking service that logs reservations
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSeatReservationGateway;

impl LoggingSeatReservationGateway {
    /// Creates a new seat gateway
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<dyn SeatReservationService> {
        Arc::new(Self::new())
    }
}

impl SeatReservationService for LoggingSeatReservationGateway {
    fn reserve_seats(&self, account_id: AccountId, seats: u32) {
        tracing::info!(%account_id, seats, "Seats booked");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_accepts_by_default() {
        let gateway = LoggingPaymentGateway::new();
        assert!(gateway.make_payment(AccountId::new(7).unwrap(), 20).is_ok());
    }

    #[test]
    fn test_gateway_declines_listed_accounts() {
        let blocked = AccountId::new(13).unwrap();
        let gateway = LoggingPaymentGateway::declining([blocked]);

        let error = gateway.make_payment(blocked, 40).unwrap_err();
        assert_eq!(error.reason, "account 13 is not allowed to pay");
        assert!(gateway.make_payment(AccountId::new(14).unwrap(), 40).is_ok());
    }
}
