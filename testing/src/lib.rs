//! # Cinema Tickets Testing
//!
//! Testing utilities and helpers for the cinema ticket purchase service.
//!
//! This crate provides:
//! - Recording and failing implementations of the collaborator traits
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies for ticket orders
//!
//! ## Example
//!
//! ```ignore
//! use cinema_tickets_testing::mocks::{CallLog, RecordingPaymentService, RecordingSeatReservationService};
//!
//! let log = CallLog::new();
//! let service = TicketService::new(
//!     Arc::new(RecordingPaymentService::new(log.clone())),
//!     Arc::new(RecordingSeatReservationService::new(log.clone())),
//! );
//!
//! service.purchase_tickets(account_id, &[TicketRequestLine::adults(2)])?;
//! assert_eq!(log.calls().len(), 2);
//! ```


/// Mock implementations of the collaborator traits
///
/// Every mock writes into a shared [`mocks::CallLog`] so tests can check
/// both what was called and in which order.
pub mod mocks {
    use cinema_tickets_core::environment::{SeatReservationService, TicketPaymentService};
    use cinema_tickets_core::error::CollaboratorError;
    use cinema_tickets_core::types::AccountId;
    use std::sync::{Arc, Mutex, PoisonError};

    /// One recorded collaborator invocation
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CollaboratorCall {
        /// `make_payment` was invoked
        Payment {
            /// Charged account
            account_id: AccountId,
            /// Charged amount
            amount: u32,
        },
        /// `reserve_seats` was invoked
        Reservation {
            /// Account the seats are for
            account_id: AccountId,
            /// Seats reserved
            seats: u32,
        },
    }

    /// Shared, ordered record of collaborator calls
    #[derive(Debug, Clone, Default)]
    pub struct CallLog {
        calls: Arc<Mutex<Vec<CollaboratorCall>>>,
    }

    impl CallLog {
        /// Create an empty call log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Append a call
        pub fn record(&self, call: CollaboratorCall) {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(call);
        }

        /// Snapshot of all calls, in the order they happened
        #[must_use]
        pub fn calls(&self) -> Vec<CollaboratorCall> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Payment calls only
        #[must_use]
        pub fn payments(&self) -> Vec<(AccountId, u32)> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    CollaboratorCall::Payment { account_id, amount } => Some((account_id, amount)),
                    CollaboratorCall::Reservation { .. } => None,
                })
                .collect()
        }

        /// Reservation calls only
        #[must_use]
        pub fn reservations(&self) -> Vec<(AccountId, u32)> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    CollaboratorCall::Reservation { account_id, seats } => Some((account_id, seats)),
                    CollaboratorCall::Payment { .. } => None,
                })
                .collect()
        }

        /// True when no collaborator has been called
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_empty()
        }
    }

    /// Payment service that records every charge and always succeeds
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPaymentService {
        log: CallLog,
    }

    impl RecordingPaymentService {
        /// Create a payment mock writing to `log`
        #[must_use]
        pub const fn new(log: CallLog) -> Self {
            Self { log }
        }
    }

    impl TicketPaymentService for RecordingPaymentService {
        fn make_payment(&self, account_id: AccountId, amount: u32) -> Result<(), CollaboratorError> {
            self.log
                .record(CollaboratorCall::Payment { account_id, amount });
            Ok(())
        }
    }

    /// Payment service that records every charge and then declines it
    #[derive(Debug, Clone, Default)]
    pub struct RejectingPaymentService {
        log: CallLog,
    }

    impl RejectingPaymentService {
        /// Create a declining payment mock writing to `log`
        #[must_use]
        pub const fn new(log: CallLog) -> Self {
            Self { log }
        }
    }

    impl TicketPaymentService for RejectingPaymentService {
        fn make_payment(&self, account_id: AccountId, amount: u32) -> Result<(), CollaboratorError> {
            self.log
                .record(CollaboratorCall::Payment { account_id, amount });
            Err(CollaboratorError::new("card declined"))
        }
    }

    /// Seat reservation service that records every reservation
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSeatReservationService {
        log: CallLog,
    }

    impl RecordingSeatReservationService {
        /// Create a reservation mock writing to `log`
        #[must_use]
        pub const fn new(log: CallLog) -> Self {
            Self { log }
        }
    }

    impl SeatReservationService for RecordingSeatReservationService {
        fn reserve_seats(&self, account_id: AccountId, seats: u32) {
            self.log
                .record(CollaboratorCall::Reservation { account_id, seats });
        }
    }

    /// Account id 1, for tests that don't care which account buys
    ///
    /// # Panics
    ///
    /// Never: the id is a non-zero literal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_account() -> AccountId {
        AccountId::new(1).expect("1 is a valid account id")
    }
}

/// Property-based testing utilities
///
/// Strategies generate whole orders together with the per-category totals
/// they were built from, so tests can compute expectations independently.
/// Category counts are split across one or two request lines and shuffled.
pub mod properties {
    use cinema_tickets_core::types::{TicketCategory, TicketRequestLine, MAX_TICKETS_PER_PURCHASE};
    use proptest::prelude::*;

    /// A generated order and the totals behind it
    #[derive(Debug, Clone)]
    pub struct TicketOrder {
        /// Adult tickets across all lines
        pub adults: u32,
        /// Child tickets across all lines
        pub children: u32,
        /// Infant tickets across all lines
        pub infants: u32,
        /// Request lines, in submission order
        pub lines: Vec<TicketRequestLine>,
    }

    impl TicketOrder {
        /// Tickets across all categories
        #[must_use]
        pub const fn total(&self) -> u32 {
            self.adults + self.children + self.infants
        }

        /// Price the order should be charged
        #[must_use]
        pub const fn expected_price(&self) -> u32 {
            self.adults * 20 + self.children * 10
        }

        /// Seats the order should reserve
        #[must_use]
        pub const fn expected_seats(&self) -> u32 {
            self.adults + self.children
        }
    }

    fn split(category: TicketCategory, count: u32) -> impl Strategy<Value = Vec<TicketRequestLine>> {
        (0..=count).prop_map(move |first| {
            [first, count - first]
                .into_iter()
                .filter(|&n| n > 0)
                .map(|n| TicketRequestLine::new(category, n))
                .collect()
        })
    }

    /// Lines for exactly the given totals, split and shuffled
    pub fn order_with(adults: u32, children: u32, infants: u32) -> impl Strategy<Value = TicketOrder> {
        (
            split(TicketCategory::Adult, adults),
            split(TicketCategory::Child, children),
            split(TicketCategory::Infant, infants),
        )
            .prop_flat_map(|(mut lines, child_lines, infant_lines)| {
                lines.extend(child_lines);
                lines.extend(infant_lines);
                Just(lines).prop_shuffle()
            })
            .prop_map(move |lines| TicketOrder {
                adults,
                children,
                infants,
                lines,
            })
    }

    /// Orders that must be accepted: at least one adult, at most 20 tickets
    pub fn valid_order() -> impl Strategy<Value = TicketOrder> {
        (1..=MAX_TICKETS_PER_PURCHASE)
            .prop_flat_map(|adults| (Just(adults), 0..=MAX_TICKETS_PER_PURCHASE - adults))
            .prop_flat_map(|(adults, children)| {
                (
                    Just(adults),
                    Just(children),
                    0..=MAX_TICKETS_PER_PURCHASE - adults - children,
                )
            })
            .prop_flat_map(|(adults, children, infants)| order_with(adults, children, infants))
    }

    /// Orders over the ticket limit, with any category mix
    pub fn oversized_order() -> impl Strategy<Value = TicketOrder> {
        (MAX_TICKETS_PER_PURCHASE + 1..=3 * MAX_TICKETS_PER_PURCHASE)
            .prop_flat_map(|total| (Just(total), 0..=total))
            .prop_flat_map(|(total, adults)| (Just(total), Just(adults), 0..=total - adults))
            .prop_flat_map(|(total, adults, children)| {
                order_with(adults, children, total - adults - children)
            })
    }

    /// Orders within the limit that contain no adult ticket
    pub fn adultless_order() -> impl Strategy<Value = TicketOrder> {
        (1..=MAX_TICKETS_PER_PURCHASE)
            .prop_flat_map(|total| (Just(total), 0..=total))
            .prop_flat_map(|(total, children)| order_with(0, children, total - children))
    }
}

/// Install a test-friendly `tracing` subscriber
///
/// Safe to call from every test: only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{
    CallLog, CollaboratorCall, RecordingPaymentService, RecordingSeatReservationService,
    RejectingPaymentService, test_account,
};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::properties::{adultless_order, oversized_order, valid_order};
    use super::*;
    use cinema_tickets_core::environment::{SeatReservationService, TicketPaymentService};
    use cinema_tickets_core::types::{TicketCategory, MAX_TICKETS_PER_PURCHASE};
    use proptest::prelude::*;

    #[test]
    fn test_call_log_keeps_order() {
        let log = CallLog::new();
        let payments = RecordingPaymentService::new(log.clone());
        let seats = RecordingSeatReservationService::new(log.clone());
        let account = test_account();

        assert!(log.is_empty());
        assert!(payments.make_payment(account, 40).is_ok());
        seats.reserve_seats(account, 2);

        assert_eq!(
            log.calls(),
            vec![
                CollaboratorCall::Payment { account_id: account, amount: 40 },
                CollaboratorCall::Reservation { account_id: account, seats: 2 },
            ]
        );
        assert_eq!(log.payments(), vec![(account, 40)]);
        assert_eq!(log.reservations(), vec![(account, 2)]);
    }

    #[test]
    fn test_rejecting_payment_records_then_fails() {
        let log = CallLog::new();
        let payments = RejectingPaymentService::new(log.clone());

        let result = payments.make_payment(test_account(), 20);

        assert!(result.is_err());
        assert_eq!(log.payments().len(), 1);
    }

    fn sum(order: &properties::TicketOrder, category: TicketCategory) -> u32 {
        order
            .lines
            .iter()
            .filter(|line| line.category() == category)
            .map(|line| line.count())
            .sum()
    }

    proptest! {
        #[test]
        fn prop_valid_orders_respect_the_rules(order in valid_order()) {
            prop_assert!(order.adults >= 1);
            prop_assert!(order.total() <= MAX_TICKETS_PER_PURCHASE);
            prop_assert_eq!(sum(&order, TicketCategory::Adult), order.adults);
            prop_assert_eq!(sum(&order, TicketCategory::Child), order.children);
            prop_assert_eq!(sum(&order, TicketCategory::Infant), order.infants);
        }

        #[test]
        fn prop_oversized_orders_exceed_the_limit(order in oversized_order()) {
            prop_assert!(order.total() > MAX_TICKETS_PER_PURCHASE);
            prop_assert!(!order.lines.is_empty());
        }

        #[test]
        fn prop_adultless_orders_have_no_adult_line(order in adultless_order()) {
            prop_assert_eq!(order.adults, 0);
            prop_assert!(order.total() >= 1);
            prop_assert!(order.lines.iter().all(|line| line.category() != TicketCategory::Adult));
        }
    }
}
