//! Cinema ticket purchases.
//!
//! Validates a ticket request for one account, prices it and, when valid,
//! hands payment and seat reservation to external collaborators.
//!
//! # Rules
//!
//! | Category | Price | Seat |
//! |---|---|---|
//! | Adult | 20 | yes |
//! | Child | 10 | yes |
//! | Infant | 0 | no (sits on an adult's lap) |
//!
//! - At most 20 tickets per purchase, across all categories.
//! - At least one adult ticket; child and infant tickets cannot be bought alone.
//! - Payment is taken before seats are reserved, and seats are never reserved
//!   when payment fails.
//!
//! # Quick Start
//!
//! ```no_run
//! use cinema_tickets::{
//!     AccountId, LoggingPaymentGateway, LoggingSeatReservationGateway, TicketRequestLine,
//!     TicketService,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TicketService::new(
//!     LoggingPaymentGateway::new().shared(),
//!     LoggingSeatReservationGateway::shared(),
//! );
//!
//! let account = AccountId::new(1).ok_or("account ids are positive")?;
//! service.purchase_tickets(
//!     account,
//!     &[TicketRequestLine::adults(2), TicketRequestLine::children(1)],
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateways;
pub mod purchase;
pub mod service;
pub mod tally;

// Re-export commonly used types
pub use cinema_tickets_core::environment::{SeatReservationService, TicketPaymentService};
pub use cinema_tickets_core::error::{CollaboratorError, ParseError};
pub use cinema_tickets_core::types::{
    AccountId, TicketCategory, TicketRequestLine, MAX_TICKETS_PER_PURCHASE,
};
pub use config::Config;
pub use error::{PurchaseError, PurchaseErrorKind};
pub use gateways::{LoggingPaymentGateway, LoggingSeatReservationGateway};
pub use purchase::{PurchaseAction, PurchaseEnvironment, PurchaseReducer, PurchaseState, PurchaseStatus};
pub use service::TicketService;
pub use tally::TicketTally;
