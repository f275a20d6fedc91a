//! Per-category ticket totals, pricing and the purchase rules.

use crate::error::PurchaseError;
use cinema_tickets_core::types::{TicketCategory, TicketRequestLine, MAX_TICKETS_PER_PURCHASE};
use serde::{Deserialize, Serialize};

/// Ticket counts summed per category across every request line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTally {
    /// Adult tickets
    pub adults: u32,
    /// Child tickets
    pub children: u32,
    /// Infant tickets
    pub infants: u32,
}

impl TicketTally {
    /// Sum the lines per category
    ///
    /// Sums saturate instead of wrapping, so an absurd request still lands
    /// above the ticket limit.
    #[must_use]
    pub fn from_lines(lines: &[TicketRequestLine]) -> Self {
        lines.iter().fold(Self::default(), |mut tally, line| {
            let slot = match line.category() {
                TicketCategory::Adult => &mut tally.adults,
                TicketCategory::Child => &mut tally.children,
                TicketCategory::Infant => &mut tally.infants,
            };
            *slot = slot.saturating_add(line.count());
            tally
        })
    }

    /// Tickets across all categories
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.children)
            .saturating_add(self.infants)
    }

    /// Tickets of one category
    #[must_use]
    pub const fn count(&self, category: TicketCategory) -> u32 {
        match category {
            TicketCategory::Adult => self.adults,
            TicketCategory::Child => self.children,
            TicketCategory::Infant => self.infants,
        }
    }

    /// Amount to charge
    #[must_use]
    pub fn price(&self) -> u32 {
        TicketCategory::ALL
            .into_iter()
            .map(|category| category.unit_price().saturating_mul(self.count(category)))
            .fold(0, u32::saturating_add)
    }

    /// Seats to reserve; infants sit on a lap
    #[must_use]
    pub fn seats(&self) -> u32 {
        TicketCategory::ALL
            .into_iter()
            .filter(|category| category.allocates_seat())
            .map(|category| self.count(category))
            .fold(0, u32::saturating_add)
    }

    /// Check the purchase rules, first failure wins
    ///
    /// 1. At most [`MAX_TICKETS_PER_PURCHASE`] tickets.
    /// 2. At least one adult. This also rules out child or infant tickets
    ///    bought on their own, and a request whose lines are all zero.
    ///
    /// # Errors
    ///
    /// [`PurchaseError::TicketLimitExceeded`] or
    /// [`PurchaseError::AdultTicketRequired`].
    pub fn validate(&self) -> Result<(), PurchaseError> {
        let requested = self.total();
        if requested > MAX_TICKETS_PER_PURCHASE {
            return Err(PurchaseError::TicketLimitExceeded {
                requested,
                limit: MAX_TICKETS_PER_PURCHASE,
            });
        }

        if self.adults < 1 {
            return Err(PurchaseError::AdultTicketRequired);
        }

        Ok(())
    }
}
