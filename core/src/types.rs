//! Domain value types for ticket purchases.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Most tickets a single purchase may contain, across all categories
pub const MAX_TICKETS_PER_PURCHASE: u32 = 20;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of the purchasing account
///
/// Always positive: a zero (or missing) account cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(NonZeroU64);

impl AccountId {
    /// Creates an `AccountId`, returning `None` for zero
    #[must_use]
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Get the raw identifier
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0.get()
    }
}

impl FromStr for AccountId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseError::InvalidAccountId(s.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ticket categories
// ============================================================================

/// Ticket category, which decides price and seat allocation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    /// Under-twos: free, sit on an adult's lap
    Infant,
    /// Children: half price, own seat
    Child,
    /// Adults: full price, own seat
    Adult,
}

impl TicketCategory {
    /// All categories, in price order
    pub const ALL: [Self; 3] = [Self::Infant, Self::Child, Self::Adult];

    /// Fixed unit price in currency-agnostic integer units
    #[must_use]
    pub const fn unit_price(self) -> u32 {
        match self {
            Self::Infant => 0,
            Self::Child => 10,
            Self::Adult => 20,
        }
    }

    /// Whether a ticket of this category gets its own seat
    #[must_use]
    pub const fn allocates_seat(self) -> bool {
        !matches!(self, Self::Infant)
    }

    /// Upper-case name used in request lines
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infant => "INFANT",
            Self::Child => "CHILD",
            Self::Adult => "ADULT",
        }
    }
}

impl FromStr for TicketCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseError::UnknownCategory(name.to_string()))
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request lines
// ============================================================================

/// One line of a purchase request: a category and how many tickets of it
///
/// Immutable once built. Several lines for the same category add up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketRequestLine {
    category: TicketCategory,
    count: u32,
}

impl TicketRequestLine {
    /// Creates a request line
    #[must_use]
    pub const fn new(category: TicketCategory, count: u32) -> Self {
        Self { category, count }
    }

    /// Shorthand for an adult line
    #[must_use]
    pub const fn adults(count: u32) -> Self {
        Self::new(TicketCategory::Adult, count)
    }

    /// Shorthand for a child line
    #[must_use]
    pub const fn children(count: u32) -> Self {
        Self::new(TicketCategory::Child, count)
    }

    /// Shorthand for an infant line
    #[must_use]
    pub const fn infants(count: u32) -> Self {
        Self::new(TicketCategory::Infant, count)
    }

    /// Ticket category of this line
    #[must_use]
    pub const fn category(&self) -> TicketCategory {
        self.category
    }

    /// Number of tickets on this line
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }
}

/// Parses `CATEGORY:COUNT` (or `CATEGORY=COUNT`), e.g. `adult:2`
impl FromStr for TicketRequestLine {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, count) = s
            .split_once([':', '='])
            .ok_or_else(|| ParseError::MalformedLine(s.to_string()))?;

        let category = name.parse()?;
        let count = count
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidCount(count.trim().to_string()))?;

        Ok(Self::new(category, count))
    }
}

impl fmt::Display for TicketRequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.count)
    }
}
