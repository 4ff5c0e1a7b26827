//! Order types for the matchbook engine.
//!
//! ## Identity
//!
//! Every order carries an [`OrderId`] (random v4 UUID) assigned when the
//! order is created. Ids are opaque and unique across books; the engine
//! never reassigns them.
//!
//! ## Fixed-Point Representation
//!
//! Prices are stored as u64 scaled by 10^8 (see [`crate::types::price`]).
//! Quantities are plain integer units. Timestamps are caller-supplied
//! milliseconds; the engine never reads a clock.

use std::fmt;

use uuid::Uuid;

// ============================================================================
// OrderId
// ============================================================================

/// Opaque unique order identifier.
///
/// Backed by a random (v4) UUID so ids are unique across books without
/// coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Buy order (bid) - wants to purchase the instrument
    Buy,
    /// Sell order (ask) - wants to sell the instrument
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// OrderType enum
// ============================================================================

/// Order type enumeration.
///
/// Only `Limit` orders may rest in the book; the other three execute
/// immediately to whatever extent they can and never leave a residual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// Executes at the limit price or better; the unfilled remainder rests
    Limit,
    /// No price bound; consumes liquidity at whatever the book offers
    Market,
    /// Executes what it can immediately, the remainder is discarded
    ImmediateOrCancel,
    /// Executes in full immediately or not at all
    FillOrKill,
}

impl OrderType {
    /// Whether an unfilled remainder of this type rests in the book
    pub fn rests(self) -> bool {
        matches!(self, OrderType::Limit)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order submitted to the book.
///
/// ## Fields
///
/// `price` uses fixed-point representation (scaled by 10^8) and is ignored
/// for `Market` orders. `remaining` starts equal to `quantity` and is
/// decremented as the order fills; `0 <= remaining <= quantity` always
/// holds.
///
/// ## Example
///
/// ```
/// use matchbook::{Order, OrderType, Side};
///
/// // Buy 100 units at 50000.00000000
/// let order = Order::limit(
///     "BTC-USD",
///     Side::Buy,
///     5_000_000_000_000,
///     100,
///     1_703_577_600_000,
///     "agent-1",
/// );
/// assert_eq!(order.order_type, OrderType::Limit);
/// assert_eq!(order.remaining, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique order identifier, assigned at creation
    pub id: OrderId,

    /// Instrument this order trades
    pub instrument: String,

    /// Buy or Sell
    pub side: Side,

    /// Limit / Market / ImmediateOrCancel / FillOrKill
    pub order_type: OrderType,

    /// Limit price in fixed-point (scaled by 10^8); 0 and ignored for Market
    pub price: u64,

    /// Original quantity in integer units
    pub quantity: u64,

    /// Remaining quantity (decremented by fills)
    pub remaining: u64,

    /// Submission timestamp in milliseconds, supplied by the caller
    pub timestamp: u64,

    /// Identifier of the agent that owns this order
    pub agent_id: String,
}

impl Order {
    /// Create a new order of any type.
    ///
    /// # Arguments
    ///
    /// * `instrument` - Instrument identifier
    /// * `side` - Buy or Sell
    /// * `order_type` - Limit / Market / ImmediateOrCancel / FillOrKill
    /// * `price` - Limit price in fixed-point (scaled by 10^8)
    /// * `quantity` - Quantity in integer units
    /// * `timestamp` - Submission time in milliseconds
    /// * `agent_id` - Owning agent identifier
    pub fn new(
        instrument: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: u64,
        quantity: u64,
        timestamp: u64,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            instrument: instrument.into(),
            side,
            order_type,
            price,
            quantity,
            remaining: quantity,
            timestamp,
            agent_id: agent_id.into(),
        }
    }

    /// Create a limit order.
    pub fn limit(
        instrument: impl Into<String>,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
        agent_id: impl Into<String>,
    ) -> Self {
        Self::new(instrument, side, OrderType::Limit, price, quantity, timestamp, agent_id)
    }

    /// Create a market order. The price field is left at 0 and never read.
    pub fn market(
        instrument: impl Into<String>,
        side: Side,
        quantity: u64,
        timestamp: u64,
        agent_id: impl Into<String>,
    ) -> Self {
        Self::new(instrument, side, OrderType::Market, 0, quantity, timestamp, agent_id)
    }

    /// Create an immediate-or-cancel order.
    pub fn immediate_or_cancel(
        instrument: impl Into<String>,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
        agent_id: impl Into<String>,
    ) -> Self {
        Self::new(
            instrument,
            side,
            OrderType::ImmediateOrCancel,
            price,
            quantity,
            timestamp,
            agent_id,
        )
    }

    /// Create a fill-or-kill order.
    pub fn fill_or_kill(
        instrument: impl Into<String>,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
        agent_id: impl Into<String>,
    ) -> Self {
        Self::new(instrument, side, OrderType::FillOrKill, price, quantity, timestamp, agent_id)
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Get the filled quantity
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// Fill a portion of this order.
    ///
    /// # Returns
    ///
    /// The actual quantity filled (capped at the remaining quantity)
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.remaining);
        self.remaining -= actual_fill;
        actual_fill
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
