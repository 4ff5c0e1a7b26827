//! Trade type representing an executed match between two orders.
//!
//! ## Price Discovery
//!
//! A trade always executes at the resting (passive) order's price,
//! regardless of which side was aggressive. The buy side is always recorded
//! as `buy_order_id`, so downstream consumers never need to know who
//! crossed the spread.

use std::fmt;

use uuid::Uuid;

use crate::types::OrderId;

// ============================================================================
// TradeId
// ============================================================================

/// Opaque unique trade identifier (random v4 UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradeId(Uuid);

impl TradeId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Trade struct
// ============================================================================

/// An immutable record of a single execution between a buy and a sell order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    /// Unique trade identifier, assigned at creation
    pub id: TradeId,

    /// Instrument the trade executed on
    pub instrument: String,

    /// Id of the buy order, whether it was aggressive or resting
    pub buy_order_id: OrderId,

    /// Id of the sell order, whether it was aggressive or resting
    pub sell_order_id: OrderId,

    /// Agent that owns the buy order
    pub buy_agent_id: String,

    /// Agent that owns the sell order
    pub sell_agent_id: String,

    /// Execution price in fixed-point (scaled by 10^8).
    /// Always the resting order's price
    pub price: u64,

    /// Executed quantity in integer units (always positive)
    pub quantity: u64,

    /// Execution timestamp in milliseconds
    pub timestamp: u64,
}

impl Trade {
    /// Create a new trade record.
    ///
    /// # Arguments
    ///
    /// * `instrument` - Instrument identifier
    /// * `buy_order_id` / `sell_order_id` - Participating order ids by side
    /// * `buy_agent_id` / `sell_agent_id` - Owning agents by side
    /// * `price` - Execution price (the resting order's price, fixed-point)
    /// * `quantity` - Executed quantity in integer units
    /// * `timestamp` - Execution time in milliseconds
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instrument: impl Into<String>,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        buy_agent_id: impl Into<String>,
        sell_agent_id: impl Into<String>,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id: TradeId::new(),
            instrument: instrument.into(),
            buy_order_id,
            sell_order_id,
            buy_agent_id: buy_agent_id.into(),
            sell_agent_id: sell_agent_id.into(),
            price,
            quantity,
            timestamp,
        }
    }

    /// Calculate the notional value of this trade (price * quantity).
    ///
    /// The result keeps the price's 10^8 scaling; divide by SCALE to get
    /// the actual notional.
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.quantity as u128)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
