//! Single-instrument limit order book with price-time priority matching.
//!
//! ## Architecture
//!
//! The book uses a hybrid data structure:
//!
//! - **Slab**: pre-allocatable storage for resting order nodes
//! - **Ladder** (BTreeMap): sorted price levels per side for best-price access
//! - **HashMap**: order id to slab key mapping for O(1) cancel
//!
//! ## Matching
//!
//! An incoming order consumes liquidity from the opposite ladder best price
//! first, FIFO within each level, at the resting order's price. The unfilled
//! remainder of a limit order rests in its own ladder; market, IOC, and FOK
//! remainders are discarded. A fill-or-kill order is checked for full
//! feasibility before any fill happens.
//!
//! ## Example
//!
//! ```
//! use matchbook::{Order, OrderBook, Side};
//!
//! let mut book = OrderBook::new("BTC-USD");
//!
//! let sell = Order::limit("BTC-USD", Side::Sell, 5_000_000_000_000, 100, 1, "maker");
//! assert!(book.submit(sell, 1).unwrap().is_empty());
//!
//! let buy = Order::limit("BTC-USD", Side::Buy, 5_000_000_000_000, 40, 2, "taker");
//! let trades = book.submit(buy, 2).unwrap();
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity, 40);
//! assert_eq!(book.best_ask(), Some((5_000_000_000_000, 60)));
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use slab::Slab;

use crate::error::BookError;
use crate::orderbook::{Ladder, OrderNode, PriceLevel};
use crate::types::price::fixed_to_decimal;
use crate::types::{Order, OrderId, OrderType, Side, Trade};

// ============================================================================
// Depth snapshot
// ============================================================================

/// Aggregate quantity at one price, as reported by [`OrderBook::depth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    /// Level price in fixed-point (scaled by 10^8)
    pub price: u64,
    /// Total resting quantity at this price
    pub quantity: u64,
}

/// Depth snapshot for both sides, best-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depth {
    /// Bid levels, highest price first
    pub bids: Vec<DepthLevel>,
    /// Ask levels, lowest price first
    pub asks: Vec<DepthLevel>,
}

// ============================================================================
// OrderBook
// ============================================================================

/// Limit order book for a single instrument.
///
/// All operations are synchronous and single-threaded; invariants hold at
/// operation boundaries. Wrap the whole book in a mutex if it must be
/// shared across threads.
#[derive(Debug)]
pub struct OrderBook {
    /// Instrument this book trades
    instrument: String,

    /// Storage for all resting order nodes
    orders: Slab<OrderNode>,

    /// Bid price levels (best = highest)
    bids: Ladder,

    /// Ask price levels (best = lowest)
    asks: Ladder,

    /// Order id to slab key mapping (for O(1) cancel)
    order_index: HashMap<OrderId, usize>,

    /// Append-only record of every execution
    tape: Vec<Trade>,

    /// Price and timestamp of the most recent trade
    last_trade: Option<(u64, u64)>,

    /// Number of resting bid orders
    bid_count: usize,

    /// Number of resting ask orders
    ask_count: usize,
}

/// Whether an incoming limit at `limit_price` can trade against the
/// opposite side's best price.
fn crosses(incoming_side: Side, limit_price: u64, opposite_best: u64) -> bool {
    match incoming_side {
        Side::Buy => limit_price >= opposite_best,
        Side::Sell => limit_price <= opposite_best,
    }
}

/// Select one side's ladder out of the pair.
fn side_ladder<'a>(bids: &'a Ladder, asks: &'a Ladder, side: Side) -> &'a Ladder {
    match side {
        Side::Buy => bids,
        Side::Sell => asks,
    }
}

fn side_ladder_mut<'a>(bids: &'a mut Ladder, asks: &'a mut Ladder, side: Side) -> &'a mut Ladder {
    match side {
        Side::Buy => bids,
        Side::Sell => asks,
    }
}

impl OrderBook {
    /// Create a new empty book for `instrument`.
    ///
    /// # Panics
    ///
    /// Panics if `instrument` is empty.
    pub fn new(instrument: impl Into<String>) -> Self {
        Self::with_capacity(instrument, 0)
    }

    /// Create a book with pre-allocated storage for `order_capacity`
    /// resting orders.
    pub fn with_capacity(instrument: impl Into<String>, order_capacity: usize) -> Self {
        let instrument = instrument.into();
        assert!(!instrument.is_empty(), "instrument must be non-empty");

        Self {
            instrument,
            orders: Slab::with_capacity(order_capacity),
            bids: Ladder::new(Side::Buy),
            asks: Ladder::new(Side::Sell),
            order_index: HashMap::with_capacity(order_capacity),
            tape: Vec::new(),
            last_trade: None,
            bid_count: 0,
            ask_count: 0,
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// The instrument this book trades.
    #[inline]
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Get the current capacity (pre-allocated order slots)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Get the total number of resting orders in the book
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Get the number of resting bid orders
    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    /// Get the number of resting ask orders
    #[inline]
    pub fn ask_count(&self) -> usize {
        self.ask_count
    }

    /// Check if the book has no resting orders
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Get the number of ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    // ========================================================================
    // Submission and Matching
    // ========================================================================

    /// Submit an order, returning the trades it generated in order.
    ///
    /// `now` is the caller's clock in milliseconds; it is stamped onto the
    /// generated trades and should be nondecreasing across calls.
    ///
    /// A fill-or-kill that cannot fill in full, and any immediate order
    /// finding no crossing liquidity, succeed with an empty trade list.
    /// Only contract violations (zero quantity, consumed remaining, wrong
    /// instrument, duplicate id) return `Err`, leaving the book untouched.
    pub fn submit(&mut self, mut order: Order, now: u64) -> Result<Vec<Trade>, BookError> {
        if order.quantity == 0 {
            return Err(BookError::InvalidOrder("quantity must be positive"));
        }
        if order.remaining != order.quantity {
            return Err(BookError::InvalidOrder("remaining must equal the original quantity"));
        }
        if order.instrument != self.instrument {
            return Err(BookError::InvalidOrder("order instrument does not match this book"));
        }
        if self.order_index.contains_key(&order.id) {
            return Err(BookError::InvalidOrder("order id is already resting in this book"));
        }

        let mut trades = Vec::new();

        // All-or-nothing gate: a FOK that cannot fill in full is dropped
        // before it touches any level.
        if order.order_type == OrderType::FillOrKill && !self.fok_fillable(&order) {
            return Ok(trades);
        }

        self.match_incoming(&mut order, now, &mut trades);

        if order.remaining > 0 && order.order_type.rests() {
            self.book_order(order);
        }

        Ok(trades)
    }

    /// Check whether enough opposite liquidity exists within the order's
    /// limit to fill it completely.
    fn fok_fillable(&self, incoming: &Order) -> bool {
        let opposite = side_ladder(&self.bids, &self.asks, incoming.side.opposite());

        let mut available: u64 = 0;
        for (price, level) in opposite.iter() {
            if !crosses(incoming.side, incoming.price, price) {
                break;
            }
            available = available.saturating_add(level.total_quantity());
            if available >= incoming.remaining {
                return true;
            }
        }
        false
    }

    /// Consume opposite-side liquidity until the incoming order is filled,
    /// the opposite ladder drains, or the next best price stops crossing.
    fn match_incoming(&mut self, incoming: &mut Order, now: u64, trades: &mut Vec<Trade>) {
        let resting_side = incoming.side.opposite();

        while incoming.remaining > 0 {
            let Some(best_price) =
                side_ladder(&self.bids, &self.asks, resting_side).best_price()
            else {
                break;
            };

            // Market orders have no price bound and walk the ladder.
            if incoming.order_type != OrderType::Market
                && !crosses(incoming.side, incoming.price, best_price)
            {
                break;
            }

            let head_key = side_ladder(&self.bids, &self.asks, resting_side)
                .get(best_price)
                .and_then(PriceLevel::front)
                .expect("best level is present and non-empty");

            let (resting_id, resting_agent, fill_qty, resting_filled) = {
                let node = self
                    .orders
                    .get_mut(head_key)
                    .expect("queued order is present in the slab");
                let fill_qty = incoming.remaining.min(node.remaining());
                node.fill(fill_qty);
                incoming.remaining -= fill_qty;
                (node.order_id(), node.order.agent_id.clone(), fill_qty, node.is_filled())
            };

            // Trades execute at the resting order's price. The buy side is
            // recorded as the buy side whichever order was aggressive.
            let trade = match incoming.side {
                Side::Buy => Trade::new(
                    self.instrument.clone(),
                    incoming.id,
                    resting_id,
                    incoming.agent_id.clone(),
                    resting_agent,
                    best_price,
                    fill_qty,
                    now,
                ),
                Side::Sell => Trade::new(
                    self.instrument.clone(),
                    resting_id,
                    incoming.id,
                    resting_agent,
                    incoming.agent_id.clone(),
                    best_price,
                    fill_qty,
                    now,
                ),
            };
            self.last_trade = Some((best_price, now));
            trades.push(trade.clone());
            self.tape.push(trade);

            let opposite = side_ladder_mut(&mut self.bids, &mut self.asks, resting_side);
            let level = opposite
                .get_mut(best_price)
                .expect("matched level is still present");

            // The aggregate must drop by the fill in both branches; an
            // exhausted order unlinks with a zero remainder afterwards.
            level.consume(fill_qty);

            if resting_filled {
                level.unlink(head_key, &mut self.orders);
                if level.is_empty() {
                    opposite.remove(best_price);
                }
                self.order_index
                    .remove(&resting_id)
                    .expect("filled order is present in the id index");
                self.orders.remove(head_key);
                match resting_side {
                    Side::Buy => self.bid_count -= 1,
                    Side::Sell => self.ask_count -= 1,
                }
            }
        }
    }

    /// Rest an order's remainder in its own ladder and index it.
    fn book_order(&mut self, order: Order) {
        let id = order.id;
        let side = order.side;
        let price = order.price;

        let key = self.orders.insert(OrderNode::new(order));
        self.order_index.insert(id, key);

        let ladder = side_ladder_mut(&mut self.bids, &mut self.asks, side);
        ladder.get_or_create(price).enqueue(key, &mut self.orders);

        match side {
            Side::Buy => self.bid_count += 1,
            Side::Sell => self.ask_count += 1,
        }
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Cancel a resting order's unfilled remainder.
    ///
    /// Returns `false` if the id is unknown (never booked, already filled,
    /// or already cancelled); the book is left unchanged in that case.
    /// Trades executed before the cancel are final.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        let Some(&key) = self.order_index.get(&order_id) else {
            return false;
        };

        let (side, price) = {
            let node = self
                .orders
                .get(key)
                .expect("indexed order is present in the slab");
            (node.order.side, node.order.price)
        };

        let ladder = side_ladder_mut(&mut self.bids, &mut self.asks, side);
        let level = ladder
            .get_mut(price)
            .expect("indexed order has a price level");
        level.unlink(key, &mut self.orders);
        if level.is_empty() {
            ladder.remove(price);
        }

        self.order_index.remove(&order_id);
        self.orders.remove(key);
        match side {
            Side::Buy => self.bid_count -= 1,
            Side::Sell => self.ask_count -= 1,
        }
        true
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Check if an order is resting in the book
    #[inline]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Get a resting order by id
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let key = *self.order_index.get(&order_id)?;
        Some(&self.orders.get(key).expect("indexed order is present in the slab").order)
    }

    // ========================================================================
    // Market Data Queries (read-only)
    // ========================================================================

    /// Best bid as `(price, aggregate quantity)`, or `None` if no bids rest.
    pub fn best_bid(&self) -> Option<(u64, u64)> {
        self.bids.best_level().map(|level| (level.price(), level.total_quantity()))
    }

    /// Best ask as `(price, aggregate quantity)`, or `None` if no asks rest.
    pub fn best_ask(&self) -> Option<(u64, u64)> {
        self.asks.best_level().map(|level| (level.price(), level.total_quantity()))
    }

    /// Best ask minus best bid, when both sides exist.
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }

    /// Exact midpoint of the best bid and ask, when both sides exist.
    ///
    /// Returned as a `Decimal` because the midpoint of an odd-tick spread
    /// falls between two ticks.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => {
                Some((fixed_to_decimal(bid) + fixed_to_decimal(ask)) / Decimal::from(2))
            }
            _ => None,
        }
    }

    /// Up to `levels` price levels per side, best-first.
    ///
    /// A side with fewer populated levels returns what exists; the result
    /// is never padded.
    pub fn depth(&self, levels: usize) -> Depth {
        let snapshot = |ladder: &Ladder| {
            ladder
                .iter()
                .take(levels)
                .map(|(price, level)| DepthLevel {
                    price,
                    quantity: level.total_quantity(),
                })
                .collect()
        };

        Depth {
            bids: snapshot(&self.bids),
            asks: snapshot(&self.asks),
        }
    }

    /// Price and timestamp of the most recent trade, or `None` if the book
    /// has not traded yet.
    #[inline]
    pub fn last_trade(&self) -> Option<(u64, u64)> {
        self.last_trade
    }

    // ========================================================================
    // Trade Tape
    // ========================================================================

    /// Every trade executed by this book, in execution order.
    #[inline]
    pub fn tape(&self) -> &[Trade] {
        &self.tape
    }

    /// Take the accumulated tape, leaving it empty.
    ///
    /// Long-running simulations call this periodically to bound memory;
    /// `last_trade` is unaffected.
    pub fn drain_tape(&mut self) -> Vec<Trade> {
        std::mem::take(&mut self.tape)
    }

    // ========================================================================
    // Book Access
    // ========================================================================

    /// Get a reference to the order node storage
    #[inline]
    pub fn orders(&self) -> &Slab<OrderNode> {
        &self.orders
    }

    /// Get a reference to the bid ladder
    #[inline]
    pub fn bids(&self) -> &Ladder {
        &self.bids
    }

    /// Get a reference to the ask ladder
    #[inline]
    pub fn asks(&self) -> &Ladder {
        &self.asks
    }

    /// Clear all resting orders, the tape, and the last-trade cache.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.asks.clear();
        self.order_index.clear();
        self.tape.clear();
        self.last_trade = None;
        self.bid_count = 0;
        self.ask_count = 0;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
