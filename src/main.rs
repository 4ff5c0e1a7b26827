//! matchbook - Demo Binary
//!
//! Walks through a small trading session against a fresh book: resting
//! liquidity, a market sweep, and the standard top-of-book queries.

use matchbook::types::price::{from_fixed, from_fixed_trimmed, to_fixed};
use matchbook::{Order, OrderBook, Side};

fn main() {
    println!("===========================================");
    println!("  matchbook - limit order book demo");
    println!("===========================================");
    println!();

    let mut book = OrderBook::with_capacity("ACME", 1024);

    // Seed both sides with resting limit orders
    println!("Resting liquidity:");
    let resting = [
        (Side::Buy, "9.95", 100),
        (Side::Buy, "9.90", 200),
        (Side::Sell, "10.00", 150),
        (Side::Sell, "10.05", 250),
    ];
    for (i, (side, price, qty)) in resting.iter().enumerate() {
        let order = Order::limit("ACME", *side, to_fixed(price).unwrap(), *qty, i as u64, "maker");
        println!("  {:?} {} @ {}", side, qty, price);
        book.submit(order, i as u64).expect("valid order");
    }
    println!();

    println!("Top of book:");
    print_top(&book);
    println!();

    // A market buy sweeps the ask side
    println!("Submitting BUY MARKET 200...");
    let trades = book
        .submit(Order::market("ACME", Side::Buy, 200, 10, "taker"), 10)
        .expect("valid order");
    for trade in &trades {
        println!(
            "  trade: {} @ {} (buyer={}, seller={})",
            trade.quantity,
            from_fixed(trade.price),
            trade.buy_agent_id,
            trade.sell_agent_id,
        );
    }
    println!();

    println!("Top of book after the sweep:");
    print_top(&book);
    println!();

    println!("Tape holds {} trades", book.tape().len());
    if let Some((price, ts)) = book.last_trade() {
        println!("Last trade: {} at t={}", from_fixed_trimmed(price), ts);
    }
}

fn print_top(book: &OrderBook) {
    match book.best_bid() {
        Some((price, qty)) => println!("  best bid: {} x {}", from_fixed(price), qty),
        None => println!("  best bid: (none)"),
    }
    match book.best_ask() {
        Some((price, qty)) => println!("  best ask: {} x {}", from_fixed(price), qty),
        None => println!("  best ask: (none)"),
    }
    match book.spread() {
        Some(spread) => println!("  spread:   {}", from_fixed(spread)),
        None => println!("  spread:   (none)"),
    }
    match book.mid_price() {
        Some(mid) => println!("  mid:      {}", mid),
        None => println!("  mid:      (none)"),
    }
}
