//! Inbox Digest Example
//!
//! Builds a pipeline from the bundled default fixtures, runs a small inbox
//! through it and prints the ranked offers, then the same offers as JSON.
//! Two of the emails carry the same code, and one is a receipt with no offer.
//!
//! Run with: `cargo run --example inbox_digest`

use std::io;

use anyhow::{Result, anyhow};
use jiff::civil::date;

use promo_sift::{fixtures::Fixture, messages::RawMessage, report};

/// Inbox Digest Example
pub fn main() -> Result<()> {
    let pipeline = Fixture::from_set("default")?.pipeline()?;

    let inbox = [
        RawMessage::new(
            "Sephora - Beauty Insider Event",
            "Sephora Deals <deals@sephora.com>",
            "Take 20% off skincare and makeup with code GLOW20. Offer ends October 28, 2025.",
        ),
        RawMessage::new(
            "Psst... your code is inside",
            "Sephora <deals@sephora.com>",
            "Reminder: GLOW20 still works. Enter code GLOW20 at checkout.",
        ),
        RawMessage::new(
            "Your order has shipped",
            "orders@shop.com",
            "Thanks for shopping with us!",
        ),
        RawMessage::new(
            "Burger Barn: Weekend feast",
            "noreply@burgerbarn.com",
            "Save $10 on any burger meal over $30. Use promo code BARN10, valid until 10/26/2025.",
        ),
    ];

    let (offers, stats) = pipeline.run_with_stats(&inbox, date(2025, 10, 20));

    if offers.is_empty() {
        return Err(anyhow!("expected offers in the demo inbox"));
    }

    let mut out = io::stdout().lock();

    report::write_table(&mut out, &offers)?;
    report::write_json(&mut out, &offers)?;

    #[expect(clippy::print_stdout, reason = "Example code")]
    {
        println!(
            "{} messages, {} skipped, {} duplicates merged",
            stats.messages,
            stats.skipped,
            stats.candidates - stats.unique
        );
    }

    Ok(())
}
