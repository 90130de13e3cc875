//! Report
//!
//! Renders offers for people (a table) and for other programs (JSON records).

use std::{fmt::Write as _, io};

use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Color, Style, Theme, object::Rows},
};
use thiserror::Error;

use crate::offers::{EnrichedOffer, UrgencyTier};

pub mod records;
pub mod summary;

pub use records::{OfferRecord, to_records};
pub use summary::{EXPIRING_SOON_DAYS, OfferFilter, OfferSummary};

/// Errors writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the output failed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Serialising records failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

const HEADERS: [&str; 6] = ["Urgency", "Merchant", "Discount", "Code", "Category", "Expires"];

const URGENCY_COLUMN: usize = 0;
const CODE_COLUMN: usize = 3;
const EXPIRES_COLUMN: usize = 5;

/// Write offers as a table followed by a short summary.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_table<'a>(
    out: &mut impl io::Write,
    offers: impl IntoIterator<Item = &'a EnrichedOffer>,
) -> Result<(), ReportError> {
    let offers: Vec<&EnrichedOffer> = offers.into_iter().collect();

    if offers.is_empty() {
        writeln!(out, "\nNo offers found.\n")?;

        return Ok(());
    }

    let mut builder = Builder::default();
    let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

    builder.push_record(HEADERS);

    for (idx, offer) in offers.iter().enumerate() {
        let row = idx + 1;

        builder.push_record([
            offer.urgency_label(),
            offer.offer.merchant.clone(),
            offer.display_discount().to_string(),
            offer
                .offer
                .code
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            offer.offer.category.to_string(),
            offer.display_expiration().to_string(),
        ]);

        if let Some(color) = urgency_color(offer.urgency) {
            color_ops.push((row, URGENCY_COLUMN, color));
        }

        if offer.offer.code.is_none() {
            color_ops.push((row, CODE_COLUMN, color_dark_grey()));
        }

        if offer.days_left.is_none() {
            color_ops.push((row, EXPIRES_COLUMN, color_dark_grey()));
        }
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}")?;

    write_summary(out, &OfferSummary::from_offers(offers))
}

fn write_summary(out: &mut impl io::Write, summary: &OfferSummary) -> Result<(), ReportError> {
    writeln!(out, " \x1b[1mOffers:\x1b[0m {}", summary.total)?;
    writeln!(
        out,
        " Expiring within {EXPIRING_SOON_DAYS} days: {}",
        summary.expiring_soon
    )?;
    writeln!(out, " With promo code: {}", summary.with_code)?;

    let categories = summary
        .by_category
        .iter()
        .map(|(category, count)| format!("{category} ({count})"))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(out, " Categories: {categories}")?;
    writeln!(out)?;

    Ok(())
}

/// Write offers as a pretty-printed JSON array of [`OfferRecord`]s.
///
/// # Errors
///
/// Returns an error if serialisation or writing fails.
pub fn write_json<'a>(
    out: &mut impl io::Write,
    offers: impl IntoIterator<Item = &'a EnrichedOffer>,
) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *out, &to_records(offers))?;
    writeln!(out)?;

    Ok(())
}

fn urgency_color(urgency: UrgencyTier) -> Option<Color> {
    match urgency {
        UrgencyTier::Critical => Some(Color::FG_RED),
        UrgencyTier::High => Some(Color::FG_YELLOW),
        UrgencyTier::Medium => Some(Color::FG_GREEN),
        UrgencyTier::Low | UrgencyTier::Unknown => Some(color_dark_grey()),
        UrgencyTier::Expired => None,
    }
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in dark-grey escapes,
/// leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
