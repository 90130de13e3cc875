//! Integration test for the demo fixture set.
//!
//! Eight promotional emails, each carrying one offer. Evaluated on 2025-10-18 the
//! expected ranking is:
//!
//! 1. Ticketmaster, MUSIC50, $50 off, expires today (Critical)
//! 2. DoorDash, FEAST50, 50% off, expires tomorrow (Critical)
//! 3. Southwest Airlines, FLIGHT40, 40% off, 2 days (High)
//! 4. Target, SHIP15FREE, 15% off, 4 days (Medium)
//! 5. Best Buy, no code, 20% off, 6 days (Medium)
//! 6. Papa John's, BOGO2024, buy one get one free, 7 days (Medium)
//! 7. Expedia, CYBER60, 60% off, 12 days (Low)
//! 8. Nordstrom, SAVE25NOW, 25% off, 14 days (Low)
//!
//! Three days later the first three have expired and are dropped.

use jiff::civil::date;
use rust_decimal::Decimal;
use testresult::TestResult;

use promo_sift::{
    fixtures::Fixture,
    offers::{EnrichedOffer, PromoCode, UrgencyTier},
    pipeline::RunStats,
    report::{self, OfferFilter, OfferSummary},
};

fn codes(offers: &[EnrichedOffer]) -> Vec<Option<&str>> {
    offers
        .iter()
        .map(|offer| offer.offer.code.as_ref().map(PromoCode::as_str))
        .collect()
}

#[test]
fn demo_batch_ranks_all_offers() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let pipeline = fixture.pipeline()?;

    let (offers, stats) = pipeline.run_with_stats(fixture.messages(), date(2025, 10, 18));

    assert_eq!(
        stats,
        RunStats {
            messages: 8,
            skipped: 0,
            candidates: 8,
            unique: 8,
            expired: 0,
            emitted: 8,
        }
    );

    assert_eq!(
        codes(&offers),
        [
            Some("MUSIC50"),
            Some("FEAST50"),
            Some("FLIGHT40"),
            Some("SHIP15FREE"),
            None,
            Some("BOGO2024"),
            Some("CYBER60"),
            Some("SAVE25NOW"),
        ]
    );

    let merchants: Vec<&str> = offers.iter().map(|offer| offer.offer.merchant.as_str()).collect();

    assert_eq!(
        merchants,
        [
            "Ticketmaster",
            "DoorDash",
            "Southwest Airlines",
            "Target",
            "Best Buy",
            "Papa John's",
            "Expedia",
            "Nordstrom",
        ]
    );

    let days: Vec<Option<i32>> = offers.iter().map(|offer| offer.days_left).collect();

    assert_eq!(
        days,
        [Some(0), Some(1), Some(2), Some(4), Some(6), Some(7), Some(12), Some(14)]
    );

    let tiers: Vec<UrgencyTier> = offers.iter().map(|offer| offer.urgency).collect();

    assert_eq!(
        tiers,
        [
            UrgencyTier::Critical,
            UrgencyTier::Critical,
            UrgencyTier::High,
            UrgencyTier::Medium,
            UrgencyTier::Medium,
            UrgencyTier::Medium,
            UrgencyTier::Low,
            UrgencyTier::Low,
        ]
    );

    Ok(())
}

#[test]
fn demo_batch_fields() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let offers = fixture.pipeline()?.run(fixture.messages(), date(2025, 10, 18));

    let summary: Vec<(&str, &str, Decimal)> = offers
        .iter()
        .map(|offer| {
            (
                offer.offer.discount.as_str(),
                offer.offer.category.as_str(),
                offer.discount_score,
            )
        })
        .collect();

    assert_eq!(
        summary,
        [
            ("$50 off", "Entertainment", Decimal::from(100)),
            ("50% off", "Food & Dining", Decimal::from(50)),
            ("40% off", "Travel", Decimal::from(40)),
            ("15% off", "Shopping", Decimal::from(15)),
            ("20% off", "Electronics", Decimal::from(20)),
            ("Buy one get one free", "Food & Dining", Decimal::from(50)),
            ("60% off", "Travel", Decimal::from(60)),
            ("25% off", "Fashion", Decimal::from(25)),
        ]
    );

    let labels: Vec<String> = offers.iter().map(EnrichedOffer::urgency_label).collect();

    assert_eq!(labels.first().map(String::as_str), Some("Today"));
    assert_eq!(labels.get(1).map(String::as_str), Some("Tomorrow"));
    assert_eq!(labels.get(2).map(String::as_str), Some("2 days"));

    Ok(())
}

#[test]
fn expired_offers_are_dropped_later() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let (offers, stats) = fixture
        .pipeline()?
        .run_with_stats(fixture.messages(), date(2025, 10, 21));

    assert_eq!(stats.expired, 3);
    assert_eq!(
        codes(&offers),
        [
            Some("SHIP15FREE"),
            None,
            Some("BOGO2024"),
            Some("CYBER60"),
            Some("SAVE25NOW"),
        ]
    );
    assert!(
        offers.iter().all(|offer| offer.days_left.is_some_and(|days| days >= 0)),
        "no expired offer may be emitted"
    );

    Ok(())
}

#[test]
fn repeated_batch_collapses_to_the_same_offers() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let pipeline = fixture.pipeline()?;
    let today = date(2025, 10, 18);

    let doubled: Vec<_> = fixture
        .messages()
        .iter()
        .chain(fixture.messages())
        .cloned()
        .collect();

    let (offers, stats) = pipeline.run_with_stats(&doubled, today);

    assert_eq!(stats.candidates, 16);
    assert_eq!(stats.unique, 8);
    assert_eq!(offers, pipeline.run(fixture.messages(), today));

    Ok(())
}

#[test]
fn filtered_views_and_summary() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let offers = fixture.pipeline()?.run(fixture.messages(), date(2025, 10, 18));

    let travel = OfferFilter::all().in_category("Travel").apply(&offers);
    let soon = OfferFilter::all().expiring_soon().apply(&offers);

    assert_eq!(travel.len(), 2);
    assert_eq!(soon.len(), 6);

    let summary = OfferSummary::from_offers(&offers);

    assert_eq!(summary.total, 8);
    assert_eq!(summary.with_code, 7);
    assert_eq!(summary.expiring_soon, 6);

    let mut out = Vec::new();
    report::write_table(&mut out, soon)?;
    let output = String::from_utf8(out)?;

    assert!(output.contains("Ticketmaster"), "table should list Ticketmaster");
    assert!(!output.contains("Nordstrom"), "Nordstrom expires in 14 days");

    Ok(())
}
