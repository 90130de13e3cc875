//! Worked examples run against the default configuration.

use jiff::civil::date;
use rust_decimal::Decimal;
use testresult::TestResult;

use promo_sift::{
    enrich::Enricher,
    fixtures::Fixture,
    messages::RawMessage,
    offers::{OfferCandidate, UrgencyTier},
};

#[test]
fn airline_email_yields_one_travel_offer() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let pipeline = fixture.pipeline()?;

    let message = RawMessage::new(
        "Southwest Airlines - Flash Sale",
        "deals@southwest.com",
        "Use promo code FLIGHT40 at checkout to save 40% off on all flights. \
         This incredible offer expires October 20, 2025.",
    );

    let candidates = pipeline.candidates_for(&message);
    let [candidate] = candidates.as_slice() else {
        return Err(format!("expected one candidate, got {candidates:?}").into());
    };

    assert_eq!(candidate.code.as_ref().map(ToString::to_string).as_deref(), Some("FLIGHT40"));
    assert_eq!(candidate.discount, "40% off");
    assert_eq!(candidate.merchant, "Southwest Airlines");
    assert_eq!(candidate.category.as_str(), "Travel");
    assert_eq!(candidate.expiration_text.as_deref(), Some("October 20, 2025"));

    let offers = pipeline.run(&[message], date(2025, 10, 18));
    let [offer] = offers.as_slice() else {
        return Err("expected one offer".into());
    };

    assert_eq!(offer.discount_score, Decimal::from(40));
    assert_eq!(offer.days_left, Some(2));
    assert_eq!(offer.urgency, UrgencyTier::High);

    Ok(())
}

#[test]
fn same_code_in_two_emails_is_one_offer() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let pipeline = fixture.pipeline()?;

    let messages = [
        RawMessage::new(
            "Nordstrom - Your exclusive 25% discount awaits",
            "offers@nordstrom.com",
            "Save 25% on your entire purchase. Use code: SAVE25NOW",
        ),
        RawMessage::new(
            "Nordstrom - Reminder",
            "Nordstrom <offers@nordstrom.com>",
            "Your code SAVE25NOW is waiting. Ends: November 1, 2025",
        ),
    ];

    let offers = pipeline.run(&messages, date(2025, 10, 18));
    let [offer] = offers.as_slice() else {
        return Err(format!("expected one offer, got {}", offers.len()).into());
    };

    assert_eq!(offer.offer.merchant, "Nordstrom");
    assert_eq!(offer.offer.discount, "25% off");
    assert_eq!(offer.offer.expiration_text.as_deref(), Some("November 1, 2025"));

    Ok(())
}

#[test]
fn thank_you_note_has_no_offer() -> TestResult {
    let pipeline = Fixture::from_set("default")?.pipeline()?;

    let message = RawMessage::new("Your order", "Shop <orders@shop.com>", "Thanks for shopping with us!");

    assert!(pipeline.candidates_for(&message).is_empty(), "no code and no discount");

    Ok(())
}

#[test]
fn unparseable_expiration_is_kept_as_unknown() -> TestResult {
    let config = Fixture::from_set("default")?.config()?;
    let enricher = Enricher::new(&config.extraction)?;

    let (offers, expired) = enricher.enrich_batch(
        vec![OfferCandidate {
            merchant: "Acme".to_string(),
            discount: "10% off".to_string(),
            expiration_text: Some("sometime soon".to_string()),
            ..OfferCandidate::default()
        }],
        date(2025, 10, 18),
    );

    let [offer] = offers.as_slice() else {
        return Err("expected the offer to be kept".into());
    };

    assert_eq!(offer.expiration_date, None);
    assert_eq!(offer.days_left, None);
    assert_eq!(offer.urgency, UrgencyTier::Unknown);
    assert!(!offer.is_expired, "unknown is not expired");
    assert_eq!(expired, 0);

    Ok(())
}

#[test]
fn dollar_offer_outranks_percentage_offer() -> TestResult {
    let config = Fixture::from_set("default")?.config()?;
    let enricher = Enricher::new(&config.extraction)?;

    let candidate = |discount: &str| OfferCandidate {
        merchant: "Acme".to_string(),
        discount: discount.to_string(),
        ..OfferCandidate::default()
    };

    let (offers, _) = enricher.enrich_batch(vec![candidate("25% off"), candidate("$50 off")], date(2025, 10, 18));
    let ranked: Vec<(&str, Decimal)> = offers
        .iter()
        .map(|offer| (offer.offer.discount.as_str(), offer.discount_score))
        .collect();

    assert_eq!(
        ranked,
        [("$50 off", Decimal::from(100)), ("25% off", Decimal::from(25))]
    );

    Ok(())
}
