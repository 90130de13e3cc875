//! Promo Sift
//!
//! Promo Sift turns a batch of promotional emails into a clean, ranked list of
//! offers. Each email is scanned for promo codes, discounts and expiration
//! phrases; offers are attributed to a merchant and a category, duplicates across
//! emails are merged, and the survivors are ranked by how soon they expire and how
//! generous they are.
//!
//! All vocabulary (code hints, expiry keywords, date formats, the category
//! taxonomy and merchant rules) is configuration, see [`config::PipelineConfig`].

pub mod categorize;
pub mod config;
pub mod dedup;
pub mod enrich;
pub mod extract;
pub mod fixtures;
pub mod merchants;
pub mod messages;
pub mod offers;
pub mod pipeline;
pub mod prelude;
pub mod report;
