//! Configuration loading and validation through fixture files.

use std::fs;

use testresult::TestResult;

use promo_sift::{
    config::ConfigError,
    fixtures::{Fixture, FixtureError},
};

const TAXONOMY: &str = "
categories:
  - name: Travel
    keywords: [flight, hotel]
  - name: Food & Dining
    keywords: [pizza]
";

const MERCHANTS: &str = "
generic_senders: [noreply]
generic_suffixes: [Deals]
slogan_openers: [Last Chance]
subject_separators: [' - ', ':']
max_subject_len: 40
placeholder: Unknown Merchant
";

const EXTRACTION: &str = "
code_hints: [promo code, code]
hint_window: 40
expiry_keywords: [expires]
expiry_window: 40
date_formats: ['%B %d, %Y']
context_chars: 80
";

fn write_set(taxonomy: &str, merchants: &str, extraction: &str) -> Result<tempfile::TempDir, std::io::Error> {
    let dir = tempfile::tempdir()?;

    for (kind, contents) in [("taxonomy", taxonomy), ("merchants", merchants), ("extraction", extraction)] {
        fs::create_dir_all(dir.path().join(kind))?;
        fs::write(dir.path().join(kind).join("custom.yml"), contents)?;
    }

    Ok(dir)
}

fn load(dir: &tempfile::TempDir) -> Result<Fixture, FixtureError> {
    let mut fixture = Fixture::with_base_path(dir.path());

    fixture
        .load_taxonomy("custom")?
        .load_merchants("custom")?
        .load_extraction("custom")?;

    Ok(fixture)
}

#[test]
fn minimal_set_builds_a_pipeline() -> TestResult {
    let dir = write_set(TAXONOMY, MERCHANTS, EXTRACTION)?;
    let fixture = load(&dir)?;
    let config = fixture.config()?;

    assert_eq!(config.taxonomy.categories.len(), 2);
    assert_eq!(config.extraction.code_length.min, 4);

    fixture.pipeline()?;

    Ok(())
}

#[test]
fn empty_taxonomy_is_rejected() -> TestResult {
    let dir = write_set("categories: []\n", MERCHANTS, EXTRACTION)?;

    assert!(
        matches!(load(&dir)?.config(), Err(FixtureError::Config(ConfigError::EmptyTaxonomy))),
        "empty taxonomy must fail"
    );

    Ok(())
}

#[test]
fn duplicate_category_is_rejected() -> TestResult {
    let taxonomy = "
categories:
  - name: Travel
    keywords: [flight]
  - name: travel
    keywords: [hotel]
";
    let dir = write_set(taxonomy, MERCHANTS, EXTRACTION)?;

    assert!(
        matches!(
            load(&dir)?.config(),
            Err(FixtureError::Config(ConfigError::DuplicateCategory(_)))
        ),
        "duplicate category must fail"
    );

    Ok(())
}

#[test]
fn missing_date_formats_are_rejected() -> TestResult {
    let extraction = EXTRACTION.replace("date_formats: ['%B %d, %Y']", "date_formats: []");
    let dir = write_set(TAXONOMY, MERCHANTS, &extraction)?;

    assert!(
        matches!(
            load(&dir)?.config(),
            Err(FixtureError::Config(ConfigError::EmptyList("extraction.date_formats")))
        ),
        "empty date formats must fail"
    );

    Ok(())
}

#[test]
fn blank_placeholder_is_rejected() -> TestResult {
    let merchants = MERCHANTS.replace("placeholder: Unknown Merchant", "placeholder: '  '");
    let dir = write_set(TAXONOMY, &merchants, EXTRACTION)?;

    assert!(
        matches!(
            load(&dir)?.config(),
            Err(FixtureError::Config(ConfigError::BlankPlaceholder))
        ),
        "blank placeholder must fail"
    );

    Ok(())
}

#[test]
fn missing_section_is_reported() -> TestResult {
    let dir = write_set(TAXONOMY, MERCHANTS, EXTRACTION)?;
    let mut fixture = Fixture::with_base_path(dir.path());
    fixture.load_taxonomy("custom")?;

    assert!(
        matches!(fixture.config(), Err(FixtureError::MissingSection(_))),
        "config without merchant rules must fail"
    );

    Ok(())
}

#[test]
fn malformed_yaml_is_a_yaml_error() -> TestResult {
    let dir = write_set("categories: [", MERCHANTS, EXTRACTION)?;
    let mut fixture = Fixture::with_base_path(dir.path());

    assert!(
        matches!(fixture.load_taxonomy("custom"), Err(FixtureError::Yaml(_))),
        "malformed YAML must fail"
    );

    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let mut fixture = Fixture::with_base_path("./does-not-exist");

    assert!(
        matches!(fixture.load_extraction("custom"), Err(FixtureError::Io(_))),
        "missing file must fail"
    );
}
