//! Sample data generation for the `seed` subcommand.
//!
//! Generation is driven by a [`ChaCha8Rng`], so a given seed always produces
//! the same programs.

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bounty_storage::{AssetType, Eligibility, NewProgram, ProgramStore, StorageError};

/// 2023-01-01T00:00:00Z
const START_DATE_MIN: i64 = 1_672_531_200;
/// 2024-12-31T00:00:00Z
const START_DATE_MAX: i64 = 1_735_603_200;

const TWITTER_HANDLE_MAX: usize = 16;

const COMPANIES: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Stark Industries", "Wayne Enterprises",
    "Cyberdyne", "Soylent", "Tyrell", "Wonka", "Vandelay", "Aperture", "Black Mesa", "Oscorp",
    "Massive Dynamic", "Pied Piper", "Dunder Mifflin", "Gringotts", "Monarch",
];

const DOMAIN_WORDS: &[&str] = &[
    "acme", "globex", "nimbus", "orbit", "vertex", "pixel", "cobalt", "lumen", "quartz", "harbor",
    "summit", "ember", "atlas", "beacon", "cipher", "delta",
];

const DOMAIN_SUFFIXES: &[&str] = &["com", "net", "org", "io", "dev", "co"];

const HACKER_NOUNS: &[&str] = &[
    "firewall", "protocol", "bandwidth", "interface", "microchip", "pixel", "driver", "array",
    "transmitter", "matrix", "sensor", "circuit", "card", "program", "application", "bus",
];

/// Builds one random program.
pub fn generate_program(rng: &mut ChaCha8Rng) -> NewProgram {
    let asset_type = *pick(rng, &AssetType::ALL);
    let eligibility = *pick(rng, &Eligibility::ALL);

    NewProgram {
        name: format!("{} Bug Bounty Program", pick(rng, COMPANIES)),
        start_date: start_date(rng),
        website: rng.gen_bool(0.8).then(|| website(rng)),
        twitter: rng.gen_bool(0.7).then(|| twitter_handle(rng)),
        asset_type: Some(asset_type),
        identifier: identifier(rng, asset_type),
        description: rng.gen_bool(0.9).then(|| description(rng)),
        eligibility,
    }
}

/// Replaces every stored program with `count` generated ones, inserted
/// `batch_size` at a time. Returns the number of programs inserted.
pub fn seed_programs(
    store: &dyn ProgramStore,
    rng: &mut ChaCha8Rng,
    count: usize,
    batch_size: usize,
) -> Result<usize, StorageError> {
    let removed = store.delete_all_programs()?;
    tracing::info!(removed, "cleared existing programs");

    tracing::info!(count, "generating programs");
    let programs: Vec<NewProgram> = (0..count).map(|_| generate_program(rng)).collect();

    let batch_size = batch_size.max(1);
    let batches = count.div_ceil(batch_size);
    let mut inserted = 0;
    for (index, batch) in programs.chunks(batch_size).enumerate() {
        inserted += store.insert_programs(batch)?.len();
        tracing::info!("inserted batch {}/{}", index + 1, batches);
    }
    Ok(inserted)
}

fn pick<'a, T>(rng: &mut ChaCha8Rng, items: &'a [T]) -> &'a T {
    // Every list above is non-empty.
    &items[rng.gen_range(0..items.len())]
}

fn domain_word(rng: &mut ChaCha8Rng) -> &'static str {
    *pick(rng, DOMAIN_WORDS)
}

fn domain_name(rng: &mut ChaCha8Rng) -> String {
    format!("{}.{}", domain_word(rng), pick(rng, DOMAIN_SUFFIXES))
}

fn start_date(rng: &mut ChaCha8Rng) -> DateTime<Utc> {
    let secs = rng.gen_range(START_DATE_MIN..=START_DATE_MAX);
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

fn website(rng: &mut ChaCha8Rng) -> String {
    format!("https://{}/", domain_name(rng))
}

fn twitter_handle(rng: &mut ChaCha8Rng) -> String {
    let handle = match rng.gen_range(0..3) {
        0 => format!("@{}", domain_word(rng)),
        1 => {
            let company: String = pick(rng, COMPANIES)
                .to_lowercase()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect();
            format!("@{company}")
        }
        _ => format!("@{}{}", domain_word(rng), rng.gen_range(10..=99)),
    };
    handle.chars().take(TWITTER_HANDLE_MAX).collect()
}

fn identifier(rng: &mut ChaCha8Rng, asset_type: AssetType) -> String {
    match asset_type {
        AssetType::Web => match rng.gen_range(0..4) {
            0 => domain_name(rng),
            1 => format!("api.{}", domain_name(rng)),
            2 => format!("app.{}", domain_name(rng)),
            _ => format!("{}-{}.com", domain_word(rng), domain_word(rng)),
        },
        AssetType::Mobile => {
            let prefix: &str = *pick(rng, &["com", "org", "io", "app"]);
            format!("{prefix}.{}.{}", domain_word(rng), domain_word(rng))
        }
    }
}

fn description(rng: &mut ChaCha8Rng) -> String {
    let noun = pick(rng, HACKER_NOUNS);
    match rng.gen_range(0..3) {
        0 => format!(
            "We are committed to ensuring the security of our {noun} platform. This program \
             rewards researchers who responsibly disclose vulnerabilities."
        ),
        1 => format!(
            "{} runs a comprehensive security program. We encourage ethical hackers to help us \
             find and fix issues in our {noun} infrastructure.",
            pick(rng, COMPANIES)
        ),
        _ => format!(
            "This program covers security vulnerabilities in our {noun} services. All reports \
             are reviewed by our security team."
        ),
    }
}
