//! Random identifier generation.
//!
//! All draws are uniform. Value spaces:
//!
//! | Identifier      | Shape                                  | Space          |
//! |-----------------|----------------------------------------|----------------|
//! | Patient ID      | `A-Z` + integer in 1000..=9999         | 234,000        |
//! | Accession ID    | 10 chars from `[A-Za-z0-9]`            | 62^10          |
//! | Case assignees  | 1 or 2 integers in 10^9..=9_999_999_999, comma joined | |
//! | Block ID        | integer in 1_000_000..=9_999_999       | 9,000,000      |
//! | Birth date      | calendar day in a year range           |                |

use chrono::{Days, NaiveDate};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of a generated accession ID.
const ACCESSION_ID_LEN: usize = 10;

/// Default first year of generated birth dates.
pub const DEFAULT_BIRTH_START_YEAR: i32 = 1940;

/// Default last year of generated birth dates.
pub const DEFAULT_BIRTH_END_YEAR: i32 = 2015;

// =============================================================================
// Birth Date Range
// =============================================================================

/// Inclusive calendar range from January 1st of the start year to
/// December 31st of the end year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl BirthDateRange {
    /// Build a range from years. Returns `None` if `start_year > end_year`
    /// or either year is outside chrono's supported range.
    pub fn years(start_year: i32, end_year: i32) -> Option<Self> {
        if start_year > end_year {
            return None;
        }
        Some(Self {
            start: NaiveDate::from_ymd_opt(start_year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(end_year, 12, 31)?,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days after `start` covered by the range.
    fn span_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs()
    }
}

impl Default for BirthDateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(DEFAULT_BIRTH_START_YEAR, 1, 1)
                .unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(DEFAULT_BIRTH_END_YEAR, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }
}

// =============================================================================
// Identifier Generator
// =============================================================================

/// Random identifier source.
///
/// Generic over the RNG so tests can inject a seeded one.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use slide_manifest::identity::IdentifierGenerator;
///
/// let mut generator = IdentifierGenerator::new(StdRng::seed_from_u64(7));
/// let patient_id = generator.random_patient_id();
/// assert_eq!(patient_id.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct IdentifierGenerator<R> {
    rng: R,
    birth_dates: BirthDateRange,
}

impl<R: Rng> IdentifierGenerator<R> {
    /// Create a generator with the default 1940..=2015 birth date range.
    pub fn new(rng: R) -> Self {
        Self::with_birth_dates(rng, BirthDateRange::default())
    }

    pub fn with_birth_dates(rng: R, birth_dates: BirthDateRange) -> Self {
        Self { rng, birth_dates }
    }

    /// Uniform calendar day within `range`, both ends inclusive.
    pub fn random_date(&mut self, range: BirthDateRange) -> NaiveDate {
        let offset = self.rng.gen_range(0..=range.span_days());
        range
            .start
            .checked_add_days(Days::new(offset))
            .unwrap_or(range.end)
    }

    /// Uniform birth date within the configured range.
    pub fn random_birth_date(&mut self) -> NaiveDate {
        self.random_date(self.birth_dates)
    }

    /// One uppercase letter followed by a 4-digit number, e.g. `K4821`.
    pub fn random_patient_id(&mut self) -> String {
        let letter = char::from(self.rng.gen_range(b'A'..=b'Z'));
        let number: u16 = self.rng.gen_range(1000..=9999);
        format!("{}{}", letter, number)
    }

    /// Ten alphanumeric characters drawn with replacement.
    pub fn random_accession_id(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(ACCESSION_ID_LEN)
            .map(char::from)
            .collect()
    }

    /// `count` 10-digit integers joined by commas.
    pub fn random_case_assignees(&mut self, count: u8) -> String {
        (0..count.max(1))
            .map(|_| {
                self.rng
                    .gen_range(1_000_000_000u64..=9_999_999_999)
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// 7-digit block ID used when a file name has no block segment.
    pub fn random_block_id(&mut self) -> String {
        self.rng.gen_range(1_000_000u32..=9_999_999).to_string()
    }
}

/// Format a date as the manifest expects (`YYYY-MM-DD`).
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
