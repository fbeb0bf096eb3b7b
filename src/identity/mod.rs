//! Synthetic identity layer.
//!
//! Everything that decides *who* a slide belongs to lives here:
//!
//! - [`ParsedSlideName`]: case / block / stain decomposition of a file name
//! - [`IdentifierGenerator`]: random patient IDs, accession IDs, case
//!   assignee codes and birth dates
//! - [`NameProvider`]: first / last name synthesis (backed by `fake`)
//! - [`UsedIdsLedger`]: identifier triples issued by earlier runs
//! - [`CaseIdentityResolver`]: per-run case map that reuses or mints
//!   identities under an [`IdentityPolicy`]
//!
//! # Data Flow
//!
//! ```text
//! file name ──► ParsedSlideName ──► case_id
//!                                     │
//!                                     ▼
//!                      ┌──────────────────────────────┐
//!                      │    CaseIdentityResolver      │
//!                      │  case_id -> PatientIdentity  │
//!                      └───────┬──────────────┬───────┘
//!                              │ new case     │ collision checks
//!                              ▼              ▼
//!                   IdentifierGenerator   UsedIdsLedger
//!                   + NameProvider
//! ```

mod filename;
mod generator;
mod ledger;
mod names;
mod policy;
mod resolver;

pub use filename::{strip_extension, ParsedSlideName, CASE_ID_LEN, DEFAULT_STAIN};
pub(crate) use generator::format_date;
pub use generator::{
    BirthDateRange, IdentifierGenerator, DEFAULT_BIRTH_END_YEAR, DEFAULT_BIRTH_START_YEAR,
};
pub use ledger::{IdentifierTriple, UsedIdsLedger, LEDGER_COLUMNS};
pub use names::{FakeNameProvider, NameProvider};
pub use policy::{
    IdentityPolicy, LedgerCollisionFields, TransactionIdentityScope, DEFAULT_MAX_ATTEMPTS,
};
pub use resolver::{CaseIdentityResolver, CaseTransactionIdentity, PatientIdentity, ResolvedIdentity};
