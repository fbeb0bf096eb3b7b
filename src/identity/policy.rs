//! Identity reuse and collision policy switches.

use serde::Serialize;

/// Default cap on generation attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// How long an accession ID / case assignee pair lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionIdentityScope {
    /// Fresh values for every slide, even within one case
    #[default]
    PerSlide,
    /// Minted once per case and reused with the patient identity
    PerCase,
}

/// Which ledger columns make a generated identity "already used".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerCollisionFields {
    /// Reject a patient ID found anywhere in the ledger's PatientId column
    #[default]
    PatientIdOnly,
    /// Reject only an exact (PatientId, AccessionId, CaseAssignees) match.
    /// A patient ID already in the ledger may be issued again with a new
    /// accession ID and assignees.
    FullTriple,
}

/// Policy applied by the case identity resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentityPolicy {
    pub transaction_scope: TransactionIdentityScope,
    pub ledger_collision: LedgerCollisionFields,
    /// Number of 10-digit codes in the "Case Assignees" column (1 or 2)
    pub case_assignee_count: u8,
    /// Attempts allowed before `IdentifierSpaceExhausted`
    pub max_attempts: usize,
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self {
            transaction_scope: TransactionIdentityScope::default(),
            ledger_collision: LedgerCollisionFields::default(),
            case_assignee_count: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
