//! Case identity resolution.
//!
//! The resolver holds the run's case map. The first slide of a case mints a
//! patient identity; every later slide of the same case gets it back
//! unchanged. Accession ID and case assignees are either minted per slide or
//! cached with the case, depending on [`TransactionIdentityScope`].
//!
//! Generated values are checked against the [`UsedIdsLedger`] and against
//! everything this resolver already issued. Patient IDs of distinct cases
//! are always pairwise distinct within a run. Retries are capped by
//! [`IdentityPolicy::max_attempts`].

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use crate::error::IdentityError;

use super::generator::IdentifierGenerator;
use super::ledger::{IdentifierTriple, UsedIdsLedger};
use super::names::NameProvider;
use super::policy::{IdentityPolicy, LedgerCollisionFields, TransactionIdentityScope};

/// Fake patient fields shared by every slide of a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientIdentity {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// Submission tracking fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTransactionIdentity {
    pub accession_id: String,
    pub case_assignees: String,
}

/// Result of resolving one slide's case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub patient: PatientIdentity,
    pub transaction: CaseTransactionIdentity,
    /// `true` when the patient identity came from the case map
    pub reused: bool,
}

impl ResolvedIdentity {
    /// The triple this identity contributes to the ledger.
    pub fn triple(&self) -> IdentifierTriple {
        IdentifierTriple::new(
            self.patient.patient_id.clone(),
            self.transaction.accession_id.clone(),
            self.transaction.case_assignees.clone(),
        )
    }
}

#[derive(Debug, Clone)]
struct CaseRecord {
    patient: PatientIdentity,
    /// Only cached under `PerCase` scope
    transaction: Option<CaseTransactionIdentity>,
}

/// Per-run case map with reuse and collision rules.
pub struct CaseIdentityResolver<'l, R, N> {
    generator: IdentifierGenerator<R>,
    names: N,
    ledger: &'l UsedIdsLedger,
    policy: IdentityPolicy,
    cases: HashMap<String, CaseRecord>,
    issued_patient_ids: HashSet<String>,
    issued_triples: HashSet<IdentifierTriple>,
}

impl<'l, R: Rng, N: NameProvider> CaseIdentityResolver<'l, R, N> {
    pub fn new(
        generator: IdentifierGenerator<R>,
        names: N,
        ledger: &'l UsedIdsLedger,
        policy: IdentityPolicy,
    ) -> Self {
        Self {
            generator,
            names,
            ledger,
            policy,
            cases: HashMap::new(),
            issued_patient_ids: HashSet::new(),
            issued_triples: HashSet::new(),
        }
    }

    /// Number of distinct cases seen so far.
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Access the generator, e.g. for block ID fallbacks.
    pub fn generator_mut(&mut self) -> &mut IdentifierGenerator<R> {
        &mut self.generator
    }

    /// Return the identity for `case_id`, minting one for an unseen case.
    pub fn resolve(&mut self, case_id: &str) -> Result<ResolvedIdentity, IdentityError> {
        if let Some(record) = self.cases.get(case_id) {
            let patient = record.patient.clone();
            let cached = record.transaction.clone();

            let transaction = match cached {
                Some(transaction) => transaction,
                None => self.mint_transaction(&patient.patient_id)?,
            };

            debug!(case_id, patient_id = %patient.patient_id, "Reusing case identity");
            return Ok(ResolvedIdentity {
                patient,
                transaction,
                reused: true,
            });
        }

        let (patient_id, transaction) = self.mint_case()?;
        let patient = PatientIdentity {
            patient_id,
            first_name: self.names.first_name(),
            last_name: self.names.last_name(),
            date_of_birth: self.generator.random_birth_date(),
        };

        let cached = match self.policy.transaction_scope {
            TransactionIdentityScope::PerCase => Some(transaction.clone()),
            TransactionIdentityScope::PerSlide => None,
        };
        self.cases.insert(
            case_id.to_string(),
            CaseRecord {
                patient: patient.clone(),
                transaction: cached,
            },
        );

        debug!(case_id, patient_id = %patient.patient_id, "Minted case identity");
        Ok(ResolvedIdentity {
            patient,
            transaction,
            reused: false,
        })
    }

    /// Mint a patient ID together with its first transaction identity.
    fn mint_case(&mut self) -> Result<(String, CaseTransactionIdentity), IdentityError> {
        for _ in 0..self.policy.max_attempts {
            let patient_id = self.generator.random_patient_id();
            if self.issued_patient_ids.contains(&patient_id) {
                continue;
            }

            match self.policy.ledger_collision {
                LedgerCollisionFields::PatientIdOnly => {
                    if self.ledger.contains_patient_id(&patient_id) {
                        continue;
                    }
                    let transaction = self.generate_transaction();
                    self.issue(&patient_id, &transaction);
                    return Ok((patient_id, transaction));
                }
                LedgerCollisionFields::FullTriple => {
                    let transaction = self.generate_transaction();
                    if self.triple_in_use(&patient_id, &transaction) {
                        continue;
                    }
                    self.issue(&patient_id, &transaction);
                    return Ok((patient_id, transaction));
                }
            }
        }

        Err(IdentityError::IdentifierSpaceExhausted {
            field: "patient id",
            attempts: self.policy.max_attempts,
        })
    }

    /// Mint a new transaction identity for an already known patient.
    fn mint_transaction(
        &mut self,
        patient_id: &str,
    ) -> Result<CaseTransactionIdentity, IdentityError> {
        for _ in 0..self.policy.max_attempts {
            let transaction = self.generate_transaction();
            if self.policy.ledger_collision == LedgerCollisionFields::FullTriple
                && self.triple_in_use(patient_id, &transaction)
            {
                continue;
            }
            self.issue(patient_id, &transaction);
            return Ok(transaction);
        }

        Err(IdentityError::IdentifierSpaceExhausted {
            field: "accession id",
            attempts: self.policy.max_attempts,
        })
    }

    fn generate_transaction(&mut self) -> CaseTransactionIdentity {
        CaseTransactionIdentity {
            accession_id: self.generator.random_accession_id(),
            case_assignees: self
                .generator
                .random_case_assignees(self.policy.case_assignee_count),
        }
    }

    fn triple_in_use(&self, patient_id: &str, transaction: &CaseTransactionIdentity) -> bool {
        let triple = IdentifierTriple::new(
            patient_id,
            transaction.accession_id.clone(),
            transaction.case_assignees.clone(),
        );
        self.ledger.contains_triple(&triple) || self.issued_triples.contains(&triple)
    }

    fn issue(&mut self, patient_id: &str, transaction: &CaseTransactionIdentity) {
        self.issued_patient_ids.insert(patient_id.to_string());
        self.issued_triples.insert(IdentifierTriple::new(
            patient_id,
            transaction.accession_id.clone(),
            transaction.case_assignees.clone(),
        ));
    }
}
