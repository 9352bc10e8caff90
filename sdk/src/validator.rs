// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use std::collections::HashMap;

use ades_status_tracker::{Conclusion, Indication, SubIndication};
use chrono::{DateTime, Utc};
use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    collaborators::{
        BasicValidation, BasicVerdict, CryptographicSignatureAcceptance,
        PolicyRevocationFreshnessChecker, RecordedBasicValidation, RevocationFreshnessChecker,
        SignatureAcceptanceValidator,
    },
    diagnostic::{DiagnosticData, SignatureFacts},
    policy::ValidationPolicy,
    process::{
        BestSignatureTime, ProcessResult, SignatureContext,
        ValidationProcessForSignaturesWithLongTermData, ValidationProcessForSignaturesWithTime,
    },
    utils::time::utc_now,
    Error, Result,
};

/// Adjudicates every signature of a document.
///
/// # Example
///
/// ```
/// use ades_validation::{diagnostic::DiagnosticData, policy::ValidationPolicy, Validator};
///
/// # fn main() -> ades_validation::Result<()> {
/// let data = DiagnosticData::from_json(r#"{"signatures": [], "certificates": []}"#)?;
///
/// let reports = Validator::new()
///     .with_diagnostic_data(data)
///     .with_policy(ValidationPolicy::default())
///     .validate()?;
///
/// assert!(reports.signatures.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct Validator {
    diagnostic_data: Option<DiagnosticData>,
    policy: Option<ValidationPolicy>,
    basic: Box<dyn BasicValidation>,
    freshness: Box<dyn RevocationFreshnessChecker>,
    acceptance: Box<dyn SignatureAcceptanceValidator>,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            diagnostic_data: None,
            policy: None,
            basic: Box::new(RecordedBasicValidation),
            freshness: Box::new(PolicyRevocationFreshnessChecker),
            acceptance: Box::new(CryptographicSignatureAcceptance),
        }
    }
}

impl Validator {
    /// Creates a validator using the default collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostic_data(mut self, data: DiagnosticData) -> Self {
        self.diagnostic_data = Some(data);
        self
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Replaces the source of basic validation verdicts.
    pub fn with_basic_validation<B: BasicValidation + 'static>(mut self, basic: B) -> Self {
        self.basic = Box::new(basic);
        self
    }

    /// Replaces the revocation freshness checker.
    pub fn with_freshness_checker<F: RevocationFreshnessChecker + 'static>(
        mut self,
        freshness: F,
    ) -> Self {
        self.freshness = Box::new(freshness);
        self
    }

    /// Replaces the signature acceptance validator.
    pub fn with_signature_acceptance<A: SignatureAcceptanceValidator + 'static>(
        mut self,
        acceptance: A,
    ) -> Self {
        self.acceptance = Box::new(acceptance);
        self
    }

    /// Runs both validation processes for every signature.
    ///
    /// Fails before any signature is adjudicated when an input is missing,
    /// the facts are inconsistent or a basic validation verdict cannot be
    /// obtained. Reports are returned in the order of the signatures in the
    /// diagnostic data.
    pub fn validate(&self) -> Result<ValidationReports> {
        let data = self
            .diagnostic_data
            .as_ref()
            .ok_or(Error::MissingDiagnosticData)?;
        let policy = self.policy.as_ref().ok_or(Error::MissingPolicy)?;

        policy.validate()?;
        data.validate()?;

        let validation_time = data.validation_time.unwrap_or_else(utc_now);

        let verdicts = data
            .signatures
            .iter()
            .map(|signature| self.verdicts(data, signature, policy))
            .collect::<Result<Vec<_>>>()?;

        let signatures = data
            .signatures
            .par_iter()
            .zip(verdicts.par_iter())
            .map(|(signature, (basic, timestamps))| {
                let ctx = SignatureContext::new(
                    data,
                    signature,
                    policy,
                    basic,
                    timestamps,
                    validation_time,
                );
                self.adjudicate(&ctx)
            })
            .collect();

        Ok(ValidationReports {
            validation_time,
            signatures,
        })
    }

    fn verdicts(
        &self,
        data: &DiagnosticData,
        signature: &SignatureFacts,
        policy: &ValidationPolicy,
    ) -> Result<(BasicVerdict, HashMap<String, BasicVerdict>)> {
        let basic = self.basic.signature_verdict(data, signature, policy)?;

        let timestamps = signature
            .timestamps
            .iter()
            .map(|timestamp| {
                self.basic
                    .timestamp_verdict(data, timestamp, policy)
                    .map(|verdict| (timestamp.id.clone(), verdict))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok((basic, timestamps))
    }

    fn adjudicate(&self, ctx: &SignatureContext<'_>) -> SignatureReport {
        let with_time = ValidationProcessForSignaturesWithTime::new(ctx).execute();
        let long_term = ValidationProcessForSignaturesWithLongTermData::new(
            ctx,
            self.freshness.as_ref(),
            self.acceptance.as_ref(),
        )
        .execute();

        let report = SignatureReport {
            id: ctx.signature().id.clone(),
            basic: ctx.basic().conclusion.clone(),
            with_time,
            long_term,
        };

        info!(
            "signature {}: {}",
            report.id,
            report.long_term.conclusion.indication.verdict_label()
        );
        report
    }
}

/// Results of the validation of one document.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationReports {
    /// Instant the validation was performed at.
    pub validation_time: DateTime<Utc>,

    /// One report per signature, in document order.
    pub signatures: Vec<SignatureReport>,
}

impl ValidationReports {
    pub fn signature(&self, id: &str) -> Option<&SignatureReport> {
        self.signatures.iter().find(|s| s.id == id)
    }

    /// Returns the reports as a JSON tree.
    pub fn to_tree(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Results of the validation of one signature.
#[derive(Clone, Debug, Serialize)]
pub struct SignatureReport {
    pub id: String,

    /// Verdict of the basic validation process.
    pub basic: Conclusion,

    /// Result of the validation process for signatures with time.
    pub with_time: ProcessResult,

    /// Result of the validation process for signatures with long-term
    /// validation data.
    pub long_term: ProcessResult,
}

impl SignatureReport {
    /// Returns the final indication of the signature.
    pub fn indication(&self) -> Indication {
        self.long_term.conclusion.indication
    }

    pub fn sub_indication(&self) -> Option<SubIndication> {
        self.long_term.conclusion.sub_indication
    }

    pub fn best_signature_time(&self) -> BestSignatureTime {
        self.long_term.best_signature_time
    }
}
