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

//! Interfaces to the processes that surround signature adjudication.
//!
//! Each trait has a default implementation working from the facts already
//! recorded in the [`DiagnosticData`]. Callers with live sources (an online
//! revocation fetcher, a full basic validation) plug in their own
//! implementation through the [`Validator`](crate::Validator) builder.

use ades_status_tracker::{message, Conclusion, Indication, Message, MessageTag, SubIndication};
use chrono::{DateTime, Utc};

use crate::{
    diagnostic::{
        BasicValidationFacts, CertificateFacts, DiagnosticData, RevocationFacts, SignatureFacts,
        TimestampFacts,
    },
    policy::{Level, ValidationPolicy},
    process::CryptographicChecker,
    utils::time::format_time,
    Error, Result,
};

/// Verdict of the basic validation process for a signature or time-stamp.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicVerdict {
    pub conclusion: Conclusion,

    /// Revocation instant reported with `REVOKED_NO_POE` or
    /// `REVOKED_CA_NO_POE`.
    pub revocation_time: Option<DateTime<Utc>>,

    /// Expiration instant of the unreliable algorithm reported with
    /// `CRYPTO_CONSTRAINTS_FAILURE_NO_POE`.
    pub crypto_expiration: Option<DateTime<Utc>>,
}

impl BasicVerdict {
    /// Creates a verdict without any recorded instant.
    pub fn new(conclusion: Conclusion) -> Self {
        Self {
            conclusion,
            revocation_time: None,
            crypto_expiration: None,
        }
    }
}

impl From<&BasicValidationFacts> for BasicVerdict {
    fn from(facts: &BasicValidationFacts) -> Self {
        let mut conclusion = Conclusion::new(facts.indication);
        conclusion.set_verdict(facts.indication, facts.sub_indication);
        for detail in &facts.errors {
            conclusion.add_error(message!(MessageTag::BasicValidationFinding, "detail" => detail));
        }

        Self {
            conclusion,
            revocation_time: facts.revocation_time,
            crypto_expiration: facts.crypto_expiration,
        }
    }
}

/// Produces basic validation verdicts.
pub trait BasicValidation: Send + Sync {
    /// Returns the basic validation verdict of a signature.
    fn signature_verdict(
        &self,
        data: &DiagnosticData,
        signature: &SignatureFacts,
        policy: &ValidationPolicy,
    ) -> Result<BasicVerdict>;

    /// Returns the basic validation verdict of a time-stamp.
    fn timestamp_verdict(
        &self,
        data: &DiagnosticData,
        timestamp: &TimestampFacts,
        policy: &ValidationPolicy,
    ) -> Result<BasicVerdict>;
}

/// Reads the verdicts recorded in the diagnostic data.
///
/// A signature or time-stamp without a recorded verdict is reported as
/// [`Error::MissingBasicValidation`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordedBasicValidation;

impl BasicValidation for RecordedBasicValidation {
    fn signature_verdict(
        &self,
        _data: &DiagnosticData,
        signature: &SignatureFacts,
        _policy: &ValidationPolicy,
    ) -> Result<BasicVerdict> {
        signature
            .basic_validation
            .as_ref()
            .map(BasicVerdict::from)
            .ok_or_else(|| Error::MissingBasicValidation {
                id: signature.id.clone(),
            })
    }

    fn timestamp_verdict(
        &self,
        _data: &DiagnosticData,
        timestamp: &TimestampFacts,
        _policy: &ValidationPolicy,
    ) -> Result<BasicVerdict> {
        timestamp
            .basic_validation
            .as_ref()
            .map(BasicVerdict::from)
            .ok_or_else(|| Error::MissingBasicValidation {
                id: timestamp.id.clone(),
            })
    }
}

/// Decides whether revocation data is fresh enough at a control time.
pub trait RevocationFreshnessChecker: Send + Sync {
    /// Returns [`Indication::Passed`] when `revocation` is fresh at `time`,
    /// otherwise `INDETERMINATE/TRY_LATER`, optionally with a
    /// [`MessageTag::RevocationRetryAfter`] info.
    fn check(
        &self,
        revocation: &RevocationFacts,
        certificate: &CertificateFacts,
        time: DateTime<Utc>,
        policy: &ValidationPolicy,
    ) -> Conclusion;
}

/// Freshness based on the policy maximum age, or on the update interval of
/// the revocation data when no maximum age is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyRevocationFreshnessChecker;

impl RevocationFreshnessChecker for PolicyRevocationFreshnessChecker {
    fn check(
        &self,
        revocation: &RevocationFacts,
        _certificate: &CertificateFacts,
        time: DateTime<Utc>,
        policy: &ValidationPolicy,
    ) -> Conclusion {
        let max_age = policy
            .revocation
            .revocation_freshness
            .and_then(|rule| rule.max_age)
            .map(|age| age.duration())
            .or_else(|| {
                revocation
                    .next_update
                    .map(|next_update| next_update - revocation.this_update)
            });

        let age = time - revocation.production_time;
        if max_age.is_some_and(|max_age| age <= max_age) {
            return Conclusion::passed();
        }

        let mut conclusion =
            Conclusion::with_sub_indication(Indication::Indeterminate, SubIndication::TryLater);
        conclusion.add_error(
            message!(MessageTag::RevocationFresh, "control_time" => format_time(&time)),
        );
        if let Some(next_update) = revocation.next_update {
            conclusion.add_info(message!(
                MessageTag::RevocationRetryAfter,
                "retry_after" => format_time(&next_update)
            ));
        }
        conclusion
    }
}

/// Decides whether a signature is acceptable at a given time.
pub trait SignatureAcceptanceValidator: Send + Sync {
    fn check(
        &self,
        signature: &SignatureFacts,
        time: DateTime<Utc>,
        policy: &ValidationPolicy,
    ) -> Conclusion;
}

/// Accepts a signature whose algorithms meet the cryptographic constraints
/// of the policy at the given time.
#[derive(Clone, Copy, Debug, Default)]
pub struct CryptographicSignatureAcceptance;

impl SignatureAcceptanceValidator for CryptographicSignatureAcceptance {
    fn check(
        &self,
        signature: &SignatureFacts,
        time: DateTime<Utc>,
        policy: &ValidationPolicy,
    ) -> Conclusion {
        let constraints = &policy.cryptographic;
        let mut conclusion = Conclusion::passed();

        let Some(level) = constraints.level else {
            return conclusion;
        };

        let checker = CryptographicChecker::new(constraints);
        let Err(finding) = checker.check(signature.signature_algorithm.as_ref(), time) else {
            return conclusion;
        };

        let message: Message = message!(
            MessageTag::CryptographicConstraintsMet,
            "control_time" => format_time(&time),
            "finding" => finding
        );

        match level {
            Level::Fail => {
                conclusion.set_verdict(
                    Indication::Indeterminate,
                    Some(SubIndication::SigConstraintsFailure),
                );
                conclusion.add_error(message);
            }
            Level::Warn => conclusion.add_warning(message),
            Level::Inform => conclusion.add_info(message),
            Level::Ignore => {}
        }
        conclusion
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::TimeZone;

    use super::*;
    use crate::{
        diagnostic::{AlgorithmFacts, RevocationKind, RevocationStatus},
        policy::{FreshnessRule, TimeUnit, TimeValue},
    };

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap()
    }

    fn revocation(production: u32, next_update: Option<u32>) -> RevocationFacts {
        RevocationFacts {
            id: "R-1".to_owned(),
            kind: RevocationKind::Ocsp,
            issuer_certificate: None,
            production_time: at(production),
            this_update: at(production),
            next_update: next_update.map(at),
            status: RevocationStatus::Good,
            reason: None,
            revocation_time: None,
            accepted: true,
            signature_algorithm: None,
        }
    }

    fn certificate() -> CertificateFacts {
        serde_json::from_str(
            r#"{
                "id": "C-1",
                "not_before": "2024-01-01T00:00:00Z",
                "not_after": "2025-01-01T00:00:00Z"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn recorded_basic_validation() {
        let data = DiagnosticData::default();
        let policy = ValidationPolicy::default();

        let mut signature: SignatureFacts = serde_json::from_str(r#"{"id": "S-1"}"#).unwrap();
        let result = RecordedBasicValidation.signature_verdict(&data, &signature, &policy);
        assert!(matches!(result, Err(Error::MissingBasicValidation { id }) if id == "S-1"));

        let mut facts = BasicValidationFacts::new(
            Indication::Indeterminate,
            Some(SubIndication::RevokedNoPoe),
        );
        facts.revocation_time = Some(at(2));
        facts.errors.push("the signing certificate is revoked".to_owned());
        signature.basic_validation = Some(facts);

        let verdict = RecordedBasicValidation
            .signature_verdict(&data, &signature, &policy)
            .unwrap();
        assert!(verdict.conclusion.is(
            Indication::Indeterminate,
            Some(SubIndication::RevokedNoPoe)
        ));
        assert_eq!(verdict.revocation_time, Some(at(2)));
        assert_eq!(
            verdict.conclusion.errors()[0].attribute("detail"),
            Some("the signing certificate is revoked")
        );
    }

    #[test]
    fn freshness_from_update_interval() {
        let policy = ValidationPolicy::default();
        let checker = PolicyRevocationFreshnessChecker;

        // interval of 7 days
        let fresh = checker.check(&revocation(1, Some(8)), &certificate(), at(5), &policy);
        assert!(fresh.is_valid());

        let stale = checker.check(&revocation(1, Some(8)), &certificate(), at(20), &policy);
        assert!(stale.is(Indication::Indeterminate, Some(SubIndication::TryLater)));
        assert_eq!(
            stale.infos()[0].attribute("retry_after"),
            Some("2024-03-08 00:00:00 UTC")
        );

        let unknown = checker.check(&revocation(1, None), &certificate(), at(2), &policy);
        assert!(!unknown.is_valid());
        assert!(unknown.infos().is_empty());
    }

    #[test]
    fn freshness_from_max_age() {
        let mut policy = ValidationPolicy::default();
        policy.revocation.revocation_freshness = Some(FreshnessRule {
            level: Level::Fail,
            max_age: Some(TimeValue::new(1, TimeUnit::Days)),
        });
        let checker = PolicyRevocationFreshnessChecker;

        assert!(checker
            .check(&revocation(1, None), &certificate(), at(2), &policy)
            .is_valid());
        assert!(!checker
            .check(&revocation(1, Some(30)), &certificate(), at(3), &policy)
            .is_valid());
    }

    #[test]
    fn signature_acceptance() {
        let mut policy = ValidationPolicy::default();
        let mut signature: SignatureFacts = serde_json::from_str(r#"{"id": "S-1"}"#).unwrap();
        signature.signature_algorithm = Some(AlgorithmFacts::new("rsa", "sha256", 2048));

        let acceptance = CryptographicSignatureAcceptance;
        assert!(acceptance.check(&signature, at(1), &policy).is_valid());

        signature.signature_algorithm = Some(AlgorithmFacts::new("rsa", "sha256", 1024));
        let rejected = acceptance.check(&signature, at(1), &policy);
        assert!(rejected.is(
            Indication::Indeterminate,
            Some(SubIndication::SigConstraintsFailure)
        ));
        assert_eq!(
            rejected.errors()[0].tag,
            MessageTag::CryptographicConstraintsMet
        );

        policy.cryptographic.level = Some(Level::Warn);
        let warned = acceptance.check(&signature, at(1), &policy);
        assert!(warned.is_valid());
        assert_eq!(warned.warnings().len(), 1);
    }
}
