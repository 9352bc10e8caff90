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

//! Builders for the facts used by the integration tests.
//!
//! The standard document is validated on 2024-06-01 and signed by
//! `C-SIGNER`, issued by `C-CA`, issued by the trust anchor `C-ROOT`. Both
//! non-anchor certificates have good revocation data produced the day before
//! the validation.

#![allow(dead_code)]

use ades_validation::{
    diagnostic::{
        AlgorithmFacts, BasicValidationFacts, CertificateFacts, DiagnosticData, RevocationFacts,
        RevocationKind, RevocationStatus, SignatureFacts, TimestampFacts, TimestampType,
    },
    policy::ValidationPolicy,
    Indication, SubIndication, ValidationReports, Validator,
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

#[allow(unused_macros)]
macro_rules! assert_err {
    ($expression:expr, $($pattern:tt)+) => {
        match $expression {
            $($pattern)+ => (),
            ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
        }
    }
}
#[allow(unused_imports)]
pub(super) use assert_err;

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn validation_time() -> DateTime<Utc> {
    at(2024, 6, 1)
}

pub fn algorithm() -> AlgorithmFacts {
    AlgorithmFacts::new("rsa", "sha256", 2048)
}

pub fn certificate(
    id: &str,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
) -> CertificateFacts {
    CertificateFacts {
        id: id.to_owned(),
        not_before,
        not_after,
        trusted: false,
        sunset_date: None,
        revocations: vec![],
        policy_oids: vec![],
        ocsp_no_check: false,
        signature_algorithm: Some(algorithm()),
    }
}

/// A good OCSP response produced at `production`, valid for a week.
pub fn revocation(id: &str, issuer: &str, production: DateTime<Utc>) -> RevocationFacts {
    RevocationFacts {
        id: id.to_owned(),
        kind: RevocationKind::Ocsp,
        issuer_certificate: Some(issuer.to_owned()),
        production_time: production,
        this_update: production,
        next_update: Some(production + TimeDelta::days(7)),
        status: RevocationStatus::Good,
        reason: None,
        revocation_time: None,
        accepted: true,
        signature_algorithm: Some(algorithm()),
    }
}

pub fn revoked(mut revocation: RevocationFacts, revocation_time: DateTime<Utc>) -> RevocationFacts {
    revocation.status = RevocationStatus::Revoked;
    revocation.revocation_time = Some(revocation_time);
    revocation
}

pub fn timestamp(
    id: &str,
    timestamp_type: TimestampType,
    production: DateTime<Utc>,
) -> TimestampFacts {
    TimestampFacts {
        id: id.to_owned(),
        timestamp_type,
        production_time: production,
        message_imprint_found: true,
        message_imprint_intact: true,
        basic_validation: Some(BasicValidationFacts::passed()),
        covered_timestamps: vec![],
        signature_algorithm: Some(algorithm()),
    }
}

pub fn signature_timestamp(id: &str, production: DateTime<Utc>) -> TimestampFacts {
    timestamp(id, TimestampType::SignatureTimestamp, production)
}

pub fn basic(
    indication: Indication,
    sub_indication: Option<SubIndication>,
) -> BasicValidationFacts {
    BasicValidationFacts::new(indication, sub_indication)
}

pub fn indeterminate(sub_indication: SubIndication) -> BasicValidationFacts {
    basic(Indication::Indeterminate, Some(sub_indication))
}

/// A signature by `C-SIGNER` with the given basic verdict and time-stamps.
pub fn signature(
    id: &str,
    basic_validation: BasicValidationFacts,
    timestamps: Vec<TimestampFacts>,
) -> SignatureFacts {
    SignatureFacts {
        id: id.to_owned(),
        certificate_chain: vec!["C-SIGNER".to_owned(), "C-CA".to_owned(), "C-ROOT".to_owned()],
        timestamps,
        claimed_signing_time: None,
        signature_algorithm: Some(algorithm()),
        basic_validation: Some(basic_validation),
        evidence_records: vec![],
        detached_content: false,
        enveloped: false,
    }
}

/// `C-SIGNER`, `C-CA` and `C-ROOT`.
pub fn certificates() -> Vec<CertificateFacts> {
    let mut signer = certificate("C-SIGNER", at(2023, 1, 1), at(2025, 1, 1));
    signer
        .revocations
        .push(revocation("R-SIGNER", "C-CA", at(2024, 5, 31)));

    let mut ca = certificate("C-CA", at(2020, 1, 1), at(2030, 1, 1));
    ca.revocations
        .push(revocation("R-CA", "C-ROOT", at(2024, 5, 31)));

    let mut root = certificate("C-ROOT", at(2015, 1, 1), at(2035, 1, 1));
    root.trusted = true;

    vec![signer, ca, root]
}

pub fn document(signatures: Vec<SignatureFacts>) -> DiagnosticData {
    document_with(signatures, certificates())
}

pub fn document_with(
    signatures: Vec<SignatureFacts>,
    certificates: Vec<CertificateFacts>,
) -> DiagnosticData {
    DiagnosticData {
        validation_time: Some(validation_time()),
        signatures,
        certificates,
    }
}

pub fn validate(data: DiagnosticData) -> ValidationReports {
    validate_with(data, ValidationPolicy::default())
}

pub fn validate_with(data: DiagnosticData, policy: ValidationPolicy) -> ValidationReports {
    Validator::new()
        .with_diagnostic_data(data)
        .with_policy(policy)
        .validate()
        .unwrap()
}

pub fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}
