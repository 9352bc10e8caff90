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

//! Validation process for signatures with time.

mod common;

use ades_validation::{
    diagnostic::TimestampType,
    policy::{Level, TimeRule, TimeUnit, ValidationPolicy},
    ConstraintStatus, Indication, MessageTag, ReportEntry, SubIndication,
};
use common::*;

fn basic_passed() -> ades_validation::diagnostic::BasicValidationFacts {
    basic(Indication::Passed, None)
}

#[test]
fn no_timestamp() {
    let reports = validate(document(vec![signature("S-1", basic_passed(), vec![])]));
    let report = reports.signature("S-1").unwrap();

    let conclusion = &report.with_time.conclusion;
    assert_eq!(conclusion.indication, Indication::Indeterminate);
    assert_eq!(conclusion.sub_indication, Some(SubIndication::NoTimestamp));
    assert_eq!(report.sub_indication(), Some(SubIndication::NoTimestamp));
}

#[test]
fn one_signature_timestamp() {
    let t1 = at(2024, 2, 1);
    let reports = validate(document(vec![signature(
        "S-1",
        basic_passed(),
        vec![signature_timestamp("T-1", t1)],
    )]));
    let report = reports.signature("S-1").unwrap();

    assert!(report.with_time.conclusion.is_valid());
    assert_eq!(report.with_time.best_signature_time.get(), t1);
    assert_eq!(report.indication(), Indication::Passed);
    assert_eq!(report.best_signature_time().get(), t1);

    let info = &report.with_time.conclusion.infos()[0];
    assert_eq!(info.tag, MessageTag::BestSignatureTime);
    assert_eq!(
        info.attribute("best_signature_time"),
        Some("2024-02-01 00:00:00 UTC")
    );
}

#[test]
fn revoked_after_best_signature_time() {
    let mut facts = indeterminate(SubIndication::RevokedNoPoe);
    facts.revocation_time = Some(at(2024, 3, 1));

    let reports = validate(document(vec![signature(
        "S-1",
        facts,
        vec![signature_timestamp("T-1", at(2024, 2, 1))],
    )]));
    let report = reports.signature("S-1").unwrap();

    assert!(report.with_time.conclusion.is_valid());
    assert!(report.long_term.conclusion.is_valid());
}

#[test]
fn revoked_before_best_signature_time() {
    let mut facts = indeterminate(SubIndication::RevokedNoPoe);
    facts.revocation_time = Some(at(2024, 2, 1));

    let reports = validate(document(vec![signature(
        "S-1",
        facts,
        vec![signature_timestamp("T-1", at(2024, 2, 1))],
    )]));
    let report = reports.signature("S-1").unwrap();

    for conclusion in [&report.with_time.conclusion, &report.long_term.conclusion] {
        assert!(conclusion.is(Indication::Indeterminate, Some(SubIndication::RevokedNoPoe)));
    }
}

#[test]
fn content_timestamp_after_signature_timestamp() {
    let reports = validate(document(vec![signature(
        "S-1",
        basic_passed(),
        vec![
            timestamp("T-CONTENT", TimestampType::ContentTimestamp, at(2024, 2, 1)),
            signature_timestamp("T-1", at(2024, 2, 1)),
        ],
    )]));
    let report = reports.signature("S-1").unwrap();

    for conclusion in [&report.with_time.conclusion, &report.long_term.conclusion] {
        assert!(conclusion.is(Indication::Failed, Some(SubIndication::TimestampOrderFailure)));
    }
}

#[test]
fn content_timestamp_before_signature_timestamp() {
    let reports = validate(document(vec![signature(
        "S-1",
        basic_passed(),
        vec![
            timestamp("T-CONTENT", TimestampType::AllDataObjectsTimestamp, at(2024, 1, 1)),
            signature_timestamp("T-1", at(2024, 2, 1)),
        ],
    )]));
    let report = reports.signature("S-1").unwrap();

    assert!(report.with_time.conclusion.is_valid());
    // content time-stamps never move the best-signature-time
    assert_eq!(report.with_time.best_signature_time.get(), at(2024, 2, 1));
}

fn delay_policy() -> ValidationPolicy {
    let mut policy = ValidationPolicy::default();
    policy.timestamp.timestamp_delay = Some(TimeRule::new(Level::Fail, 1, TimeUnit::Days));
    policy
}

fn signed_at(claimed: &str) -> ades_validation::diagnostic::SignatureFacts {
    let mut signature = signature(
        "S-1",
        basic_passed(),
        vec![signature_timestamp("T-1", at(2024, 2, 1))],
    );
    signature.claimed_signing_time = Some(claimed.to_owned());
    signature
}

#[test]
fn timestamp_delay_exceeded() {
    let reports = validate_with(document(vec![signed_at("2024-01-31T00:00:00Z")]), delay_policy());
    let conclusion = &reports.signature("S-1").unwrap().with_time.conclusion;

    assert!(conclusion.is(Indication::Failed, Some(SubIndication::SigConstraintsFailure)));
    assert_eq!(conclusion.errors()[0].tag, MessageTag::TimestampDelay);
}

#[test]
fn timestamp_delay_respected() {
    let reports = validate_with(document(vec![signed_at("2024-01-31T12:00:00Z")]), delay_policy());
    let report = reports.signature("S-1").unwrap();

    assert!(report.with_time.conclusion.is_valid());
    assert!(report.long_term.conclusion.is_valid());
}

#[test]
fn claimed_signing_time_blank() {
    let reports = validate_with(document(vec![signed_at("  ")]), delay_policy());
    let conclusion = &reports.signature("S-1").unwrap().with_time.conclusion;

    assert!(conclusion.is(
        Indication::Indeterminate,
        Some(SubIndication::ClaimedSigningTimeAbsent)
    ));
}

#[test]
fn claimed_signing_time_malformed() {
    let reports = validate_with(document(vec![signed_at("yesterday")]), delay_policy());
    let conclusion = &reports.signature("S-1").unwrap().with_time.conclusion;

    assert!(conclusion.is(Indication::Failed, Some(SubIndication::SigConstraintsFailure)));
}

#[test]
fn signing_time_ignored_without_delay() {
    let reports = validate(document(vec![signed_at("yesterday")]));
    let report = reports.signature("S-1").unwrap();

    assert!(report.with_time.conclusion.is_valid());
    assert!(!report
        .with_time
        .report
        .has_constraint(MessageTag::SigningTimePresent));
}

#[test]
fn best_signature_time_only_moves_earlier() {
    let later_first = signature(
        "S-1",
        basic_passed(),
        vec![
            signature_timestamp("T-1", at(2024, 3, 1)),
            signature_timestamp("T-2", at(2024, 2, 1)),
        ],
    );
    let earlier_first = signature(
        "S-2",
        basic_passed(),
        vec![
            signature_timestamp("T-1", at(2024, 2, 1)),
            signature_timestamp("T-2", at(2024, 3, 1)),
        ],
    );

    let reports = validate(document(vec![later_first, earlier_first]));

    for report in &reports.signatures {
        assert_eq!(report.with_time.best_signature_time.get(), at(2024, 2, 1));
        assert!(report.with_time.best_signature_time.get() <= reports.validation_time);
        assert!(report.with_time.conclusion.is_valid());
    }

    // the later time-stamp of S-2 is dropped with a warning
    let report = reports.signature("S-2").unwrap();
    let blocks: Vec<_> = report.with_time.report.blocks().collect();
    assert_eq!(blocks[1].id(), Some("T-2"));
    assert_eq!(blocks[1].attribute("accepted"), Some("false"));
    assert_eq!(
        blocks[1]
            .constraint(MessageTag::TimestampProductionBeforeBestSignatureTime)
            .unwrap()
            .status,
        ConstraintStatus::Warning
    );
}

#[test]
fn rejected_timestamps_are_reported_as_warnings() {
    let mut invalid = signature_timestamp("T-3", at(2024, 1, 1));
    invalid.basic_validation = Some(basic(Indication::Failed, Some(SubIndication::HashFailure)));

    let reports = validate(document(vec![signature(
        "S-1",
        basic_passed(),
        vec![
            signature_timestamp("T-1", at(2024, 2, 1)),
            signature_timestamp("T-2", at(2024, 3, 1)),
            invalid,
        ],
    )]));
    let conclusion = &reports.signature("S-1").unwrap().with_time.conclusion;

    assert!(conclusion.is_valid());
    assert!(conclusion.errors().is_empty());

    let tags: Vec<_> = conclusion.warnings().iter().map(|m| m.tag).collect();
    assert_eq!(
        tags,
        vec![
            MessageTag::TimestampProductionBeforeBestSignatureTime,
            MessageTag::TimestampBasicValidationAcceptable
        ]
    );
}

#[test]
fn timestamp_count() {
    let mut invalid = signature_timestamp("T-1", at(2024, 2, 1));
    invalid.basic_validation = Some(basic(Indication::Failed, Some(SubIndication::HashFailure)));

    let mut unreadable = signature_timestamp("T-1", at(2024, 2, 1));
    unreadable.message_imprint_found = false;

    let reports = validate(document(vec![
        signature("S-ABSENT", basic_passed(), vec![]),
        signature("S-INVALID", basic_passed(), vec![invalid]),
        signature("S-UNREADABLE", basic_passed(), vec![unreadable]),
        signature(
            "S-VALID",
            basic_passed(),
            vec![signature_timestamp("T-1", at(2024, 2, 1))],
        ),
    ]));

    let sub = |id: &str| reports.signature(id).unwrap().with_time.conclusion.sub_indication;
    assert_eq!(sub("S-ABSENT"), Some(SubIndication::NoTimestamp));
    assert_eq!(sub("S-INVALID"), Some(SubIndication::NoValidTimestamp));
    assert_eq!(sub("S-UNREADABLE"), Some(SubIndication::NoValidTimestamp));
    assert_eq!(sub("S-VALID"), None);
}

#[test]
fn stops_at_first_failure() {
    let reports = validate(document(vec![signature("S-1", basic_passed(), vec![])]));
    let report = &reports.signature("S-1").unwrap().with_time.report;

    let names: Vec<_> = report
        .entries()
        .iter()
        .map(|entry| match entry {
            ReportEntry::Constraint(c) => c.name,
            ReportEntry::Block(b) => panic!("unexpected block {}", b.kind()),
        })
        .collect();
    assert_eq!(
        names,
        vec![
            MessageTag::BasicValidationAcceptable,
            MessageTag::AtLeastOneValidTimestamp
        ]
    );
    assert_eq!(report.filter_errors().count(), 1);
}

#[test]
fn unacceptable_basic_verdict_is_propagated() {
    let mut facts = basic(Indication::Failed, Some(SubIndication::SigCryptoFailure));
    facts.errors.push("the signature value does not match".to_owned());

    let reports = validate(document(vec![signature(
        "S-1",
        facts,
        vec![signature_timestamp("T-1", at(2024, 2, 1))],
    )]));
    let report = reports.signature("S-1").unwrap();

    for conclusion in [&report.with_time.conclusion, &report.long_term.conclusion] {
        assert!(conclusion.is(Indication::Failed, Some(SubIndication::SigCryptoFailure)));
        assert_eq!(conclusion.errors()[0].tag, MessageTag::BasicValidationFinding);
    }
    assert_eq!(report.with_time.report.entries().len(), 1);
}

#[test]
fn signing_certificate_validity_always_fails() {
    let reports = validate(document(vec![signature(
        "S-1",
        indeterminate(SubIndication::OutOfBoundsNoPoe),
        vec![signature_timestamp("T-1", at(2024, 2, 1))],
    )]));
    let result = &reports.signature("S-1").unwrap().with_time;

    assert!(result
        .conclusion
        .is(Indication::Indeterminate, Some(SubIndication::OutOfBoundsNoPoe)));
    let constraint = result
        .report
        .constraint(MessageTag::SigningCertificateValidAtBestSignatureTime)
        .unwrap();
    assert_eq!(constraint.status, ConstraintStatus::Error);
    assert_eq!(constraint.id.as_deref(), Some("C-SIGNER"));
}

#[test]
fn not_yet_valid_at_best_signature_time() {
    let reports = validate(document(vec![signature(
        "S-1",
        indeterminate(SubIndication::OutOfBoundsNoPoe),
        vec![signature_timestamp("T-1", at(2022, 6, 1))],
    )]));

    assert!(reports
        .signature("S-1")
        .unwrap()
        .with_time
        .conclusion
        .is(Indication::Failed, Some(SubIndication::NotYetValid)));
}

#[test]
fn algorithm_reliable_at_best_signature_time() {
    let mut facts = indeterminate(SubIndication::CryptoConstraintsFailureNoPoe);
    facts.crypto_expiration = Some(at(2024, 3, 1));

    let reports = validate(document(vec![
        signature(
            "S-RELIABLE",
            facts.clone(),
            vec![signature_timestamp("T-1", at(2024, 2, 1))],
        ),
        signature(
            "S-EXPIRED",
            facts,
            vec![signature_timestamp("T-1", at(2024, 4, 1))],
        ),
    ]));

    assert!(reports
        .signature("S-RELIABLE")
        .unwrap()
        .with_time
        .conclusion
        .is_valid());
    assert!(reports.signature("S-EXPIRED").unwrap().with_time.conclusion.is(
        Indication::Indeterminate,
        Some(SubIndication::CryptoConstraintsFailureNoPoe)
    ));
}

#[test]
fn absent_rule_is_skipped() {
    let mut policy = ValidationPolicy::default();
    policy.signature.at_least_one_valid_timestamp = None;

    let reports = validate_with(
        document(vec![signature("S-1", basic_passed(), vec![])]),
        policy,
    );
    let result = &reports.signature("S-1").unwrap().with_time;

    assert!(result.conclusion.is_valid());
    assert!(!result.report.has_constraint(MessageTag::AtLeastOneValidTimestamp));
}

#[test]
fn ignored_rule_is_recorded() {
    let mut policy = ValidationPolicy::default();
    policy.signature.at_least_one_valid_timestamp = Some(Level::Ignore);

    let reports = validate_with(
        document(vec![signature("S-1", basic_passed(), vec![])]),
        policy,
    );
    let result = &reports.signature("S-1").unwrap().with_time;

    assert!(result.conclusion.is_valid());
    let constraint = result
        .report
        .constraint(MessageTag::AtLeastOneValidTimestamp)
        .unwrap();
    assert_eq!(constraint.status, ConstraintStatus::Information);
    assert!(constraint.message.is_none());
}
