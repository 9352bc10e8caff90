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

//! Validator inputs, outputs and orchestration.

mod common;

use ades_validation::{
    collaborators::{BasicValidation, BasicVerdict},
    diagnostic::{DiagnosticData, SignatureFacts, TimestampFacts},
    policy::ValidationPolicy,
    Conclusion, Error, Indication, Result, SubIndication, Validator,
};
use common::{
    assert_err, at, basic, document, fixture_path, indeterminate, signature, signature_timestamp,
    validate, validate_with,
};

fn timestamped(id: &str) -> SignatureFacts {
    signature(
        id,
        basic(Indication::Passed, None),
        vec![signature_timestamp("T-1", at(2024, 2, 1))],
    )
}

#[test]
fn missing_inputs() {
    let result = Validator::new()
        .with_policy(ValidationPolicy::default())
        .validate();
    assert_err!(result, Err(Error::MissingDiagnosticData));

    let result = Validator::new()
        .with_diagnostic_data(document(vec![]))
        .validate();
    assert_err!(result, Err(Error::MissingPolicy));
}

#[test]
fn unknown_certificate() {
    let mut signature = timestamped("S-1");
    signature.certificate_chain.push("C-MISSING".to_owned());

    let result = Validator::new()
        .with_diagnostic_data(document(vec![signature]))
        .with_policy(ValidationPolicy::default())
        .validate();

    assert_err!(result, Err(Error::UnknownCertificate { .. }));
}

#[test]
fn duplicate_signature() {
    let result = Validator::new()
        .with_diagnostic_data(document(vec![timestamped("S-1"), timestamped("S-1")]))
        .with_policy(ValidationPolicy::default())
        .validate();

    assert_err!(result, Err(Error::DuplicateId(_)));
}

#[test]
fn missing_basic_verdict() {
    let mut signature = timestamped("S-1");
    signature.basic_validation = None;

    let result = Validator::new()
        .with_diagnostic_data(document(vec![signature]))
        .with_policy(ValidationPolicy::default())
        .validate();
    assert!(matches!(result, Err(Error::MissingBasicValidation { id }) if id == "S-1"));

    let mut signature = timestamped("S-1");
    signature.timestamps[0].basic_validation = None;

    let result = Validator::new()
        .with_diagnostic_data(document(vec![signature]))
        .with_policy(ValidationPolicy::default())
        .validate();
    assert!(matches!(result, Err(Error::MissingBasicValidation { id }) if id == "T-1"));
}

#[test]
fn invalid_policy() {
    let mut policy = ValidationPolicy::default();
    policy.version = 99;

    let result = Validator::new()
        .with_diagnostic_data(document(vec![timestamped("S-1")]))
        .with_policy(policy)
        .validate();

    assert_err!(result, Err(Error::VersionCompatibility(_)));
}

#[test]
fn reports_follow_document_order() {
    let ids: Vec<String> = (0..32).map(|i| format!("S-{i:02}")).collect();
    let signatures = ids.iter().map(|id| timestamped(id)).collect();

    let reports = validate(document(signatures));

    let reported: Vec<_> = reports.signatures.iter().map(|s| s.id.clone()).collect();
    assert_eq!(reported, ids);
    assert!(reports
        .signatures
        .iter()
        .all(|s| s.indication() == Indication::Passed));
}

#[test]
fn identical_inputs_give_identical_reports() {
    let data = document(vec![
        timestamped("S-1"),
        signature("S-2", basic(Indication::Passed, None), vec![]),
        signature(
            "S-3",
            indeterminate(SubIndication::OutOfBoundsNoPoe),
            vec![signature_timestamp("T-1", at(2024, 2, 1))],
        ),
    ]);

    let first = validate(data.clone()).to_tree().unwrap();
    let second = validate(data).to_tree().unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn report_tree() {
    let reports = validate(document(vec![timestamped("S-1")]));
    let tree = reports.to_tree().unwrap();

    let signature = &tree["signatures"][0];
    assert_eq!(signature["id"], "S-1");
    assert_eq!(signature["long_term"]["conclusion"]["indication"], "PASSED");
    assert_eq!(
        signature["long_term"]["best_signature_time"],
        "2024-02-01 00:00:00 UTC"
    );
    assert_eq!(
        signature["with_time"]["report"]["kind"],
        "validationProcessWithTime"
    );
}

#[test]
fn validation_time_defaults_to_now() {
    let mut data = document(vec![timestamped("S-1")]);
    data.validation_time = None;

    let before = chrono::Utc::now();
    let reports = validate(data);

    assert!(reports.validation_time >= before);
    assert_eq!(
        reports.signature("S-1").unwrap().best_signature_time().get(),
        at(2024, 2, 1)
    );
}

#[test]
fn from_files() {
    let data = DiagnosticData::from_file(fixture_path("document.json")).unwrap();
    let policy = ValidationPolicy::new()
        .with_file(fixture_path("policy.toml"))
        .unwrap();

    let reports = validate_with(data, policy);

    let report = reports.signature("S-TIMESTAMPED").unwrap();
    assert_eq!(report.indication(), Indication::Passed);
    assert_eq!(report.with_time.conclusion.indication, Indication::Passed);

    let report = reports.signature("S-LATE").unwrap();
    assert!(report
        .long_term
        .conclusion
        .is(Indication::Failed, Some(SubIndication::SigConstraintsFailure)));

    let report = reports.signature("S-UNTIMESTAMPED").unwrap();
    assert_eq!(report.sub_indication(), Some(SubIndication::NoTimestamp));
    assert_eq!(report.basic.errors().len(), 1);
}

/// Treats every signature and time-stamp as valid.
struct Lenient;

impl BasicValidation for Lenient {
    fn signature_verdict(
        &self,
        _data: &DiagnosticData,
        _signature: &SignatureFacts,
        _policy: &ValidationPolicy,
    ) -> Result<BasicVerdict> {
        Ok(BasicVerdict::new(Conclusion::passed()))
    }

    fn timestamp_verdict(
        &self,
        _data: &DiagnosticData,
        _timestamp: &TimestampFacts,
        _policy: &ValidationPolicy,
    ) -> Result<BasicVerdict> {
        Ok(BasicVerdict::new(Conclusion::passed()))
    }
}

#[test]
fn custom_basic_validation() {
    let mut signature = timestamped("S-1");
    signature.basic_validation = None;
    signature.timestamps[0].basic_validation = None;

    let reports = Validator::new()
        .with_diagnostic_data(document(vec![signature]))
        .with_policy(ValidationPolicy::default())
        .with_basic_validation(Lenient)
        .validate()
        .unwrap();

    assert_eq!(reports.signature("S-1").unwrap().indication(), Indication::Passed);
}
