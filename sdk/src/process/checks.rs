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

//! Gates shared by the validation processes.

use ades_status_tracker::{Indication, MessageTag, SubIndication};
use chrono::{DateTime, Utc};
use log::warn;

use super::{timestamps::TimestampOutcome, BestSignatureTime, SignatureContext};
use crate::{
    chain::{Chain, ChainStopped, Evaluation, Rule},
    diagnostic::CertificateFacts,
    policy::Level,
    utils::time::{format_time, parse_claimed_time},
};

/// Sub-indications of the basic validation the with-time process can
/// recover from.
pub(crate) const ACCEPTABLE_FOR_WITH_TIME: &[SubIndication] = &[
    SubIndication::OutOfBoundsNoPoe,
    SubIndication::RevokedNoPoe,
    SubIndication::CryptoConstraintsFailureNoPoe,
];

/// Sub-indications of the basic validation the long-term process can
/// recover from.
pub(crate) const ACCEPTABLE_FOR_LONG_TERM: &[SubIndication] = &[
    SubIndication::CryptoConstraintsFailureNoPoe,
    SubIndication::RevokedNoPoe,
    SubIndication::RevokedCaNoPoe,
    SubIndication::TryLater,
    SubIndication::OutOfBoundsNoPoe,
    SubIndication::OutOfBoundsNotRevoked,
];

/// The basic validation verdict must be PASSED or INDETERMINATE with one of
/// `acceptable`. Otherwise the basic verdict and its errors are propagated.
pub(crate) fn check_basic_validation(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    acceptable: &[SubIndication],
) -> Result<(), ChainStopped> {
    let basic = &ctx.basic().conclusion;
    let accepted = basic.is_valid() || ctx.basic_is_one_of(Indication::Indeterminate, acceptable);

    if !accepted {
        chain.conclusion_mut().append_errors(basic);
    }

    chain.check(
        &Rule::new(MessageTag::BasicValidationAcceptable, Some(Level::Fail), || {
            let evaluation =
                Evaluation::from_bool(accepted).with_attribute("indication", basic.indication);
            match basic.sub_indication {
                Some(sub) => evaluation.with_attribute("sub_indication", sub),
                None => evaluation,
            }
        })
        .failing_with(basic.indication, basic.sub_indication),
    )
}

/// At least one signature time-stamp must have been accepted.
pub(crate) fn check_at_least_one_valid_timestamp(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    outcome: &TimestampOutcome,
) -> Result<(), ChainStopped> {
    let count = outcome.count;
    let sub_indication = if count.value() < 0 {
        SubIndication::NoTimestamp
    } else {
        SubIndication::NoValidTimestamp
    };

    chain.check(
        &Rule::new(
            MessageTag::AtLeastOneValidTimestamp,
            ctx.policy().signature.at_least_one_valid_timestamp,
            || Evaluation::from_bool(count.value() > 0).with_attribute("count", count.value()),
        )
        .failing_with(Indication::Indeterminate, Some(sub_indication)),
    )
}

/// The certificate must have been revoked after the best-signature-time.
pub(crate) fn check_revocation_time(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    certificate_id: Option<&str>,
    revocation_time: Option<DateTime<Utc>>,
    bst: BestSignatureTime,
    sub_indication: SubIndication,
) -> Result<(), ChainStopped> {
    let mut rule = Rule::new(
        MessageTag::RevocationTimeAfterBestSignatureTime,
        ctx.policy().signature.revocation_time_after_best_signature_time,
        || {
            let evaluation = Evaluation::default().with_attribute("best_signature_time", bst);
            match revocation_time {
                Some(revoked) => evaluation
                    .with_attribute("revocation_time", format_time(&revoked))
                    .passed_if(bst.get() < revoked),
                None => {
                    warn!(
                        "{}: revocation time missing for {}",
                        ctx.signature().id,
                        certificate_id.unwrap_or("the signing certificate")
                    );
                    evaluation.with_attribute("revocation_time", "unknown")
                }
            }
        },
    )
    .failing_with(Indication::Indeterminate, Some(sub_indication));

    if let Some(id) = certificate_id {
        rule = rule.about(id);
    }
    chain.check(&rule)
}

/// The best-signature-time must not be before the issuance of the
/// certificate.
pub(crate) fn check_issuance(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    certificate: Option<&CertificateFacts>,
    bst: BestSignatureTime,
) -> Result<(), ChainStopped> {
    let mut rule = Rule::new(
        MessageTag::BestSignatureTimeNotBeforeCertificateIssuance,
        ctx.policy()
            .signature
            .best_signature_time_not_before_certificate_issuance,
        || {
            let evaluation = Evaluation::default().with_attribute("best_signature_time", bst);
            match certificate {
                Some(cert) => evaluation
                    .with_attribute("not_before", format_time(&cert.not_before))
                    .passed_if(cert.not_before <= bst.get()),
                None => {
                    warn!("{}: signing certificate missing", ctx.signature().id);
                    evaluation.with_attribute("not_before", "unknown")
                }
            }
        },
    )
    .failing_with(Indication::Failed, Some(SubIndication::NotYetValid));

    if let Some(cert) = certificate {
        rule = rule.about(&cert.id);
    }
    chain.check(&rule)
}

/// The best-signature-time must be before the expiration of the
/// certificate.
pub(crate) fn check_expiration(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    certificate: Option<&CertificateFacts>,
    bst: BestSignatureTime,
    sub_indication: SubIndication,
) -> Result<(), ChainStopped> {
    let mut rule = Rule::new(
        MessageTag::BestSignatureTimeBeforeCertificateExpiration,
        ctx.policy()
            .signature
            .best_signature_time_before_certificate_expiration,
        || {
            let evaluation = Evaluation::default().with_attribute("best_signature_time", bst);
            match certificate {
                Some(cert) => evaluation
                    .with_attribute("not_after", format_time(&cert.not_after))
                    .passed_if(bst.get() < cert.not_after),
                None => {
                    warn!("{}: signing certificate missing", ctx.signature().id);
                    evaluation.with_attribute("not_after", "unknown")
                }
            }
        },
    )
    .failing_with(Indication::Indeterminate, Some(sub_indication));

    if let Some(cert) = certificate {
        rule = rule.about(&cert.id);
    }
    chain.check(&rule)
}

/// Content time-stamps must be produced before the accepted signature
/// time-stamps.
pub(crate) fn check_coherence_order(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    outcome: &TimestampOutcome,
) -> Result<(), ChainStopped> {
    chain.check(
        &Rule::new(
            MessageTag::TimestampCoherenceOrder,
            ctx.policy().timestamp.coherence_order,
            || match (outcome.latest_content_time, outcome.earliest_signature_time) {
                (Some(content), Some(signature)) => Evaluation::from_bool(content < signature)
                    .with_attribute("content_time", format_time(&content))
                    .with_attribute("signature_time", format_time(&signature)),
                _ => Evaluation::pass(),
            },
        )
        .failing_with(Indication::Failed, Some(SubIndication::TimestampOrderFailure)),
    )
}

/// The claimed signing time must be present and, with the permitted delay,
/// after the best-signature-time. Only applies when a delay is configured.
pub(crate) fn check_signing_time(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    bst: BestSignatureTime,
) -> Result<(), ChainStopped> {
    let rules = &ctx.policy().timestamp;
    let Some(delay) = rules.timestamp_delay else {
        return Ok(());
    };

    let claimed = ctx
        .signature()
        .claimed_signing_time
        .as_deref()
        .unwrap_or_default();

    chain.check(
        &Rule::new(
            MessageTag::SigningTimePresent,
            rules.signing_time_present_level(),
            || Evaluation::from_bool(!claimed.trim().is_empty()),
        )
        .failing_with(
            Indication::Indeterminate,
            Some(SubIndication::ClaimedSigningTimeAbsent),
        ),
    )?;

    chain.check(
        &Rule::new(MessageTag::TimestampDelay, Some(delay.level), || {
            let evaluation = Evaluation::default()
                .with_attribute("best_signature_time", bst)
                .with_attribute("claimed_signing_time", claimed);
            match parse_claimed_time(claimed) {
                Some(signing_time) => {
                    let limit = signing_time.checked_add_signed(delay.time_value().duration());
                    evaluation.passed_if(limit.map_or(true, |limit| limit > bst.get()))
                }
                None => {
                    warn!(
                        "{}: claimed signing time {claimed:?} cannot be parsed",
                        ctx.signature().id
                    );
                    evaluation
                }
            }
        })
        .failing_with(Indication::Failed, Some(SubIndication::SigConstraintsFailure)),
    )
}
