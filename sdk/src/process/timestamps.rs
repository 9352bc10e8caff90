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

use ades_status_tracker::{BlockKind, Conclusion, Indication, MessageTag, ReportNode, SubIndication};
use chrono::{DateTime, Utc};
use log::debug;

use super::{BestSignatureTime, SignatureContext};
use crate::{
    chain::{Chain, ChainStopped, Evaluation, Rule},
    diagnostic::TimestampFacts,
    utils::time::format_time,
};

/// Number of signature time-stamps able to establish the
/// best-signature-time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimestampCount {
    /// The signature has no signature time-stamp.
    Absent,
    /// No signature time-stamp was accepted.
    NoneValid,
    /// At least one signature time-stamp was accepted.
    AtLeastOneValid,
}

impl TimestampCount {
    /// Returns -1, 0 or 1.
    pub fn value(&self) -> i8 {
        match self {
            Self::Absent => -1,
            Self::NoneValid => 0,
            Self::AtLeastOneValid => 1,
        }
    }
}

/// What the time-stamp validation established.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TimestampOutcome {
    pub count: TimestampCount,

    /// Latest production time of the usable content time-stamps.
    pub latest_content_time: Option<DateTime<Utc>>,

    /// Earliest production time of the accepted signature time-stamps.
    pub earliest_signature_time: Option<DateTime<Utc>>,

    /// Number of time-stamps whose message imprint is valid.
    pub surviving: usize,
}

/// Validates the content time-stamps, then the signature time-stamps, each
/// in document order. Every time-stamp gets its own block in `chain`.
///
/// Accepted signature time-stamps lower `bst`.
pub(crate) fn validate_timestamps(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    bst: &mut BestSignatureTime,
) -> TimestampOutcome {
    let signature = ctx.signature();
    let mut latest_content_time: Option<DateTime<Utc>> = None;
    let mut earliest_signature_time: Option<DateTime<Utc>> = None;
    let mut surviving = 0;

    for timestamp in signature.content_timestamps() {
        let (report, conclusion, usable) = validate_timestamp(ctx, timestamp, None);
        chain.add_block(report);
        carry_messages(chain, &conclusion);

        if timestamp.is_message_imprint_valid() {
            surviving += 1;
        }
        if usable {
            latest_content_time = latest_content_time.max(Some(timestamp.production_time));
        }
    }

    let mut candidates = 0;
    for timestamp in signature.signature_timestamps() {
        candidates += 1;

        let (report, conclusion, usable) = validate_timestamp(ctx, timestamp, Some(*bst));
        chain.add_block(report);
        carry_messages(chain, &conclusion);

        if timestamp.is_message_imprint_valid() {
            surviving += 1;
        }
        if usable && bst.lower_to(timestamp.production_time) {
            debug!(
                "{}: best-signature-time lowered to {} by {}",
                signature.id, bst, timestamp.id
            );
            earliest_signature_time = Some(
                earliest_signature_time.map_or(timestamp.production_time, |t| {
                    t.min(timestamp.production_time)
                }),
            );
        }
    }

    let count = match (candidates, earliest_signature_time) {
        (0, _) => TimestampCount::Absent,
        (_, None) => TimestampCount::NoneValid,
        (_, Some(_)) => TimestampCount::AtLeastOneValid,
    };

    TimestampOutcome {
        count,
        latest_content_time,
        earliest_signature_time,
        surviving,
    }
}

// A rejected time-stamp does not stop the signature's chain, so its errors
// become warnings of the signature.
fn carry_messages(chain: &mut Chain, timestamp: &Conclusion) {
    let conclusion = chain.conclusion_mut();
    for message in timestamp.errors().iter().chain(timestamp.warnings()) {
        conclusion.add_warning(message.clone());
    }
    for message in timestamp.infos() {
        conclusion.add_info(message.clone());
    }
}

/// Validates one time-stamp. Signature time-stamps are validated against the
/// current best-signature-time.
///
/// Returns the time-stamp's block, its conclusion and whether the time-stamp
/// can be used.
fn validate_timestamp(
    ctx: &SignatureContext<'_>,
    timestamp: &TimestampFacts,
    bst: Option<BestSignatureTime>,
) -> (ReportNode, Conclusion, bool) {
    let verdict = ctx.timestamp_verdict(&timestamp.id);
    let passed = verdict.is_some_and(|v| v.is_valid());

    let mut chain = Chain::with_id(BlockKind::TimestampValidation, &timestamp.id);
    chain.set_attribute("production_time", format_time(&timestamp.production_time));

    let _ = run_timestamp_checks(ctx, &mut chain, timestamp, passed, bst);

    let usable = timestamp.is_message_imprint_valid()
        && passed
        && bst.map_or(true, |bst| timestamp.production_time < bst.get());

    let (indication, sub_indication) = if !timestamp.message_imprint_found {
        (Indication::Indeterminate, Some(SubIndication::SignedDataNotFound))
    } else if !timestamp.message_imprint_intact {
        (Indication::Failed, Some(SubIndication::HashFailure))
    } else {
        match verdict {
            Some(v) => (v.indication, v.sub_indication),
            None => (Indication::Indeterminate, None),
        }
    };

    chain.set_attribute("accepted", usable);
    let (report, conclusion) = chain.finish(indication, sub_indication);
    (report, conclusion, usable)
}

fn run_timestamp_checks(
    ctx: &SignatureContext<'_>,
    chain: &mut Chain,
    timestamp: &TimestampFacts,
    passed: bool,
    bst: Option<BestSignatureTime>,
) -> Result<(), ChainStopped> {
    let rules = &ctx.policy().timestamp;
    let verdict = ctx.timestamp_verdict(&timestamp.id);

    chain.check(
        &Rule::new(
            MessageTag::TimestampMessageImprintFound,
            rules.message_imprint_data_found,
            || Evaluation::from_bool(timestamp.message_imprint_found),
        )
        .failing_with(
            Indication::Indeterminate,
            Some(SubIndication::SignedDataNotFound),
        ),
    )?;

    chain.check(
        &Rule::new(
            MessageTag::TimestampMessageImprintIntact,
            rules.message_imprint_data_intact,
            || Evaluation::from_bool(timestamp.message_imprint_intact),
        )
        .failing_with(Indication::Failed, Some(SubIndication::HashFailure)),
    )?;

    chain.check(
        &Rule::new(
            MessageTag::TimestampBasicValidationAcceptable,
            rules.basic_validation_acceptable,
            || {
                let indication = verdict
                    .map(|v| v.indication.to_string())
                    .unwrap_or_else(|| "unknown".to_owned());
                Evaluation::from_bool(passed).with_attribute("indication", indication)
            },
        )
        .failing_with(
            verdict.map_or(Indication::Indeterminate, |v| v.indication),
            verdict.and_then(|v| v.sub_indication),
        ),
    )?;

    if let Some(bst) = bst {
        chain.check(
            &Rule::new(
                MessageTag::TimestampProductionBeforeBestSignatureTime,
                rules.production_before_best_signature_time,
                || {
                    Evaluation::from_bool(timestamp.production_time < bst.get())
                        .with_attribute(
                            "production_time",
                            format_time(&timestamp.production_time),
                        )
                        .with_attribute("best_signature_time", bst)
                },
            )
            .failing_with(Indication::Indeterminate, Some(SubIndication::NoPoe)),
        )?;
    }

    Ok(())
}
