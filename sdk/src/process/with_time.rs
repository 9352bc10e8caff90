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

use ades_status_tracker::{message, BlockKind, Indication, MessageTag, SubIndication};
use log::info;

use super::{
    checks::{self, ACCEPTABLE_FOR_WITH_TIME},
    timestamps::validate_timestamps,
    BestSignatureTime, ProcessResult, SignatureContext,
};
use crate::{
    chain::{Chain, ChainStopped, Evaluation, Rule},
    utils::time::format_time,
};

/// Validation process for signatures with time (AdES-T).
///
/// Establishes the best-signature-time from the signature time-stamps and
/// decides whether it lifts an INDETERMINATE basic validation verdict.
pub struct ValidationProcessForSignaturesWithTime<'a> {
    ctx: &'a SignatureContext<'a>,
}

impl<'a> ValidationProcessForSignaturesWithTime<'a> {
    pub fn new(ctx: &'a SignatureContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn execute(&self) -> ProcessResult {
        let signature = self.ctx.signature();
        let mut chain = Chain::with_id(BlockKind::ValidationProcessWithTime, &signature.id);
        let mut bst = BestSignatureTime::new(self.ctx.validation_time());

        if self.run(&mut chain, &mut bst).is_ok() {
            chain.conclusion_mut().add_info(message!(
                MessageTag::BestSignatureTime,
                "best_signature_time" => bst
            ));
        }

        chain.set_attribute("best_signature_time", bst);
        let (report, conclusion) = chain.finish(Indication::Passed, None);

        info!(
            "{}: validation with time concluded {}{}",
            signature.id,
            conclusion.indication.verdict_label(),
            conclusion
                .sub_indication
                .map(|s| format!("/{s}"))
                .unwrap_or_default()
        );

        ProcessResult {
            report,
            conclusion,
            best_signature_time: bst,
        }
    }

    fn run(&self, chain: &mut Chain, bst: &mut BestSignatureTime) -> Result<(), ChainStopped> {
        let ctx = self.ctx;

        checks::check_basic_validation(ctx, chain, ACCEPTABLE_FOR_WITH_TIME)?;

        let outcome = validate_timestamps(ctx, chain, bst);
        checks::check_at_least_one_valid_timestamp(ctx, chain, &outcome)?;

        let bst = *bst;
        match ctx.basic_sub_indication() {
            Some(SubIndication::RevokedNoPoe) => {
                checks::check_revocation_time(
                    ctx,
                    chain,
                    ctx.signing_certificate().map(|c| c.id.as_str()),
                    ctx.basic().revocation_time,
                    bst,
                    SubIndication::RevokedNoPoe,
                )?;
            }
            Some(SubIndication::OutOfBoundsNoPoe) => {
                let certificate = ctx.signing_certificate();
                checks::check_issuance(ctx, chain, certificate, bst)?;

                // No proof that the signing certificate was valid at the
                // best-signature-time can be derived here, so this gate
                // always fails.
                let mut rule = Rule::new(
                    MessageTag::SigningCertificateValidAtBestSignatureTime,
                    ctx.policy()
                        .signature
                        .signing_certificate_valid_at_best_signature_time,
                    || Evaluation::fail().with_attribute("best_signature_time", bst),
                )
                .failing_with(
                    Indication::Indeterminate,
                    Some(SubIndication::OutOfBoundsNoPoe),
                );
                if let Some(cert) = certificate {
                    rule = rule.about(&cert.id);
                }
                chain.check(&rule)?;
            }
            Some(SubIndication::CryptoConstraintsFailureNoPoe) => {
                let expiration = ctx.basic().crypto_expiration.or_else(|| {
                    ctx.signature()
                        .signature_algorithm
                        .as_ref()
                        .and_then(|a| ctx.crypto().expiration(a))
                });

                chain.check(
                    &Rule::new(
                        MessageTag::AlgorithmReliableAtBestSignatureTime,
                        ctx.policy().signature.algorithm_reliable_at_best_signature_time,
                        || {
                            let evaluation = Evaluation::default()
                                .with_attribute("best_signature_time", bst);
                            match expiration {
                                Some(expiration) => evaluation
                                    .with_attribute(
                                        "finding",
                                        format!(
                                            "algorithm expired on {}",
                                            format_time(&expiration)
                                        ),
                                    )
                                    .passed_if(expiration >= bst.get()),
                                None => evaluation
                                    .with_attribute("finding", "algorithm expiration is unknown"),
                            }
                        },
                    )
                    .about(&ctx.signature().id)
                    .failing_with(
                        Indication::Indeterminate,
                        Some(SubIndication::CryptoConstraintsFailureNoPoe),
                    ),
                )?;
            }
            _ => {}
        }

        checks::check_coherence_order(ctx, chain, &outcome)?;
        checks::check_signing_time(ctx, chain, bst)?;

        Ok(())
    }
}
