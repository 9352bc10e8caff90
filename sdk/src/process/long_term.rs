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

use ades_status_tracker::{
    message, BlockKind, Indication, Message, MessageTag, ReportNode, SubIndication,
};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::{
    checks::{self, ACCEPTABLE_FOR_LONG_TERM},
    crypto::CryptoFinding,
    revocation_selector::{RevocationSelection, RevocationSelector},
    timestamps::validate_timestamps,
    BestSignatureTime, ProcessResult, SignatureContext,
};
use crate::{
    chain::{Chain, ChainStopped, Evaluation, Rule},
    collaborators::{RevocationFreshnessChecker, SignatureAcceptanceValidator},
    diagnostic::{AlgorithmFacts, CertificateFacts, RevocationFacts},
    policy::Level,
    utils::time::format_time,
};

/// Revocation data selected for one certificate of the chain.
#[derive(Clone, Copy, Debug)]
struct SelectedRevocation<'a> {
    certificate: &'a CertificateFacts,
    revocation: &'a RevocationFacts,
    signing_certificate: bool,
}

/// Validation process for signatures with long-term validation data
/// (AdES-LT).
///
/// Walks the certificate chain up to a trust anchor, selects revocation data
/// for every certificate that requires it and applies the time-stamp,
/// temporal and cryptographic constraints.
pub struct ValidationProcessForSignaturesWithLongTermData<'a> {
    ctx: &'a SignatureContext<'a>,
    freshness: &'a dyn RevocationFreshnessChecker,
    acceptance: &'a dyn SignatureAcceptanceValidator,
}

impl<'a> ValidationProcessForSignaturesWithLongTermData<'a> {
    pub fn new(
        ctx: &'a SignatureContext<'a>,
        freshness: &'a dyn RevocationFreshnessChecker,
        acceptance: &'a dyn SignatureAcceptanceValidator,
    ) -> Self {
        Self {
            ctx,
            freshness,
            acceptance,
        }
    }

    pub fn execute(&self) -> ProcessResult {
        let signature = self.ctx.signature();
        let mut chain = Chain::with_id(BlockKind::ValidationProcessLongTermData, &signature.id);
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
            "{}: validation with long-term data concluded {}{}",
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
        let signature = ctx.signature();

        checks::check_basic_validation(ctx, chain, ACCEPTABLE_FOR_LONG_TERM)?;

        let selected = self.check_revocation_data(chain, *bst)?;

        let outcome = if signature.has_long_term_availability_material() {
            chain.inform(
                MessageTag::LongTermAvailabilityPresent,
                Some(&signature.id),
                message!(MessageTag::LongTermAvailabilityPresent),
            );
            None
        } else {
            let outcome = validate_timestamps(ctx, chain, bst);
            checks::check_at_least_one_valid_timestamp(ctx, chain, &outcome)?;
            Some(outcome)
        };

        let bst = *bst;
        self.check_basic_sub_indication(chain, &selected, bst)?;

        if let Some(outcome) = outcome.filter(|o| o.surviving > 0) {
            checks::check_coherence_order(ctx, chain, &outcome)?;
            checks::check_signing_time(ctx, chain, bst)?;
        }

        if ctx.basic_sub_indication() == Some(SubIndication::TryLater) {
            self.check_try_later(chain, &selected, bst)?;
        }

        self.check_signature_acceptance(chain, bst)?;
        self.check_cryptographic_constraints(chain, &selected)?;

        Ok(())
    }

    /// Walks the chain from the signing certificate to the first trust
    /// anchor and selects revocation data for every certificate that needs
    /// it.
    fn check_revocation_data(
        &self,
        chain: &mut Chain,
        bst: BestSignatureTime,
    ) -> Result<Vec<SelectedRevocation<'a>>, ChainStopped> {
        let ctx = self.ctx;
        let rules = &ctx.policy().revocation;
        let use_sunset_date = ctx.policy().trust.use_sunset_date;

        let mut selected = vec![];
        for (position, certificate) in ctx.certificate_chain().into_iter().enumerate() {
            if certificate.is_trust_anchor_at(ctx.validation_time(), use_sunset_date) {
                debug!("{}: trust anchor {} reached", ctx.signature().id, certificate.id);
                break;
            }

            if let Some(reason) = self.revocation_skip_reason(certificate) {
                chain.inform(
                    MessageTag::RevocationCheckSkipped,
                    Some(&certificate.id),
                    message!(MessageTag::RevocationCheckSkipped, "reason" => reason),
                );
                continue;
            }

            chain.check(
                &Rule::new(
                    MessageTag::RevocationDataAvailable,
                    rules.revocation_data_available,
                    || Evaluation::from_bool(!certificate.revocations.is_empty()),
                )
                .about(&certificate.id)
                .failing_with(Indication::Indeterminate, Some(SubIndication::TryLater)),
            )?;

            if certificate.revocations.is_empty() {
                continue;
            }

            let RevocationSelection {
                selected: revocation,
                report,
            } = RevocationSelector::new(ctx.diagnostic(), certificate, bst.get()).select();
            chain.add_block(report);

            chain.check(
                &Rule::new(
                    MessageTag::AcceptableRevocationDataFound,
                    rules.acceptable_revocation_data_found,
                    || Evaluation::from_bool(revocation.is_some()),
                )
                .about(&certificate.id)
                .failing_with(Indication::Indeterminate, Some(SubIndication::TryLater)),
            )?;

            if let Some(revocation) = revocation {
                selected.push(SelectedRevocation {
                    certificate,
                    revocation,
                    signing_certificate: position == 0,
                });
            }
        }

        Ok(selected)
    }

    fn revocation_skip_reason(&self, certificate: &CertificateFacts) -> Option<&'static str> {
        let rules = &self.ctx.policy().revocation;

        if rules.skip_for_ocsp_no_check && certificate.ocsp_no_check {
            return Some("the certificate carries the ocsp-nocheck extension");
        }

        if certificate
            .policy_oids
            .iter()
            .any(|oid| rules.skip_for_policy_oids.contains(oid))
        {
            return Some("a certificate policy exempts the certificate");
        }

        if let Some(short_term) = rules.short_term_validity {
            if certificate.not_after - certificate.not_before <= short_term.duration() {
                return Some("the certificate is short-term");
            }
        }

        None
    }

    fn check_basic_sub_indication(
        &self,
        chain: &mut Chain,
        selected: &[SelectedRevocation<'a>],
        bst: BestSignatureTime,
    ) -> Result<(), ChainStopped> {
        let ctx = self.ctx;
        let signing = ctx.signing_certificate();

        match ctx.basic_sub_indication() {
            Some(sub @ (SubIndication::RevokedNoPoe | SubIndication::RevokedCaNoPoe)) => {
                let signing_revoked = sub == SubIndication::RevokedNoPoe;
                let mut affected: Vec<(Option<&CertificateFacts>, Option<DateTime<Utc>>)> =
                    selected
                        .iter()
                        .filter(|s| {
                            s.revocation.is_revoked() && s.signing_certificate == signing_revoked
                        })
                        .map(|s| (Some(s.certificate), s.revocation.revocation_time))
                        .collect();

                if affected.is_empty() {
                    let certificate = if signing_revoked { signing } else { None };
                    affected.push((certificate, ctx.basic().revocation_time));
                }

                for (certificate, revocation_time) in affected {
                    checks::check_revocation_time(
                        ctx,
                        chain,
                        certificate.map(|c| c.id.as_str()),
                        revocation_time,
                        bst,
                        sub,
                    )?;
                    checks::check_issuance(ctx, chain, certificate.or(signing), bst)?;
                    checks::check_expiration(
                        ctx,
                        chain,
                        certificate.or(signing),
                        bst,
                        SubIndication::OutOfBoundsNotRevoked,
                    )?;
                }
            }
            None | Some(SubIndication::OutOfBoundsNoPoe) => {
                checks::check_issuance(ctx, chain, signing, bst)?;

                let known_not_revoked = Self::known_not_revoked(selected);
                let expired = signing.is_some_and(|c| bst.get() >= c.not_after);
                if expired {
                    self.check_known_not_revoked(
                        chain,
                        signing,
                        known_not_revoked,
                        ctx.policy().signature.known_not_revoked,
                    )?;
                }

                let sub = if known_not_revoked {
                    SubIndication::OutOfBoundsNotRevoked
                } else {
                    SubIndication::OutOfBoundsNoPoe
                };
                checks::check_expiration(ctx, chain, signing, bst, sub)?;
            }
            Some(SubIndication::CryptoConstraintsFailureNoPoe) => {
                let level = ctx.policy().signature.algorithm_reliable_at_best_signature_time;
                let subjects = std::iter::once((
                    ctx.signature().id.as_str(),
                    ctx.signature().signature_algorithm.as_ref(),
                ))
                .chain(
                    ctx.certificate_chain()
                        .into_iter()
                        .map(|c| (c.id.as_str(), c.signature_algorithm.as_ref())),
                );

                for (id, algorithm) in subjects {
                    self.check_algorithm(
                        chain,
                        MessageTag::AlgorithmReliableAtBestSignatureTime,
                        level,
                        id,
                        algorithm,
                        ("best_signature_time", bst.get()),
                    )?;
                }
            }
            Some(SubIndication::OutOfBoundsNotRevoked) => {
                checks::check_issuance(ctx, chain, signing, bst)?;
                checks::check_expiration(
                    ctx,
                    chain,
                    signing,
                    bst,
                    SubIndication::OutOfBoundsNotRevoked,
                )?;

                let soft = ctx
                    .policy()
                    .signature
                    .known_not_revoked
                    .map(|level| if level == Level::Fail { Level::Warn } else { level });
                self.check_known_not_revoked(
                    chain,
                    signing,
                    Self::known_not_revoked(selected),
                    soft,
                )?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns `true` if good revocation data was selected for the signing
    /// certificate.
    fn known_not_revoked(selected: &[SelectedRevocation<'_>]) -> bool {
        selected
            .iter()
            .any(|s| s.signing_certificate && !s.revocation.is_revoked())
    }

    fn check_known_not_revoked(
        &self,
        chain: &mut Chain,
        certificate: Option<&CertificateFacts>,
        known_not_revoked: bool,
        level: Option<Level>,
    ) -> Result<(), ChainStopped> {
        let mut rule = Rule::new(MessageTag::CertificateKnownNotRevoked, level, || {
            Evaluation::from_bool(known_not_revoked)
        })
        .failing_with(Indication::Indeterminate, Some(SubIndication::OutOfBoundsNoPoe));

        if let Some(certificate) = certificate {
            rule = rule.about(&certificate.id);
        }
        chain.check(&rule)
    }

    fn check_algorithm(
        &self,
        chain: &mut Chain,
        name: MessageTag,
        level: Option<Level>,
        subject_id: &str,
        algorithm: Option<&AlgorithmFacts>,
        (time_key, time): (&str, DateTime<Utc>),
    ) -> Result<(), ChainStopped> {
        let result = self.ctx.crypto().check(algorithm, time);
        if result == Err(CryptoFinding::MissingAlgorithm) {
            warn!("{}: algorithm facts missing for {subject_id}", self.ctx.signature().id);
        }

        chain.check(
            &Rule::new(name, level, || {
                let evaluation = Evaluation::from_bool(result.is_ok())
                    .with_attribute(time_key, format_time(&time));
                match &result {
                    Ok(()) => evaluation,
                    Err(finding) => evaluation.with_attribute("finding", finding),
                }
            })
            .about(subject_id)
            .failing_with(
                Indication::Indeterminate,
                Some(SubIndication::CryptoConstraintsFailureNoPoe),
            ),
        )
    }

    fn check_try_later(
        &self,
        chain: &mut Chain,
        selected: &[SelectedRevocation<'a>],
        bst: BestSignatureTime,
    ) -> Result<(), ChainStopped> {
        let ctx = self.ctx;
        let rules = &ctx.policy().revocation;

        for s in selected {
            if s.revocation.is_on_hold() {
                chain.check(
                    &Rule::new(MessageTag::BeforeSuspension, rules.before_suspension, || {
                        let evaluation =
                            Evaluation::default().with_attribute("best_signature_time", bst);
                        match s.revocation.revocation_time {
                            Some(suspended) => evaluation
                                .with_attribute("suspension_time", format_time(&suspended))
                                .passed_if(bst.get() < suspended),
                            None => evaluation.with_attribute("suspension_time", "unknown"),
                        }
                    })
                    .about(&s.certificate.id)
                    .failing_with(Indication::Indeterminate, Some(SubIndication::TryLater)),
                )?;
                continue;
            }

            let Some(rule) = rules.revocation_freshness else {
                continue;
            };

            let conclusion = self
                .freshness
                .check(s.revocation, s.certificate, bst.get(), ctx.policy());

            let mut block = ReportNode::with_id(BlockKind::RevocationFreshness, &s.revocation.id);
            block.set_attribute("certificate", &s.certificate.id);
            block.set_attribute("control_time", bst);
            block.set_conclusion(conclusion.clone());
            chain.add_block(block);

            if !conclusion.is_valid() && rule.level == Level::Fail {
                for hint in conclusion.infos() {
                    chain.conclusion_mut().add_info(hint.clone());
                }
            }

            chain.check(
                &Rule::new(MessageTag::RevocationFresh, Some(rule.level), || {
                    let evaluation = Evaluation::from_bool(conclusion.is_valid())
                        .with_attribute("control_time", bst);
                    match conclusion.errors().first() {
                        Some(error) => evaluation.with_message(error.clone()),
                        None => evaluation,
                    }
                })
                .about(&s.revocation.id)
                .failing_with(conclusion.indication, conclusion.sub_indication),
            )?;
        }

        Ok(())
    }

    fn check_signature_acceptance(
        &self,
        chain: &mut Chain,
        bst: BestSignatureTime,
    ) -> Result<(), ChainStopped> {
        let ctx = self.ctx;
        let signature = ctx.signature();
        let conclusion = self.acceptance.check(signature, bst.get(), ctx.policy());

        let mut block = ReportNode::with_id(BlockKind::SignatureAcceptance, &signature.id);
        block.set_attribute("control_time", bst);
        block.set_conclusion(conclusion.clone());
        chain.add_block(block);

        let message: Option<Message> = conclusion.errors().first().cloned();
        chain.check(
            &Rule::new(
                MessageTag::SignatureAcceptableAtBestSignatureTime,
                ctx.policy().signature.signature_acceptable_at_best_signature_time,
                || {
                    let evaluation = Evaluation::from_bool(conclusion.is_valid())
                        .with_attribute("best_signature_time", bst);
                    match &message {
                        Some(message) => evaluation.with_message(message.clone()),
                        None => evaluation,
                    }
                },
            )
            .about(&signature.id)
            .failing_with(conclusion.indication, conclusion.sub_indication),
        )
    }

    /// Checks the certificate chain and the selected revocation data against
    /// the cryptographic constraints at the validation time.
    fn check_cryptographic_constraints(
        &self,
        chain: &mut Chain,
        selected: &[SelectedRevocation<'a>],
    ) -> Result<(), ChainStopped> {
        let ctx = self.ctx;
        let level = ctx.policy().cryptographic.chain_at_validation_time;
        let time = ("validation_time", ctx.validation_time());

        for certificate in ctx.certificate_chain() {
            self.check_algorithm(
                chain,
                MessageTag::AlgorithmReliableAtValidationTime,
                level,
                &certificate.id,
                certificate.signature_algorithm.as_ref(),
                time,
            )?;
        }

        for s in selected {
            self.check_algorithm(
                chain,
                MessageTag::AlgorithmReliableAtValidationTime,
                level,
                &s.revocation.id,
                s.revocation.signature_algorithm.as_ref(),
                time,
            )?;
        }

        Ok(())
    }
}
