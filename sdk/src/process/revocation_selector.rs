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

use std::cmp::Reverse;

use ades_status_tracker::{
    message, BlockKind, Conclusion, Constraint, ConstraintStatus, Indication, MessageTag,
    ReportNode, SubIndication,
};
use chrono::{DateTime, Utc};
use log::debug;

use crate::{
    diagnostic::{CertificateFacts, DiagnosticData, RevocationFacts},
    utils::time::format_time,
};

/// Outcome of a revocation selection.
#[derive(Clone, Debug)]
pub struct RevocationSelection<'a> {
    /// The revocation data item usable at the control time, if any.
    pub selected: Option<&'a RevocationFacts>,

    /// A `RevocationSelection` block listing every candidate considered.
    pub report: ReportNode,
}

/// Picks the revocation data usable as proof for a certificate at a control
/// time.
///
/// A candidate is usable when it was accepted by the upstream checks, its
/// issuer is known and was valid when the data was produced, its this-update
/// is strictly before the control time, and it existed at the control time.
/// Among usable candidates the latest production time wins, then the latest
/// this-update, then the earliest position in the certificate's list.
pub struct RevocationSelector<'a> {
    diagnostic: &'a DiagnosticData,
    certificate: &'a CertificateFacts,
    control_time: DateTime<Utc>,
}

impl<'a> RevocationSelector<'a> {
    pub fn new(
        diagnostic: &'a DiagnosticData,
        certificate: &'a CertificateFacts,
        control_time: DateTime<Utc>,
    ) -> Self {
        Self {
            diagnostic,
            certificate,
            control_time,
        }
    }

    pub fn select(&self) -> RevocationSelection<'a> {
        let mut report = ReportNode::with_id(BlockKind::RevocationSelection, &self.certificate.id);
        report.set_attribute("control_time", format_time(&self.control_time));

        let mut usable = vec![];
        for (position, revocation) in self.certificate.revocations.iter().enumerate() {
            let candidate = Constraint::new(MessageTag::RevocationCandidate, ConstraintStatus::Ok)
                .with_id(&revocation.id)
                .with_attribute("production_time", format_time(&revocation.production_time))
                .with_attribute("this_update", format_time(&revocation.this_update));

            match self.rejection(revocation) {
                Some(reason) => {
                    debug!(
                        "revocation {} for {} rejected: {reason}",
                        revocation.id, self.certificate.id
                    );
                    report.add_constraint(Constraint {
                        status: ConstraintStatus::Information,
                        message: Some(message!(
                            MessageTag::RevocationCandidate,
                            "reason" => reason
                        )),
                        ..candidate
                    });
                }
                None => {
                    report.add_constraint(candidate);
                    usable.push((position, revocation));
                }
            }
        }

        let selected = usable
            .into_iter()
            .max_by_key(|(position, r)| (r.production_time, r.this_update, Reverse(*position)))
            .map(|(_, r)| r);

        let control_time = format_time(&self.control_time);
        let (status, message, conclusion) = match selected {
            Some(_) => (ConstraintStatus::Ok, None, Conclusion::passed()),
            None => (
                ConstraintStatus::Information,
                Some(message!(MessageTag::RevocationSelected, "control_time" => &control_time)),
                Conclusion::with_sub_indication(Indication::Indeterminate, SubIndication::TryLater),
            ),
        };

        let mut constraint = Constraint::new(MessageTag::RevocationSelected, status)
            .with_attribute("control_time", control_time);
        if let Some(revocation) = selected {
            constraint = constraint.with_id(&revocation.id);
        }
        if let Some(message) = message {
            constraint = constraint.with_message(message);
        }
        report.add_constraint(constraint);
        report.set_conclusion(conclusion);

        RevocationSelection { selected, report }
    }

    fn rejection(&self, revocation: &RevocationFacts) -> Option<&'static str> {
        if !revocation.accepted {
            return Some("the revocation data was not accepted");
        }

        let issuer = revocation
            .issuer_certificate
            .as_deref()
            .and_then(|id| self.diagnostic.certificate(id));
        match issuer {
            None => return Some("the issuer of the revocation data is unknown"),
            Some(issuer) if !issuer.is_valid_at(revocation.production_time) => {
                return Some("the issuer was not valid when the revocation data was produced")
            }
            Some(_) => {}
        }

        if revocation.this_update >= self.control_time {
            return Some("this-update is not before the control time");
        }

        if !revocation.has_poe_at(self.control_time) {
            return Some("no proof of existence at the control time");
        }

        None
    }
}
