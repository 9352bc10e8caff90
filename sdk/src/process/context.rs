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

use std::{collections::HashMap, fmt};

use ades_status_tracker::{Conclusion, Indication, SubIndication};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::{
    collaborators::BasicVerdict,
    diagnostic::{CertificateFacts, DiagnosticData, SignatureFacts},
    policy::ValidationPolicy,
    process::crypto::CryptographicChecker,
    utils::time::format_time,
};

/// Per-signature inputs of the validation processes.
///
/// A context is built for one signature and only borrows shared, read-only
/// data, so independent signatures can be adjudicated in parallel.
#[derive(Clone, Copy, Debug)]
pub struct SignatureContext<'a> {
    diagnostic: &'a DiagnosticData,
    signature: &'a SignatureFacts,
    policy: &'a ValidationPolicy,
    basic: &'a BasicVerdict,
    timestamp_verdicts: &'a HashMap<String, BasicVerdict>,
    validation_time: DateTime<Utc>,
}

impl<'a> SignatureContext<'a> {
    pub fn new(
        diagnostic: &'a DiagnosticData,
        signature: &'a SignatureFacts,
        policy: &'a ValidationPolicy,
        basic: &'a BasicVerdict,
        timestamp_verdicts: &'a HashMap<String, BasicVerdict>,
        validation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            diagnostic,
            signature,
            policy,
            basic,
            timestamp_verdicts,
            validation_time,
        }
    }

    pub fn diagnostic(&self) -> &'a DiagnosticData {
        self.diagnostic
    }

    pub fn signature(&self) -> &'a SignatureFacts {
        self.signature
    }

    pub fn policy(&self) -> &'a ValidationPolicy {
        self.policy
    }

    /// Returns the verdict of the basic validation of the signature.
    pub fn basic(&self) -> &'a BasicVerdict {
        self.basic
    }

    /// Returns the sub-indication of the basic validation, if any.
    pub fn basic_sub_indication(&self) -> Option<SubIndication> {
        self.basic.conclusion.sub_indication
    }

    /// Returns `true` if the basic validation concluded with the given
    /// indication and one of the given sub-indications.
    pub(crate) fn basic_is_one_of(
        &self,
        indication: Indication,
        sub_indications: &[SubIndication],
    ) -> bool {
        let conclusion = &self.basic.conclusion;
        conclusion.indication == indication
            && conclusion
                .sub_indication
                .is_some_and(|sub| sub_indications.contains(&sub))
    }

    /// Returns the verdict of the basic validation of a time-stamp.
    pub fn timestamp_verdict(&self, id: &str) -> Option<&'a Conclusion> {
        self.timestamp_verdicts.get(id).map(|v| &v.conclusion)
    }

    pub fn validation_time(&self) -> DateTime<Utc> {
        self.validation_time
    }

    /// Returns the certificate chain of the signature, signing certificate
    /// first.
    pub fn certificate_chain(&self) -> Vec<&'a CertificateFacts> {
        self.diagnostic.certificate_chain(self.signature)
    }

    pub fn signing_certificate(&self) -> Option<&'a CertificateFacts> {
        self.diagnostic.signing_certificate(self.signature)
    }

    pub fn crypto(&self) -> CryptographicChecker<'a> {
        CryptographicChecker::new(&self.policy.cryptographic)
    }
}

/// The best-signature-time of a signature.
///
/// It starts at the validation time and can only move earlier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BestSignatureTime(DateTime<Utc>);

impl BestSignatureTime {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self(initial)
    }

    pub fn get(&self) -> DateTime<Utc> {
        self.0
    }

    /// Moves the best-signature-time to `time` if `time` is strictly
    /// earlier. Returns `true` if it moved.
    pub fn lower_to(&mut self, time: DateTime<Utc>) -> bool {
        if time < self.0 {
            self.0 = time;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for BestSignatureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(&self.0))
    }
}

impl Serialize for BestSignatureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn only_moves_earlier() {
        let t0 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();

        let mut bst = BestSignatureTime::new(t0);
        assert!(bst.lower_to(t1));
        assert!(!bst.lower_to(t2));
        assert!(!bst.lower_to(t1));
        assert_eq!(bst.get(), t1);
        assert_eq!(bst.to_string(), "2021-03-04 10:00:00 UTC");
    }

    #[test]
    fn serializes_like_report_attributes() {
        let t = Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap();
        let bst = BestSignatureTime::new(t);

        assert_eq!(
            serde_json::to_value(bst).unwrap(),
            serde_json::Value::String(format_time(&t))
        );
    }
}
