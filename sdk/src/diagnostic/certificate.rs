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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlgorithmFacts, RevocationFacts};

/// Facts about one certificate.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CertificateFacts {
    /// Identifier of the certificate.
    pub id: String,

    /// Start of the validity period.
    pub not_before: DateTime<Utc>,

    /// End of the validity period.
    pub not_after: DateTime<Utc>,

    /// The certificate is a trust anchor.
    #[serde(default)]
    pub trusted: bool,

    /// Instant after which the trust anchor is no longer trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset_date: Option<DateTime<Utc>>,

    /// Revocation data about this certificate, in the order it was
    /// collected.
    #[serde(default)]
    pub revocations: Vec<RevocationFacts>,

    /// Certificate policy identifiers.
    #[serde(default)]
    pub policy_oids: Vec<String>,

    /// The certificate carries the `id-pkix-ocsp-nocheck` extension.
    #[serde(default)]
    pub ocsp_no_check: bool,

    /// Algorithms used by the issuer to sign this certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<AlgorithmFacts>,
}

impl CertificateFacts {
    /// Returns `true` if the certificate is a trust anchor at `time`.
    ///
    /// With `use_sunset_date`, a trust anchor whose sunset date is not after
    /// `time` is no longer trusted.
    pub fn is_trust_anchor_at(&self, time: DateTime<Utc>, use_sunset_date: bool) -> bool {
        if !self.trusted {
            return false;
        }

        match self.sunset_date {
            Some(sunset) if use_sunset_date => time < sunset,
            _ => true,
        }
    }

    /// Returns `true` if `time` is within the validity period.
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.not_before <= time && time <= self.not_after
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::TimeZone;

    use super::*;

    fn anchor() -> CertificateFacts {
        CertificateFacts {
            id: "C-ROOT".into(),
            not_before: Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
            not_after: Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).unwrap(),
            trusted: true,
            sunset_date: Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()),
            revocations: vec![],
            policy_oids: vec![],
            ocsp_no_check: false,
            signature_algorithm: None,
        }
    }

    #[test]
    fn sunset_date() {
        let cert = anchor();
        let before = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();

        assert!(cert.is_trust_anchor_at(before, true));
        assert!(!cert.is_trust_anchor_at(after, true));
        assert!(cert.is_trust_anchor_at(after, false));
    }

    #[test]
    fn validity_period() {
        let cert = anchor();

        assert!(cert.is_valid_at(cert.not_before));
        assert!(cert.is_valid_at(cert.not_after));
        assert!(!cert.is_valid_at(Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap()));
    }
}
