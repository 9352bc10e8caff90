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

use super::AlgorithmFacts;

/// Source of a revocation data item.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationKind {
    Crl,
    Ocsp,
}

/// Revocation status reported for a certificate.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationStatus {
    Good,
    Revoked,
}

/// CRL reason codes (RFC 5280, section 5.3.1).
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

/// Facts about one CRL entry or OCSP response.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RevocationFacts {
    /// Identifier of the revocation data item.
    pub id: String,

    pub kind: RevocationKind,

    /// Identifier of the certificate that signed the revocation data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_certificate: Option<String>,

    /// Instant the CRL or OCSP response was produced.
    pub production_time: DateTime<Utc>,

    pub this_update: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_update: Option<DateTime<Utc>>,

    pub status: RevocationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RevocationReason>,

    /// Revocation instant when `status` is `REVOKED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_time: Option<DateTime<Utc>>,

    /// The structural and signature checks of the revocation data passed.
    #[serde(default)]
    pub accepted: bool,

    /// Algorithms used to sign the revocation data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<AlgorithmFacts>,
}

impl RevocationFacts {
    /// Returns `true` if the certificate is reported as revoked.
    pub fn is_revoked(&self) -> bool {
        self.status == RevocationStatus::Revoked
    }

    /// Returns `true` if the certificate is reported as suspended.
    pub fn is_on_hold(&self) -> bool {
        self.is_revoked() && self.reason == Some(RevocationReason::CertificateHold)
    }

    /// Returns `true` if the revocation data is known to exist at `time`.
    pub fn has_poe_at(&self, time: DateTime<Utc>) -> bool {
        self.production_time <= time
    }
}
