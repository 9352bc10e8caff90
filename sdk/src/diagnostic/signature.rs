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

use ades_status_tracker::{Indication, SubIndication};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TimestampFacts, TimestampType};

/// Facts about one signature.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SignatureFacts {
    /// Identifier of the signature.
    pub id: String,

    /// Identifiers of the certificate chain, signing certificate first.
    #[serde(default)]
    pub certificate_chain: Vec<String>,

    /// Time-stamps embedded in the signature, in document order.
    #[serde(default)]
    pub timestamps: Vec<TimestampFacts>,

    /// Claimed signing time as found in the signed attributes. May be blank
    /// or malformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_signing_time: Option<String>,

    /// Algorithms used to produce the signature value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<AlgorithmFacts>,

    /// Verdict of the basic validation process, when computed upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_validation: Option<BasicValidationFacts>,

    /// Identifiers of evidence records protecting the signature.
    #[serde(default)]
    pub evidence_records: Vec<String>,

    /// The signed content is detached from the signature.
    #[serde(default)]
    pub detached_content: bool,

    /// The signature is enveloped by the signed content.
    #[serde(default)]
    pub enveloped: bool,
}

impl SignatureFacts {
    /// Returns the time-stamps of the given types, in document order.
    pub fn timestamps_of_type<'a>(
        &'a self,
        types: &'a [TimestampType],
    ) -> impl Iterator<Item = &'a TimestampFacts> + 'a {
        self.timestamps
            .iter()
            .filter(move |t| types.contains(&t.timestamp_type))
    }

    /// Returns the time-stamps over the signed content, in document order.
    pub fn content_timestamps(&self) -> impl Iterator<Item = &TimestampFacts> {
        self.timestamps_of_type(&TimestampType::CONTENT)
    }

    /// Returns the time-stamps over the signature value, in document order.
    pub fn signature_timestamps(&self) -> impl Iterator<Item = &TimestampFacts> {
        self.timestamps_of_type(&[TimestampType::SignatureTimestamp])
    }

    /// Returns `true` if an archive time-stamp, an evidence record or a
    /// time-stamp covering other time-stamps protects the signature.
    pub fn has_long_term_availability_material(&self) -> bool {
        !self.evidence_records.is_empty()
            || self.timestamps.iter().any(|t| {
                t.timestamp_type == TimestampType::ArchiveTimestamp || t.covers_timestamps()
            })
    }
}

/// Algorithms and key size used to produce a signature value.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AlgorithmFacts {
    /// Encryption algorithm, for example `rsa` or `ecdsa`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,

    /// Digest algorithm, for example `sha256`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Length of the public key in bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_length: Option<u32>,
}

impl AlgorithmFacts {
    /// Creates algorithm facts.
    pub fn new(encryption: &str, digest: &str, key_length: u32) -> Self {
        Self {
            encryption: Some(encryption.to_owned()),
            digest: Some(digest.to_owned()),
            key_length: Some(key_length),
        }
    }
}

/// Verdict of the basic validation process as computed upstream.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BasicValidationFacts {
    pub indication: Indication,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,

    /// Revocation instant recorded with `REVOKED_NO_POE` or
    /// `REVOKED_CA_NO_POE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_time: Option<DateTime<Utc>>,

    /// Algorithm expiration instant recorded with
    /// `CRYPTO_CONSTRAINTS_FAILURE_NO_POE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_expiration: Option<DateTime<Utc>>,

    /// Findings of the basic validation process.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl BasicValidationFacts {
    /// Creates a verdict without any recorded instant or finding.
    pub fn new(indication: Indication, sub_indication: Option<SubIndication>) -> Self {
        Self {
            indication,
            sub_indication,
            revocation_time: None,
            crypto_expiration: None,
            errors: vec![],
        }
    }

    /// Creates a [`Indication::Passed`] verdict.
    pub fn passed() -> Self {
        Self::new(Indication::Passed, None)
    }
}
