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

//! The read-only fact model consumed by the validation processes.
//!
//! Diagnostic data is produced by an external extractor, which parses
//! signature containers, builds certificate chains, fetches revocation data
//! and executes the cryptographic primitives. The processes in this crate
//! only adjudicate the facts recorded here and never change them.

mod certificate;
mod revocation;
mod signature;
mod timestamp;

use std::collections::HashSet;
#[cfg(feature = "file_io")]
use std::path::Path;

pub use certificate::CertificateFacts;
use chrono::{DateTime, Utc};
pub use revocation::{RevocationFacts, RevocationKind, RevocationReason, RevocationStatus};
use serde::{Deserialize, Serialize};
pub use signature::{AlgorithmFacts, BasicValidationFacts, SignatureFacts};
pub use timestamp::{TimestampFacts, TimestampType};

use crate::{Error, Result};

/// All facts extracted from one signed document.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DiagnosticData {
    /// Instant the validation is performed at. Defaults to the current time
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_time: Option<DateTime<Utc>>,

    /// Signatures found in the document, in document order.
    #[serde(default)]
    pub signatures: Vec<SignatureFacts>,

    /// Every certificate referenced by a signature, a time-stamp or a
    /// revocation data item.
    #[serde(default)]
    pub certificates: Vec<CertificateFacts>,
}

impl DiagnosticData {
    /// Parses diagnostic data from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads diagnostic data from a JSON file.
    #[cfg(feature = "file_io")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .ok_or(Error::UnsupportedType)?
            .to_string_lossy();

        if !ext.eq_ignore_ascii_case("json") {
            return Err(Error::UnsupportedType);
        }

        let buf = std::fs::read(path)?;
        Ok(serde_json::from_slice(&buf)?)
    }

    /// Returns the signature with the given identifier.
    pub fn signature(&self, id: &str) -> Option<&SignatureFacts> {
        self.signatures.iter().find(|s| s.id == id)
    }

    /// Returns the certificate with the given identifier.
    pub fn certificate(&self, id: &str) -> Option<&CertificateFacts> {
        self.certificates.iter().find(|c| c.id == id)
    }

    /// Returns the certificate chain of a signature, signing certificate
    /// first.
    pub fn certificate_chain(&self, signature: &SignatureFacts) -> Vec<&CertificateFacts> {
        signature
            .certificate_chain
            .iter()
            .filter_map(|id| self.certificate(id))
            .collect()
    }

    /// Returns the signing certificate of a signature.
    pub fn signing_certificate(&self, signature: &SignatureFacts) -> Option<&CertificateFacts> {
        signature
            .certificate_chain
            .first()
            .and_then(|id| self.certificate(id))
    }

    /// Checks the referential integrity of the facts.
    ///
    /// Identifiers must be unique per kind and every certificate referenced
    /// by a signature chain must be present.
    pub fn validate(&self) -> Result<()> {
        unique_ids(self.signatures.iter().map(|s| s.id.as_str()))?;
        unique_ids(self.certificates.iter().map(|c| c.id.as_str()))?;

        for certificate in &self.certificates {
            unique_ids(certificate.revocations.iter().map(|r| r.id.as_str()))?;
        }

        for signature in &self.signatures {
            unique_ids(signature.timestamps.iter().map(|t| t.id.as_str()))?;

            if let Some(missing) = signature
                .certificate_chain
                .iter()
                .find(|id| self.certificate(id).is_none())
            {
                return Err(Error::UnknownCertificate {
                    signature: signature.id.clone(),
                    certificate: missing.clone(),
                });
            }
        }

        Ok(())
    }
}

fn unique_ids<'a, I: Iterator<Item = &'a str>>(ids: I) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::DuplicateId(id.to_owned()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use ades_status_tracker::Indication;

    use super::*;

    const FACTS: &str = r#"{
        "validation_time": "2023-01-01T00:00:00Z",
        "signatures": [
            {
                "id": "S-1",
                "certificate_chain": ["C-SIGNER", "C-ROOT"],
                "claimed_signing_time": "2021-03-01T09:00:00Z",
                "basic_validation": { "indication": "PASSED" },
                "timestamps": [
                    {
                        "id": "T-1",
                        "timestamp_type": "SIGNATURE_TIMESTAMP",
                        "production_time": "2021-03-01T09:05:00Z",
                        "message_imprint_found": true,
                        "message_imprint_intact": true
                    }
                ]
            }
        ],
        "certificates": [
            {
                "id": "C-SIGNER",
                "not_before": "2020-01-01T00:00:00Z",
                "not_after": "2024-01-01T00:00:00Z"
            },
            {
                "id": "C-ROOT",
                "not_before": "2010-01-01T00:00:00Z",
                "not_after": "2040-01-01T00:00:00Z",
                "trusted": true
            }
        ]
    }"#;

    #[test]
    fn from_json() {
        let data = DiagnosticData::from_json(FACTS).unwrap();
        data.validate().unwrap();

        let signature = data.signature("S-1").unwrap();
        let chain: Vec<&str> = data
            .certificate_chain(signature)
            .iter()
            .map(|c| c.id.as_str())
            .collect();

        assert_eq!(chain, vec!["C-SIGNER", "C-ROOT"]);
        assert_eq!(data.signing_certificate(signature).unwrap().id, "C-SIGNER");
        assert_eq!(
            signature.basic_validation.as_ref().unwrap().indication,
            Indication::Passed
        );
        assert_eq!(signature.signature_timestamps().count(), 1);
        assert!(!signature.has_long_term_availability_material());
    }

    #[test]
    fn timestamps_by_type() {
        let mut data = DiagnosticData::from_json(FACTS).unwrap();
        let signature = &mut data.signatures[0];

        let mut content = signature.timestamps[0].clone();
        content.id = "T-CONTENT".into();
        content.timestamp_type = TimestampType::AllDataObjectsTimestamp;
        let mut archive = signature.timestamps[0].clone();
        archive.id = "T-ARCHIVE".into();
        archive.timestamp_type = TimestampType::ArchiveTimestamp;
        signature.timestamps.push(archive);
        signature.timestamps.insert(0, content);

        fn ids<'a>(timestamps: impl Iterator<Item = &'a TimestampFacts>) -> Vec<&'a str> {
            timestamps.map(|t| t.id.as_str()).collect()
        }

        assert_eq!(ids(signature.content_timestamps()), vec!["T-CONTENT"]);
        assert_eq!(ids(signature.signature_timestamps()), vec!["T-1"]);
        assert_eq!(
            ids(signature.timestamps_of_type(&[
                TimestampType::ArchiveTimestamp,
                TimestampType::AllDataObjectsTimestamp
            ])),
            vec!["T-CONTENT", "T-ARCHIVE"]
        );
        assert!(signature.has_long_term_availability_material());
    }

    #[test]
    fn unknown_certificate() {
        let mut data = DiagnosticData::from_json(FACTS).unwrap();
        data.certificates.pop();

        match data.validate() {
            Err(Error::UnknownCertificate {
                signature,
                certificate,
            }) => {
                assert_eq!(signature, "S-1");
                assert_eq!(certificate, "C-ROOT");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_id() {
        let mut data = DiagnosticData::from_json(FACTS).unwrap();
        let copy = data.signatures[0].clone();
        data.signatures.push(copy);

        assert!(matches!(data.validate(), Err(Error::DuplicateId(id)) if id == "S-1"));
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            DiagnosticData::from_json("{ \"signatures\": 12 }"),
            Err(Error::JsonError(_))
        ));
    }

    #[cfg(feature = "file_io")]
    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("facts.json");
        std::fs::write(&path, FACTS).unwrap();
        assert_eq!(DiagnosticData::from_file(&path).unwrap().signatures.len(), 1);

        let path = dir.path().join("facts.xml");
        std::fs::write(&path, FACTS).unwrap();
        assert!(matches!(
            DiagnosticData::from_file(&path),
            Err(Error::UnsupportedType)
        ));
    }
}
