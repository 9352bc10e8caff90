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

//! The validation policy.
//!
//! Every constraint is optional. A constraint set to `None` is not evaluated
//! and leaves no trace in the report, while a constraint at
//! [`Level::Ignore`] is evaluated and recorded as information.
//!
//! Policies are layered: a partial JSON or TOML document only overrides the
//! values it names.
//!
//! ```
//! # use ades_validation::{policy::{Level, ValidationPolicy}, Result};
//! # fn main() -> Result<()> {
//! let policy = ValidationPolicy::new().with_toml(
//!     r#"
//!         [signature]
//!         at_least_one_valid_timestamp = "WARN"
//!
//!         [timestamp.timestamp_delay]
//!         level = "FAIL"
//!         value = 1
//!         unit = "days"
//!     "#,
//! )?;
//!
//! assert_eq!(policy.signature.at_least_one_valid_timestamp, Some(Level::Warn));
//! # Ok(())
//! # }
//! ```

mod constraint;
mod cryptographic;

#[cfg(feature = "file_io")]
use std::path::Path;

use config::{Config, FileFormat};
pub use constraint::{FreshnessRule, Level, TimeRule, TimeUnit, TimeValue};
pub use cryptographic::CryptographicConstraints;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const VERSION: u32 = 1;

// trait used to validate user input to make sure user supplied policies are valid
pub(crate) trait PolicyValidate {
    // returns error if the policy is invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Constraints applied to the signature by the validation processes.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SignatureConstraints {
    /// At least one signature time-stamp must establish the
    /// best-signature-time.
    pub at_least_one_valid_timestamp: Option<Level>,

    /// A revoked certificate must have been revoked after the
    /// best-signature-time.
    pub revocation_time_after_best_signature_time: Option<Level>,

    /// The best-signature-time must not be before the certificate issuance.
    pub best_signature_time_not_before_certificate_issuance: Option<Level>,

    /// The signing certificate must be valid at the best-signature-time.
    pub signing_certificate_valid_at_best_signature_time: Option<Level>,

    /// The best-signature-time must be before the certificate expiration.
    pub best_signature_time_before_certificate_expiration: Option<Level>,

    /// A certificate past its expiration must be known not to be revoked.
    pub known_not_revoked: Option<Level>,

    /// Algorithms must be reliable at the best-signature-time.
    pub algorithm_reliable_at_best_signature_time: Option<Level>,

    /// The signature must be acceptable at the best-signature-time.
    pub signature_acceptable_at_best_signature_time: Option<Level>,
}

impl Default for SignatureConstraints {
    fn default() -> Self {
        SignatureConstraints {
            at_least_one_valid_timestamp: Some(Level::Fail),
            revocation_time_after_best_signature_time: Some(Level::Fail),
            best_signature_time_not_before_certificate_issuance: Some(Level::Fail),
            signing_certificate_valid_at_best_signature_time: Some(Level::Fail),
            best_signature_time_before_certificate_expiration: Some(Level::Fail),
            known_not_revoked: Some(Level::Warn),
            algorithm_reliable_at_best_signature_time: Some(Level::Fail),
            signature_acceptable_at_best_signature_time: Some(Level::Fail),
        }
    }
}

impl PolicyValidate for SignatureConstraints {}

/// Constraints applied to time-stamps.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TimestampConstraints {
    pub message_imprint_data_found: Option<Level>,
    pub message_imprint_data_intact: Option<Level>,

    /// The basic validation of the time-stamp must pass.
    pub basic_validation_acceptable: Option<Level>,

    /// A signature time-stamp must be produced before the current
    /// best-signature-time to be used.
    pub production_before_best_signature_time: Option<Level>,

    /// Content time-stamps must be produced before signature time-stamps.
    pub coherence_order: Option<Level>,

    /// Level of the claimed signing time presence check. Falls back to the
    /// level of `timestamp_delay` when unset.
    pub signing_time_present: Option<Level>,

    /// Maximum delay between the claimed signing time and the
    /// best-signature-time.
    pub timestamp_delay: Option<TimeRule>,
}

impl Default for TimestampConstraints {
    fn default() -> Self {
        TimestampConstraints {
            message_imprint_data_found: Some(Level::Fail),
            message_imprint_data_intact: Some(Level::Fail),
            basic_validation_acceptable: Some(Level::Fail),
            production_before_best_signature_time: Some(Level::Warn),
            coherence_order: Some(Level::Fail),
            signing_time_present: None,
            timestamp_delay: None,
        }
    }
}

impl TimestampConstraints {
    /// Returns the level of the claimed signing time presence check, if the
    /// check applies.
    pub fn signing_time_present_level(&self) -> Option<Level> {
        let delay = self.timestamp_delay?;
        Some(self.signing_time_present.unwrap_or(delay.level))
    }
}

impl PolicyValidate for TimestampConstraints {
    fn validate(&self) -> Result<()> {
        if let Some(delay) = &self.timestamp_delay {
            if delay.time_value().try_duration().is_none() {
                return Err(Error::BadParam("timestamp_delay is out of range".into()));
            }
        }
        Ok(())
    }
}

/// Constraints applied to revocation data.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RevocationConstraints {
    /// Revocation data must be present for every certificate that requires
    /// it.
    pub revocation_data_available: Option<Level>,

    /// The revocation selector must find usable revocation data.
    pub acceptable_revocation_data_found: Option<Level>,

    pub revocation_freshness: Option<FreshnessRule>,

    /// The best-signature-time must precede the suspension of a certificate
    /// on hold.
    pub before_suspension: Option<Level>,

    /// Certificates with one of these policy identifiers need no revocation
    /// data.
    #[serde(default)]
    pub skip_for_policy_oids: Vec<String>,

    /// Certificates with the `id-pkix-ocsp-nocheck` extension need no
    /// revocation data.
    pub skip_for_ocsp_no_check: bool,

    /// Certificates whose validity period does not exceed this duration need
    /// no revocation data.
    pub short_term_validity: Option<TimeValue>,
}

impl Default for RevocationConstraints {
    fn default() -> Self {
        RevocationConstraints {
            revocation_data_available: Some(Level::Fail),
            acceptable_revocation_data_found: Some(Level::Fail),
            revocation_freshness: Some(FreshnessRule {
                level: Level::Fail,
                max_age: None,
            }),
            before_suspension: Some(Level::Fail),
            skip_for_policy_oids: vec![],
            skip_for_ocsp_no_check: true,
            short_term_validity: None,
        }
    }
}

impl PolicyValidate for RevocationConstraints {
    fn validate(&self) -> Result<()> {
        let max_age = self.revocation_freshness.and_then(|f| f.max_age);
        for value in [max_age, self.short_term_validity].into_iter().flatten() {
            if value.try_duration().is_none() {
                return Err(Error::BadParam("revocation duration is out of range".into()));
            }
        }
        Ok(())
    }
}

/// Settings to configure trust anchors.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TrustConstraints {
    /// Whether a trust anchor stops being one after its sunset date.
    ///
    /// The default value is true.
    pub use_sunset_date: bool,
}

#[allow(clippy::derivable_impls)]
impl Default for TrustConstraints {
    fn default() -> Self {
        TrustConstraints {
            use_sunset_date: true,
        }
    }
}

impl PolicyValidate for TrustConstraints {}

/// The validation policy.
///
/// Start from [`ValidationPolicy::new`] (or [`Default`]) and overlay partial
/// JSON or TOML documents with [`with_json`](Self::with_json),
/// [`with_toml`](Self::with_toml) or [`with_file`](Self::with_file).
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ValidationPolicy {
    /// Version of the policy format.
    pub version: u32,
    /// Constraints on the signature.
    pub signature: SignatureConstraints,
    /// Constraints on time-stamps.
    pub timestamp: TimestampConstraints,
    /// Constraints on revocation data.
    pub revocation: RevocationConstraints,
    /// Trust anchor settings.
    pub trust: TrustConstraints,
    /// Cryptographic constraints.
    pub cryptographic: CryptographicConstraints,
}

impl ValidationPolicy {
    /// Returns the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays a JSON document on top of this policy.
    pub fn with_json(self, json: &str) -> Result<Self> {
        self.with_string(json, "json")
    }

    /// Overlays a TOML document on top of this policy.
    pub fn with_toml(self, toml: &str) -> Result<Self> {
        self.with_string(toml, "toml")
    }

    /// Overlays a JSON or TOML file on top of this policy.
    ///
    /// The format is inferred from the file extension.
    #[cfg(feature = "file_io")]
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .ok_or(Error::BadParam(
                "policy file must have json or toml extension".into(),
            ))?
            .to_str()
            .ok_or(Error::BadParam("invalid policy file name".into()))?;
        let policy_buf = std::fs::read(path)?;
        self.with_string(&String::from_utf8_lossy(&policy_buf), ext)
    }

    /// Sets a single value by its dotted path, for example
    /// `signature.at_least_one_valid_timestamp`.
    pub fn with_value<T: Into<config::Value>>(self, path: &str, value: T) -> Result<Self> {
        let config = Config::try_from(&self).map_err(|e| Error::OtherError(Box::new(e)))?;

        let updated_config = Config::builder()
            .add_source(config)
            .set_override(path, value)
            .map_err(|e| Error::BadParam(format!("Invalid path '{path}': {e}")))?
            .build()
            .map_err(|e| Error::OtherError(Box::new(e)))?;

        let updated = updated_config
            .try_deserialize::<ValidationPolicy>()
            .map_err(|e| Error::BadParam(format!("Invalid value for '{path}': {e}")))?;

        updated.validate()?;

        Ok(updated)
    }

    /// Serializes the policy into a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    fn with_string(self, policy_str: &str, format: &str) -> Result<Self> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            _ => return Err(Error::UnsupportedType),
        };

        let current_config = Config::try_from(&self).map_err(|e| Error::OtherError(Box::new(e)))?;

        // merge overrides, allows for partial changes
        let updated_config = Config::builder()
            .add_source(current_config)
            .add_source(config::File::from_str(policy_str, f))
            .build()
            .map_err(|_e| Error::BadParam("could not parse policy".into()))?;

        let policy = updated_config
            .try_deserialize::<ValidationPolicy>()
            .map_err(|e| Error::BadParam(e.to_string()))?;

        policy.validate()?;

        Ok(policy)
    }

    /// Checks that the policy is usable.
    pub fn validate(&self) -> Result<()> {
        PolicyValidate::validate(self)
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy {
            version: VERSION,
            signature: Default::default(),
            timestamp: Default::default(),
            revocation: Default::default(),
            trust: Default::default(),
            cryptographic: Default::default(),
        }
    }
}

impl PolicyValidate for ValidationPolicy {
    fn validate(&self) -> Result<()> {
        if self.version > VERSION {
            return Err(Error::VersionCompatibility(
                "policy version too new".into(),
            ));
        }
        self.signature.validate()?;
        self.timestamp.validate()?;
        self.revocation.validate()?;
        self.trust.validate()?;
        self.cryptographic.validate()
    }
}
