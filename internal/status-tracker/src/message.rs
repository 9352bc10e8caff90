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

//! Catalog of constraint names and report messages.
//!
//! Every constraint a validation process can evaluate, and every message it
//! can attach to a report, is a [`MessageTag`]. Reports carry the tag's
//! stable [`code`](MessageTag::code); human text is looked up from the tag
//! and rendered with the attributes of the [`Message`].

use std::{collections::BTreeMap, fmt};

use serde::{Serialize, Serializer};

/// Names every constraint and message known to the validation processes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MessageTag {
    /// The basic validation verdict allows the process to continue.
    BasicValidationAcceptable,

    /// A finding reported by the basic validation process.
    BasicValidationFinding,

    /// The message imprint of a time-stamp was found.
    TimestampMessageImprintFound,

    /// The message imprint of a time-stamp is intact.
    TimestampMessageImprintIntact,

    /// The basic validation of a time-stamp passed.
    TimestampBasicValidationAcceptable,

    /// A signature time-stamp was produced before the best-signature-time.
    TimestampProductionBeforeBestSignatureTime,

    /// At least one signature time-stamp was accepted.
    AtLeastOneValidTimestamp,

    /// The revocation time is after the best-signature-time.
    RevocationTimeAfterBestSignatureTime,

    /// The best-signature-time is not before the certificate issuance.
    BestSignatureTimeNotBeforeCertificateIssuance,

    /// The signing certificate is valid at the best-signature-time.
    SigningCertificateValidAtBestSignatureTime,

    /// The best-signature-time is before the certificate expiration.
    BestSignatureTimeBeforeCertificateExpiration,

    /// The certificate is known not to be revoked.
    CertificateKnownNotRevoked,

    /// An algorithm is reliable at the best-signature-time.
    AlgorithmReliableAtBestSignatureTime,

    /// An algorithm is reliable at the validation time.
    AlgorithmReliableAtValidationTime,

    /// Content time-stamps precede signature time-stamps.
    TimestampCoherenceOrder,

    /// The claimed signing time is present.
    SigningTimePresent,

    /// The claimed signing time plus the permitted delay is after the
    /// best-signature-time.
    TimestampDelay,

    /// Revocation checking is not required for a certificate.
    RevocationCheckSkipped,

    /// Revocation data is available for a certificate.
    RevocationDataAvailable,

    /// Acceptable revocation data was found for a certificate.
    AcceptableRevocationDataFound,

    /// Long-term availability material defers time-stamp validation.
    LongTermAvailabilityPresent,

    /// The best-signature-time is before a certificate suspension.
    BeforeSuspension,

    /// Revocation data is fresh.
    RevocationFresh,

    /// The signature is acceptable at the best-signature-time.
    SignatureAcceptableAtBestSignatureTime,

    /// The cryptographic constraints are met.
    CryptographicConstraintsMet,

    /// One revocation candidate considered by the selector.
    RevocationCandidate,

    /// The revocation selector found a usable candidate.
    RevocationSelected,

    /// The best-signature-time reached by a process.
    BestSignatureTime,

    /// A hint for when fresher revocation data is expected.
    RevocationRetryAfter,
}

impl MessageTag {
    /// Returns the stable identifier used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BasicValidationAcceptable => "basicValidation.acceptable",
            Self::BasicValidationFinding => "basicValidation.finding",
            Self::TimestampMessageImprintFound => "timeStamp.messageImprint.found",
            Self::TimestampMessageImprintIntact => "timeStamp.messageImprint.intact",
            Self::TimestampBasicValidationAcceptable => "timeStamp.basicValidation.acceptable",
            Self::TimestampProductionBeforeBestSignatureTime => {
                "timeStamp.productionTime.beforeBestSignatureTime"
            }
            Self::AtLeastOneValidTimestamp => "signature.timeStamp.atLeastOneValid",
            Self::RevocationTimeAfterBestSignatureTime => {
                "signingCredential.revocationTime.afterBestSignatureTime"
            }
            Self::BestSignatureTimeNotBeforeCertificateIssuance => {
                "signingCredential.issuance.notAfterBestSignatureTime"
            }
            Self::SigningCertificateValidAtBestSignatureTime => {
                "signingCredential.validAtBestSignatureTime"
            }
            Self::BestSignatureTimeBeforeCertificateExpiration => {
                "signingCredential.expiration.afterBestSignatureTime"
            }
            Self::CertificateKnownNotRevoked => "signingCredential.knownNotRevoked",
            Self::AlgorithmReliableAtBestSignatureTime => "algorithm.reliableAtBestSignatureTime",
            Self::AlgorithmReliableAtValidationTime => "algorithm.reliableAtValidationTime",
            Self::TimestampCoherenceOrder => "timeStamp.coherenceOrder",
            Self::SigningTimePresent => "signature.signingTime.present",
            Self::TimestampDelay => "signature.timeStamp.delay",
            Self::RevocationCheckSkipped => "revocation.check.skipped",
            Self::RevocationDataAvailable => "revocation.data.available",
            Self::AcceptableRevocationDataFound => "revocation.data.acceptable",
            Self::LongTermAvailabilityPresent => "signature.longTermAvailability.present",
            Self::BeforeSuspension => "revocation.suspension.afterBestSignatureTime",
            Self::RevocationFresh => "revocation.fresh",
            Self::SignatureAcceptableAtBestSignatureTime => {
                "signature.acceptableAtBestSignatureTime"
            }
            Self::CryptographicConstraintsMet => "cryptographic.constraints.met",
            Self::RevocationCandidate => "revocation.candidate",
            Self::RevocationSelected => "revocation.selected",
            Self::BestSignatureTime => "signature.bestSignatureTime",
            Self::RevocationRetryAfter => "revocation.retryAfter",
        }
    }

    /// Returns the question a constraint with this name answers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::BasicValidationAcceptable => {
                "Is the result of the basic validation process acceptable?"
            }
            Self::BasicValidationFinding => "What did the basic validation process report?",
            Self::TimestampMessageImprintFound => "Is the message imprint of the time-stamp found?",
            Self::TimestampMessageImprintIntact => {
                "Is the message imprint of the time-stamp intact?"
            }
            Self::TimestampBasicValidationAcceptable => {
                "Is the basic validation of the time-stamp conclusive?"
            }
            Self::TimestampProductionBeforeBestSignatureTime => {
                "Is the time-stamp produced before the best-signature-time?"
            }
            Self::AtLeastOneValidTimestamp => "Is there at least one valid time-stamp?",
            Self::RevocationTimeAfterBestSignatureTime => {
                "Is the revocation time after the best-signature-time?"
            }
            Self::BestSignatureTimeNotBeforeCertificateIssuance => {
                "Is the best-signature-time not before the issuance date of the certificate?"
            }
            Self::SigningCertificateValidAtBestSignatureTime => {
                "Is the signing certificate valid at the best-signature-time?"
            }
            Self::BestSignatureTimeBeforeCertificateExpiration => {
                "Is the best-signature-time before the expiration date of the certificate?"
            }
            Self::CertificateKnownNotRevoked => "Is the certificate known not to be revoked?",
            Self::AlgorithmReliableAtBestSignatureTime => {
                "Is the algorithm reliable at the best-signature-time?"
            }
            Self::AlgorithmReliableAtValidationTime => {
                "Is the algorithm reliable at the validation time?"
            }
            Self::TimestampCoherenceOrder => {
                "Are content time-stamps produced before signature time-stamps?"
            }
            Self::SigningTimePresent => "Is the claimed signing time present?",
            Self::TimestampDelay => "Is the time-stamp delay respected?",
            Self::RevocationCheckSkipped => "Is revocation checking required?",
            Self::RevocationDataAvailable => "Is revocation data available?",
            Self::AcceptableRevocationDataFound => "Is acceptable revocation data found?",
            Self::LongTermAvailabilityPresent => "Is long-term availability material present?",
            Self::BeforeSuspension => {
                "Is the best-signature-time before the suspension of the certificate?"
            }
            Self::RevocationFresh => "Is the revocation data fresh?",
            Self::SignatureAcceptableAtBestSignatureTime => {
                "Is the signature acceptable at the best-signature-time?"
            }
            Self::CryptographicConstraintsMet => "Are the cryptographic constraints met?",
            Self::RevocationCandidate => "Can the revocation data be used?",
            Self::RevocationSelected => "Is usable revocation data selected?",
            Self::BestSignatureTime => "What is the best-signature-time?",
            Self::RevocationRetryAfter => "When can fresher revocation data be expected?",
        }
    }

    /// Returns the human text attached to a message with this tag.
    ///
    /// For constraints this describes the condition that did not hold.
    /// Placeholders of the form `{name}` are replaced by the message
    /// attributes when rendered by [`Message::text`].
    pub fn failure_text(&self) -> &'static str {
        match self {
            Self::BasicValidationAcceptable => {
                "The result of the basic validation process does not allow the process to continue."
            }
            Self::BasicValidationFinding => "The basic validation process reported: {detail}.",
            Self::TimestampMessageImprintFound => {
                "The message imprint of the time-stamp was not found."
            }
            Self::TimestampMessageImprintIntact => {
                "The message imprint of the time-stamp is not intact."
            }
            Self::TimestampBasicValidationAcceptable => {
                "The basic validation of the time-stamp concluded {indication}."
            }
            Self::TimestampProductionBeforeBestSignatureTime => {
                "The time-stamp production time {production_time} is not before the best-signature-time {best_signature_time}."
            }
            Self::AtLeastOneValidTimestamp => {
                "No valid time-stamp proves the existence of the signature."
            }
            Self::RevocationTimeAfterBestSignatureTime => {
                "The revocation time {revocation_time} is not after the best-signature-time {best_signature_time}."
            }
            Self::BestSignatureTimeNotBeforeCertificateIssuance => {
                "The best-signature-time {best_signature_time} is before the issuance date {not_before} of the certificate."
            }
            Self::SigningCertificateValidAtBestSignatureTime => {
                "The validity of the signing certificate at the best-signature-time {best_signature_time} cannot be established."
            }
            Self::BestSignatureTimeBeforeCertificateExpiration => {
                "The best-signature-time {best_signature_time} is not before the expiration date {not_after} of the certificate."
            }
            Self::CertificateKnownNotRevoked => {
                "The certificate is not known to be not revoked."
            }
            Self::AlgorithmReliableAtBestSignatureTime => {
                "The algorithm is not reliable at the best-signature-time {best_signature_time}: {finding}."
            }
            Self::AlgorithmReliableAtValidationTime => {
                "The algorithm is not reliable at the validation time {validation_time}: {finding}."
            }
            Self::TimestampCoherenceOrder => {
                "The content time-stamp produced at {content_time} is not before the signature time-stamp produced at {signature_time}."
            }
            Self::SigningTimePresent => "The claimed signing time is absent.",
            Self::TimestampDelay => {
                "The claimed signing time plus the permitted delay is not after the best-signature-time {best_signature_time}."
            }
            Self::RevocationCheckSkipped => {
                "Revocation data is not required for the certificate: {reason}."
            }
            Self::RevocationDataAvailable => "No revocation data is available for the certificate.",
            Self::AcceptableRevocationDataFound => {
                "No acceptable revocation data was found for the certificate."
            }
            Self::LongTermAvailabilityPresent => {
                "Long-term availability material is present; time-stamp validation is deferred."
            }
            Self::BeforeSuspension => {
                "The best-signature-time {best_signature_time} is not before the suspension time {suspension_time}."
            }
            Self::RevocationFresh => "The revocation data is not fresh at {control_time}.",
            Self::SignatureAcceptableAtBestSignatureTime => {
                "The signature is not acceptable at the best-signature-time {best_signature_time}."
            }
            Self::CryptographicConstraintsMet => {
                "The cryptographic constraints are not met at {control_time}: {finding}."
            }
            Self::RevocationCandidate => "The revocation data cannot be used: {reason}.",
            Self::RevocationSelected => "None of the revocation data is usable at {control_time}.",
            Self::BestSignatureTime => "The best-signature-time is {best_signature_time}.",
            Self::RevocationRetryAfter => {
                "Fresher revocation data is expected after {retry_after}."
            }
        }
    }
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for MessageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// A message attached to a constraint or a conclusion.
///
/// Use the [`message`](crate::message!) macro to create a `Message` with
/// attributes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Message {
    /// Kind of message.
    pub tag: MessageTag,

    /// Values substituted into the message text.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Message {
    /// Creates a message without attributes.
    pub fn new(tag: MessageTag) -> Self {
        Self {
            tag,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute<K: Into<String>, V: fmt::Display>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    /// Returns the value of an attribute, if set.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.as_str())
    }

    /// Renders the human text of this message.
    ///
    /// Placeholders without a matching attribute are left as they are.
    pub fn text(&self) -> String {
        let mut text = self.tag.failure_text().to_string();
        for (key, value) in &self.attributes {
            text = text.replace(&format!("{{{key}}}"), value);
        }
        text
    }
}

impl From<MessageTag> for Message {
    fn from(tag: MessageTag) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag.code(), self.text())
    }
}

/// Creates a [`Message`] from a [`MessageTag`] and optional attributes.
///
/// ## Example
///
/// ```
/// # use ades_status_tracker::{message, MessageTag};
/// let msg = message!(
///     MessageTag::BestSignatureTime,
///     "best_signature_time" => "2021-03-04 10:00:00 UTC"
/// );
///
/// assert_eq!(
///     msg.text(),
///     "The best-signature-time is 2021-03-04 10:00:00 UTC."
/// );
/// ```
#[macro_export]
macro_rules! message {
    ($tag:expr) => {{
        $crate::Message::new($tag)
    }};
    ($tag:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        $crate::Message::new($tag)$(.with_attribute($key, $value))+
    }};
}
