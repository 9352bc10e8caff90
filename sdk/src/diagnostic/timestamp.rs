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

use super::{AlgorithmFacts, BasicValidationFacts};

/// Kinds of time-stamps a signature can embed.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampType {
    /// Time-stamp over the signed content.
    ContentTimestamp,

    /// Time-stamp over all signed data objects.
    AllDataObjectsTimestamp,

    /// Time-stamp over some of the signed data objects.
    IndividualDataObjectsTimestamp,

    /// Time-stamp over the signature value.
    SignatureTimestamp,

    /// Time-stamp over the signature and its validation data.
    ValidationDataTimestamp,

    /// Archive time-stamp.
    ArchiveTimestamp,
}

impl TimestampType {
    /// Time-stamps computed over the signed content before the signature
    /// existed.
    pub const CONTENT: [TimestampType; 3] = [
        Self::ContentTimestamp,
        Self::AllDataObjectsTimestamp,
        Self::IndividualDataObjectsTimestamp,
    ];
}

/// Facts about one time-stamp.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TimestampFacts {
    /// Identifier of the time-stamp.
    pub id: String,

    /// Kind of the time-stamp.
    pub timestamp_type: TimestampType,

    /// Generation time asserted by the time-stamping authority.
    pub production_time: DateTime<Utc>,

    /// The message imprint of the time-stamp was found.
    #[serde(default)]
    pub message_imprint_found: bool,

    /// The message imprint matches the time-stamped data.
    #[serde(default)]
    pub message_imprint_intact: bool,

    /// Verdict of the basic validation of the time-stamp's own signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_validation: Option<BasicValidationFacts>,

    /// Identifiers of other time-stamps covered by this one.
    #[serde(default)]
    pub covered_timestamps: Vec<String>,

    /// Algorithms used by the time-stamping authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<AlgorithmFacts>,
}

impl TimestampFacts {
    /// Returns `true` if the message imprint was found and is intact.
    pub fn is_message_imprint_valid(&self) -> bool {
        self.message_imprint_found && self.message_imprint_intact
    }

    /// Returns `true` if this time-stamp covers other time-stamps.
    pub fn covers_timestamps(&self) -> bool {
        !self.covered_timestamps.is_empty()
    }
}
