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

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{Message, MessageTag};

/// Outcome of one evaluated constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintStatus {
    /// The constraint held.
    Ok,

    /// The constraint did not hold at a warning level.
    Warning,

    /// The constraint did not hold at a failing level.
    Error,

    /// The constraint is informational, or its level is configured to be
    /// ignored.
    Information,
}

impl fmt::Display for ConstraintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Information => "INFORMATION",
        };
        f.write_str(label)
    }
}

/// One evaluated constraint, as recorded in a [`ReportNode`].
///
/// [`ReportNode`]: crate::ReportNode
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Constraint {
    /// Name of the constraint.
    pub name: MessageTag,

    /// Outcome of the evaluation.
    pub status: ConstraintStatus,

    /// Identifier of the certificate, time-stamp or revocation data the
    /// constraint was evaluated against, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Warning, error or informational message produced by the evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// Values observed while evaluating the constraint.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Constraint {
    /// Creates a constraint record with the given outcome.
    pub fn new(name: MessageTag, status: ConstraintStatus) -> Self {
        Self {
            name,
            status,
            id: None,
            message: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the identifier of the evaluated object.
    #[must_use]
    pub fn with_id<S: Into<String>>(self, id: S) -> Self {
        Constraint {
            id: Some(id.into()),
            ..self
        }
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(self, message: Message) -> Self {
        Constraint {
            message: Some(message),
            ..self
        }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute<K: Into<String>, V: fmt::Display>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    /// Returns `true` if the constraint held or was only informational.
    pub fn is_ok(&self) -> bool {
        matches!(
            self.status,
            ConstraintStatus::Ok | ConstraintStatus::Information
        )
    }
}
