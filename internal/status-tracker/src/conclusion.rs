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

use serde::Serialize;

use crate::{Indication, Message, SubIndication};

/// The verdict reached by a validation process or one of its blocks.
///
/// Messages are partitioned by severity. A conclusion holds at most one
/// terminating error from the process itself, plus any errors carried over
/// from a verdict it propagates.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Conclusion {
    /// Primary verdict.
    pub indication: Indication,

    /// Reason for the verdict, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<Message>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Message>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    infos: Vec<Message>,
}

impl Conclusion {
    /// Creates a conclusion without sub-indication or messages.
    pub fn new(indication: Indication) -> Self {
        Self {
            indication,
            sub_indication: None,
            errors: vec![],
            warnings: vec![],
            infos: vec![],
        }
    }

    /// Creates a conclusion with a sub-indication.
    pub fn with_sub_indication(indication: Indication, sub_indication: SubIndication) -> Self {
        Self {
            sub_indication: Some(sub_indication),
            ..Self::new(indication)
        }
    }

    /// Creates a [`Indication::Passed`] conclusion.
    pub fn passed() -> Self {
        Self::new(Indication::Passed)
    }

    /// Returns `true` if the indication is [`Indication::Passed`].
    pub fn is_valid(&self) -> bool {
        self.indication.is_passed()
    }

    /// Returns `true` if the verdict matches both values.
    pub fn is(&self, indication: Indication, sub_indication: Option<SubIndication>) -> bool {
        self.indication == indication && self.sub_indication == sub_indication
    }

    /// Replaces the verdict, keeping all messages.
    pub fn set_verdict(&mut self, indication: Indication, sub_indication: Option<SubIndication>) {
        self.indication = indication;
        self.sub_indication = sub_indication;
    }

    /// Returns the error messages.
    pub fn errors(&self) -> &[Message] {
        &self.errors
    }

    /// Returns the warning messages.
    pub fn warnings(&self) -> &[Message] {
        &self.warnings
    }

    /// Returns the informational messages.
    pub fn infos(&self) -> &[Message] {
        &self.infos
    }

    /// Adds an error message.
    pub fn add_error(&mut self, message: Message) {
        self.errors.push(message);
    }

    /// Adds a warning message.
    pub fn add_warning(&mut self, message: Message) {
        self.warnings.push(message);
    }

    /// Adds an informational message.
    pub fn add_info(&mut self, message: Message) {
        self.infos.push(message);
    }

    /// Copies the error messages of another conclusion into this one.
    ///
    /// Used when a process propagates the verdict of another process.
    pub fn append_errors(&mut self, other: &Conclusion) {
        self.errors.extend(other.errors.iter().cloned());
    }
}
