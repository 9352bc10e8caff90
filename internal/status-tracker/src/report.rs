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

use std::{collections::BTreeMap, fmt, iter::Iterator};

use serde::Serialize;

use crate::{Conclusion, Constraint, ConstraintStatus, MessageTag, ReportError};

/// Kind of process or sub-process a [`ReportNode`] describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    /// Validation process for signatures with time.
    ValidationProcessWithTime,

    /// Validation process for signatures with long-term validation data.
    ValidationProcessLongTermData,

    /// Validation of one time-stamp inside a signature process.
    TimestampValidation,

    /// Selection of revocation data for one certificate.
    RevocationSelection,

    /// Freshness check of one revocation data item.
    RevocationFreshness,

    /// Signature acceptance validation at a given time.
    SignatureAcceptance,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ValidationProcessWithTime => "validationProcessWithTime",
            Self::ValidationProcessLongTermData => "validationProcessLongTermData",
            Self::TimestampValidation => "timestampValidation",
            Self::RevocationSelection => "revocationSelection",
            Self::RevocationFreshness => "revocationFreshness",
            Self::SignatureAcceptance => "signatureAcceptance",
        };
        f.write_str(label)
    }
}

/// An entry in a [`ReportNode`], kept in evaluation order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "entry", rename_all = "camelCase")]
pub enum ReportEntry {
    /// An evaluated constraint.
    Constraint(Constraint),

    /// A nested sub-process.
    Block(ReportNode),
}

/// A `ReportNode` is the audit trail of one validation process (or
/// sub-process) for one subject.
///
/// Entries are append-only and kept in the order they were evaluated. A
/// node's [`Conclusion`] is set once, when the process that owns it
/// completes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReportNode {
    kind: BlockKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    entries: Vec<ReportEntry>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    conclusion: Option<Conclusion>,
}

impl ReportNode {
    /// Returns an empty [`ReportNode`] of the given kind.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            id: None,
            entries: vec![],
            attributes: BTreeMap::new(),
            conclusion: None,
        }
    }

    /// Returns an empty [`ReportNode`] about a specific subject.
    pub fn with_id<S: Into<String>>(kind: BlockKind, id: S) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new(kind)
        }
    }

    /// Returns the kind of this node.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Returns the identifier of the subject, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns all entries in evaluation order.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Appends a [`Constraint`].
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.entries.push(ReportEntry::Constraint(constraint));
    }

    /// Appends a nested [`ReportNode`].
    pub fn add_block(&mut self, block: ReportNode) {
        self.entries.push(ReportEntry::Block(block));
    }

    /// Returns the constraints directly recorded in this node, in evaluation
    /// order.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Constraint(c) => Some(c),
            ReportEntry::Block(_) => None,
        })
    }

    /// Returns the nested nodes, in evaluation order.
    pub fn blocks(&self) -> impl Iterator<Item = &ReportNode> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Block(b) => Some(b),
            ReportEntry::Constraint(_) => None,
        })
    }

    /// Returns the first constraint with the given name, if any.
    pub fn constraint(&self, name: MessageTag) -> Option<&Constraint> {
        self.constraints().find(|c| c.name == name)
    }

    /// Returns `true` if a constraint with the given name was recorded.
    pub fn has_constraint(&self, name: MessageTag) -> bool {
        self.constraint(name).is_some()
    }

    /// Returns the constraints whose status is [`ConstraintStatus::Error`].
    pub fn filter_errors(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints()
            .filter(|c| c.status == ConstraintStatus::Error)
    }

    /// Returns `true` if any constraint of this node failed.
    pub fn has_any_error(&self) -> bool {
        self.filter_errors().next().is_some()
    }

    /// Sets an attribute of this node.
    pub fn set_attribute<K: Into<String>, V: fmt::Display>(&mut self, key: K, value: V) {
        self.attributes.insert(key.into(), value.to_string());
    }

    /// Returns the value of an attribute, if set.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.as_str())
    }

    /// Returns the conclusion, once the owning process completed.
    pub fn conclusion(&self) -> Option<&Conclusion> {
        self.conclusion.as_ref()
    }

    /// Records the conclusion of the owning process.
    pub fn set_conclusion(&mut self, conclusion: Conclusion) {
        self.conclusion = Some(conclusion);
    }

    /// Converts this node and all nested nodes into a JSON tree suitable for
    /// report renderers.
    pub fn to_tree(&self) -> Result<serde_json::Value, ReportError> {
        Ok(serde_json::to_value(self)?)
    }
}
