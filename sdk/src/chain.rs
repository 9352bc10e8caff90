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

//! The constraint engine.
//!
//! A [`Chain`] evaluates [`Check`]s in order against one subject, records
//! every evaluated check in its [`ReportNode`] and stops at the first check
//! that fails at [`Level::Fail`]. Processes thread the chain through their
//! steps and short-circuit with `?`:
//!
//! ```
//! # use ades_status_tracker::{BlockKind, Indication, MessageTag, SubIndication};
//! # use ades_validation::{chain::{Chain, ChainStopped, Evaluation, Rule}, policy::Level};
//! fn run(chain: &mut Chain) -> Result<(), ChainStopped> {
//!     chain.check(&Rule::new(
//!         MessageTag::SigningTimePresent,
//!         Some(Level::Warn),
//!         || Evaluation::fail(),
//!     ))?;
//!     chain.check(
//!         &Rule::new(MessageTag::AtLeastOneValidTimestamp, Some(Level::Fail), || {
//!             Evaluation::fail()
//!         })
//!         .failing_with(Indication::Indeterminate, Some(SubIndication::NoTimestamp)),
//!     )?;
//!     Ok(())
//! }
//!
//! let mut chain = Chain::new(BlockKind::ValidationProcessWithTime);
//! assert!(run(&mut chain).is_err());
//!
//! let (report, conclusion) = chain.finish(Indication::Passed, None);
//! assert_eq!(report.constraints().count(), 2);
//! assert_eq!(conclusion.sub_indication, Some(SubIndication::NoTimestamp));
//! assert_eq!(conclusion.warnings().len(), 1);
//! ```

use std::fmt;

use ades_status_tracker::{
    BlockKind, Conclusion, Constraint, ConstraintStatus, Indication, Message, MessageTag,
    ReportNode, SubIndication,
};
use log::debug;

use crate::policy::Level;

/// Outcome of evaluating one [`Check`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Evaluation {
    passed: bool,
    attributes: Vec<(String, String)>,
    message: Option<Message>,
}

impl Evaluation {
    /// The checked condition holds.
    pub fn pass() -> Self {
        Self::from_bool(true)
    }

    /// The checked condition does not hold.
    pub fn fail() -> Self {
        Self::from_bool(false)
    }

    pub fn from_bool(passed: bool) -> Self {
        Self {
            passed,
            ..Default::default()
        }
    }

    /// Records a value observed during the evaluation.
    ///
    /// Attributes are stored on the constraint and substituted into the
    /// message text.
    #[must_use]
    pub fn with_attribute<K: Into<String>, V: fmt::Display>(mut self, key: K, value: V) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    /// Replaces the message reported when the condition does not hold.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    /// Sets the outcome.
    #[must_use]
    pub fn passed_if(mut self, passed: bool) -> Self {
        self.passed = passed;
        self
    }

    pub fn is_pass(&self) -> bool {
        self.passed
    }
}

/// A named, optional, ordered step of a validation process.
pub trait Check {
    /// Name of the constraint recorded in the report.
    fn name(&self) -> MessageTag;

    /// Enforcement level, or `None` if the check is not applicable.
    fn level(&self) -> Option<Level>;

    /// Identifier of the object the check is evaluated against.
    fn subject_id(&self) -> Option<&str> {
        None
    }

    fn evaluate(&self) -> Evaluation;

    /// Indication set when the check fails at [`Level::Fail`].
    fn failure_indication(&self) -> Indication;

    /// Sub-indication set when the check fails at [`Level::Fail`].
    fn failure_sub_indication(&self) -> Option<SubIndication>;
}

/// A [`Check`] built from a closure.
pub struct Rule<F> {
    name: MessageTag,
    level: Option<Level>,
    subject_id: Option<String>,
    evaluate: F,
    indication: Indication,
    sub_indication: Option<SubIndication>,
}

impl<F: Fn() -> Evaluation> Rule<F> {
    /// Creates a rule failing with [`Indication::Failed`] and no
    /// sub-indication.
    pub fn new(name: MessageTag, level: Option<Level>, evaluate: F) -> Self {
        Self {
            name,
            level,
            subject_id: None,
            evaluate,
            indication: Indication::Failed,
            sub_indication: None,
        }
    }

    /// Sets the verdict of a failure at [`Level::Fail`].
    #[must_use]
    pub fn failing_with(
        mut self,
        indication: Indication,
        sub_indication: Option<SubIndication>,
    ) -> Self {
        self.indication = indication;
        self.sub_indication = sub_indication;
        self
    }

    /// Sets the identifier of the evaluated object.
    #[must_use]
    pub fn about<S: Into<String>>(mut self, id: S) -> Self {
        self.subject_id = Some(id.into());
        self
    }
}

impl<F: Fn() -> Evaluation> Check for Rule<F> {
    fn name(&self) -> MessageTag {
        self.name
    }

    fn level(&self) -> Option<Level> {
        self.level
    }

    fn subject_id(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }

    fn evaluate(&self) -> Evaluation {
        (self.evaluate)()
    }

    fn failure_indication(&self) -> Indication {
        self.indication
    }

    fn failure_sub_indication(&self) -> Option<SubIndication> {
        self.sub_indication
    }
}

/// Returned by [`Chain::check`] once a check failed at [`Level::Fail`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChainStopped;

impl fmt::Display for ChainStopped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation chain stopped")
    }
}

/// Evaluates checks in order, accumulating a report and a conclusion.
#[derive(Clone, Debug)]
pub struct Chain {
    node: ReportNode,
    conclusion: Conclusion,
    stopped: bool,
}

impl Chain {
    /// Creates a chain whose report is a block of the given kind.
    pub fn new(kind: BlockKind) -> Self {
        Self::from_node(ReportNode::new(kind))
    }

    /// Creates a chain about a specific subject.
    pub fn with_id<S: Into<String>>(kind: BlockKind, id: S) -> Self {
        Self::from_node(ReportNode::with_id(kind, id))
    }

    fn from_node(node: ReportNode) -> Self {
        Self {
            node,
            conclusion: Conclusion::passed(),
            stopped: false,
        }
    }

    /// Evaluates one check.
    ///
    /// A check without level is skipped and leaves no trace. Returns
    /// `Err(ChainStopped)` if the check failed at [`Level::Fail`], or if an
    /// earlier check already stopped the chain.
    pub fn check<C: Check + ?Sized>(&mut self, check: &C) -> Result<(), ChainStopped> {
        if self.stopped {
            return Err(ChainStopped);
        }

        let Some(level) = check.level() else {
            debug!("{}: {} skipped", self.node.kind(), check.name());
            return Ok(());
        };

        let evaluation = check.evaluate();
        let name = check.name();

        let message = || {
            evaluation.message.clone().unwrap_or_else(|| {
                evaluation
                    .attributes
                    .iter()
                    .fold(Message::new(name), |m, (k, v)| m.with_attribute(k.as_str(), v))
            })
        };

        let (status, message) = match (evaluation.passed, level) {
            (_, Level::Ignore) => (ConstraintStatus::Information, None),
            (true, _) => (ConstraintStatus::Ok, None),
            (false, Level::Fail) => {
                let message = message();
                self.conclusion.add_error(message.clone());
                self.conclusion
                    .set_verdict(check.failure_indication(), check.failure_sub_indication());
                self.stopped = true;
                (ConstraintStatus::Error, Some(message))
            }
            (false, Level::Warn) => {
                let message = message();
                self.conclusion.add_warning(message.clone());
                (ConstraintStatus::Warning, Some(message))
            }
            (false, Level::Inform) => {
                let message = message();
                self.conclusion.add_info(message.clone());
                (ConstraintStatus::Information, Some(message))
            }
        };

        debug!(
            "{}{}: {} {} ({level})",
            self.node.kind(),
            self.node.id().map(|id| format!(" {id}")).unwrap_or_default(),
            name,
            status
        );

        let mut constraint = Constraint::new(name, status);
        if let Some(id) = check.subject_id() {
            constraint = constraint.with_id(id);
        }
        if let Some(message) = message {
            constraint = constraint.with_message(message);
        }
        for (key, value) in &evaluation.attributes {
            constraint = constraint.with_attribute(key.as_str(), value);
        }
        self.node.add_constraint(constraint);

        if self.stopped {
            Err(ChainStopped)
        } else {
            Ok(())
        }
    }

    /// Evaluates a list of checks in order, stopping at the first failure at
    /// [`Level::Fail`].
    pub fn execute(&mut self, checks: &[&dyn Check]) -> Result<(), ChainStopped> {
        for check in checks {
            self.check(*check)?;
        }
        Ok(())
    }

    /// Records an informational constraint that is not governed by the
    /// policy.
    pub fn inform(&mut self, name: MessageTag, subject_id: Option<&str>, message: Message) {
        let mut constraint =
            Constraint::new(name, ConstraintStatus::Information).with_message(message.clone());
        if let Some(id) = subject_id {
            constraint = constraint.with_id(id);
        }
        self.node.add_constraint(constraint);
        self.conclusion.add_info(message);
    }

    /// Appends a nested report.
    pub fn add_block(&mut self, block: ReportNode) {
        self.node.add_block(block);
    }

    pub fn set_attribute<K: Into<String>, V: fmt::Display>(&mut self, key: K, value: V) {
        self.node.set_attribute(key, value);
    }

    /// Returns the report recorded so far.
    pub fn report(&self) -> &ReportNode {
        &self.node
    }

    /// Returns the conclusion reached so far.
    pub fn conclusion(&self) -> &Conclusion {
        &self.conclusion
    }

    /// Gives access to the messages of the conclusion.
    ///
    /// The verdict is owned by the chain and only changes when a check fails.
    pub fn conclusion_mut(&mut self) -> &mut Conclusion {
        &mut self.conclusion
    }

    /// Returns `true` once a check failed at [`Level::Fail`].
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Completes the chain.
    ///
    /// The given verdict is used if no check stopped the chain. The
    /// conclusion is also recorded on the report.
    pub fn finish(
        mut self,
        indication: Indication,
        sub_indication: Option<SubIndication>,
    ) -> (ReportNode, Conclusion) {
        if !self.stopped {
            self.conclusion.set_verdict(indication, sub_indication);
        }
        self.node.set_conclusion(self.conclusion.clone());
        (self.node, self.conclusion)
    }
}
