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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]

mod conclusion;
pub use conclusion::Conclusion;

mod constraint;
pub use constraint::{Constraint, ConstraintStatus};

mod error;
pub use error::ReportError;

mod indication;
pub use indication::{Indication, SubIndication};

pub mod message;
pub use message::{Message, MessageTag};

mod report;
pub use report::{BlockKind, ReportEntry, ReportNode};

#[cfg(test)]
pub(crate) mod tests;
