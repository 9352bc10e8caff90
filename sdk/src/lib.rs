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
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! This library adjudicates AdES signatures from pre-extracted validation
//! facts.
//!
//! It runs the validation process for signatures with time and the
//! validation process for signatures with long-term validation data over a
//! [`DiagnosticData`](diagnostic::DiagnosticData) fact model, under a
//! configurable [`ValidationPolicy`](policy::ValidationPolicy), and records
//! every check it evaluates in a report tree.
//!
//! # Example: Validating the signatures of a document
//!
//! ```
//! # use ades_validation::Result;
//! use ades_validation::{diagnostic::DiagnosticData, policy::ValidationPolicy, Validator};
//!
//! # fn main() -> Result<()> {
//! let data = DiagnosticData::from_json(
//!     r#"{
//!         "validation_time": "2024-06-01T00:00:00Z",
//!         "certificates": [
//!             {
//!                 "id": "C-ROOT",
//!                 "not_before": "2020-01-01T00:00:00Z",
//!                 "not_after": "2040-01-01T00:00:00Z",
//!                 "trusted": true
//!             }
//!         ],
//!         "signatures": [
//!             {
//!                 "id": "S-1",
//!                 "certificate_chain": ["C-ROOT"],
//!                 "basic_validation": { "indication": "PASSED" }
//!             }
//!         ]
//!     }"#,
//! )?;
//!
//! let policy = ValidationPolicy::new().with_toml(
//!     r#"
//!     [timestamp]
//!     coherence_order = "WARN"
//!     "#,
//! )?;
//!
//! let reports = Validator::new()
//!     .with_diagnostic_data(data)
//!     .with_policy(policy)
//!     .validate()?;
//!
//! for signature in &reports.signatures {
//!     println!("{}: {}", signature.id, signature.indication());
//! }
//! # Ok(())
//! # }
//! ```

pub use ades_status_tracker::{
    message, BlockKind, Conclusion, Constraint, ConstraintStatus, Indication, Message,
    MessageTag, ReportEntry, ReportNode, SubIndication,
};

pub mod chain;
pub mod collaborators;
pub mod diagnostic;

mod error;
pub use error::{Error, Result};

pub mod policy;
pub mod process;

pub(crate) mod utils;

mod validator;
pub use validator::{SignatureReport, ValidationReports, Validator};
