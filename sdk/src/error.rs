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

use thiserror::Error;

/// `Error` enumerates errors returned by the validation entry points.
///
/// Adjudication findings are never reported through this type. They are
/// carried by the [`Conclusion`](ades_status_tracker::Conclusion) of each
/// process. An `Error` means the inputs could not be adjudicated at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No diagnostic data was supplied to the validator.
    #[error("diagnostic data missing")]
    MissingDiagnosticData,

    /// No validation policy was supplied to the validator.
    #[error("validation policy missing")]
    MissingPolicy,

    /// A signature or time-stamp has no basic validation verdict.
    #[error("basic validation verdict missing: id = {id}")]
    MissingBasicValidation { id: String },

    /// A signature references a certificate that is not in the diagnostic
    /// data.
    #[error("unknown certificate: signature = {signature}, certificate = {certificate}")]
    UnknownCertificate {
        signature: String,
        certificate: String,
    },

    /// The same identifier is used by more than one object of a kind.
    #[error("duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("bad parameter: {0}")]
    BadParam(String),

    #[error("type is unsupported")]
    UnsupportedType,

    /// The policy was written for a newer version of this crate.
    #[error("version incompatibility: {0}")]
    VersionCompatibility(String),

    // --- third-party errors ---
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    TomlSerializationError(#[from] toml::ser::Error),

    #[error(transparent)]
    ReportError(#[from] ades_status_tracker::ReportError),

    #[error(transparent)]
    OtherError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// A specialized `Result` type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;
