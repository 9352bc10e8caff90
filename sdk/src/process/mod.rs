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

//! The signature validation processes.
//!
//! [`ValidationProcessForSignaturesWithTime`] and
//! [`ValidationProcessForSignaturesWithLongTermData`] both start from the
//! basic validation verdict of a signature and run a [`Chain`] of
//! policy-controlled checks over the facts of a [`SignatureContext`].
//!
//! [`Chain`]: crate::chain::Chain

use ades_status_tracker::{Conclusion, ReportNode};
use serde::Serialize;

pub(crate) mod checks;
mod context;
mod crypto;
mod long_term;
mod revocation_selector;
mod timestamps;
mod with_time;

pub use context::{BestSignatureTime, SignatureContext};
pub use crypto::{CryptoFinding, CryptographicChecker};
pub use long_term::ValidationProcessForSignaturesWithLongTermData;
pub use revocation_selector::{RevocationSelection, RevocationSelector};
pub use timestamps::TimestampCount;
pub use with_time::ValidationProcessForSignaturesWithTime;

/// Outcome of one validation process for one signature.
#[derive(Clone, Debug, Serialize)]
pub struct ProcessResult {
    /// Ordered record of every check the process evaluated.
    pub report: ReportNode,

    /// The verdict of the process.
    pub conclusion: Conclusion,

    /// The best-signature-time the process reached.
    pub best_signature_time: BestSignatureTime,
}
