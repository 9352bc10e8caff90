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
use thiserror::Error;

use crate::{
    diagnostic::AlgorithmFacts, policy::CryptographicConstraints, utils::time::format_time,
};

/// Reason an algorithm is not reliable under the cryptographic constraints.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CryptoFinding {
    #[error("algorithm information is missing")]
    MissingAlgorithm,

    #[error("encryption algorithm {0} is not accepted")]
    EncryptionNotAccepted(String),

    #[error("digest algorithm {0} is not accepted")]
    DigestNotAccepted(String),

    #[error("key length of {algorithm} is unknown")]
    UnknownKeyLength { algorithm: String },

    #[error("key length {size} of {algorithm} is below {minimum}")]
    KeyTooSmall {
        algorithm: String,
        size: u32,
        minimum: u32,
    },

    #[error("algorithm {algorithm} expired on {}", format_time(.expiration))]
    Expired {
        algorithm: String,
        expiration: DateTime<Utc>,
    },
}

/// Applies the cryptographic constraints of the policy to algorithm facts.
#[derive(Clone, Copy, Debug)]
pub struct CryptographicChecker<'a> {
    constraints: &'a CryptographicConstraints,
}

impl<'a> CryptographicChecker<'a> {
    pub fn new(constraints: &'a CryptographicConstraints) -> Self {
        Self { constraints }
    }

    /// Checks that the algorithms are accepted, that the key is long enough
    /// and that no algorithm expired before `time`.
    pub fn check(
        &self,
        algorithm: Option<&AlgorithmFacts>,
        time: DateTime<Utc>,
    ) -> Result<(), CryptoFinding> {
        let algorithm = algorithm.ok_or(CryptoFinding::MissingAlgorithm)?;
        let encryption = algorithm
            .encryption
            .as_deref()
            .ok_or(CryptoFinding::MissingAlgorithm)?;
        let digest = algorithm
            .digest
            .as_deref()
            .ok_or(CryptoFinding::MissingAlgorithm)?;

        if !self.constraints.accepts_encryption(encryption) {
            return Err(CryptoFinding::EncryptionNotAccepted(encryption.to_owned()));
        }

        if !self.constraints.accepts_digest(digest) {
            return Err(CryptoFinding::DigestNotAccepted(digest.to_owned()));
        }

        if let Some(minimum) = self.constraints.minimum_key_size(encryption) {
            let size = algorithm
                .key_length
                .ok_or_else(|| CryptoFinding::UnknownKeyLength {
                    algorithm: encryption.to_owned(),
                })?;

            if size < minimum {
                return Err(CryptoFinding::KeyTooSmall {
                    algorithm: encryption.to_owned(),
                    size,
                    minimum,
                });
            }
        }

        for name in [encryption, digest] {
            if let Some(expiration) = self.constraints.expiration(name) {
                if expiration < time {
                    return Err(CryptoFinding::Expired {
                        algorithm: name.to_owned(),
                        expiration,
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns the earliest expiration instant of the algorithms, if any is
    /// configured.
    pub fn expiration(&self, algorithm: &AlgorithmFacts) -> Option<DateTime<Utc>> {
        [algorithm.encryption.as_deref(), algorithm.digest.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|name| self.constraints.expiration(name))
            .min()
    }
}
