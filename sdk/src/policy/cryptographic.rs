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

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{Level, PolicyValidate};
use crate::{Error, Result};

/// Cryptographic constraints applied to signatures, certificates and
/// revocation data.
///
/// Algorithm names are compared case-insensitively. Map keys are written in
/// lower case.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CryptographicConstraints {
    /// Level of the cryptographic checks.
    pub level: Option<Level>,

    /// Accepted encryption algorithms. An empty list accepts any algorithm.
    #[serde(default)]
    pub acceptable_encryption_algorithms: Vec<String>,

    /// Accepted digest algorithms. An empty list accepts any algorithm.
    #[serde(default)]
    pub acceptable_digest_algorithms: Vec<String>,

    /// Minimum public key length in bits, per encryption algorithm.
    #[serde(default)]
    pub minimum_key_sizes: BTreeMap<String, u32>,

    /// Instant after which an algorithm is no longer considered reliable.
    #[serde(default)]
    pub algorithm_expiration: BTreeMap<String, DateTime<Utc>>,

    /// Level of the final pass checking the certificate chain and the
    /// selected revocation data at the validation time.
    pub chain_at_validation_time: Option<Level>,
}

impl CryptographicConstraints {
    /// Returns `true` if the encryption algorithm is accepted.
    pub fn accepts_encryption(&self, algorithm: &str) -> bool {
        accepts(&self.acceptable_encryption_algorithms, algorithm)
    }

    /// Returns `true` if the digest algorithm is accepted.
    pub fn accepts_digest(&self, algorithm: &str) -> bool {
        accepts(&self.acceptable_digest_algorithms, algorithm)
    }

    /// Returns the minimum key length for an encryption algorithm.
    pub fn minimum_key_size(&self, algorithm: &str) -> Option<u32> {
        self.minimum_key_sizes
            .get(&algorithm.to_ascii_lowercase())
            .copied()
    }

    /// Returns the expiration instant of an algorithm.
    pub fn expiration(&self, algorithm: &str) -> Option<DateTime<Utc>> {
        self.algorithm_expiration
            .get(&algorithm.to_ascii_lowercase())
            .copied()
    }
}

fn accepts(list: &[String], algorithm: &str) -> bool {
    list.is_empty() || list.iter().any(|a| a.eq_ignore_ascii_case(algorithm))
}

fn algorithms(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

fn expires(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

impl Default for CryptographicConstraints {
    fn default() -> Self {
        let minimum_key_sizes = [("rsa", 2048), ("dsa", 2048), ("ecdsa", 256)]
            .into_iter()
            .map(|(name, size)| (name.to_owned(), size))
            .collect();

        let algorithm_expiration = [
            ("md5", expires(2004, 8, 1)),
            ("sha1", expires(2009, 1, 1)),
        ]
        .into_iter()
        .filter_map(|(name, time)| time.map(|t| (name.to_owned(), t)))
        .collect();

        CryptographicConstraints {
            level: Some(Level::Fail),
            acceptable_encryption_algorithms: algorithms(&["rsa", "dsa", "ecdsa", "ed25519"]),
            acceptable_digest_algorithms: algorithms(&[
                "sha1", "sha224", "sha256", "sha384", "sha512",
            ]),
            minimum_key_sizes,
            algorithm_expiration,
            chain_at_validation_time: Some(Level::Fail),
        }
    }
}

impl PolicyValidate for CryptographicConstraints {
    fn validate(&self) -> Result<()> {
        let names = self
            .acceptable_encryption_algorithms
            .iter()
            .chain(self.acceptable_digest_algorithms.iter())
            .chain(self.minimum_key_sizes.keys())
            .chain(self.algorithm_expiration.keys());

        for name in names {
            if name.trim().is_empty() {
                return Err(Error::BadParam("algorithm name must not be empty".into()));
            }
        }

        if let Some((name, _)) = self.minimum_key_sizes.iter().find(|(_, size)| **size == 0) {
            return Err(Error::BadParam(format!(
                "minimum key size for {name} must be greater than 0"
            )));
        }

        Ok(())
    }
}
