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

/// Return the current time in UTC.
pub(crate) fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Formats an instant the way it is shown in report attributes.
pub(crate) fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parses a claimed signing time.
///
/// Returns `None` for blank or malformed values.
pub(crate) fn parse_claimed_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn format() {
        let t = Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap();
        assert_eq!(format_time(&t), "2021-03-04 10:00:00 UTC");
    }

    #[test]
    fn claimed_time() {
        assert_eq!(
            parse_claimed_time(" 2021-03-04T11:00:00+01:00 "),
            Some(Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap())
        );
        assert_eq!(parse_claimed_time("   "), None);
        assert_eq!(parse_claimed_time("yesterday"), None);
    }
}
