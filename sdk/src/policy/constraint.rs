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

use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Enforcement level of a constraint.
///
/// A constraint at [`Level::Ignore`] is still evaluated and recorded but
/// never affects the verdict.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    /// A failure stops the process with the constraint's verdict.
    Fail,

    /// A failure is reported as a warning.
    Warn,

    /// A failure is reported as information.
    Inform,

    /// The outcome is recorded without any message.
    Ignore,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fail => "FAIL",
            Self::Warn => "WARN",
            Self::Inform => "INFORM",
            Self::Ignore => "IGNORE",
        };
        f.write_str(label)
    }
}

#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn milliseconds(&self) -> u64 {
        match self {
            Self::Milliseconds => 1,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
        }
    }
}

/// An amount of time expressed in a unit.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TimeValue {
    pub value: u64,
    pub unit: TimeUnit,
}

impl TimeValue {
    /// Creates a time value.
    pub fn new(value: u64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// Returns the amount as a duration, or `None` if it cannot be
    /// represented.
    pub fn try_duration(&self) -> Option<TimeDelta> {
        let ms = self.value.checked_mul(self.unit.milliseconds())?;
        TimeDelta::try_milliseconds(i64::try_from(ms).ok()?)
    }

    /// Returns the amount as a duration, saturating at the largest
    /// representable duration.
    pub fn duration(&self) -> TimeDelta {
        self.try_duration().unwrap_or(TimeDelta::MAX)
    }
}

/// A constraint bounding the delay between two instants.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TimeRule {
    pub level: Level,
    pub value: u64,
    pub unit: TimeUnit,
}

impl TimeRule {
    /// Creates a time rule.
    pub fn new(level: Level, value: u64, unit: TimeUnit) -> Self {
        Self { level, value, unit }
    }

    /// Returns the configured amount of time.
    pub fn time_value(&self) -> TimeValue {
        TimeValue::new(self.value, self.unit)
    }
}

/// Constraint on the freshness of revocation data.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FreshnessRule {
    pub level: Level,

    /// Maximum age of revocation data at the control time. Without it, the
    /// update interval of the revocation data itself is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<TimeValue>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn durations() {
        assert_eq!(
            TimeValue::new(2, TimeUnit::Days).duration(),
            TimeDelta::try_days(2).unwrap()
        );
        assert_eq!(
            TimeRule::new(Level::Fail, 90, TimeUnit::Minutes)
                .time_value()
                .duration(),
            TimeDelta::try_minutes(90).unwrap()
        );
        assert_eq!(TimeValue::new(u64::MAX, TimeUnit::Days).try_duration(), None);
        assert_eq!(
            TimeValue::new(u64::MAX, TimeUnit::Days).duration(),
            TimeDelta::MAX
        );
    }

    #[test]
    fn level_names() {
        let level: Level = serde_json::from_str("\"INFORM\"").unwrap();
        assert_eq!(level, Level::Inform);
        assert_eq!(Level::Warn.to_string(), "WARN");
    }
}
