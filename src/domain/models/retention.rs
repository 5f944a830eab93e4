//! Retention obligation policies for trash and file versions.
//!
//! A policy string holds one or two comma-separated parts:
//!
//! | Value        | Meaning                                               |
//! |--------------|-------------------------------------------------------|
//! | `auto`       | purge automatically whenever space is needed          |
//! | `auto, D`    | purge after `D` days, or earlier if space is needed   |
//! | `D, auto`    | keep at least `D` days, purge later if space is needed |
//! | `D1, D2`     | keep at least `D1` days, purge after `D2` days        |
//! | `D`          | keep exactly `D` days                                 |
//! | `disabled`   | never purge automatically                             |

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

const AUTO: &str = "auto";
const DISABLED: &str = "disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionMode {
    /// At least one bound is left to the space-based expiry.
    Auto,
    /// Automatic purging is off.
    Disabled,
    /// Both bounds are explicit day counts.
    Fixed,
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Disabled => "disabled",
            Self::Fixed => "fixed",
        })
    }
}

/// Parsed retention policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionObligation {
    pub mode: RetentionMode,
    /// Minimum number of days an item is kept.
    pub min_days: Option<u32>,
    /// Number of days after which an item is purged.
    pub max_days: Option<u32>,
}

impl RetentionObligation {
    pub const fn auto() -> Self {
        Self {
            mode: RetentionMode::Auto,
            min_days: None,
            max_days: None,
        }
    }

    pub const fn disabled() -> Self {
        Self {
            mode: RetentionMode::Disabled,
            min_days: None,
            max_days: None,
        }
    }

    /// The max bound if one is set, otherwise the min bound.
    pub fn days(&self) -> Option<u32> {
        self.max_days.or(self.min_days)
    }
}

impl Default for RetentionObligation {
    fn default() -> Self {
        Self::auto()
    }
}

/// Error returned when a retention policy string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidRetention(pub String);

#[derive(Clone, Copy)]
enum Bound {
    Auto,
    Days(u32),
}

fn parse_bound(part: &str) -> Result<Bound, InvalidRetention> {
    if part.eq_ignore_ascii_case(AUTO) {
        return Ok(Bound::Auto);
    }
    part.parse::<u32>()
        .map(Bound::Days)
        .map_err(|_| InvalidRetention(format!("'{part}' is neither 'auto' nor a day count")))
}

impl FromStr for RetentionObligation {
    type Err = InvalidRetention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();

        match parts.as_slice() {
            [single] if single.eq_ignore_ascii_case(DISABLED) => Ok(Self::disabled()),
            [single] => match parse_bound(single)? {
                Bound::Auto => Ok(Self::auto()),
                Bound::Days(days) => Ok(Self {
                    mode: RetentionMode::Fixed,
                    min_days: Some(days),
                    max_days: Some(days),
                }),
            },
            [min, max] => match (parse_bound(min)?, parse_bound(max)?) {
                (Bound::Auto, Bound::Auto) => Ok(Self::auto()),
                (Bound::Auto, Bound::Days(max)) => Ok(Self {
                    mode: RetentionMode::Auto,
                    min_days: None,
                    max_days: Some(max),
                }),
                (Bound::Days(min), Bound::Auto) => Ok(Self {
                    mode: RetentionMode::Auto,
                    min_days: Some(min),
                    max_days: None,
                }),
                (Bound::Days(min), Bound::Days(max)) if min > max => Err(InvalidRetention(
                    format!("minimum of {min} days exceeds maximum of {max} days"),
                )),
                (Bound::Days(min), Bound::Days(max)) => Ok(Self {
                    mode: RetentionMode::Fixed,
                    min_days: Some(min),
                    max_days: Some(max),
                }),
            },
            _ => Err(InvalidRetention(format!(
                "'{s}' must have the form '<auto|days>[, <auto|days>]' or 'disabled'"
            ))),
        }
    }
}

impl fmt::Display for RetentionObligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mode, self.min_days, self.max_days) {
            (RetentionMode::Disabled, _, _) => f.write_str(DISABLED),
            (_, None, None) => f.write_str(AUTO),
            (_, None, Some(max)) => write!(f, "{AUTO}, {max}"),
            (_, Some(min), None) => write!(f, "{min}, {AUTO}"),
            (_, Some(min), Some(max)) if min == max => write!(f, "{min}"),
            (_, Some(min), Some(max)) => write!(f, "{min}, {max}"),
        }
    }
}
