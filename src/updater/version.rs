// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Strict version numbers.

use std::fmt;
use std::str::FromStr;

use crate::error::UpdateError;

/// Pre-release marker. Variant order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Stage {
    Alpha(u32),
    Beta(u32),
    Final,
}

/// A version of the form `MAJOR.MINOR[.PATCH][(a|b)N]`.
///
/// A missing patch number counts as zero, and a pre-release sorts before
/// the release it leads to.
///
/// # Examples
///
/// ```
/// use beca_climate::updater::Version;
///
/// let v: Version = "1.2".parse().unwrap();
/// assert_eq!(v, "1.2.0".parse().unwrap());
/// assert!("1.2.0b1".parse::<Version>().unwrap() < v);
/// assert!("1.2.0a3".parse::<Version>().unwrap() < "1.2.0b1".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
    stage: Stage,
}

impl Version {
    /// Creates a release version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            stage: Stage::Final,
        }
    }

    /// Returns `true` for alpha and beta versions.
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        self.stage != Stage::Final
    }
}

impl FromStr for Version {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UpdateError::InvalidVersion(s.to_string());

        let (numbers, stage) = match s.find(['a', 'b']) {
            Some(pos) => {
                let (numbers, marker) = s.split_at(pos);
                let n = parse_number(&marker[1..]).ok_or_else(invalid)?;
                let stage = if marker.starts_with('a') {
                    Stage::Alpha(n)
                } else {
                    Stage::Beta(n)
                };
                (numbers, stage)
            }
            None => (s, Stage::Final),
        };

        let parts = numbers
            .split('.')
            .map(parse_number)
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(invalid)?;

        let (major, minor, patch) = match parts[..] {
            [major, minor] => (major, minor, 0),
            [major, minor, patch] => (major, minor, patch),
            _ => return Err(invalid()),
        };

        Ok(Self {
            major,
            minor,
            patch,
            stage,
        })
    }
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        match self.stage {
            Stage::Alpha(n) => write!(f, "a{n}"),
            Stage::Beta(n) => write!(f, "b{n}"),
            Stage::Final => Ok(()),
        }
    }
}
