pub mod convert;

pub use convert::{ConvertError, Converter};

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A single pre-release identifier.
///
/// Derived ordering relies on the variant order: a numeric identifier sorts
/// below any alphanumeric identifier at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u64),
    Alphanumeric(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Alphanumeric(s) => f.write_str(s),
        }
    }
}

/// A parsed version: numeric triple, pre-release identifiers, build metadata.
///
/// Comparison follows semver precedence: major/minor/patch numerically, then
/// pre-release identifiers (a release without any outranks every pre-release
/// of the same triple), and build metadata never participates. Two versions
/// that differ only in build metadata compare equal.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Vec<Identifier>,
    pub build: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty version string")]
    Empty,
    #[error("invalid numeric component {0:?}")]
    InvalidNumber(String),
    #[error("empty {0} identifier")]
    EmptyIdentifier(&'static str),
    #[error("invalid character in identifier {0:?}")]
    InvalidIdentifier(String),
}

impl Version {
    /// Parse a version string tolerantly.
    ///
    /// Missing minor/patch components default to 0 and leading zeros are
    /// accepted; the `-prerelease+build` suffix grammar is the standard one.
    /// "1" parses as 1.0.0, "1.8-beta.1" as 1.8.0-beta.1.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let (rest, build_part) = match input.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (input, None),
        };
        let (core, pre_part) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let mut numbers = core.splitn(3, '.');
        let major = parse_number(numbers.next().unwrap_or(""))?;
        let minor = match numbers.next() {
            Some(part) => parse_number(part)?,
            None => 0,
        };
        let patch = match numbers.next() {
            Some(part) => parse_number(part)?,
            None => 0,
        };

        let pre = match pre_part {
            Some(pre) => parse_pre(pre)?,
            None => Vec::new(),
        };
        let build = match build_part {
            Some(build) => parse_build(build)?,
            None => Vec::new(),
        };

        Ok(Version {
            major,
            minor,
            patch,
            pre,
            build,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

fn parse_number(part: &str) -> Result<u64, ParseError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber(part.to_string()));
    }
    part.parse()
        .map_err(|_| ParseError::InvalidNumber(part.to_string()))
}

fn valid_identifier(part: &str) -> bool {
    part.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn parse_pre(pre: &str) -> Result<Vec<Identifier>, ParseError> {
    pre.split('.')
        .map(|part| {
            if part.is_empty() {
                return Err(ParseError::EmptyIdentifier("pre-release"));
            }
            if !valid_identifier(part) {
                return Err(ParseError::InvalidIdentifier(part.to_string()));
            }
            if part.bytes().all(|b| b.is_ascii_digit()) {
                // Leading zeros are tolerated: "01" is the numeric identifier 1.
                part.parse()
                    .map(Identifier::Numeric)
                    .map_err(|_| ParseError::InvalidNumber(part.to_string()))
            } else {
                Ok(Identifier::Alphanumeric(part.to_string()))
            }
        })
        .collect()
}

fn parse_build(build: &str) -> Result<Vec<String>, ParseError> {
    build
        .split('.')
        .map(|part| {
            if part.is_empty() {
                return Err(ParseError::EmptyIdentifier("build"));
            }
            if !valid_identifier(part) {
                return Err(ParseError::InvalidIdentifier(part.to_string()));
            }
            Ok(part.to_string())
        })
        .collect()
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (i, identifier) in self.pre.iter().enumerate() {
            f.write_str(if i == 0 { "-" } else { "." })?;
            write!(f, "{}", identifier)?;
        }
        for (i, identifier) in self.build.iter().enumerate() {
            f.write_str(if i == 0 { "+" } else { "." })?;
            f.write_str(identifier)?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // No pre-release outranks any pre-release of the same triple.
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                // Lexicographic over identifiers; a shorter sequence that is
                // a prefix of a longer one compares lower.
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}
