//! Normalization of release-artifact names into comparable versions.
//!
//! Artifact names conflate a product name, a numeric version, an optional
//! pre-release qualifier, and platform/packaging metadata in one
//! hyphen/dot-delimited string ("pkg1.8beta1.linux-amd64.tar.gz"). The
//! converter recovers a canonical `major.minor.patch-pre+build` string from
//! that convention and parses it into a [`Version`]:
//!
//! - `pkg1.8beta1.linux-amd64.tar.gz` → `1.8.0-beta.1+linux.amd64.tar.gz`
//! - `pkg-tools1.8.1.src.tar.gz` → `1.8.1+tools.src.tar.gz`
//! - `pkg1.21rc2.windows-386.zip` → `1.21.0-rc.2+windows.386.zip`
//!
//! The mapping is a deterministic best effort for names following the
//! base+numeric+suffix+extension convention, not a universal grammar.

use thiserror::Error;

use super::{ParseError, Version};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("no numeric version in {identifier:?}")]
    EmptyVersion { identifier: String },
    #[error("{identifier:?} normalized to {assembled:?}, which is not a valid version: {source}")]
    MalformedVersion {
        identifier: String,
        assembled: String,
        source: ParseError,
    },
}

impl ConvertError {
    /// The artifact name or tag that failed to convert.
    pub fn identifier(&self) -> &str {
        match self {
            ConvertError::EmptyVersion { identifier }
            | ConvertError::MalformedVersion { identifier, .. } => identifier,
        }
    }
}

/// Converts raw artifact names and version tags into [`Version`]s.
///
/// Built once with the product name ("pkg" for pkg1.8.1, "go" for go1.8.1)
/// and shared immutably across conversions. The product name is dropped
/// from the identifier; any remaining alphabetic prefix (a variant such as
/// "tools" in pkg-tools1.8.1) survives into the build metadata.
#[derive(Debug, Clone)]
pub struct Converter {
    product: String,
}

impl Converter {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
        }
    }

    /// Convert one identifier into a structured version.
    pub fn to_version(&self, identifier: &str) -> Result<Version, ConvertError> {
        let assembled = self.canonicalize(identifier)?;
        Version::parse(&assembled).map_err(|source| ConvertError::MalformedVersion {
            identifier: identifier.to_string(),
            assembled,
            source,
        })
    }

    /// Assemble the canonical `version-pre+build` string for an identifier
    /// without parsing it.
    pub fn canonicalize(&self, identifier: &str) -> Result<String, ConvertError> {
        let (base, remainder) = split_prefix(identifier);
        let (core, tail) = split_metadata(remainder);
        let (numeric, extra) = split_qualifier(&core);
        if numeric.is_empty() {
            return Err(ConvertError::EmptyVersion {
                identifier: identifier.to_string(),
            });
        }

        let mut assembled = pad_numeric(numeric);
        assembled.push_str(&canonicalize_qualifier(extra));
        assembled.push_str(&self.canonicalize_metadata(base, &tail));
        Ok(assembled)
    }

    /// Build-metadata block: `+<variant>.<tail>` with the product name
    /// dropped from the front of the prefix, hyphenated platform words
    /// split into their own identifiers, and the one numeric-looking
    /// platform tag (`osx10.8`) rewritten so its OS level does not read as
    /// a further dotted version segment. Empty when there is nothing to say.
    fn canonicalize_metadata(&self, base: &str, tail: &str) -> String {
        let variant = base
            .strip_prefix(self.product.as_str())
            .unwrap_or(base)
            .trim_matches('-');

        let mut parts = Vec::new();
        if !variant.is_empty() {
            parts.push(variant);
        }
        if !tail.is_empty() {
            parts.push(tail);
        }
        if parts.is_empty() {
            return String::new();
        }

        // Hyphens first: rewriting osx10. before them would be undone by
        // the hyphen rewrite.
        let joined = parts.join(".").replace('-', ".").replace("osx10.", "osx10-");
        format!("+{}", joined)
    }
}

/// Longest leading run of ASCII alphabetic characters and hyphens, with
/// trailing hyphens stripped from the prefix. A digit-leading identifier
/// has an empty prefix and is returned whole as the remainder.
fn split_prefix(identifier: &str) -> (&str, &str) {
    let end = identifier
        .bytes()
        .position(|b| !(b.is_ascii_alphabetic() || b == b'-'))
        .unwrap_or(identifier.len());
    let (prefix, remainder) = identifier.split_at(end);
    (prefix.trim_end_matches('-'), remainder)
}

/// Split the post-prefix remainder into the numeric+qualifier core and the
/// raw metadata tail. The remainder is read as dot-separated tokens: token 0
/// always belongs to the version; the first later token not starting with a
/// digit begins the metadata.
fn split_metadata(remainder: &str) -> (String, String) {
    let tokens: Vec<&str> = remainder.split('.').collect();
    let cut = (1..tokens.len())
        .find(|&i| !tokens[i].starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(tokens.len());
    (tokens[..cut].join("."), tokens[cut..].join("."))
}

/// Longest leading `digits(.digits)*` run is the numeric version; whatever
/// follows is the free-form qualifier ("beta1", "rc2", ...).
fn split_qualifier(core: &str) -> (&str, &str) {
    let bytes = core.as_bytes();
    let mut end = 0;
    let mut i = 0;
    loop {
        let run_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == run_start {
            break;
        }
        end = i;
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
        } else {
            break;
        }
    }
    core.split_at(end)
}

/// Right-pad a dotted numeric version with `.0` until it has three
/// components. Already-complete versions pass through unchanged.
fn pad_numeric(numeric: &str) -> String {
    let mut padded = numeric.to_string();
    for _ in numeric.split('.').count()..3 {
        padded.push_str(".0");
    }
    padded
}

/// Rewrite a free-form qualifier into a `-`-prefixed block of dot-separated
/// pre-release identifiers, in order: hyphens become dots, every maximal
/// digit run is dotted off on both sides, dot runs collapse, outer dots are
/// trimmed. "beta1" → "-beta.1"; an empty result yields an empty block.
fn canonicalize_qualifier(extra: &str) -> String {
    let mut dotted = String::with_capacity(extra.len() + 4);
    let mut in_digits = false;
    for mut c in extra.chars() {
        if c == '-' {
            c = '.';
        }
        let is_digit = c.is_ascii_digit();
        if is_digit != in_digits {
            dotted.push('.');
            in_digits = is_digit;
        }
        dotted.push(c);
    }
    if in_digits {
        dotted.push('.');
    }

    let mut collapsed = String::with_capacity(dotted.len());
    for c in dotted.chars() {
        if c != '.' || !collapsed.ends_with('.') {
            collapsed.push(c);
        }
    }

    let trimmed = collapsed.trim_matches('.');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("-{}", trimmed)
    }
}
