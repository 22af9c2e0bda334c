//! Batch conversion and precedence ordering of release identifiers.

use crate::version::{ConvertError, Converter, Version};

/// One successfully converted input: the raw identifier it came from and
/// the structured version recovered from it.
#[derive(Debug, Clone)]
pub struct VersionedRecord {
    pub identifier: String,
    pub version: Version,
}

/// What to do when a single identifier fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Trusted input: the first failure fails the whole batch.
    Abort,
    /// Open input: failures are collected and the rest of the batch proceeds.
    Skip,
}

/// Outcome of converting a batch of identifiers: the records that parsed
/// and, under [`FailurePolicy::Skip`], the inputs that did not.
#[derive(Debug, Default)]
pub struct Batch {
    pub records: Vec<VersionedRecord>,
    pub failures: Vec<ConvertError>,
}

impl Batch {
    /// Stable descending sort; among equal-precedence records the input
    /// order is preserved.
    pub fn sort_newest_first(&mut self) {
        self.records.sort_by(|a, b| b.version.cmp(&a.version));
    }

    /// Stable ascending sort.
    pub fn sort_oldest_first(&mut self) {
        self.records.sort_by(|a, b| a.version.cmp(&b.version));
    }

    /// The highest-precedence record, first-seen among ties. Does not
    /// require the batch to be sorted.
    pub fn newest(&self) -> Option<&VersionedRecord> {
        self.records
            .iter()
            .reduce(|best, record| if record.version > best.version { record } else { best })
    }
}

/// Convert every identifier in the batch, applying `policy` to failures.
pub fn convert_batch<I, S>(
    converter: &Converter,
    identifiers: I,
    policy: FailurePolicy,
) -> Result<Batch, ConvertError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = Batch::default();
    for identifier in identifiers {
        let identifier = identifier.as_ref();
        match converter.to_version(identifier) {
            Ok(version) => batch.records.push(VersionedRecord {
                identifier: identifier.to_string(),
                version,
            }),
            Err(error) => match policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::Skip => batch.failures.push(error),
            },
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(names: &[&str], policy: FailurePolicy) -> Result<Batch, ConvertError> {
        convert_batch(&Converter::new("pkg"), names, policy)
    }

    #[test]
    fn test_sorted_descending() {
        let mut batch = batch(
            &["pkg1.8beta1.linux-amd64.tar.gz", "pkg1.8", "pkg1.7.4"],
            FailurePolicy::Abort,
        )
        .unwrap();
        batch.sort_newest_first();
        let versions: Vec<String> = batch
            .records
            .iter()
            .map(|r| r.version.to_string())
            .collect();
        assert_eq!(
            versions,
            [
                "1.8.0",
                "1.8.0-beta.1+linux.amd64.tar.gz",
                "1.7.4",
            ]
        );
    }

    #[test]
    fn test_sorted_ascending() {
        let mut batch = batch(&["pkg1.8", "pkg1.7.4", "pkg1.8beta1"], FailurePolicy::Abort).unwrap();
        batch.sort_oldest_first();
        let identifiers: Vec<&str> = batch.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(identifiers, ["pkg1.7.4", "pkg1.8beta1", "pkg1.8"]);
    }

    #[test]
    fn test_stable_sort_preserves_tie_order() {
        // Same precedence, different packaging: input order must survive.
        let names = [
            "pkg1.8.1.linux-amd64.tar.gz",
            "pkg1.8.1.windows-386.zip",
            "pkg1.8.1.src.tar.gz",
            "pkg1.9",
        ];
        let mut batch = batch(&names, FailurePolicy::Abort).unwrap();
        batch.sort_newest_first();
        let identifiers: Vec<&str> = batch.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(
            identifiers,
            [
                "pkg1.9",
                "pkg1.8.1.linux-amd64.tar.gz",
                "pkg1.8.1.windows-386.zip",
                "pkg1.8.1.src.tar.gz",
            ]
        );
    }

    #[test]
    fn test_newest_prefers_first_seen_tie() {
        let batch = batch(
            &["pkg1.8.1.linux-amd64.tar.gz", "pkg1.8.1.src.tar.gz"],
            FailurePolicy::Abort,
        )
        .unwrap();
        assert_eq!(
            batch.newest().unwrap().identifier,
            "pkg1.8.1.linux-amd64.tar.gz"
        );
    }

    #[test]
    fn test_newest_release_outranks_prerelease() {
        let batch = batch(&["pkg1.8beta1", "pkg1.8", "pkg1.7.4"], FailurePolicy::Abort).unwrap();
        assert_eq!(batch.newest().unwrap().identifier, "pkg1.8");
    }

    #[test]
    fn test_abort_policy_fails_fast() {
        let err = batch(&["pkg1.8", "readme.txt", "pkg1.9"], FailurePolicy::Abort).unwrap_err();
        assert_eq!(err.identifier(), "readme.txt");
    }

    #[test]
    fn test_skip_policy_collects_failures() {
        let batch = batch(
            &["pkg1.8", "readme.txt", "robots.txt", "pkg1.9"],
            FailurePolicy::Skip,
        )
        .unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.failures.len(), 2);
        assert_eq!(batch.failures[0].identifier(), "readme.txt");
        assert_eq!(batch.failures[1].identifier(), "robots.txt");
        assert_eq!(batch.newest().unwrap().identifier, "pkg1.9");
    }

    #[test]
    fn test_empty_batch_has_no_newest() {
        let batch = batch(&[], FailurePolicy::Skip).unwrap();
        assert!(batch.newest().is_none());
        assert!(batch.records.is_empty());
    }
}
