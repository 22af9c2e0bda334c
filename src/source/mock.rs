//! Mock source for driving batch logic in tests without network calls.

use super::Source;
use anyhow::{Result, anyhow};
use async_trait::async_trait;

/// A mock source that returns a canned list of identifiers, or fails.
pub struct MockSource {
    names: Vec<String>,
    fail: bool,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            fail: false,
        }
    }

    /// Add one identifier to the canned listing.
    pub fn with_name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    /// Make every fetch fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for MockSource {
    async fn fetch(&self) -> Result<Vec<String>> {
        if self.fail {
            return Err(anyhow!("mock source failure"));
        }
        Ok(self.names.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::{FailurePolicy, convert_batch};
    use crate::version::Converter;

    #[tokio::test]
    async fn test_mock_source_feeds_a_batch() {
        let source = MockSource::new()
            .with_name("pkg1.8beta1.linux-amd64.tar.gz")
            .with_name("pkg1.7.4.src.tar.gz")
            .with_name("LICENSE");

        let names = source.fetch().await.unwrap();
        let batch = convert_batch(&Converter::new("pkg"), names, FailurePolicy::Skip).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(
            batch.newest().unwrap().identifier,
            "pkg1.8beta1.linux-amd64.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_mock_source_failure() {
        let source = MockSource::new().failing();
        assert!(source.fetch().await.is_err());
    }
}
