pub mod cli;
pub mod config;
pub mod rank;
pub mod source;
pub mod version;

pub use config::NewestConfig;
pub use rank::{Batch, FailurePolicy, VersionedRecord, convert_batch};
pub use source::{FeedSource, ListingSource, Source};
pub use version::{ConvertError, Converter, Identifier, Version};
