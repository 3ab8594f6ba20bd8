pub mod integration;

pub use integration::{normalize_unique_name, AdditionalInfo, FileStatus, Integration};
