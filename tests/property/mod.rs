//! Property-based tests for repository guarantees

mod repository_properties;
