//! Domain primitives for the AMI and snapshot age audit.
//!
//! This crate owns deterministic classification behavior, report rendering,
//! and storage key construction. It intentionally excludes AWS SDK and
//! Lambda runtime concerns.

pub mod classify;
pub mod records;
pub mod report;
pub mod storage_keys;
