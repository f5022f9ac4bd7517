//! AWS-oriented adapters and handlers for the AMI and snapshot age audit.
//!
//! This crate owns runtime integration details (the Lambda entry point, EC2
//! region and resource listing, S3 report storage, and SNS notification)
//! around the deterministic classification core.

pub mod adapters;
pub mod handlers;
