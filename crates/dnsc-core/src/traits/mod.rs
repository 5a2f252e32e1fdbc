//! Core traits for dnsc
//!
//! This module defines the abstract interfaces that all provider
//! implementations must follow.
//!
//! - [`RecordAdapter`]: Read and write record sets at one DNS hosting provider
//! - [`RecordAdapterFactory`]: Build adapters from configuration

pub mod record_adapter;

pub use record_adapter::{RecordAdapter, RecordAdapterFactory};
