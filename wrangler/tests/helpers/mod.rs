//! Test Helper Utilities
//!
//! Shared utilities for testing labware-wrangler

#![allow(dead_code)]

pub mod db_utils;
pub mod fakes;
pub mod log_capture;

// Re-export commonly used items
pub use db_utils::{
    create_test_warehouse, plate_rows, seed_rows, tube_rack_rows, unwrangled_barcodes, SeedRow,
    TestWarehouse, TEST_DESTINATION,
};
pub use fakes::{RecordingReferenceBackend, ScriptedRegistrationClient};
pub use log_capture::{capture_logs, LogCapture};
