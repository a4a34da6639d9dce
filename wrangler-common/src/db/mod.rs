//! Warehouse connection pool and schema bootstrap

pub mod init;

pub use init::*;
