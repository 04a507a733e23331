//! Core type definitions used across the DocVault workspace.

pub mod id;

pub use id::*;
