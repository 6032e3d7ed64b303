//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`assemble`] - Build a terrain mesh and write OBJ, MTL, textures and manifest
//! - [`init`] - Write a config file with the current settings
//! - [`plan`] - Show the bounding box and tile list without downloading

pub mod assemble;
pub mod common;
pub mod init;
pub mod plan;
