//! Shared conventions for the meshkiln asset pipeline.
//!
//! The two pipeline stages never exchange data in memory - the filesystem
//! naming scheme and the remote success markers *are* the contract between
//! them. Both live here so the drivers cannot drift apart.

pub mod markers;
pub mod naming;
pub mod params;
