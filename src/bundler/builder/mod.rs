//! Bundle orchestration and coordination.
//!
//! This module provides the main [`DmgBundler`] orchestrator, which:
//! 1. Resolves the [`DmgSpec`](crate::bundler::DmgSpec) for a project
//! 2. Delegates image construction to a disk image facility
//! 3. Returns a [`BundledArtifact`] with size and checksum
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`DmgBundler`] struct
//! - [`tool_detection`] - External tool availability checking

pub mod checksum;
mod orchestrator;
pub mod tool_detection;

pub use orchestrator::{BundledArtifact, DmgBundler};
