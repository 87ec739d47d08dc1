//! core
//!
//! Core domain types and operations for addonkit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ModuleName, NodeId
//! - [`manifest`] - Module discovery and strict manifest parsing
//! - [`deps`] - Repository dependency files and addons root discovery
//! - [`graph`] - Dependency graph arena
//! - [`level`] - Dependency level resolution
//! - [`order`] - Level-based install ordering
//! - [`closure`] - Transitive manifest dependencies over a search path
//! - [`changed`] - Modules touched by a change set
//! - [`logcheck`] - Test failure detection in server logs
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Everything is recomputed per invocation; nothing is persisted
//! - Lookups take explicit search paths, never process-wide state
//! - All orderings are deterministic

pub mod changed;
pub mod closure;
pub mod config;
pub mod deps;
pub mod graph;
pub mod level;
pub mod logcheck;
pub mod manifest;
pub mod order;
pub mod types;
