//! core
//!
//! Core domain types, records, and configuration for the gradebook.
//!
//! # Modules
//!
//! - [`types`] - Strong types: StudentId, AssignmentId, GradeValue, etc.
//! - [`model`] - Student, assignment and grade records
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Relationships between records are checked by services, not types

pub mod config;
pub mod model;
pub mod types;
