//! Stepwire Core
//!
//! Core types and abstractions shared by the Stepwire client, CLI and controller.
//!
//! This crate contains:
//! - Domain types: job step records and the collections the controller returns
//! - Protocol: the message envelope exchanged with the controller and its frame codec
//! - Report: the plain-text job step report

pub mod domain;
pub mod protocol;
pub mod report;
