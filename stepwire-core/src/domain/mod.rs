//! Core domain types
//!
//! These types describe job step state as the controller reports it. They are
//! shared between the controller (which owns the state) and the client (which
//! queries it).

pub mod step;
