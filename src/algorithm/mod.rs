//! Algorithm implementations for temporal affiliation networks
//!
//! `network` turns a window's affiliations into edges and member metrics;
//! `temporal` repeats that over a sequence of time windows.

pub mod network;
pub mod temporal;
