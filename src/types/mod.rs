//! Core types for shot data representation.
//!
//! - [`Shot`] is a fully resolved shot record, the unit the codec packs and unpacks
//! - [`ShotFields`] is the partial form with device defaults applied on resolution

mod shot;

pub use shot::{DEFAULT_TEMPERATURE, Shot, ShotFields, clamp_byte};
