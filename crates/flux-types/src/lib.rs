//! Foundation types for Flux containers.
//!
//! This crate provides the identity and value types shared by the
//! transaction and container crates. Every other Flux crate depends on
//! `flux-types`.
//!
//! # Key Types
//!
//! - [`Amount`] — Signed quantity used for stored amounts and transfer requests
//! - [`Facet`] — One of the seven access points of a container (six directions plus unsided)
//! - [`FacetLimits`] — Per-operation insertion and extraction ceilings of one facet
//! - [`QuantityState`] — Point-in-time `(amount, capacity)` pair

pub mod error;
pub mod facet;
pub mod quantity;

pub use error::TypeError;
pub use facet::Facet;
pub use quantity::{Amount, FacetLimits, QuantityState};
