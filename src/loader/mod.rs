//! Relational object loading
//!
//! [`GraphLoader`] decomposes flat, prefixed records into one object per
//! schema class, derives a stable id per object, skips objects it has
//! already created, and links the objects of each call through every
//! declared reference property. Flushing the store's partial batch is
//! guaranteed on every exit path by the loader's `Drop`.

pub mod graph;
pub mod identity;

pub use graph::GraphLoader;
pub use identity::object_id;
