//! Typed schema model for the object store
//!
//! The store reports its schema as a loose JSON document; nothing in it
//! tags a property as scalar vs cross-reference. This module parses that
//! document once, at loader construction, into an explicit tagged model
//! ([`ScalarProperty`] vs [`ReferenceProperty`]) so the loader never has to
//! re-infer property kinds per call.

pub mod parse;
pub mod types;

pub use parse::parse_schema;
pub use types::{ClassSchema, ReferenceProperty, ScalarProperty, Schema};
