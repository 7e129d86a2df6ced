//! Schemas: validation contracts attached to nodes of the property tree.

mod builder;
mod constraint;
mod definition;
pub mod template;

pub use builder::SchemaBuilder;
pub use constraint::{Constraint, CustomConstraint, EnumConstraint, RangeBound, RangeConstraint};
pub use definition::Schema;
