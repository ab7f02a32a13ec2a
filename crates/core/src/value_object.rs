//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// - **Value Object**: no identity (a price of `750.00` equals any other `750.00`)
/// - **Entity**: has identity (two products with the same id are the same product)
///
/// Value objects are immutable; to "modify" one, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
