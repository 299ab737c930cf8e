//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values: two tax
/// ids with the same digits are the same tax id. To "modify" one, build a new
/// one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct TaxRate(Decimal);
///
/// impl ValueObject for TaxRate {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
