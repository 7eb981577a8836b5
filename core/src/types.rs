//! Shared primitive types used across every generator.

/// A stable identifier for any generated entity (UUID text form).
pub type EntityId = String;

/// A generated table: rows in emission order.
pub type Table<T> = Vec<T>;

/// ISO calendar date format used for clean date columns.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// ISO timestamp format used for event times.
pub const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";
