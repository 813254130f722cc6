//! Standard messages shared by every failure envelope.

pub const INTERNAL_ERROR: &str = "An unexpected error occurred";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
