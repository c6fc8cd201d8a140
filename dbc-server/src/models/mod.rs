//! Request-side models with validation at construction
//!
//! Everything taken from a path, query string or body goes through one of
//! these types. Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod code;
pub mod search;
pub mod pagination;

pub use validation::ValidationError;
pub use code::Code;
pub use search::SearchTerm;
pub use pagination::{Pagination, Paginated, PaginationParams};
