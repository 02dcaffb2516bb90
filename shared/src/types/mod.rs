//! Wire types shared by every HTTP handler

pub mod pagination;
pub mod response;

pub use pagination::{PageInfo, Paginated, Pagination, DEFAULT_LIMIT, MAX_LIMIT};
pub use response::{ApiErrorBody, ApiResponse, ErrorDetail};
