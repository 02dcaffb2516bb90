//! Order management: listing, creation, status lifecycle and deletion

mod input;
mod service;


pub use input::{validate_address, validate_items, NewOrder};
pub use service::{OrderFilter, OrderService, SERVICE_STATUS};
