//! Account self-service: profile and password changes

mod service;

#[cfg(test)]
mod tests;

pub use service::{UpdateProfile, UserService};
