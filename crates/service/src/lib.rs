//! Service layer providing business-oriented operations on top of models.
//! - Separates business rules (authorization, validation, aggregation) from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod payload;
pub mod permissions;
pub mod auth;
pub mod offer_service;
pub mod order_service;
pub mod review_service;
pub mod profile_service;
pub mod stats_service;
#[cfg(test)]
pub mod test_support;
