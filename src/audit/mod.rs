//! Audit domain layer
//!
//! Pure business logic: the audited bundle model, the catalog graph and
//! the checks that turn a bundle manifest into findings. Nothing in this
//! module touches processes or the network.
pub mod domain;
pub mod policies;
pub mod services;
