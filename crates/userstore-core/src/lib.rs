//! # Userstore Core
//!
//! Core types shared by every layer of the user store: the [`User`] entity,
//! the closed [`StoreError`] taxonomy returned by data-access operations, and
//! logging/telemetry bootstrap for the composition root.

pub mod domain;
pub mod error;
pub mod result;
pub mod telemetry;

pub use domain::*;
pub use error::*;
pub use result::*;
