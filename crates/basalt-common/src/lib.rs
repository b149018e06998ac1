//! # basalt-common
//!
//! Common types and constants for BasaltDB.
//!
//! This crate provides the foundational pieces shared by the storage
//! components:
//!
//! - **Types**: core identifiers (`PageId`, `Lsn`)
//! - **Constants**: page geometry and pool defaults
//!
//! ## Example
//!
//! ```rust
//! use basalt_common::constants::PAGE_SIZE;
//! use basalt_common::types::PageId;
//!
//! let page_id = PageId::new(42);
//! assert!(page_id.is_valid());
//! assert_eq!(PAGE_SIZE, 4096);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod types;

// Re-export commonly used items at the crate root
pub use constants::*;
pub use types::{Lsn, PageId};
