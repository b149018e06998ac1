//! Core type definitions for BasaltDB.

mod ids;

pub use ids::{Lsn, PageId};
