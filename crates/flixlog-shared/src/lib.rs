//! # flixlog-shared
//!
//! Types and helpers shared by the FlixLog journal store and its front ends:
//! ID newtypes, storage-key constants, the local device identity, and
//! time formatting.

pub mod constants;
pub mod identity;
pub mod time;
pub mod types;

pub use identity::DeviceIdentity;
pub use types::{AnnotationId, ShowId};
