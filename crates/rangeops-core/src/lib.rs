//! # rangeops-core — Foundational Types
//!
//! Defines the primitives that the access resolver and the CLI share.
//! Every other crate in the workspace depends on `rangeops-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `OrgId` and `UserId` are
//!    distinct types with validated constructors. An organization id can
//!    never be passed where a user id is expected.
//!
//! 2. **Closed role set.** `Role` has exactly three variants. Backend role
//!    strings are parsed once at the boundary; nothing downstream matches
//!    on strings.
//!
//! 3. **UTC-only timestamps.** `Timestamp` normalizes every input offset to
//!    UTC at seconds precision so identical instants compare equal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rangeops-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod role;
pub mod temporal;

pub use error::RangeopsError;
pub use identity::{OrgId, UserId};
pub use role::Role;
pub use temporal::Timestamp;
