//! Precondition checks shared by [`Context`](crate::Context) and
//! [`Registry`](crate::Registry). Every check is `#[track_caller]` so the
//! resulting diagnostic points at the caller's misuse.

pub mod callback;
pub mod key;
