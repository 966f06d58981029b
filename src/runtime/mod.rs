//! Runtime values, operators and the shared services compiled functions use.
//!
//! # No-Cycle Invariant
//! Values and frames are `Arc`-shared, so a reference cycle leaks. The
//! invariant is:
//! - A compiled function reaches itself only through a weak handle
//!   ([`callable::WeakCallable`]), never through a frame slot.
//! - Frames point at their parents only; a lambda captures the frame it was
//!   created in, not frames created by its own calls.
//!
//! A definition that stores a closure into a variable of the block that the
//! closure itself captures breaks this and is not reclaimed.

pub mod arg_key;
pub mod cache;
pub mod callable;
pub mod error;
pub mod frame;
pub mod ops;
pub mod parallel;
pub mod pool;
pub mod value;

#[cfg(test)]
mod parallel_test;
