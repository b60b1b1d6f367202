//! Core watch event model and sink dispatch interface.
//!
//! Every notification sink consumes the same [`Event`] through the
//! [`Handler`] trait. The watch pipeline owns event production; sinks only
//! read events and decide how to forward them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod event;
pub mod handler;
pub mod time;

pub use event::Event;
pub use handler::{Handler, MulticastHandler, NoOpHandler};
pub use time::{Clock, SystemClock, TestClock};
