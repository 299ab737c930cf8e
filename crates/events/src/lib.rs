//! Domain events emitted by command-driven aggregates.

pub mod event;

pub use event::Event;
