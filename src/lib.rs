//! Input-decoding core of the GlideKey virtual keyboard.
//!
//! Converts raw pointer and key events into committed text and ranked
//! suggestions. The host app owns rendering, layouts, persistence, and the
//! text sink; this crate owns gesture classification, swipe decoding,
//! suggestion ranking, the session state machine, and the async pipeline
//! between them. Hosts drive the engine through the [`api`] binding layer;
//! the inner modules are public for tests, tooling, and direct embedding.

pub mod api;
pub mod geometry;
pub mod gesture;
pub mod session;
pub mod settings;
pub mod suggest;
pub mod swipe;
pub mod trace_init;

mod async_worker;

uniffi::setup_scaffolding!();
