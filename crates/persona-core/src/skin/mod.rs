//! # PersonaBar Skin Lifecycle
//!
//! The host page raises init, load, pre-render and unload once each per
//! render. [`SkinManager`] enforces that order with a [`PageLifecycle`] and
//! fans each phase out to the subscribed [`SkinEventListener`]s.
pub mod error;
pub mod lifecycle;
pub mod listener;
pub mod manager;

pub use error::SkinError;
pub use lifecycle::{PageLifecycle, SkinEventArgs, SkinPhase};
pub use listener::SkinEventListener;
pub use manager::{RenderReport, SkinManager};

#[cfg(test)]
mod tests;
