//! # PersonaBar Kernel
//!
//! Wires the components together and drives their lifecycle.
//!
//! - [`Application`](bootstrap::Application) builds storage, events, the UI
//!   bridge, the menu registry, the feature manager, the host shell and the
//!   skin manager, registers them in a [`DependencyRegistry`] and runs
//!   `initialize`/`start` in that order and `stop` in reverse.
//! - [`KernelComponent`](component::KernelComponent) is the lifecycle trait
//!   every component implements.
//! - [`Error`](error::Error) aggregates the subsystem errors.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;

pub use bootstrap::Application;
pub use component::{DependencyRegistry, KernelComponent};
pub use error::{Error, Result};
