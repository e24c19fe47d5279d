//! # PersonaBar Host Shell
//!
//! Loads feature panels when their bar entry is selected. Bundles come
//! from a [`BundleSource`] through the load-once [`ModuleRegistry`]; the
//! bundle's [`PanelFactory`] yields a [`Panel`] that the [`HostShell`]
//! initializes once and reloads on later activations.
//!
//! ```text
//! Unloaded -> Loading -> Initialized -> Active <-> Hidden
//!                 \            \
//!                  `-> Failed <-'   (re-selection retries)
//! ```
pub mod bar;
pub mod bundle;
pub mod error;
pub mod host;
pub mod module_registry;
pub mod panel;
pub mod state;
pub mod utility;

pub use bar::BarSkinListener;
pub use bundle::{BundleCatalog, BundleSource};
pub use error::PanelError;
pub use host::{HostShell, ReadyCallback};
pub use module_registry::ModuleRegistry;
pub use panel::{Panel, PanelContext, PanelFactory, PanelWrapper};
pub use state::{PanelAction, PanelMode, PanelStatus, SelectOutcome};
pub use utility::Utility;

#[cfg(test)]
mod tests;
