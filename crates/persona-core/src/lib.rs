//! # PersonaBar Core
//!
//! Kernel of the PersonaBar admin shell: the menu registry and its permission
//! evaluator, the pluggable menu-item controllers, the feature system that
//! installs menu items, the host shell that lazily loads feature panels, and
//! the generic service facade panels use to talk to the server.
pub mod data;
pub mod event;
pub mod feature;
pub mod kernel;
pub mod menu;
pub mod service;
pub mod shell;
pub mod skin;
pub mod storage;
pub mod ui_bridge;

pub use kernel::Application;
pub use kernel::error::Error as KernelError;
pub use feature::{Feature, FeatureManifest, FeatureManager};
pub use menu::{MenuItem, MenuManager, UserInfo};
pub use shell::HostShell;
pub use service::ServiceClient;
pub use event::{EventDispatcher, Event};
pub use storage::StorageProvider;
