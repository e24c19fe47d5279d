use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock as StdRwLock};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::data::DataService;
use crate::event::{SharedEventDispatcher, SystemEvent};
use crate::kernel::component::KernelComponent;
use crate::kernel::error::{Error, Result};
use crate::menu::controller::{ControllerRegistry, MenuItemController, MenuSettings};
use crate::menu::error::MenuError;
use crate::menu::model::{MenuItem, MenuPermission, UserInfo};
use crate::menu::permission;
use crate::menu::tree::MenuTree;

/// A visible menu entry after controller customization
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub item: MenuItem,
    pub settings: Option<MenuSettings>,
    pub children: Vec<MenuEntry>,
}

impl MenuEntry {
    /// Depth-first `(depth, entry)` pairs, this entry first
    pub fn flatten(&self) -> Vec<(usize, &MenuEntry)> {
        let mut out = vec![(0, self)];
        for child in &self.children {
            out.extend(child.flatten().into_iter().map(|(depth, entry)| (depth + 1, entry)));
        }
        out
    }
}

/// What the host shell needs to load a panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDescriptor {
    pub identifier: String,
    pub module_name: String,
    /// Bundle path the panel is fetched from
    pub path: String,
    pub mobile_support: bool,
    pub settings: Option<MenuSettings>,
}

#[derive(Debug, Default)]
struct MenuState {
    tree: MenuTree,
    default_roles: HashMap<i32, Vec<String>>,
    permissions: Vec<MenuPermission>,
    loaded: bool,
}

/// Holds the menu registry read from the data service and renders the bar
/// for a user.
pub struct MenuManager {
    name: &'static str,
    data: Arc<dyn DataService>,
    controllers: StdRwLock<ControllerRegistry>,
    state: RwLock<MenuState>,
    portal_id: i32,
    events: Option<SharedEventDispatcher>,
}

impl fmt::Debug for MenuManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuManager")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("portal_id", &self.portal_id)
            .finish_non_exhaustive()
    }
}

impl MenuManager {
    pub fn new(data: Arc<dyn DataService>, portal_id: i32) -> Self {
        Self {
            name: "MenuManager",
            data,
            controllers: StdRwLock::new(ControllerRegistry::new()),
            state: RwLock::new(MenuState::default()),
            portal_id,
            events: None,
        }
    }

    pub fn with_events(mut self, events: SharedEventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    pub fn data_service(&self) -> &Arc<dyn DataService> {
        &self.data
    }

    pub fn portal_id(&self) -> i32 {
        self.portal_id
    }

    /// Run `f` with the controller table locked for writing.
    pub fn with_controllers<T>(&self, f: impl FnOnce(&mut ControllerRegistry) -> T) -> Result<T> {
        let mut registry = self
            .controllers
            .write()
            .map_err(|_| Error::Other("Menu controller registry lock poisoned".to_string()))?;
        Ok(f(&mut registry))
    }

    pub fn register_controller(&self, name: &str, controller: Arc<dyn MenuItemController>) -> Result<()> {
        self.with_controllers(|registry| registry.register(name, controller))??;
        Ok(())
    }

    pub fn controller_names(&self) -> Vec<String> {
        self.controllers
            .read()
            .map(|registry| registry.names())
            .unwrap_or_default()
    }

    fn resolve_controller(&self, name: &str) -> Arc<dyn MenuItemController> {
        match self.controllers.read() {
            Ok(registry) => registry.resolve(name),
            Err(_) => {
                log::error!("Menu controller registry lock poisoned, hiding '{}'", name);
                Arc::new(crate::menu::controller::NullController)
            }
        }
    }

    /// Re-read items, default roles and permissions and rebuild the tree.
    pub async fn reload(&self) -> Result<usize> {
        let items = self.data.get_menu_items().await?;
        let mut default_roles = HashMap::new();
        for item in &items {
            let roles = self.data.get_menu_default_roles(item.menu_id).await?;
            if !roles.is_empty() {
                default_roles.insert(item.menu_id, roles);
            }
        }
        let permissions = self.data.get_permissions_by_portal(self.portal_id).await?;

        let tree = MenuTree::build(items);
        let count = tree.len();
        {
            let mut state = self.state.write().await;
            *state = MenuState {
                tree,
                default_roles,
                permissions,
                loaded: true,
            };
        }
        log::info!("Menu registry loaded with {} item(s)", count);

        if let Some(events) = &self.events {
            events.dispatch(&SystemEvent::MenuReloaded { item_count: count }).await;
        }
        Ok(count)
    }

    async fn ensure_loaded(&self) -> Result<()> {
        if !self.state.read().await.loaded {
            self.reload().await?;
        }
        Ok(())
    }

    /// Snapshot of the full registry tree, visibility not applied
    pub async fn tree(&self) -> Result<MenuTree> {
        self.ensure_loaded().await?;
        Ok(self.state.read().await.tree.clone())
    }

    async fn permissions_for(&self, user: &UserInfo) -> Result<Vec<MenuPermission>> {
        if user.portal_id == self.portal_id {
            Ok(self.state.read().await.permissions.clone())
        } else {
            self.data.get_permissions_by_portal(user.portal_id).await
        }
    }

    /// The bar as `user` sees it. Children of hidden items are hidden.
    pub async fn visible_menu(&self, user: &UserInfo) -> Result<Vec<MenuEntry>> {
        self.ensure_loaded().await?;
        let permissions = self.permissions_for(user).await?;
        let state = self.state.read().await;

        let entries = state
            .tree
            .roots()
            .iter()
            .filter_map(|identifier| self.render(&state, identifier, user, &permissions))
            .collect();
        Ok(entries)
    }

    fn render(
        &self,
        state: &MenuState,
        identifier: &str,
        user: &UserInfo,
        permissions: &[MenuPermission],
    ) -> Option<MenuEntry> {
        let mut item = state.tree.get(identifier)?.clone();
        let controller = self.resolve_controller(&item.controller);
        controller.update_parameters(&mut item);

        let default_roles = state
            .default_roles
            .get(&item.menu_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let decision = permission::evaluate(&item, user, default_roles, permissions);
        if !decision.is_visible() {
            log::trace!("Menu item '{}' hidden: {:?}", identifier, decision);
            return None;
        }
        if !controller.visible(&item) {
            log::trace!("Menu item '{}' hidden by controller '{}'", identifier, item.controller);
            return None;
        }

        let settings = controller.settings(&item);
        let children = state
            .tree
            .children(identifier)
            .iter()
            .filter_map(|child| self.render(state, child, user, permissions))
            .collect();
        Some(MenuEntry {
            item,
            settings,
            children,
        })
    }

    /// Find an entry in the visible menu
    pub async fn find_visible(&self, identifier: &str, user: &UserInfo) -> Result<Option<MenuEntry>> {
        let menu = self.visible_menu(user).await?;
        let found = menu
            .iter()
            .flat_map(|entry| entry.flatten())
            .find(|(_, entry)| entry.item.identifier == identifier)
            .map(|(_, entry)| entry.clone());
        Ok(found)
    }

    /// Descriptor of a registered panel, controller parameters applied.
    pub async fn descriptor(&self, identifier: &str) -> Result<PanelDescriptor> {
        self.ensure_loaded().await?;
        let mut item = {
            let state = self.state.read().await;
            match state.tree.get(identifier) {
                Some(item) if state.tree.is_reachable(identifier) => item.clone(),
                _ => return Err(MenuError::ItemNotFound(identifier.to_string()).into()),
            }
        };
        let controller = self.resolve_controller(&item.controller);
        controller.update_parameters(&mut item);
        Ok(PanelDescriptor {
            settings: controller.settings(&item),
            identifier: item.identifier,
            module_name: item.module_name,
            path: item.path,
            mobile_support: item.mobile_support,
        })
    }

    /// Descriptor of a panel `user` may open
    pub async fn descriptor_for(&self, identifier: &str, user: &UserInfo) -> Result<PanelDescriptor> {
        match self.find_visible(identifier, user).await? {
            Some(entry) => Ok(PanelDescriptor {
                identifier: entry.item.identifier,
                module_name: entry.item.module_name,
                path: entry.item.path,
                mobile_support: entry.item.mobile_support,
                settings: entry.settings,
            }),
            None => {
                if self.state.read().await.tree.get(identifier).is_some() {
                    Err(MenuError::NotVisible(identifier.to_string()).into())
                } else {
                    Err(MenuError::ItemNotFound(identifier.to_string()).into())
                }
            }
        }
    }
}

#[async_trait]
impl KernelComponent for MenuManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        self.reload().await?;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}
