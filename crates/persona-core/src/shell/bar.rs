use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::kernel::error::Result;
use crate::menu::manager::{MenuEntry, MenuManager};
use crate::skin::{SkinEventArgs, SkinEventListener};

/// Puts the bar on every page: the registry is re-read on init and the
/// visible bar for the page's user is computed on pre-render.
#[derive(Debug)]
pub struct BarSkinListener {
    menu: Arc<MenuManager>,
    rendered: Mutex<HashMap<i32, Vec<MenuEntry>>>,
}

impl BarSkinListener {
    pub fn new(menu: Arc<MenuManager>) -> Self {
        Self {
            menu,
            rendered: Mutex::new(HashMap::new()),
        }
    }

    /// The bar computed for a page that has not been unloaded yet
    pub async fn rendered_bar(&self, page_id: i32) -> Option<Vec<MenuEntry>> {
        self.rendered.lock().await.get(&page_id).cloned()
    }
}

#[async_trait]
impl SkinEventListener for BarSkinListener {
    fn name(&self) -> &str {
        "persona-bar"
    }

    async fn init(&self, _args: &SkinEventArgs) -> Result<()> {
        self.menu.reload().await?;
        Ok(())
    }

    async fn pre_render(&self, args: &SkinEventArgs) -> Result<()> {
        let bar = self.menu.visible_menu(&args.user).await?;
        log::debug!("Page {}: bar has {} root entries", args.page_id, bar.len());
        self.rendered.lock().await.insert(args.page_id, bar);
        Ok(())
    }

    async fn unload(&self, args: &SkinEventArgs) -> Result<()> {
        self.rendered.lock().await.remove(&args.page_id);
        Ok(())
    }
}
