use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::skin::lifecycle::SkinEventArgs;

/// Page decoration hooked into the skin lifecycle
#[async_trait]
pub trait SkinEventListener: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self, _args: &SkinEventArgs) -> Result<()> {
        Ok(())
    }

    async fn load(&self, _args: &SkinEventArgs) -> Result<()> {
        Ok(())
    }

    async fn pre_render(&self, _args: &SkinEventArgs) -> Result<()> {
        Ok(())
    }

    async fn unload(&self, _args: &SkinEventArgs) -> Result<()> {
        Ok(())
    }
}
