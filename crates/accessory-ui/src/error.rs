use accessory_core::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}
