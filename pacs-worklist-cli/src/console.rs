//! 终端环境下的协作者实现，所有动作只写日志

use async_trait::async_trait;
use pacs_core::Result;
use pacs_worklist::services::{Clipboard, NavigationState, Navigator, Notifier, Toast, UpdateService};
use pacs_worklist::StudyUpdate;
use tracing::info;

pub struct ConsoleClipboard;

#[async_trait]
impl Clipboard for ConsoleClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        info!("Clipboard <- {}", text);
        Ok(())
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        info!("[{:?}] {}", toast.kind, toast.message);
    }
}

pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str, state: NavigationState) -> Result<()> {
        info!("Navigate to {} (study {})", path, state.study.id);
        Ok(())
    }
}

pub struct ConsoleUpdateService;

#[async_trait]
impl UpdateService for ConsoleUpdateService {
    async fn update_study(&self, update: StudyUpdate) -> Result<()> {
        info!("Update study {}: {}", update.study_id, serde_json::to_string(&update)?);
        Ok(())
    }
}
