//! 外部协作者接口
//!
//! 剪贴板、提示消息、导航与更新服务均由宿主提供，本层只依赖这些契约。

use async_trait::async_trait;
use pacs_core::{Result, StudyRecord};
use serde::Serialize;
use std::sync::Arc;

use crate::config::{ToastConfig, ToastPlacement};
use crate::patient_edit::StudyUpdate;

/// 平台剪贴板
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// 提示消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// 一条短暂提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub placement: ToastPlacement,
    pub duration_ms: u64,
}

impl Toast {
    pub fn success(message: impl Into<String>, options: &ToastConfig) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            placement: options.placement,
            duration_ms: options.duration_ms,
        }
    }

    pub fn error(message: impl Into<String>, options: &ToastConfig) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            placement: options.placement,
            duration_ms: options.duration_ms,
        }
    }
}

/// 提示消息服务
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// 随导航携带的状态
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub study: StudyRecord,
    #[serde(rename = "studyInstanceUID", skip_serializing_if = "Option::is_none")]
    pub study_instance_uid: Option<String>,
}

/// 导航服务
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, state: NavigationState) -> Result<()>;
}

/// 检查信息更新服务
#[async_trait]
pub trait UpdateService: Send + Sync {
    async fn update_study(&self, update: StudyUpdate) -> Result<()>;
}

/// 行操作所需的协作者集合
#[derive(Clone)]
pub struct RowServices {
    pub clipboard: Arc<dyn Clipboard>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl RowServices {
    pub fn new(
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            clipboard,
            notifier,
            navigator,
        }
    }
}

impl std::fmt::Debug for RowServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowServices").finish_non_exhaustive()
    }
}
