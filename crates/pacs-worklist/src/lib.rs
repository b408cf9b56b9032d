//! # PACS医生工作列表
//!
//! 医生端检查列表的无界面视图模型，包括：
//! - 行展示：把一条检查记录渲染成表格行，并处理行内操作
//! - 表格控制：加载中/空列表/有数据三态，弹窗状态与分页回调
//! - 患者信息编辑：表单预填、校验与异步提交
//!
//! 剪贴板、提示、导航与更新服务由宿主通过 [`services`] 中的接口注入。

pub mod callbacks;
pub mod config;
pub mod modal;
pub mod patient_edit;
pub mod popover;
pub mod row;
pub mod services;
pub mod status;
pub mod table;

// 重新导出主要类型
pub use callbacks::TableCallbacks;
pub use config::WorklistConfig;
pub use modal::{ModalKind, ModalSelection, ModalState};
pub use patient_edit::{PatientEditDraft, PatientEditForm, StudyUpdate, SubmitOutcome};
pub use popover::{DownloadPopover, ScrollOffset, TriggerBounds};
pub use row::{RowAction, RowHandler, RowView, StudyRow, COLUMNS};
pub use services::{Clipboard, NavigationState, Navigator, Notifier, RowServices, Toast, UpdateService};
pub use status::{status_label, status_style, StatusStyle};
pub use table::{TableController, TableView};
