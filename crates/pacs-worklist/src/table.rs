//! 表格控制器
//!
//! 持有记录列表与弹窗状态，渲染加载中、空列表、有数据三种互斥视图，
//! 并把行内操作转成弹窗状态变化或外部回调。

use pacs_core::{PacsError, Pagination, Result, StudyRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::callbacks::TableCallbacks;
use crate::config::WorklistConfig;
use crate::modal::{ModalKind, ModalSelection, ModalState};
use crate::patient_edit::{
    PatientEditDraft, PatientEditForm, PendingSubmission, SubmissionResult, SubmitOutcome,
};
use crate::popover::DownloadPopover;
use crate::row::{RowAction, RowHandler, RowView, StudyRow, COLUMNS};
use crate::services::RowServices;

pub const LOADING_MESSAGE: &str = "Loading studies...";
pub const EMPTY_TITLE: &str = "No studies found";
pub const EMPTY_HINT: &str = "Try adjusting your filters";

/// 分页条
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterView {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u64,
    pub records_per_page: u32,
    pub displayed_records: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub page_size_options: Vec<u32>,
}

/// 编辑表单快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientEditView {
    pub title: String,
    pub draft: PatientEditDraft,
    pub submitting: bool,
    pub submit_label: &'static str,
    pub last_error: Option<String>,
}

/// 已挂载的弹窗
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountedModal {
    pub kind: ModalKind,
    pub selection: ModalSelection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<PatientEditView>,
}

/// 有数据时的表格
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<RowView>,
    pub footer: FooterView,
    pub modals: Vec<MountedModal>,
}

/// 表格视图
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableView {
    Loading { message: String },
    Empty { title: String, hint: String },
    Populated(PopulatedTable),
}

impl TableView {
    pub fn row_count(&self) -> usize {
        match self {
            Self::Populated(table) => table.rows.len(),
            _ => 0,
        }
    }

    pub fn footer(&self) -> Option<&FooterView> {
        match self {
            Self::Populated(table) => Some(&table.footer),
            _ => None,
        }
    }
}

/// 把行操作落到控制器状态上
struct ControllerRowHandler<'a> {
    modals: &'a mut ModalState,
    patient_edit: &'a mut Option<PatientEditForm>,
    callbacks: &'a TableCallbacks,
}

impl RowHandler for ControllerRowHandler<'_> {
    fn show_timeline(&mut self, record: &StudyRecord) {
        self.modals.open(ModalKind::Timeline, ModalSelection::with_record(record));
    }

    fn open_patient(&mut self, patient_id: &str, record: &StudyRecord) {
        if !self.callbacks.patient_clicked(patient_id, record) {
            debug!("No patient click handler for study {}", record.id);
        }
    }

    fn view_report(&mut self, record: &StudyRecord) {
        self.modals.open(ModalKind::Report, ModalSelection::with_record(record));
    }

    fn show_notes(&mut self, record_id: &str) {
        self.modals.open(ModalKind::Notes, ModalSelection::id_only(record_id));
    }

    fn view_study(&mut self, record: &StudyRecord) {
        self.modals.open(ModalKind::DetailView, ModalSelection::id_only(record.id.as_str()));
    }

    fn edit_patient(&mut self, record: &StudyRecord) {
        self.modals.open(ModalKind::PatientEdit, ModalSelection::with_record(record));
        *self.patient_edit = Some(PatientEditForm::open(record));
    }
}

/// 表格控制器
#[derive(Debug)]
pub struct TableController {
    config: WorklistConfig,
    services: RowServices,
    callbacks: TableCallbacks,
    records: Vec<StudyRecord>,
    loading: bool,
    pagination: Pagination,
    modals: ModalState,
    patient_edit: Option<PatientEditForm>,
    popovers: HashMap<String, DownloadPopover>,
}

impl TableController {
    /// 创建控制器，初始所有弹窗隐藏
    pub fn new(config: WorklistConfig, services: RowServices, callbacks: TableCallbacks) -> Self {
        let pagination = Pagination {
            records_per_page: config.pagination.default_page_size,
            ..Pagination::default()
        };
        Self {
            config,
            services,
            callbacks,
            records: Vec::new(),
            loading: false,
            pagination,
            modals: ModalState::new(),
            patient_edit: None,
            popovers: HashMap::new(),
        }
    }

    pub fn config(&self) -> &WorklistConfig {
        &self.config
    }

    /// 接收数据源的一次完整更新
    pub fn set_data(&mut self, records: Vec<StudyRecord>, loading: bool, pagination: Pagination) {
        self.loading = loading;
        self.pagination = pagination;
        self.set_records(records);
    }

    /// 替换记录；不再存在的行丢弃其浮层状态，弹窗不受影响
    pub fn set_records(&mut self, records: Vec<StudyRecord>) {
        self.popovers
            .retain(|id, _| records.iter().any(|record| &record.id == id));
        debug!("Worklist received {} records", records.len());
        self.records = records;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_pagination(&mut self, pagination: Pagination) {
        self.pagination = pagination;
    }

    pub fn records(&self) -> &[StudyRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn modals(&self) -> &ModalState {
        &self.modals
    }

    pub fn is_modal_open(&self, kind: ModalKind) -> bool {
        self.modals.is_open(kind)
    }

    fn footer(&self) -> FooterView {
        let p = &self.pagination;
        FooterView {
            current_page: p.current_page,
            total_pages: p.total_pages,
            total_records: p.total_records,
            records_per_page: p.records_per_page,
            displayed_records: self.records.len(),
            has_next_page: p.has_next_page,
            has_prev_page: p.has_prev_page,
            page_size_options: self.config.pagination.page_size_options.clone(),
        }
    }

    fn mounted_modals(&self) -> Vec<MountedModal> {
        self.modals
            .visible()
            .map(|(kind, selection)| {
                let form = match (kind, &self.patient_edit) {
                    (ModalKind::PatientEdit, Some(form)) => Some(PatientEditView {
                        title: form
                            .record()
                            .patient_name
                            .clone()
                            .filter(|n| !n.is_empty())
                            .unwrap_or_else(|| "Edit Study".to_string()),
                        draft: form.draft().clone(),
                        submitting: form.is_submitting(),
                        submit_label: if form.is_submitting() { "Saving..." } else { "Save" },
                        last_error: form.last_error().map(str::to_string),
                    }),
                    _ => None,
                };
                MountedModal {
                    kind,
                    selection: selection.clone(),
                    form,
                }
            })
            .collect()
    }

    /// 渲染当前视图
    pub fn view(&self) -> TableView {
        if self.loading {
            return TableView::Loading {
                message: LOADING_MESSAGE.to_string(),
            };
        }
        if self.records.is_empty() {
            return TableView::Empty {
                title: EMPTY_TITLE.to_string(),
                hint: EMPTY_HINT.to_string(),
            };
        }

        let closed = DownloadPopover::default();
        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let popover = self.popovers.get(&record.id).unwrap_or(&closed);
                StudyRow::new(record, index, &self.config).render(popover)
            })
            .collect();

        TableView::Populated(PopulatedTable {
            columns: COLUMNS.to_vec(),
            rows,
            footer: self.footer(),
            modals: self.mounted_modals(),
        })
    }

    /// 处理某一行上的操作
    pub async fn dispatch(&mut self, record_id: &str, action: RowAction) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == record_id)
            .ok_or_else(|| PacsError::NotFound(format!("Study {} not in worklist", record_id)))?;

        let row = StudyRow::new(&self.records[index], index, &self.config);
        let popover = self.popovers.entry(record_id.to_string()).or_default();
        let mut handler = ControllerRowHandler {
            modals: &mut self.modals,
            patient_edit: &mut self.patient_edit,
            callbacks: &self.callbacks,
        };
        row.perform(action, &mut handler, popover, &self.services).await;
        Ok(())
    }

    /// 弹窗自身的关闭回调
    pub fn close_modal(&mut self, kind: ModalKind) {
        self.modals.close(kind);
        if kind == ModalKind::PatientEdit {
            self.patient_edit = None;
        }
    }

    /// 关闭某行的下载浮层
    pub fn close_download_options(&mut self, record_id: &str) {
        if let Some(popover) = self.popovers.get_mut(record_id) {
            popover.close();
        }
    }

    /// 请求翻页
    pub fn change_page(&self, page: u32) {
        if !self.callbacks.page_changed(page) {
            debug!("Page change to {} ignored: no handler", page);
        }
    }

    /// 请求修改每页条数
    pub fn change_records_per_page(&self, size: u32) {
        if !self.config.pagination.page_size_options.contains(&size) {
            debug!("Page size {} is not one of the configured options", size);
        }
        if !self.callbacks.records_per_page_changed(size) {
            debug!("Page size change to {} ignored: no handler", size);
        }
    }

    pub fn patient_edit(&self) -> Option<&PatientEditForm> {
        self.patient_edit.as_ref()
    }

    /// 编辑中的草稿
    pub fn patient_edit_draft_mut(&mut self) -> Option<&mut PatientEditDraft> {
        self.patient_edit.as_mut().map(PatientEditForm::draft_mut)
    }

    /// 锁定表单并取出待提交项
    pub fn begin_patient_edit_submit(&mut self) -> std::result::Result<PendingSubmission, SubmitOutcome> {
        if self.callbacks.on_record_update.is_none() {
            warn!("Patient edit submitted but no update handler is configured");
            return Err(SubmitOutcome::NoUpdateHandler);
        }
        match self.patient_edit.as_mut() {
            Some(form) => form.begin_submit(),
            None => Err(SubmitOutcome::NotOpen),
        }
    }

    /// 应用更新结果；表单已关闭或换了会话时丢弃
    pub fn finish_patient_edit_submit(&mut self, result: SubmissionResult) -> SubmitOutcome {
        let outcome = match self.patient_edit.as_mut() {
            Some(form) if form.owns(&result) => form.finish(result),
            _ => {
                debug!("Discarding update result for a closed or replaced edit form");
                return SubmitOutcome::Stale;
            }
        };

        if outcome == SubmitOutcome::Saved {
            info!("Patient details saved, closing edit form");
            self.close_modal(ModalKind::PatientEdit);
        }
        outcome
    }

    /// 完整的提交流程
    pub async fn submit_patient_edit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_patient_edit_submit() {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let Some(service) = self.callbacks.on_record_update.clone() else {
            return SubmitOutcome::NoUpdateHandler;
        };
        let result = pending.run(service.as_ref()).await;
        self.finish_patient_edit_submit(result)
    }
}
