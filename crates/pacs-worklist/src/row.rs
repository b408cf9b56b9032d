//! 检查行展示
//!
//! 把一条检查记录映射为一行显示数据，并处理行内操作。
//! 派生值都是记录的纯函数；副作用只有剪贴板、导航与行内浮层开关。

use pacs_core::{utils, StudyRecord};
use serde::Serialize;

use crate::config::WorklistConfig;
use crate::popover::{DownloadPopover, PopoverAnchor, ScrollOffset, TriggerBounds};
use crate::services::{NavigationState, RowServices, Toast};
use crate::status::{self, StatusStyle};

/// 表头，顺序与 [`RowView`] 的单元格一致
pub const COLUMNS: [&str; 19] = [
    "BP ID",
    "CENTER NAME",
    "SUB CENTER",
    "TIMELINE",
    "PT NAME / UHID",
    "AGE/SEX",
    "MOD",
    "VIEW IMAGES",
    "DOWNLOAD / REPORTING",
    "STUDY / SERIES / IMAGES",
    "PT ID / ACC. NO.",
    "REFERRAL DOCTOR",
    "CLINICAL HISTORY",
    "STUDY DATE/TIME",
    "UPLOAD DATE/TIME",
    "STATUS",
    "REJECTION REASON",
    "VIEW",
    "REPORT",
];

/// 行内用户操作
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowAction {
    CopyId,
    ShowTimeline,
    OpenPatient,
    ViewReport,
    ShowNotes,
    ViewStudy,
    EditPatient,
    ViewImages,
    OpenReporting,
    ToggleDownload {
        bounds: TriggerBounds,
        scroll: ScrollOffset,
    },
}

/// 接收需要控制器处理的行操作
///
/// 所有方法默认什么都不做，实现方只覆盖自己支持的操作。
pub trait RowHandler {
    fn show_timeline(&mut self, _record: &StudyRecord) {}
    fn open_patient(&mut self, _patient_id: &str, _record: &StudyRecord) {}
    fn view_report(&mut self, _record: &StudyRecord) {}
    fn show_notes(&mut self, _record_id: &str) {}
    fn view_study(&mut self, _record: &StudyRecord) {}
    fn edit_patient(&mut self, _record: &StudyRecord) {}
}

/// 不处理任何操作
#[derive(Debug, Default)]
pub struct NoopRowHandler;

impl RowHandler for NoopRowHandler {}

/// 斑马纹
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stripe {
    Even,
    Odd,
}

/// 左侧强调边框
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAccent {
    Urgent,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowStyle {
    pub stripe: Stripe,
    pub accent: Option<RowAccent>,
}

/// 附件或讨论指示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub active: bool,
    pub title: String,
}

/// 驳回原因列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RejectionCell {
    NotRejected { placeholder: String },
    Rejected {
        notes: Option<String>,
        reason: Option<String>,
    },
}

impl RejectionCell {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn text(&self) -> String {
        match self {
            Self::NotRejected { placeholder } => placeholder.clone(),
            Self::Rejected { notes, reason } => {
                match notes.as_deref().or(reason.as_deref()) {
                    Some(text) => format!("✕ {}", text),
                    None => "✕".to_string(),
                }
            }
        }
    }
}

/// 一行的显示数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub key: String,
    pub index: usize,
    pub style: RowStyle,
    pub display_id: String,
    pub organization: String,
    pub sub_center: String,
    pub patient_name: String,
    pub patient_uhid: String,
    pub urgent: bool,
    pub age_gender: String,
    pub modality: String,
    pub modality_badge: StatusStyle,
    pub study_description: String,
    pub series_summary: String,
    pub patient_id_line: String,
    pub accession_line: String,
    pub referral: String,
    pub clinical_history: String,
    pub attachments: Indicator,
    pub notes: Indicator,
    pub study_date: String,
    pub study_time: String,
    pub upload_date: String,
    pub upload_time: String,
    pub status_label: String,
    pub status_style: StatusStyle,
    pub rejection: RejectionCell,
    pub download: Option<PopoverAnchor>,
}

impl RowView {
    /// 按 [`COLUMNS`] 顺序输出纯文本单元格
    pub fn cells(&self) -> Vec<String> {
        let marker = if self.urgent { " ●" } else { "" };
        vec![
            self.display_id.clone(),
            self.organization.clone(),
            self.sub_center.clone(),
            "⏱".to_string(),
            format!("{}{} ({})", self.patient_name, marker, self.patient_uhid),
            self.age_gender.clone(),
            self.modality.clone(),
            "👁".to_string(),
            if self.download.is_some() { "⬇*" } else { "⬇" }.to_string(),
            format!("{} {}", self.study_description, self.series_summary),
            format!("{} {}", self.patient_id_line, self.accession_line),
            self.referral.clone(),
            self.clinical_history.clone(),
            format!("{} {}", self.study_date, self.study_time),
            format!("{} {}", self.upload_date, self.upload_time),
            self.status_label.clone(),
            self.rejection.text(),
            "View".to_string(),
            "📄".to_string(),
        ]
    }
}

/// 单条记录的行展示器
#[derive(Debug, Clone, Copy)]
pub struct StudyRow<'a> {
    record: &'a StudyRecord,
    index: usize,
    config: &'a WorklistConfig,
}

impl<'a> StudyRow<'a> {
    pub fn new(record: &'a StudyRecord, index: usize, config: &'a WorklistConfig) -> Self {
        Self { record, index, config }
    }

    pub fn record(&self) -> &'a StudyRecord {
        self.record
    }

    fn placeholder(&self) -> &str {
        &self.config.display.placeholder
    }

    fn or_placeholder(&self, value: Option<&str>) -> String {
        utils::non_empty(value).unwrap_or(self.placeholder()).to_string()
    }

    /// 优先级为 URGENT 或 EMERGENCY
    pub fn is_urgent(&self) -> bool {
        self.record.priority().is_some_and(|p| p.is_urgent())
    }

    /// 状态为已驳回
    pub fn is_rejected(&self) -> bool {
        self.record.status().is_some_and(|s| s.is_rejected())
    }

    /// 显示用ID：PACS编号，否则记录ID的前缀
    pub fn display_id(&self) -> String {
        match utils::present(self.record.pacs_id.as_deref()) {
            Some(id) => id.to_string(),
            None => self
                .record
                .id
                .chars()
                .take(self.config.display.id_preview_len)
                .collect(),
        }
    }

    /// 复制目标：PACS编号，否则完整记录ID
    pub fn copy_target(&self) -> &'a str {
        utils::present(self.record.pacs_id.as_deref()).unwrap_or(&self.record.id)
    }

    /// 年龄/性别
    pub fn age_gender(&self) -> String {
        if let Some(composite) = utils::present(self.record.age_gender.as_deref()) {
            return composite.to_string();
        }
        let age = utils::non_empty(self.record.patient_age.as_deref());
        let gender = utils::non_empty(self.record.patient_sex.as_deref())
            .or(utils::non_empty(self.record.patient_gender.as_deref()))
            .and_then(|g| g.trim().chars().next());
        match (age, gender) {
            (Some(age), Some(g)) => format!("{}/{}", age, g),
            _ => self.placeholder().to_string(),
        }
    }

    pub fn style(&self) -> RowStyle {
        let stripe = if self.index % 2 == 0 { Stripe::Even } else { Stripe::Odd };
        let accent = if self.is_rejected() {
            Some(RowAccent::Rejected)
        } else if self.is_urgent() {
            Some(RowAccent::Urgent)
        } else {
            None
        };
        RowStyle { stripe, accent }
    }

    fn rejection(&self) -> RejectionCell {
        if self.is_rejected() {
            RejectionCell::Rejected {
                notes: utils::non_empty(self.record.verification_notes.as_deref()).map(str::to_string),
                reason: utils::non_empty(self.record.rejection_reason()).map(str::to_string),
            }
        } else {
            RejectionCell::NotRejected {
                placeholder: self.placeholder().to_string(),
            }
        }
    }

    fn notes_indicator(&self) -> Indicator {
        let count = self.record.discussions.len();
        let flagged = self.record.has_study_notes == Some(true);
        if count > 0 || flagged {
            Indicator {
                active: true,
                title: format!("{} note(s)", count.max(1)),
            }
        } else {
            Indicator {
                active: false,
                title: "No notes".to_string(),
            }
        }
    }

    fn attachments_indicator(&self) -> Indicator {
        let count = self.record.attachments.len();
        Indicator {
            active: count > 0,
            title: if count > 0 {
                format!("{} attachment(s)", count)
            } else {
                "No attachments".to_string()
            },
        }
    }

    fn format_date(&self, value: Option<&str>) -> String {
        utils::try_format_date(value, &self.config.offset())
            .unwrap_or_else(|| self.placeholder().to_string())
    }

    fn format_time(&self, value: Option<&str>) -> String {
        utils::try_format_time(value, &self.config.offset())
            .unwrap_or_else(|| self.placeholder().to_string())
    }

    /// 生成显示数据
    pub fn render(&self, popover: &DownloadPopover) -> RowView {
        let record = self.record;
        let urgent = self.is_urgent();
        let status_raw = record.workflow_status.as_deref();
        let status_label = utils::non_empty(record.case_status_category.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| status::status_label(status_raw));

        RowView {
            key: record.id.clone(),
            index: self.index,
            style: self.style(),
            display_id: self.display_id(),
            organization: self.or_placeholder(record.organization_name.as_deref()),
            sub_center: self.or_placeholder(record.center_name.as_deref()),
            patient_name: self.or_placeholder(record.patient_name.as_deref()),
            patient_uhid: format!("UHID: {}", self.or_placeholder(record.patient_id.as_deref())),
            urgent,
            age_gender: self.age_gender(),
            modality: self.or_placeholder(record.modality.as_deref()),
            modality_badge: if urgent { status::URGENT_BADGE } else { status::DEFAULT_BADGE },
            study_description: utils::non_empty(record.study_description.as_deref())
                .unwrap_or("N/A")
                .to_string(),
            series_summary: format!(
                "S: {} / {}",
                record.series_count.unwrap_or(0),
                record.instance_count.unwrap_or(0)
            ),
            patient_id_line: format!("ID: {}", self.or_placeholder(record.patient_id.as_deref())),
            accession_line: format!("Acc: {}", self.or_placeholder(record.accession_number.as_deref())),
            referral: utils::present(record.referral_number.as_deref())
                .unwrap_or(self.placeholder())
                .to_string(),
            clinical_history: self.or_placeholder(record.clinical_history_text()),
            attachments: self.attachments_indicator(),
            notes: self.notes_indicator(),
            study_date: self.format_date(record.study_date.as_deref()),
            study_time: self.or_placeholder(record.study_time.as_deref()),
            upload_date: self.format_date(record.created_at.as_deref()),
            upload_time: self.format_time(record.created_at.as_deref()),
            status_label,
            status_style: status::status_style(status_raw),
            rejection: self.rejection(),
            download: popover.anchor(),
        }
    }

    /// 复制ID到剪贴板并提示结果，失败不会向上抛出
    pub async fn copy_identifier(&self, services: &RowServices) -> bool {
        let target = self.copy_target();
        match services.clipboard.write_text(target).await {
            Ok(()) => {
                services
                    .notifier
                    .notify(Toast::success("BP ID copied to clipboard!", &self.config.toast));
                true
            }
            Err(e) => {
                tracing::warn!("Clipboard write failed for study {}: {}", self.record.id, e);
                services
                    .notifier
                    .notify(Toast::error("Failed to copy to clipboard", &self.config.toast));
                false
            }
        }
    }

    /// 只读影像查看路由
    pub fn viewer_path(&self) -> String {
        format!("{}/{}", self.config.routes.viewer.trim_end_matches('/'), self.record.id)
    }

    /// 报告+影像联合工作区路由
    pub fn reporting_path(&self) -> String {
        let routes = &self.config.routes;
        let base = format!("{}/{}", routes.reporting.trim_end_matches('/'), self.record.id);
        if routes.reporting_query.is_empty() {
            base
        } else {
            format!("{}?{}", base, routes.reporting_query)
        }
    }

    /// 打开只读查看器（不加锁）
    pub fn open_viewer(&self, services: &RowServices) {
        let state = NavigationState {
            study: self.record.clone(),
            study_instance_uid: None,
        };
        self.navigate(services, self.viewer_path(), state);
    }

    /// 打开报告工作区，影像UID缺失时退回记录ID
    pub fn open_reporting(&self, services: &RowServices) {
        let study_instance_uid = utils::non_empty(self.record.study_instance_uid.as_deref())
            .unwrap_or(&self.record.id)
            .to_string();
        let state = NavigationState {
            study: self.record.clone(),
            study_instance_uid: Some(study_instance_uid),
        };
        self.navigate(services, self.reporting_path(), state);
    }

    fn navigate(&self, services: &RowServices, path: String, state: NavigationState) {
        tracing::debug!("Navigating to {} for study {}", path, self.record.id);
        if let Err(e) = services.navigator.navigate(&path, state) {
            tracing::error!("Navigation to {} failed: {}", path, e);
        }
    }

    /// 执行一个行内操作
    pub async fn perform(
        &self,
        action: RowAction,
        handler: &mut dyn RowHandler,
        popover: &mut DownloadPopover,
        services: &RowServices,
    ) {
        let record = self.record;
        match action {
            RowAction::CopyId => {
                self.copy_identifier(services).await;
            }
            RowAction::ShowTimeline => handler.show_timeline(record),
            RowAction::OpenPatient => match utils::non_empty(record.patient_id.as_deref()) {
                Some(patient_id) => handler.open_patient(patient_id, record),
                None => tracing::debug!("Study {} has no patient id to open", record.id),
            },
            RowAction::ViewReport => handler.view_report(record),
            RowAction::ShowNotes => handler.show_notes(&record.id),
            RowAction::ViewStudy => handler.view_study(record),
            RowAction::EditPatient => handler.edit_patient(record),
            RowAction::ViewImages => self.open_viewer(services),
            RowAction::OpenReporting => self.open_reporting(services),
            RowAction::ToggleDownload { bounds, scroll } => {
                let open = popover.toggle(bounds, scroll);
                tracing::debug!("Download options for study {} open={}", record.id, open);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Fakes;
    use crate::services::ToastKind;
    use pacs_core::ClinicalHistory;
    use serde_json::json;

    fn config() -> WorklistConfig {
        WorklistConfig::default()
    }

    fn record(value: serde_json::Value) -> StudyRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_rejected_urgent_row() {
        let cfg = config();
        let rec = record(json!({
            "_id": "abc",
            "workflowStatus": "report_rejected",
            "priority": "URGENT",
            "patientName": "J Doe"
        }));
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());

        assert!(view.urgent);
        assert_eq!(view.style.accent, Some(RowAccent::Rejected));
        assert!(view.rejection.is_rejected());
        assert_ne!(view.rejection.text(), "-");
        assert_eq!(view.status_label, "Rejected");
        assert_eq!(view.modality_badge, status::URGENT_BADGE);
    }

    #[test]
    fn test_urgent_accent_without_rejection() {
        let cfg = config();
        let rec = record(json!({"_id": "e", "priority": "EMERGENCY"}));
        let row = StudyRow::new(&rec, 1, &cfg);
        assert_eq!(
            row.style(),
            RowStyle { stripe: Stripe::Odd, accent: Some(RowAccent::Urgent) }
        );
        assert_eq!(row.render(&DownloadPopover::default()).rejection.text(), "-");
    }

    #[test]
    fn test_rejection_prefers_notes_then_reason() {
        let cfg = config();
        let rec = record(json!({
            "_id": "r",
            "workflowStatus": "report_rejected",
            "reportInfo": {"verificationInfo": {"rejectionReason": "Wrong laterality"}}
        }));
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());
        assert_eq!(view.rejection.text(), "✕ Wrong laterality");

        let rec = record(json!({
            "_id": "r2",
            "workflowStatus": "report_rejected",
            "verificationNotes": "Please redo impression"
        }));
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());
        assert_eq!(view.rejection.text(), "✕ Please redo impression");
    }

    #[test]
    fn test_wrapped_clinical_history_is_unwrapped() {
        let cfg = config();
        let rec = record(json!({"_id": "h", "clinicalHistory": {"clinicalHistory": "Hx of asthma"}}));
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());
        assert_eq!(view.clinical_history, "Hx of asthma");

        let rec = StudyRecord {
            id: "p".to_string(),
            clinical_history: Some(ClinicalHistory::Plain("Fever".to_string())),
            ..Default::default()
        };
        assert_eq!(
            StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default()).clinical_history,
            "Fever"
        );
    }

    #[test]
    fn test_missing_fields_degrade_to_placeholders() {
        let cfg = config();
        let rec = StudyRecord {
            id: "0123456789abcdef".to_string(),
            created_at: Some("not a date".to_string()),
            ..Default::default()
        };
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());

        assert_eq!(view.display_id, "0123456789");
        assert_eq!(view.organization, "-");
        assert_eq!(view.age_gender, "-");
        assert_eq!(view.clinical_history, "-");
        assert_eq!(view.study_date, "-");
        assert_eq!(view.upload_date, "-");
        assert_eq!(view.upload_time, "-");
        assert_eq!(view.status_label, "Unknown");
        assert_eq!(view.status_style, status::NEUTRAL_STYLE);
        assert_eq!(view.study_description, "N/A");
        assert_eq!(view.series_summary, "S: 0 / 0");
        assert_eq!(view.referral, "-");
        assert_eq!(view.style.accent, None);
        assert_eq!(view.cells().len(), COLUMNS.len());
    }

    #[test]
    fn test_age_gender_composite() {
        let cfg = config();
        let composite = record(json!({"_id": "a", "ageGender": "45Y/M"}));
        assert_eq!(StudyRow::new(&composite, 0, &cfg).age_gender(), "45Y/M");

        let synthesized = record(json!({
            "_id": "b", "ageGender": "N/A", "patientAge": "30", "patientSex": "Female"
        }));
        assert_eq!(StudyRow::new(&synthesized, 0, &cfg).age_gender(), "30/F");

        let partial = record(json!({"_id": "c", "patientAge": "30"}));
        assert_eq!(StudyRow::new(&partial, 0, &cfg).age_gender(), "-");
    }

    #[test]
    fn test_status_category_overrides_label_not_style() {
        let cfg = config();
        let rec = record(json!({
            "_id": "s",
            "workflowStatus": "report_drafted",
            "caseStatusCategory": "Draft Ready"
        }));
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());
        assert_eq!(view.status_label, "Draft Ready");
        assert_eq!(view.status_style, status::status_style(Some("report_drafted")));
    }

    #[test]
    fn test_dates_and_indicators() {
        let cfg = config();
        let rec = record(json!({
            "_id": "d",
            "studyDate": "20240307",
            "studyTime": "14:30:00",
            "createdAt": "2024-03-08T09:05:01Z",
            "hasStudyNotes": true,
            "attachments": [{"name": "req.pdf"}, {"name": "old.pdf"}],
            "referralNumber": "REF-9"
        }));
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());

        assert_eq!(view.study_date, "07/03/2024");
        assert_eq!(view.study_time, "14:30:00");
        assert_eq!(view.upload_date, "08/03/2024");
        assert_eq!(view.upload_time, "09:05:01");
        assert_eq!(view.notes, Indicator { active: true, title: "1 note(s)".to_string() });
        assert_eq!(view.attachments.title, "2 attachment(s)");
        assert_eq!(view.referral, "REF-9");
    }

    #[tokio::test]
    async fn test_copy_success_and_failure_notify() {
        let cfg = config();
        let rec = record(json!({"_id": "full-record-id", "bharatPacsId": "BP-42"}));
        let row = StudyRow::new(&rec, 0, &cfg);

        let ok = Fakes::new(false);
        assert!(row.copy_identifier(&ok.services()).await);
        assert_eq!(ok.clipboard.written.lock().unwrap().as_slice(), ["BP-42"]);
        let toasts = ok.notifier.toasts.lock().unwrap();
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert_eq!(toasts[0].duration_ms, 2000);

        let denied = Fakes::new(true);
        assert!(!row.copy_identifier(&denied.services()).await);
        let toasts = denied.notifier.toasts.lock().unwrap();
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "Failed to copy to clipboard");
    }

    #[tokio::test]
    async fn test_copy_falls_back_to_record_id() {
        let cfg = config();
        let rec = record(json!({"_id": "full-record-id", "bharatPacsId": "N/A"}));
        let fakes = Fakes::new(false);
        StudyRow::new(&rec, 0, &cfg).copy_identifier(&fakes.services()).await;
        assert_eq!(fakes.clipboard.written.lock().unwrap().as_slice(), ["full-record-id"]);
    }

    #[tokio::test]
    async fn test_navigation_routes() {
        let cfg = config();
        let rec = record(json!({"_id": "s1"}));
        let fakes = Fakes::new(false);
        let services = fakes.services();
        let row = StudyRow::new(&rec, 0, &cfg);
        let mut popover = DownloadPopover::default();

        row.perform(RowAction::ViewImages, &mut NoopRowHandler, &mut popover, &services).await;
        row.perform(RowAction::OpenReporting, &mut NoopRowHandler, &mut popover, &services).await;

        let visits = fakes.navigator.visits.lock().unwrap();
        assert_eq!(visits[0].0, "/doctor/viewer/s1");
        assert_eq!(visits[0].1.study_instance_uid, None);
        assert_eq!(visits[1].0, "/online-reporting/s1?openOHIF=true");
        assert_eq!(visits[1].1.study_instance_uid.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_noop_handler_and_download_toggle() {
        let cfg = config();
        let rec = record(json!({"_id": "s2"}));
        let fakes = Fakes::new(false);
        let services = fakes.services();
        let row = StudyRow::new(&rec, 0, &cfg);
        let mut popover = DownloadPopover::default();

        for action in [
            RowAction::ShowTimeline,
            RowAction::OpenPatient,
            RowAction::ViewReport,
            RowAction::ShowNotes,
            RowAction::ViewStudy,
            RowAction::EditPatient,
        ] {
            row.perform(action, &mut NoopRowHandler, &mut popover, &services).await;
        }
        assert!(fakes.navigator.visits.lock().unwrap().is_empty());
        assert!(fakes.notifier.toasts.lock().unwrap().is_empty());

        let toggle = RowAction::ToggleDownload {
            bounds: TriggerBounds { bottom: 10.0, left: 2.0, width: 20.0 },
            scroll: ScrollOffset::default(),
        };
        row.perform(toggle, &mut NoopRowHandler, &mut popover, &services).await;
        assert!(row.render(&popover).download.is_some());
        row.perform(toggle, &mut NoopRowHandler, &mut popover, &services).await;
        assert!(row.render(&popover).download.is_none());
    }

    #[derive(Default)]
    struct PatientClicks(Vec<String>);

    impl RowHandler for PatientClicks {
        fn open_patient(&mut self, patient_id: &str, _record: &StudyRecord) {
            self.0.push(patient_id.to_string());
        }
    }

    #[tokio::test]
    async fn test_open_patient_requires_patient_id() {
        let cfg = config();
        let fakes = Fakes::new(false);
        let services = fakes.services();
        let mut popover = DownloadPopover::default();
        let mut clicks = PatientClicks::default();

        for value in [
            json!({"_id": "a"}),
            json!({"_id": "b", "patientId": ""}),
            json!({"_id": "c", "patientId": "UHID-9"}),
        ] {
            let rec = record(value);
            StudyRow::new(&rec, 0, &cfg)
                .perform(RowAction::OpenPatient, &mut clicks, &mut popover, &services)
                .await;
        }
        assert_eq!(clicks.0, vec!["UHID-9".to_string()]);
    }

    #[test]
    fn test_render_with_unvalidated_offset() {
        let mut cfg = config();
        cfg.display.utc_offset_minutes = i32::MAX;
        let rec = record(json!({"_id": "z", "createdAt": "2024-03-05T10:20:30Z"}));
        let view = StudyRow::new(&rec, 0, &cfg).render(&DownloadPopover::default());
        assert_eq!(view.upload_date, "05/03/2024");
        assert_eq!(view.upload_time, "10:20:30");
    }
}
