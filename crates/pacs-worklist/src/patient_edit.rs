//! 患者信息编辑流程
//!
//! 提交分三步：`begin_submit` 锁定表单并产出待提交项，待提交项调用更新服务，
//! 结果带着会话标识回到控制器。表单已关闭或已换成另一会话时，迟到的结果被丢弃。

use pacs_core::{utils, StudyRecord};
use serde::Serialize;
use uuid::Uuid;

use crate::services::UpdateService;

/// 表单草稿
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientEditDraft {
    pub patient_name: String,
    pub patient_age: String,
    /// `M` / `F` / `O`，未选择时为空
    pub patient_gender: String,
    pub study_name: String,
    pub referring_physician: String,
    pub accession_number: String,
    pub clinical_history: String,
}

impl PatientEditDraft {
    /// 用记录现有值预填
    pub fn from_record(record: &StudyRecord) -> Self {
        let text = |v: Option<&str>| utils::non_empty(v).unwrap_or_default().to_string();
        let gender = record
            .patient_gender
            .as_deref()
            .or(record.patient_sex.as_deref());

        Self {
            patient_name: text(record.patient_name.as_deref()),
            patient_age: text(record.patient_age.as_deref()),
            patient_gender: normalize_gender(gender),
            study_name: text(
                utils::non_empty(record.study_description.as_deref())
                    .or(record.study_name.as_deref()),
            ),
            referring_physician: text(
                utils::non_empty(record.referring_physician_name.as_deref())
                    .or(record.referring_physician.as_deref()),
            ),
            accession_number: text(record.accession_number.as_deref()),
            clinical_history: record.clinical_history_text().unwrap_or_default().to_string(),
        }
    }

    /// 缺失的必填字段
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("patientName", &self.patient_name),
            ("patientAge", &self.patient_age),
            ("patientGender", &self.patient_gender),
            ("studyName", &self.study_name),
            ("referringPhysician", &self.referring_physician),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn normalize_gender(raw: Option<&str>) -> String {
    match raw.and_then(|g| g.trim().chars().next()) {
        Some(c) if matches!(c.to_ascii_uppercase(), 'M' | 'F' | 'O') => {
            c.to_ascii_uppercase().to_string()
        }
        _ => String::new(),
    }
}

/// 提交给更新服务的载荷：草稿加上检查ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyUpdate {
    #[serde(flatten)]
    pub fields: PatientEditDraft,
    pub study_id: String,
}

/// 提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 保存成功，弹窗已关闭
    Saved,
    /// 更新服务失败，弹窗保持打开
    Failed(String),
    /// 必填字段缺失，未调用更新服务
    Invalid(Vec<&'static str>),
    /// 已有提交在进行
    AlreadyPending,
    /// 未提供更新服务
    NoUpdateHandler,
    /// 编辑弹窗未打开
    NotOpen,
    /// 结果属于已关闭或已替换的表单，被丢弃
    Stale,
}

/// 已锁定、等待调用更新服务的提交
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    session: Uuid,
    update: StudyUpdate,
}

impl PendingSubmission {
    pub fn update(&self) -> &StudyUpdate {
        &self.update
    }

    /// 调用更新服务，不设超时
    pub async fn run(self, service: &dyn UpdateService) -> SubmissionResult {
        tracing::info!("Submitting patient edit for study {}", self.update.study_id);
        let outcome = service
            .update_study(self.update)
            .await
            .map_err(|e| e.to_string());
        SubmissionResult {
            session: self.session,
            outcome,
        }
    }
}

/// 更新服务返回后的结果，需交回控制器应用
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    session: Uuid,
    outcome: Result<(), String>,
}

/// 编辑表单
#[derive(Debug, Clone)]
pub struct PatientEditForm {
    session: Uuid,
    record: StudyRecord,
    draft: PatientEditDraft,
    submitting: bool,
    last_error: Option<String>,
}

impl PatientEditForm {
    pub fn open(record: &StudyRecord) -> Self {
        Self {
            session: Uuid::new_v4(),
            record: record.clone(),
            draft: PatientEditDraft::from_record(record),
            submitting: false,
            last_error: None,
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn record(&self) -> &StudyRecord {
        &self.record
    }

    pub fn draft(&self) -> &PatientEditDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PatientEditDraft {
        &mut self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 校验并锁定表单
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::AlreadyPending);
        }
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            tracing::warn!("Patient edit for study {} missing fields: {:?}", self.record.id, missing);
            return Err(SubmitOutcome::Invalid(missing));
        }

        self.submitting = true;
        self.last_error = None;
        Ok(PendingSubmission {
            session: self.session,
            update: StudyUpdate {
                fields: self.draft.clone(),
                study_id: self.record.id.clone(),
            },
        })
    }

    /// 是否为本表单会话的结果
    pub fn owns(&self, result: &SubmissionResult) -> bool {
        self.session == result.session
    }

    /// 应用结果：解锁表单，失败时记录错误，草稿保留
    pub(crate) fn finish(&mut self, result: SubmissionResult) -> SubmitOutcome {
        self.submitting = false;
        match result.outcome {
            Ok(()) => SubmitOutcome::Saved,
            Err(message) => {
                tracing::error!("Error saving patient details for study {}: {}", self.record.id, message);
                self.last_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}
