//! 核心数据模型定义
//!
//! 检查记录由外部数据源提供，本层只读。字段形状在进入本层时统一规整，
//! 例如临床病史既可能是字符串也可能是包装对象。

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// 工作列表中的一条检查记录
///
/// 派生的 serde 实现只生成同名的关联函数，外层的 trait 实现先取出
/// `_id`/`id` 与 `bharatPacsId` 这类同义字段再交给它。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase", default)]
pub struct StudyRecord {
    /// 记录ID，`_id` 优先，其次 `id`
    #[serde(rename = "_id", skip_deserializing)]
    pub id: String,
    /// 机构分配的PACS编号，可能为 "N/A"
    #[serde(deserialize_with = "lenient_string")]
    pub pacs_id: Option<String>,

    // 患者信息
    #[serde(deserialize_with = "lenient_string")]
    pub patient_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub patient_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub patient_age: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub patient_sex: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub patient_gender: Option<String>,
    /// 上游预先拼好的 "年龄/性别"，可能为 "N/A"
    #[serde(deserialize_with = "lenient_string")]
    pub age_gender: Option<String>,

    // 机构信息
    #[serde(deserialize_with = "lenient_string")]
    pub organization_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub center_name: Option<String>,

    // 临床信息
    #[serde(deserialize_with = "lenient_string")]
    pub modality: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub study_description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub study_name: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub series_count: Option<u32>,
    #[serde(deserialize_with = "lenient_count")]
    pub instance_count: Option<u32>,
    #[serde(deserialize_with = "lenient_string")]
    pub accession_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub referral_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub referring_physician_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub referring_physician: Option<String>,
    #[serde(deserialize_with = "lenient_history")]
    pub clinical_history: Option<ClinicalHistory>,
    #[serde(rename = "studyInstanceUID", deserialize_with = "lenient_string")]
    pub study_instance_uid: Option<String>,

    // 时间信息
    #[serde(deserialize_with = "lenient_string")]
    pub study_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub study_time: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: Option<String>,

    // 工作流信息
    #[serde(deserialize_with = "lenient_string")]
    pub workflow_status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub priority: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub case_status_category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub verification_notes: Option<String>,
    #[serde(deserialize_with = "lenient_report_info")]
    pub report_info: Option<ReportInfo>,

    // 讨论与附件
    #[serde(deserialize_with = "lenient_bool")]
    pub has_study_notes: Option<bool>,
    #[serde(deserialize_with = "lenient_list")]
    pub discussions: Vec<Value>,
    #[serde(deserialize_with = "lenient_list")]
    pub attachments: Vec<Value>,
}

impl Serialize for StudyRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        StudyRecord::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for StudyRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let mongo_id = fields.remove("_id").and_then(id_text);
        let plain_id = fields.remove("id").and_then(id_text);
        let bharat_pacs_id = fields.remove("bharatPacsId").and_then(id_text);

        let mut record = StudyRecord::deserialize(Value::Object(fields)).map_err(de::Error::custom)?;
        record.id = mongo_id.or(plain_id).unwrap_or_default();
        if record.pacs_id.is_none() {
            record.pacs_id = bharat_pacs_id;
        }
        Ok(record)
    }
}

/// 字符串、数字或 `{"$oid": ...}` 形式的ID，空串视为缺失
fn id_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Object(mut map) => match map.remove("$oid") {
            Some(Value::String(s)) => s,
            _ => return None,
        },
        _ => return None,
    };
    Some(text).filter(|t| !t.trim().is_empty())
}

impl StudyRecord {
    /// 解析后的工作流状态，未知值返回 None
    pub fn status(&self) -> Option<WorkflowStatus> {
        self.workflow_status.as_deref().and_then(WorkflowStatus::parse)
    }

    /// 解析后的优先级，未知值返回 None
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::parse)
    }

    pub fn clinical_history_text(&self) -> Option<&str> {
        self.clinical_history.as_ref().and_then(ClinicalHistory::text)
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.report_info
            .as_ref()
            .and_then(|info| info.verification_info.as_ref())
            .and_then(|info| info.rejection_reason.as_deref())
    }
}

/// 临床病史：上游可能直接给字符串，也可能给 `{ "clinicalHistory": "..." }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClinicalHistory {
    Plain(String),
    Wrapped {
        #[serde(rename = "clinicalHistory", default)]
        clinical_history: Option<String>,
    },
}

impl ClinicalHistory {
    /// 统一读取病史文本，空串视为缺失
    pub fn text(&self) -> Option<&str> {
        let text = match self {
            Self::Plain(text) => Some(text.as_str()),
            Self::Wrapped { clinical_history } => clinical_history.as_deref(),
        };
        text.filter(|t| !t.trim().is_empty())
    }
}

/// 报告信息（仅取审核部分）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportInfo {
    pub verification_info: Option<VerificationInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub rejection_reason: Option<String>,
}

/// 检查在报告生命周期中的工作流状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    NewStudyReceived,
    PendingAssignment,
    AssignedToDoctor,
    DoctorOpenedReport,
    ReportInProgress,
    ReportDrafted,
    ReportFinalized,
    FinalReportDownloaded,
    VerificationInProgress,
    ReportVerified,
    ReportRejected,
    Archived,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 12] = [
        Self::NewStudyReceived,
        Self::PendingAssignment,
        Self::AssignedToDoctor,
        Self::DoctorOpenedReport,
        Self::ReportInProgress,
        Self::ReportDrafted,
        Self::ReportFinalized,
        Self::FinalReportDownloaded,
        Self::VerificationInProgress,
        Self::ReportVerified,
        Self::ReportRejected,
        Self::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewStudyReceived => "new_study_received",
            Self::PendingAssignment => "pending_assignment",
            Self::AssignedToDoctor => "assigned_to_doctor",
            Self::DoctorOpenedReport => "doctor_opened_report",
            Self::ReportInProgress => "report_in_progress",
            Self::ReportDrafted => "report_drafted",
            Self::ReportFinalized => "report_finalized",
            Self::FinalReportDownloaded => "final_report_downloaded",
            Self::VerificationInProgress => "verification_in_progress",
            Self::ReportVerified => "report_verified",
            Self::ReportRejected => "report_rejected",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// 是否为终态"已驳回"
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::ReportRejected)
    }
}

/// 检查优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Routine,
    Urgent,
    Emergency,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ROUTINE" | "NORMAL" => Some(Self::Routine),
            "URGENT" => Some(Self::Urgent),
            "EMERGENCY" => Some(Self::Emergency),
            _ => None,
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::Urgent | Self::Emergency)
    }
}

/// 分页描述，由外部数据源维护
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u64,
    pub records_per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_records: 0,
            records_per_page: 50,
            has_next_page: false,
            has_prev_page: false,
        }
    }
}

/// 接受字符串、数字或布尔值，其它形状一律视为缺失
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// 接受非负整数或数字字符串
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_history<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<ClinicalHistory>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(history) => Some(history),
        Err(e) => {
            tracing::debug!("Ignoring clinical history of unexpected shape: {}", e);
            None
        }
    }))
}

fn lenient_report_info<'de, D>(deserializer: D) -> std::result::Result<Option<ReportInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::debug!("Ignoring report info of unexpected shape: {}", e);
            None
        }
    }))
}

/// 接受布尔值、"true"/"false" 字符串或 0/1
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    })
}
