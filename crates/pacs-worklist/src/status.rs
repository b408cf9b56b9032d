//! 工作流状态的显示映射
//!
//! 状态到配色、状态到标签都是全函数：未知或缺失的状态落到中性默认值。

use pacs_core::WorkflowStatus;
use serde::Serialize;

/// 状态徽章的配色三元组（背景、文字、边框）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

impl StatusStyle {
    const fn new(background: &'static str, text: &'static str, border: &'static str) -> Self {
        Self { background, text, border }
    }
}

/// 未识别状态的中性配色
pub const NEUTRAL_STYLE: StatusStyle = StatusStyle::new("gray-100", "gray-700", "gray-200");

/// 紧急检查的强调配色（模态徽章）
pub const URGENT_BADGE: StatusStyle = StatusStyle::new("rose-100", "rose-700", "rose-200");

/// 普通检查的模态徽章配色
pub const DEFAULT_BADGE: StatusStyle = StatusStyle::new("blue-100", "blue-700", "blue-200");

/// 未知状态且原始值缺失时的标签
pub const UNKNOWN_LABEL: &str = "Unknown";

fn style_of(status: WorkflowStatus) -> StatusStyle {
    use WorkflowStatus::*;
    match status {
        NewStudyReceived => StatusStyle::new("blue-100", "blue-700", "blue-200"),
        PendingAssignment => StatusStyle::new("yellow-100", "yellow-700", "yellow-200"),
        AssignedToDoctor => StatusStyle::new("purple-100", "purple-700", "purple-200"),
        DoctorOpenedReport => StatusStyle::new("indigo-100", "indigo-700", "indigo-200"),
        ReportInProgress => StatusStyle::new("cyan-100", "cyan-700", "cyan-200"),
        ReportDrafted => StatusStyle::new("teal-100", "teal-700", "teal-200"),
        ReportFinalized => StatusStyle::new("emerald-100", "emerald-700", "emerald-200"),
        FinalReportDownloaded => StatusStyle::new("green-100", "green-700", "green-200"),
        VerificationInProgress => StatusStyle::new("orange-100", "orange-700", "orange-200"),
        ReportVerified => StatusStyle::new("green-100", "green-700", "green-200"),
        ReportRejected => StatusStyle::new("rose-100", "rose-700", "rose-200"),
        Archived => StatusStyle::new("slate-100", "slate-700", "slate-200"),
    }
}

fn label_of(status: WorkflowStatus) -> &'static str {
    use WorkflowStatus::*;
    match status {
        NewStudyReceived => "New",
        PendingAssignment => "Pending",
        AssignedToDoctor => "Assigned",
        DoctorOpenedReport => "Opened",
        ReportInProgress => "In Progress",
        ReportDrafted => "Drafted",
        ReportFinalized => "Finalized",
        FinalReportDownloaded => "Downloaded",
        VerificationInProgress => "Verifying",
        ReportVerified => "Verified",
        ReportRejected => "Rejected",
        Archived => "Archived",
    }
}

/// 原始状态字符串到配色
pub fn status_style(raw: Option<&str>) -> StatusStyle {
    raw.and_then(WorkflowStatus::parse)
        .map(style_of)
        .unwrap_or(NEUTRAL_STYLE)
}

/// 原始状态字符串到短标签，未知状态原样返回
pub fn status_label(raw: Option<&str>) -> String {
    match raw {
        Some(value) => match WorkflowStatus::parse(value) {
            Some(status) => label_of(status).to_string(),
            None if value.is_empty() => UNKNOWN_LABEL.to_string(),
            None => {
                tracing::debug!("Unrecognized workflow status {:?}, showing raw value", value);
                value.to_string()
            }
        },
        None => UNKNOWN_LABEL.to_string(),
    }
}
