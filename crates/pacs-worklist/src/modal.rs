//! 弹窗可见性状态
//!
//! 每种弹窗至多一个选中项；不同种类之间互不影响，可以同时打开。

use pacs_core::StudyRecord;
use serde::Serialize;
use std::collections::HashMap;

/// 由表格控制器管理的弹窗种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    DetailView,
    Report,
    Notes,
    PatientEdit,
    Timeline,
}

impl ModalKind {
    /// 挂载顺序
    pub const ALL: [ModalKind; 5] = [
        Self::DetailView,
        Self::Report,
        Self::Notes,
        Self::PatientEdit,
        Self::Timeline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DetailView => "detail_view",
            Self::Report => "report",
            Self::Notes => "notes",
            Self::PatientEdit => "patient_edit",
            Self::Timeline => "timeline",
        }
    }
}

/// 弹窗当前选中的记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalSelection {
    pub record_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<StudyRecord>,
}

impl ModalSelection {
    pub fn id_only(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            record: None,
        }
    }

    pub fn with_record(record: &StudyRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            record: Some(record.clone()),
        }
    }
}

/// 各类弹窗的可见性
#[derive(Debug, Clone, Default)]
pub struct ModalState {
    open: HashMap<ModalKind, ModalSelection>,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开弹窗；同类弹窗已打开时替换其选中项
    pub fn open(&mut self, kind: ModalKind, selection: ModalSelection) {
        tracing::info!("Opening {} modal for record {}", kind.as_str(), selection.record_id);
        self.open.insert(kind, selection);
    }

    /// 关闭弹窗并清空选中项，返回之前是否打开
    pub fn close(&mut self, kind: ModalKind) -> bool {
        let was_open = self.open.remove(&kind).is_some();
        if was_open {
            tracing::info!("Closed {} modal", kind.as_str());
        }
        was_open
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.open.contains_key(&kind)
    }

    pub fn selection(&self, kind: ModalKind) -> Option<&ModalSelection> {
        self.open.get(&kind)
    }

    /// 按固定顺序列出当前打开的弹窗
    pub fn visible(&self) -> impl Iterator<Item = (ModalKind, &ModalSelection)> + '_ {
        ModalKind::ALL
            .into_iter()
            .filter_map(move |kind| self.open.get(&kind).map(|sel| (kind, sel)))
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        let state = ModalState::new();
        for kind in ModalKind::ALL {
            assert!(!state.is_open(kind));
        }
        assert_eq!(state.visible().count(), 0);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut state = ModalState::new();
        state.open(ModalKind::Report, ModalSelection::id_only("a"));
        state.open(ModalKind::Timeline, ModalSelection::id_only("b"));

        assert!(state.is_open(ModalKind::Report));
        assert!(state.is_open(ModalKind::Timeline));

        assert!(state.close(ModalKind::Report));
        assert!(!state.close(ModalKind::Report));
        assert!(state.is_open(ModalKind::Timeline));
    }

    #[test]
    fn test_one_instance_per_kind() {
        let mut state = ModalState::new();
        state.open(ModalKind::Notes, ModalSelection::id_only("a"));
        state.open(ModalKind::Notes, ModalSelection::id_only("b"));

        assert_eq!(state.open_count(), 1);
        assert_eq!(state.selection(ModalKind::Notes).unwrap().record_id, "b");
    }

    #[test]
    fn test_visible_order_is_fixed() {
        let mut state = ModalState::new();
        state.open(ModalKind::Timeline, ModalSelection::id_only("t"));
        state.open(ModalKind::DetailView, ModalSelection::id_only("d"));

        let kinds: Vec<_> = state.visible().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![ModalKind::DetailView, ModalKind::Timeline]);
    }
}
