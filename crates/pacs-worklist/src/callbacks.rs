//! 表格对外回调
//!
//! 每个回调都是可选的。调用一律经过守卫：未提供的回调等同于空操作。

use pacs_core::StudyRecord;
use std::sync::Arc;

use crate::services::UpdateService;

pub type PageCallback = Box<dyn Fn(u32) + Send + Sync>;
pub type PatientCallback = Box<dyn Fn(&str, &StudyRecord) + Send + Sync>;

/// 调用可选回调，缺失时返回 false
pub fn call_opt<A, F>(callback: Option<&F>, arg: A) -> bool
where
    F: Fn(A) + ?Sized,
{
    match callback {
        Some(f) => {
            f(arg);
            true
        }
        None => false,
    }
}

/// 表格控制器的外部回调
#[derive(Default)]
pub struct TableCallbacks {
    pub on_page_change: Option<PageCallback>,
    pub on_records_per_page_change: Option<PageCallback>,
    pub on_patient_click: Option<PatientCallback>,
    pub on_record_update: Option<Arc<dyn UpdateService>>,
}

impl TableCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_change(mut self, f: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_page_change = Some(Box::new(f));
        self
    }

    pub fn with_records_per_page_change(mut self, f: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_records_per_page_change = Some(Box::new(f));
        self
    }

    pub fn with_patient_click(
        mut self,
        f: impl Fn(&str, &StudyRecord) + Send + Sync + 'static,
    ) -> Self {
        self.on_patient_click = Some(Box::new(f));
        self
    }

    pub fn with_record_update(mut self, service: Arc<dyn UpdateService>) -> Self {
        self.on_record_update = Some(service);
        self
    }

    pub(crate) fn page_changed(&self, page: u32) -> bool {
        call_opt(self.on_page_change.as_deref(), page)
    }

    pub(crate) fn records_per_page_changed(&self, size: u32) -> bool {
        call_opt(self.on_records_per_page_change.as_deref(), size)
    }

    pub(crate) fn patient_clicked(&self, patient_id: &str, record: &StudyRecord) -> bool {
        match &self.on_patient_click {
            Some(f) => {
                f(patient_id, record);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for TableCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCallbacks")
            .field("on_page_change", &self.on_page_change.is_some())
            .field("on_records_per_page_change", &self.on_records_per_page_change.is_some())
            .field("on_patient_click", &self.on_patient_click.is_some())
            .field("on_record_update", &self.on_record_update.is_some())
            .finish()
    }
}
