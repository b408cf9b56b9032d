//! 工作列表命令行预览工具

mod console;

use anyhow::{bail, Context};
use clap::Parser;
use pacs_core::{Pagination, StudyRecord};
use pacs_worklist::{RowServices, TableCallbacks, TableController, TableView, WorklistConfig};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use console::{ConsoleClipboard, ConsoleNavigator, ConsoleNotifier, ConsoleUpdateService};

/// 工作列表命令行参数
#[derive(Parser, Debug)]
#[command(name = "pacs-worklist")]
#[command(about = "以文本方式预览医生工作列表")]
struct Args {
    /// 检查记录JSON文件
    #[arg(short, long)]
    file: String,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 以加载中状态渲染
    #[arg(long)]
    loading: bool,

    /// 渲染后请求跳转到该页
    #[arg(short, long)]
    page: Option<u32>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// 解析输入文件：裸数组或 `{studies, pagination}` 对象
///
/// 逐条解析记录，无法解析的条目记录警告后跳过。
fn parse_input(raw: &str) -> anyhow::Result<(Vec<StudyRecord>, Option<Pagination>)> {
    let (entries, pagination) = match serde_json::from_str::<Value>(raw)? {
        Value::Array(entries) => (entries, None),
        Value::Object(mut page) => {
            let entries = match page.remove("studies") {
                Some(Value::Array(entries)) => entries,
                Some(_) => bail!("\"studies\" must be an array"),
                None => bail!("expected a \"studies\" array"),
            };
            let pagination = match page.remove("pagination") {
                None | Some(Value::Null) => None,
                Some(value) => Some(serde_json::from_value::<Pagination>(value).context("parsing pagination")?),
            };
            (entries, pagination)
        }
        _ => bail!("expected an array of studies or an object with \"studies\""),
    };

    let studies: Vec<StudyRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping study at index {}: {}", index, e);
                None
            }
        })
        .collect();
    Ok((studies, pagination))
}

fn print_view(view: &TableView) {
    match view {
        TableView::Loading { message } => println!("{}", message),
        TableView::Empty { title, hint } => {
            println!("{}", title);
            println!("{}", hint);
        }
        TableView::Populated(table) => {
            println!("{}", table.columns.join(" | "));
            for row in &table.rows {
                println!("{}", row.cells().join(" | "));
            }
            let footer = &table.footer;
            println!(
                "Page {} of {} ({} of {} records, {} per page)",
                footer.current_page,
                footer.total_pages,
                footer.displayed_records,
                footer.total_records,
                footer.records_per_page
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .init();

    let config = WorklistConfig::load(args.config.as_deref()).context("loading worklist configuration")?;

    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file))?;
    let (studies, pagination) = parse_input(&raw).with_context(|| format!("parsing {}", args.file))?;
    let pagination = pagination.unwrap_or_else(|| Pagination {
        total_records: studies.len() as u64,
        records_per_page: config.pagination.default_page_size,
        ..Pagination::default()
    });
    info!("Loaded {} studies from {}", studies.len(), args.file);

    let services = RowServices::new(
        Arc::new(ConsoleClipboard),
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleNavigator),
    );
    let callbacks = TableCallbacks::new()
        .with_page_change(|page| info!("Requested page {}", page))
        .with_records_per_page_change(|size| info!("Requested page size {}", size))
        .with_patient_click(|patient_id, record| {
            info!("Patient {} clicked on study {}", patient_id, record.id)
        })
        .with_record_update(Arc::new(ConsoleUpdateService));

    let mut table = TableController::new(config, services, callbacks);
    table.set_data(studies, args.loading, pagination);
    print_view(&table.view());

    if let Some(page) = args.page {
        if page == 0 {
            error!("Page numbers start at 1");
        } else {
            table.change_page(page);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_entries_are_skipped() {
        let raw = r#"[{"_id": "a", "id": "a"}, 7, {"_id": 42, "hasStudyNotes": "true"}]"#;
        let (studies, pagination) = parse_input(raw).unwrap();
        let ids: Vec<_> = studies.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "42"]);
        assert!(pagination.is_none());
    }

    #[test]
    fn test_page_object_with_pagination() {
        let raw = r#"{"studies": [{"_id": "a"}], "pagination": {"currentPage": 2, "totalPages": 3}}"#;
        let (studies, pagination) = parse_input(raw).unwrap();
        assert_eq!(studies.len(), 1);
        assert_eq!(pagination.map(|p| p.current_page), Some(2));
    }

    #[test]
    fn test_rejects_unknown_top_level() {
        assert!(parse_input(r#""studies""#).is_err());
        assert!(parse_input(r#"{"records": []}"#).is_err());
    }
}
