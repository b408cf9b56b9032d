//! 工作列表显示配置
//!
//! 从可选的配置文件与 `WORKLIST__*` 环境变量加载，加载后统一校验。

use chrono::{FixedOffset, Offset, Utc};
use config::{Config, Environment, File};
use pacs_core::{PacsError, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// 工作列表完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorklistConfig {
    /// 显示配置
    pub display: DisplayConfig,
    /// 提示消息配置
    pub toast: ToastConfig,
    /// 导航路由配置
    pub routes: RouteConfig,
    /// 分页配置
    pub pagination: PaginationConfig,
}

/// 显示配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 缺失值占位符
    pub placeholder: String,
    /// 无PACS编号时展示记录ID的前几位
    pub id_preview_len: usize,
    /// 时间显示所用时区（相对UTC的分钟数）
    pub utc_offset_minutes: i32,
}

/// 提示消息位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPlacement {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// 提示消息配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub placement: ToastPlacement,
    pub duration_ms: u64,
}

/// 导航路由配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// 只读影像查看路由前缀
    pub viewer: String,
    /// 报告+影像联合工作区路由前缀
    pub reporting: String,
    /// 联合工作区附带的查询参数
    pub reporting_query: String,
}

/// 分页配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
}

impl WorklistConfig {
    /// 加载配置：文件可选，环境变量覆盖文件
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("WORKLIST").separator("__"))
            .build()
            .map_err(|e| PacsError::Config(format!("Failed to load configuration: {}", e)))?;

        let config: WorklistConfig = settings
            .try_deserialize()
            .map_err(|e| PacsError::Config(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        info!("Worklist configuration loaded from {}", config_path.unwrap_or("<defaults>"));
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        let rules: [(&str, bool, &str); 7] = [
            ("display.placeholder", self.display.placeholder.is_empty(), "placeholder cannot be empty"),
            ("display.id_preview_len", self.display.id_preview_len == 0, "id preview length cannot be 0"),
            (
                "display.utc_offset_minutes",
                self.display.utc_offset_minutes.unsigned_abs() > 14 * 60,
                "offset must be within +/-14h",
            ),
            ("toast.duration_ms", self.toast.duration_ms == 0, "toast duration cannot be 0"),
            ("pagination.default_page_size", self.pagination.default_page_size == 0, "default page size cannot be 0"),
            ("routes.viewer", !self.routes.viewer.starts_with('/'), "route must start with '/'"),
            ("routes.reporting", !self.routes.reporting.starts_with('/'), "route must start with '/'"),
        ];

        for (field, failed, message) in rules {
            if failed {
                error!("Configuration validation failed for {}: {}", field, message);
                return Err(PacsError::Config(format!("{}: {}", field, message)));
            }
        }

        Ok(())
    }

    /// 显示时区
    pub fn offset(&self) -> FixedOffset {
        self.display
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            placeholder: pacs_core::utils::PLACEHOLDER.to_string(),
            id_preview_len: 10,
            utc_offset_minutes: 0,
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            placement: ToastPlacement::BottomRight,
            duration_ms: 2000,
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            viewer: "/doctor/viewer".to_string(),
            reporting: "/online-reporting".to_string(),
            reporting_query: "openOHIF=true".to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            page_size_options: vec![10, 25, 50, 100],
        }
    }
}
