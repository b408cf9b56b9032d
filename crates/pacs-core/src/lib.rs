//! # PACS Core
//!
//! PACS工作列表的核心模块，提供检查记录数据结构、错误定义和容错格式化工具。

pub mod error;
pub mod models;
pub mod utils;

pub use error::{PacsError, Result};
pub use models::*;
