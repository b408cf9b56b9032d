//! 下载选项浮层的行内状态

use serde::Serialize;

/// 触发按钮在视口中的位置
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerBounds {
    pub bottom: f64,
    pub left: f64,
    pub width: f64,
}

/// 页面滚动偏移
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// 浮层锚点（文档坐标）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopoverAnchor {
    pub top: f64,
    pub left: f64,
    pub width: f64,
}

impl PopoverAnchor {
    pub fn from_trigger(bounds: TriggerBounds, scroll: ScrollOffset) -> Self {
        Self {
            top: bounds.bottom + scroll.y,
            left: bounds.left + scroll.x,
            width: bounds.width,
        }
    }
}

/// 下载选项浮层
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DownloadPopover {
    open: bool,
    anchor: Option<PopoverAnchor>,
}

impl DownloadPopover {
    /// 切换开关；每次切换都记录触发时的位置。返回切换后的状态
    pub fn toggle(&mut self, bounds: TriggerBounds, scroll: ScrollOffset) -> bool {
        self.anchor = Some(PopoverAnchor::from_trigger(bounds, scroll));
        self.open = !self.open;
        self.open
    }

    /// 关闭，可重复调用
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// 仅在打开时返回锚点
    pub fn anchor(&self) -> Option<PopoverAnchor> {
        if self.open {
            self.anchor
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> TriggerBounds {
        TriggerBounds { bottom: 120.0, left: 40.0, width: 28.0 }
    }

    #[test]
    fn test_toggle_twice_returns_to_closed() {
        let mut popover = DownloadPopover::default();
        assert!(popover.toggle(bounds(), ScrollOffset::default()));
        assert!(!popover.toggle(bounds(), ScrollOffset::default()));
        assert!(!popover.is_open());
        assert_eq!(popover.anchor(), None);
    }

    #[test]
    fn test_anchor_includes_scroll() {
        let mut popover = DownloadPopover::default();
        popover.toggle(bounds(), ScrollOffset { x: 5.0, y: 300.0 });
        assert_eq!(
            popover.anchor(),
            Some(PopoverAnchor { top: 420.0, left: 45.0, width: 28.0 })
        );
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut popover = DownloadPopover::default();
        popover.close();
        popover.toggle(bounds(), ScrollOffset::default());
        popover.close();
        popover.close();
        assert!(!popover.is_open());
    }
}
