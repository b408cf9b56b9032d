//! 通用工具函数
//!
//! 所有格式化函数都是容错的：输入缺失或无法解析时返回占位符，不会报错。

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// 缺失值的占位符
pub const PLACEHOLDER: &str = "-";

/// 解析后的时间戳
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// 带时刻的绝对时间
    Instant(DateTime<Utc>),
    /// 仅有日期，按日历日期显示，不做时区换算
    Date(NaiveDate),
}

/// 解析上游时间字符串
///
/// 支持 RFC 3339、`YYYY-MM-DDTHH:MM:SS[.fff]`、`YYYY-MM-DD HH:MM:SS`、
/// `YYYY-MM-DD` 以及 DICOM 的 `YYYYMMDD`。不带时区的时刻按 UTC 处理。
pub fn parse_timestamp(input: &str) -> Option<Timestamp> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(Timestamp::Instant(dt.with_timezone(&Utc)));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Timestamp::Instant(Utc.from_utc_datetime(&naive)));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(Timestamp::Date(date));
        }
    }

    None
}

fn localize(ts: Timestamp, offset: &FixedOffset) -> (NaiveDate, NaiveTime) {
    match ts {
        Timestamp::Instant(dt) => {
            let local = dt.with_timezone(offset);
            (local.date_naive(), local.time())
        }
        Timestamp::Date(date) => (date, NaiveTime::MIN),
    }
}

/// 格式化为 `DD/MM/YYYY`，无法解析时返回 None
pub fn try_format_date(input: Option<&str>, offset: &FixedOffset) -> Option<String> {
    let ts = input.and_then(parse_timestamp)?;
    Some(localize(ts, offset).0.format("%d/%m/%Y").to_string())
}

/// 格式化为 24 小时制 `HH:MM:SS`，无法解析时返回 None
pub fn try_format_time(input: Option<&str>, offset: &FixedOffset) -> Option<String> {
    let ts = input.and_then(parse_timestamp)?;
    Some(localize(ts, offset).1.format("%H:%M:%S").to_string())
}

/// 格式化为 `DD/MM/YYYY`
pub fn format_date(input: Option<&str>, offset: &FixedOffset) -> String {
    try_format_date(input, offset).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// 格式化为 24 小时制 `HH:MM:SS`
pub fn format_time(input: Option<&str>, offset: &FixedOffset) -> String {
    try_format_time(input, offset).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// 取非空文本，否则返回 None
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// 上游用 "N/A" 表示缺失
pub fn present(value: Option<&str>) -> Option<&str> {
    non_empty(value).filter(|v| *v != "N/A")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_format_date_and_time() {
        let ts = Some("2024-03-07T05:04:09Z");
        assert_eq!(format_date(ts, &utc()), "07/03/2024");
        assert_eq!(format_time(ts, &utc()), "05:04:09");
    }

    #[test]
    fn test_offset_shifts_calendar_day() {
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let ts = Some("2024-03-07T20:00:00.000Z");
        assert_eq!(format_date(ts, &ist), "08/03/2024");
        assert_eq!(format_time(ts, &ist), "01:30:00");
    }

    #[test]
    fn test_date_only_inputs() {
        assert_eq!(format_date(Some("2023-10-15"), &utc()), "15/10/2023");
        assert_eq!(format_date(Some("20231015"), &utc()), "15/10/2023");
        assert_eq!(format_time(Some("20231015"), &utc()), "00:00:00");
    }

    #[test]
    fn test_malformed_inputs_yield_placeholder() {
        for input in [None, Some(""), Some("   "), Some("yesterday"), Some("2024-13-45"), Some("99999999")] {
            assert_eq!(format_date(input, &utc()), PLACEHOLDER);
            assert_eq!(format_time(input, &utc()), PLACEHOLDER);
        }
    }

    #[test]
    fn test_present_filters_sentinel() {
        assert_eq!(present(Some("N/A")), None);
        assert_eq!(present(Some(" ")), None);
        assert_eq!(present(None), None);
        assert_eq!(present(Some("BP-7")), Some("BP-7"));
    }
}
