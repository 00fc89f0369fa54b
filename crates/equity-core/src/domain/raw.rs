//! 저장소에서 넘어오는 원시 행 타입.
//!
//! 날짜는 이미 파싱된 값, 타임스탬프, 문자열 중 하나로,
//! 값은 숫자, 문자열, null 중 하나로 들어옵니다.
//! 해석은 정규화 단계에서 수행합니다.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// 원시 날짜 표현.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// 이미 파싱된 날짜 (`YYYY-MM-DD`)
    Date(NaiveDate),
    /// RFC 3339 타임스탬프 (오프셋 기준 현지 날짜를 사용)
    DateTime(DateTime<FixedOffset>),
    /// 유닉스 타임스탬프 (밀리초)
    EpochMillis(i64),
    /// 그 외 문자열 (예: `20240102`, `2024.01.02`)
    Text(String),
}

impl From<NaiveDate> for RawDate {
    fn from(date: NaiveDate) -> Self {
        RawDate::Date(date)
    }
}

impl From<&str> for RawDate {
    fn from(text: &str) -> Self {
        RawDate::Text(text.to_string())
    }
}

/// 원시 숫자 표현.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// 정수
    Integer(i64),
    /// 부동소수점 (NaN/무한대 가능)
    Float(f64),
    /// 문자열 (예: `"1,234.5"`)
    Text(String),
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

/// 원시 행 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// 날짜
    pub date: RawDate,
    /// 값 (null 또는 누락 가능)
    #[serde(default)]
    pub value: Option<RawValue>,
}

impl RawRow {
    /// 새 행을 생성합니다.
    pub fn new(date: impl Into<RawDate>, value: Option<RawValue>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_rows() {
        let json = r#"[
            {"date": "2024-01-02", "value": 71000},
            {"date": "2024-01-03T09:00:00+09:00", "value": "71,500"},
            {"date": 1704326400000, "value": 72000.5},
            {"date": "20240105", "value": null},
            {"date": "2024.01.08"}
        ]"#;
        let rows: Vec<RawRow> = serde_json::from_str(json).unwrap();

        assert_eq!(rows.len(), 5);
        assert!(matches!(rows[0].date, RawDate::Date(_)));
        assert_eq!(rows[0].value, Some(RawValue::Integer(71000)));
        assert!(matches!(rows[1].date, RawDate::DateTime(_)));
        assert_eq!(rows[1].value, Some(RawValue::Text("71,500".to_string())));
        assert!(matches!(rows[2].date, RawDate::EpochMillis(_)));
        assert_eq!(rows[2].value, Some(RawValue::Float(72000.5)));
        assert_eq!(rows[3].date, RawDate::Text("20240105".to_string()));
        assert!(rows[3].value.is_none());
        assert!(rows[4].value.is_none());
    }
}
