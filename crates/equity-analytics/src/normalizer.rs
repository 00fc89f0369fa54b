//! 시계열 정규화 (Series Normalizer).
//!
//! 저장소에서 받은 원시 행을 날짜 오름차순, 날짜 중복 없는
//! [`SecuritySeries`]로 변환합니다.
//!
//! # 규칙
//!
//! - 날짜를 해석할 수 없는 행은 버립니다.
//! - 값이 없거나(null, `"-"`, 빈 문자열) 유한한 숫자가 아닌 행은 버립니다.
//! - 같은 날짜가 여러 번 나오면 입력 순서상 마지막 값이 남습니다.
//! - 빈 입력은 빈 시계열이 됩니다.
//!
//! 버려진 행은 에러가 아니며, 디버그 로그로만 남습니다.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use equity_core::{DatedPoint, RawDate, RawRow, RawValue, SecurityId, SecuritySeries};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 문자열 날짜로 허용하는 형식.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%Y.%m.%d"];

/// 시각이 붙은 문자열 날짜 형식 (시각은 무시).
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// 행이 버려진 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// 날짜 해석 실패
    InvalidDate,
    /// 값 누락
    MissingValue,
    /// 숫자로 해석할 수 없는 값
    InvalidValue,
    /// NaN 또는 무한대
    NonFiniteValue,
}

/// 정규화 결과 요약.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeSummary {
    /// 입력 행 수
    pub input_rows: usize,
    /// 채택된 행 수 (날짜 중복 제거 전)
    pub accepted_rows: usize,
    /// 버려진 행 수
    pub dropped_rows: usize,
    /// 중복 날짜로 덮어쓴 행 수
    pub duplicate_dates: usize,
}

/// 원시 날짜를 달력 날짜로 해석합니다.
pub fn parse_date(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::Date(date) => Some(*date),
        RawDate::DateTime(dt) => Some(dt.date_naive()),
        RawDate::EpochMillis(millis) => {
            DateTime::from_timestamp_millis(*millis).map(|dt| dt.date_naive())
        }
        RawDate::Text(text) => parse_date_text(text),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// 원시 값을 유한한 10진수로 해석합니다.
pub fn parse_value(raw: Option<&RawValue>) -> Result<Decimal, DropReason> {
    match raw {
        None => Err(DropReason::MissingValue),
        Some(RawValue::Integer(v)) => Ok(Decimal::from(*v)),
        Some(RawValue::Float(v)) => {
            if !v.is_finite() {
                return Err(DropReason::NonFiniteValue);
            }
            Decimal::from_f64(*v).ok_or(DropReason::InvalidValue)
        }
        Some(RawValue::Text(text)) => parse_value_text(text),
    }
}

fn parse_value_text(text: &str) -> Result<Decimal, DropReason> {
    let cleaned: String = text
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return Err(DropReason::MissingValue);
    }

    let lowered = cleaned.to_ascii_lowercase();
    if matches!(
        lowered.trim_start_matches(['+', '-']),
        "nan" | "inf" | "infinity"
    ) {
        return Err(DropReason::NonFiniteValue);
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| DropReason::InvalidValue)
}

/// 원시 행 하나를 포인트로 변환합니다.
pub fn normalize_row(row: &RawRow) -> Result<DatedPoint, DropReason> {
    let date = parse_date(&row.date).ok_or(DropReason::InvalidDate)?;
    let value = parse_value(row.value.as_ref())?;
    Ok(DatedPoint::new(date, value))
}

/// 원시 행 목록을 종목 시계열로 정규화합니다.
///
/// # 인자
///
/// * `security_id` - 시계열을 소유할 종목
/// * `rows` - 원시 행 (순서 무관)
pub fn normalize(security_id: impl Into<SecurityId>, rows: &[RawRow]) -> SecuritySeries {
    normalize_with_summary(security_id, rows).0
}

/// [`normalize`]와 같지만 버려진 행 통계를 함께 돌려줍니다.
pub fn normalize_with_summary(
    security_id: impl Into<SecurityId>,
    rows: &[RawRow],
) -> (SecuritySeries, NormalizeSummary) {
    let security_id = security_id.into();
    let mut summary = NormalizeSummary {
        input_rows: rows.len(),
        ..Default::default()
    };

    let mut points = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row) {
            Ok(point) => points.push(point),
            Err(reason) => {
                summary.dropped_rows += 1;
                debug!(
                    security_id = %security_id,
                    row_index = index,
                    reason = ?reason,
                    "Dropped raw row"
                );
            }
        }
    }
    summary.accepted_rows = points.len();

    let series = SecuritySeries::from_points(security_id, points);
    summary.duplicate_dates = summary.accepted_rows - series.len();

    if summary.dropped_rows > 0 || summary.duplicate_dates > 0 {
        debug!(
            security_id = %series.security_id(),
            input = summary.input_rows,
            dropped = summary.dropped_rows,
            duplicates = summary.duplicate_dates,
            points = series.len(),
            "Normalized series with dropped rows"
        );
    }

    (series, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_variants() {
        assert_eq!(parse_date(&RawDate::from("2024-01-02")), Some(d(2024, 1, 2)));
        assert_eq!(parse_date(&RawDate::from("20240102")), Some(d(2024, 1, 2)));
        assert_eq!(parse_date(&RawDate::from("2024/01/02")), Some(d(2024, 1, 2)));
        assert_eq!(parse_date(&RawDate::from("2024.01.02")), Some(d(2024, 1, 2)));
        assert_eq!(
            parse_date(&RawDate::from("2024-01-02 15:30:00")),
            Some(d(2024, 1, 2))
        );
        // 2024-01-02T00:00:00Z
        assert_eq!(
            parse_date(&RawDate::EpochMillis(1_704_153_600_000)),
            Some(d(2024, 1, 2))
        );
        assert_eq!(parse_date(&RawDate::from("not a date")), None);
        assert_eq!(parse_date(&RawDate::from("2024-02-30")), None);
        assert_eq!(parse_date(&RawDate::from("")), None);
    }

    #[test]
    fn test_parse_date_keeps_local_offset_date() {
        let raw: RawDate = serde_json::from_str(r#""2024-01-03T08:00:00+09:00""#).unwrap();
        assert_eq!(parse_date(&raw), Some(d(2024, 1, 3)));
    }

    #[test]
    fn test_parse_value_variants() {
        assert_eq!(parse_value(Some(&RawValue::Integer(71000))), Ok(dec!(71000)));
        assert_eq!(parse_value(Some(&RawValue::Float(12.5))), Ok(dec!(12.5)));
        assert_eq!(parse_value(Some(&RawValue::from("1,234.5"))), Ok(dec!(1234.5)));
        assert_eq!(parse_value(Some(&RawValue::from(" 3.1% "))), Ok(dec!(3.1)));
        assert_eq!(parse_value(Some(&RawValue::from("-0.25"))), Ok(dec!(-0.25)));
        assert_eq!(parse_value(Some(&RawValue::from("1e3"))), Ok(dec!(1000)));
    }

    #[test]
    fn test_parse_value_rejections() {
        assert_eq!(parse_value(None), Err(DropReason::MissingValue));
        assert_eq!(
            parse_value(Some(&RawValue::from("-"))),
            Err(DropReason::MissingValue)
        );
        assert_eq!(
            parse_value(Some(&RawValue::Float(f64::NAN))),
            Err(DropReason::NonFiniteValue)
        );
        assert_eq!(
            parse_value(Some(&RawValue::Float(f64::INFINITY))),
            Err(DropReason::NonFiniteValue)
        );
        assert_eq!(
            parse_value(Some(&RawValue::from("NaN"))),
            Err(DropReason::NonFiniteValue)
        );
        assert_eq!(
            parse_value(Some(&RawValue::from("-Infinity"))),
            Err(DropReason::NonFiniteValue)
        );
        assert_eq!(
            parse_value(Some(&RawValue::from("abc"))),
            Err(DropReason::InvalidValue)
        );
    }

    #[test]
    fn test_normalize_sorts_and_drops() {
        let rows = vec![
            RawRow::new("2024-01-03", Some(RawValue::Integer(300))),
            RawRow::new("garbage", Some(RawValue::Integer(999))),
            RawRow::new("2024-01-01", Some(RawValue::Integer(100))),
            RawRow::new("2024-01-02", None),
            RawRow::new("2024-01-04", Some(RawValue::Float(f64::NAN))),
        ];

        let (series, summary) = normalize_with_summary("A", &rows);

        assert_eq!(series.security_id().as_str(), "A");
        let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 3)]);
        assert_eq!(summary.input_rows, 5);
        assert_eq!(summary.dropped_rows, 3);
        assert_eq!(summary.accepted_rows, 2);
    }

    #[test]
    fn test_normalize_duplicate_date_last_wins() {
        let rows = vec![
            RawRow::new("2024-01-02", Some(RawValue::Integer(1))),
            RawRow::new("20240102", Some(RawValue::Integer(2))),
        ];

        let (series, summary) = normalize_with_summary("A", &rows);

        assert_eq!(series.len(), 1);
        assert_eq!(series.value_on(d(2024, 1, 2)), Some(dec!(2)));
        assert_eq!(summary.duplicate_dates, 1);
    }

    #[test]
    fn test_normalize_empty_input() {
        let series = normalize("A", &[]);
        assert!(series.is_empty());
    }
}
