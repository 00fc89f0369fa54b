//! 기간 분석 (Period Analytics Calculator).
//!
//! 단일 시계열(종목 또는 기업 합산)에서 다음을 계산합니다:
//! - 기준일 시점의 최신 값
//! - 기간별 평균 (현재, 12개월, 3/5/10/20/30년 등)
//! - 전체 이력의 최소/최대와 그 날짜
//! - 외부에서 제공된 순위와 순위 변동
//!
//! # 기간 규칙
//!
//! - `months == 0`: 평균이 아니라 기준일 시점 최신 값.
//! - `months > 0`: `as_of - months(달력 기준) <= date <= as_of` 구간의 산술 평균.
//! - 구간에 포인트가 하나도 없으면 그 기간은 결과에서 빠집니다 (0으로 채우지 않음).
//! - 기준일 이후 포인트는 최신 값과 기간 평균에서 제외되지만,
//!   최소/최대는 전체 이력을 대상으로 합니다.
//!
//! # 예시
//!
//! ```rust,ignore
//! use equity_analytics::period::PeriodCalculator;
//!
//! let calc = PeriodCalculator::for_metric(Metric::Per);
//! let analysis = calc.analyze(&series, None, None);
//! println!("{:?}", analysis.period("5y"));
//! ```

use chrono::{Months, NaiveDate};
use equity_core::{
    DatedPoint, EquityResult, Metric, MinMax, PeriodAnalysis, PeriodValue, PeriodWindow,
    RankSnapshot, ValueSeries,
};
use rust_decimal::Decimal;
use tracing::warn;

/// 기간 분석기.
///
/// 생성 시점에 기간 정의를 검증하므로 `analyze`는 실패하지 않습니다.
#[derive(Debug, Clone)]
pub struct PeriodCalculator {
    windows: Vec<PeriodWindow>,
}

impl Default for PeriodCalculator {
    fn default() -> Self {
        Self {
            windows: PeriodWindow::canonical(),
        }
    }
}

impl PeriodCalculator {
    /// 기간 목록으로 분석기를 생성합니다.
    ///
    /// 라벨이 비어 있거나 중복되면 `EquityError::InvalidWindow`.
    pub fn new(windows: Vec<PeriodWindow>) -> EquityResult<Self> {
        PeriodWindow::validate_all(&windows)?;
        Ok(Self { windows })
    }

    /// 지표별 기본 기간으로 분석기를 생성합니다.
    pub fn for_metric(metric: Metric) -> Self {
        Self {
            windows: metric.default_windows(),
        }
    }

    /// 분석 기간 목록.
    pub fn windows(&self) -> &[PeriodWindow] {
        &self.windows
    }

    /// 시계열을 분석합니다.
    ///
    /// # 인자
    ///
    /// * `series` - 날짜 오름차순 시계열
    /// * `as_of` - 기준일 (없으면 마지막 포인트 날짜)
    /// * `rank` - 외부 순위 스냅샷
    pub fn analyze<S>(
        &self,
        series: &S,
        as_of: Option<NaiveDate>,
        rank: Option<RankSnapshot>,
    ) -> PeriodAnalysis
    where
        S: ValueSeries + ?Sized,
    {
        let points = series.dated_points();
        let rank = rank.map(Into::into);

        let Some(last) = points.last() else {
            return PeriodAnalysis {
                as_of,
                rank,
                ..Default::default()
            };
        };

        let as_of = as_of.unwrap_or(last.date);
        let visible = &points[..points.partition_point(|p| p.date <= as_of)];
        let latest = visible.last().copied();

        let periods = self
            .windows
            .iter()
            .filter_map(|window| window_value(window, visible, latest, as_of))
            .collect();

        PeriodAnalysis {
            as_of: Some(as_of),
            latest,
            periods,
            min_max: min_max(&points),
            rank,
        }
    }
}

/// 기간 목록을 검증한 뒤 시계열을 분석합니다.
pub fn analyze<S>(
    series: &S,
    windows: &[PeriodWindow],
    as_of: Option<NaiveDate>,
    rank: Option<RankSnapshot>,
) -> EquityResult<PeriodAnalysis>
where
    S: ValueSeries + ?Sized,
{
    let calculator = PeriodCalculator::new(windows.to_vec())?;
    Ok(calculator.analyze(series, as_of, rank))
}

/// 기간 시작일 (달력 기준 N개월 전).
///
/// 날짜 범위를 벗어나면 `None`이며, 이때는 기준일 이전 전체가 구간이 됩니다.
pub fn trailing_cutoff(as_of: NaiveDate, months: u32) -> Option<NaiveDate> {
    as_of.checked_sub_months(Months::new(months))
}

fn window_value(
    window: &PeriodWindow,
    visible: &[DatedPoint],
    latest: Option<DatedPoint>,
    as_of: NaiveDate,
) -> Option<PeriodValue> {
    if window.is_current() {
        return latest.map(|point| PeriodValue {
            label: window.label.clone(),
            months: 0,
            value: point.value,
            sample_count: 1,
        });
    }

    let start = trailing_cutoff(as_of, window.months)
        .map(|cutoff| visible.partition_point(|p| p.date < cutoff))
        .unwrap_or(0);
    let slice = &visible[start..];

    let value = match mean(slice.iter().map(|p| p.value)) {
        Some(value) => value,
        None if slice.is_empty() => return None,
        None => {
            warn!(
                window = %window.label,
                samples = slice.len(),
                "Window average overflowed, window omitted"
            );
            return None;
        }
    };

    Some(PeriodValue {
        label: window.label.clone(),
        months: window.months,
        value,
        sample_count: slice.len(),
    })
}

/// 산술 평균. 빈 입력이나 합계 오버플로우면 `None`.
pub fn mean<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    let (sum, count) = values
        .into_iter()
        .try_fold((Decimal::ZERO, 0u64), |(sum, count), v| {
            sum.checked_add(v).map(|s| (s, count + 1))
        })?;

    if count == 0 {
        return None;
    }
    sum.checked_div(Decimal::from(count))
}

/// 최소/최대와 그 날짜. 같은 값이면 이른 날짜를 택합니다.
pub fn min_max(points: &[DatedPoint]) -> Option<MinMax> {
    let first = points.first()?;
    let mut result = MinMax {
        min: first.value,
        min_date: first.date,
        max: first.value,
        max_date: first.date,
    };

    for point in &points[1..] {
        if point.value < result.min {
            result.min = point.value;
            result.min_date = point.date;
        }
        if point.value > result.max {
            result.max = point.value;
            result.max_date = point.date;
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use equity_core::EquityError;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn p(date: NaiveDate, value: Decimal) -> DatedPoint {
        DatedPoint::new(date, value)
    }

    fn windows() -> Vec<PeriodWindow> {
        vec![
            PeriodWindow::current(),
            PeriodWindow::trailing_months(12),
            PeriodWindow::trailing_months(36),
        ]
    }

    #[test]
    fn test_trailing_window_uses_calendar_months() {
        // 기준일 2024-06-15, 12개월 구간은 2023-06-15부터
        let series = vec![
            p(d(2023, 5, 15), dec!(100)), // 13개월 전: 제외
            p(d(2023, 6, 15), dec!(10)),  // 경계: 포함
            p(d(2024, 5, 15), dec!(20)),  // 1개월 전
            p(d(2024, 6, 15), dec!(30)),
        ];

        let analysis = analyze(&series, &windows(), None, None).unwrap();

        assert_eq!(analysis.as_of, Some(d(2024, 6, 15)));
        assert_eq!(analysis.latest_value(), Some(dec!(30)));
        let trailing = analysis.period("12m").unwrap();
        assert_eq!(trailing.value, dec!(20));
        assert_eq!(trailing.sample_count, 3);
        assert_eq!(analysis.period("3y").unwrap().sample_count, 4);
    }

    #[test]
    fn test_points_after_as_of_excluded_from_windows() {
        let series = vec![
            p(d(2024, 1, 2), dec!(10)),
            p(d(2024, 3, 2), dec!(20)),
            p(d(2024, 6, 3), dec!(1000)),
        ];

        let analysis = analyze(&series, &windows(), Some(d(2024, 4, 1)), None).unwrap();

        assert_eq!(analysis.latest_value(), Some(dec!(20)));
        assert_eq!(analysis.period("12m").unwrap().value, dec!(15));
        // 최소/최대는 전체 이력 기준
        let mm = analysis.min_max.unwrap();
        assert_eq!(mm.max, dec!(1000));
        assert_eq!(mm.max_date, d(2024, 6, 3));
    }

    #[test]
    fn test_empty_window_is_omitted() {
        let series = vec![p(d(2024, 6, 1), dec!(5))];

        // 기준일이 첫 포인트 이전이면 모든 기간이 비어 있음
        let analysis = analyze(&series, &windows(), Some(d(2020, 1, 1)), None).unwrap();

        assert!(analysis.latest.is_none());
        assert!(analysis.periods.is_empty());
        assert!(analysis.min_max.is_some());
    }

    #[test]
    fn test_empty_series() {
        let series: Vec<DatedPoint> = Vec::new();
        let rank = RankSnapshot {
            current_rank: 3,
            prior_rank: Some(5),
        };

        let analysis = analyze(&series, &windows(), None, Some(rank)).unwrap();

        assert!(analysis.is_empty());
        assert_eq!(analysis.rank.unwrap().delta, Some(-2));
    }

    #[test]
    fn test_rank_delta_without_prior() {
        let series = vec![p(d(2024, 1, 2), dec!(1))];
        let rank = RankSnapshot {
            current_rank: 7,
            prior_rank: None,
        };

        let analysis = analyze(&series, &windows(), None, Some(rank)).unwrap();
        let rank = analysis.rank.unwrap();
        assert_eq!(rank.current, 7);
        assert_eq!(rank.delta, None);
    }

    #[test]
    fn test_min_max_ties_keep_earliest_date() {
        let series = vec![
            p(d(2024, 1, 1), dec!(5)),
            p(d(2024, 1, 2), dec!(1)),
            p(d(2024, 1, 3), dec!(5)),
            p(d(2024, 1, 4), dec!(1)),
        ];

        let mm = min_max(&series).unwrap();
        assert_eq!(mm.min_date, d(2024, 1, 2));
        assert_eq!(mm.max_date, d(2024, 1, 1));
    }

    #[test]
    fn test_invalid_windows_rejected() {
        let series = vec![p(d(2024, 1, 2), dec!(1))];
        let duplicated = vec![
            PeriodWindow::trailing_months(12),
            PeriodWindow::new("12m", 24),
        ];

        let result = analyze(&series, &duplicated, None, None);
        assert!(matches!(result, Err(EquityError::InvalidWindow(_))));
    }

    #[test]
    fn test_leap_day_cutoff() {
        // 2024-02-29에서 12개월 전은 2023-02-28
        assert_eq!(trailing_cutoff(d(2024, 2, 29), 12), Some(d(2023, 2, 28)));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(vec![dec!(1), dec!(2), dec!(3), dec!(4)]), Some(dec!(2.5)));
        assert_eq!(mean(Vec::new()), None);
    }

    #[test]
    fn test_for_metric_windows() {
        let calc = PeriodCalculator::for_metric(Metric::Per);
        assert!(calc.windows().iter().all(|w| w.months <= 120));

        let calc = PeriodCalculator::for_metric(Metric::MarketCap);
        assert_eq!(calc.windows().len(), 7);
    }
}
