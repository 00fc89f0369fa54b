//! 분포 변환 (Distribution/Heatmap Transformer).
//!
//! - 월 × 연도 히트맵: 각 칸은 해당 연-월의 마지막 포인트 값
//! - 값 히스토그램: 고정 폭 구간별 포인트 수

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use equity_core::{DatedPoint, EquityError, EquityResult, ValueSeries};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 히스토그램 구간 수 상한.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// 히트맵 칸.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// 연도
    pub year: i32,
    /// 칸 값을 제공한 포인트 날짜 (해당 월 마지막 거래일)
    pub date: NaiveDate,
    /// 값
    pub value: Decimal,
}

/// 히트맵 행 (한 달, 연도별 칸).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapRow {
    /// 월 (1-12)
    pub month: u32,
    /// 연도 오름차순 칸
    pub cells: Vec<HeatmapCell>,
}

impl HeatmapRow {
    /// 해당 연도의 칸.
    pub fn cell(&self, year: i32) -> Option<&HeatmapCell> {
        self.cells.iter().find(|c| c.year == year)
    }
}

/// 히스토그램 구간 `[start, end)`. 마지막 구간은 최댓값을 포함합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// 구간 시작
    pub start: Decimal,
    /// 구간 끝
    pub end: Decimal,
    /// 포인트 수
    pub count: usize,
}

/// 월 × 연도 히트맵을 만듭니다.
///
/// 데이터가 있는 월만 행으로 나오며, 행은 월 오름차순, 칸은 연도 오름차순입니다.
pub fn calendar_heatmap<S>(series: &S) -> Vec<HeatmapRow>
where
    S: ValueSeries + ?Sized,
{
    let points = series.dated_points();

    // 날짜 오름차순이므로 나중 포인트가 같은 칸을 덮어씀
    let mut grid: BTreeMap<u32, BTreeMap<i32, DatedPoint>> = BTreeMap::new();
    for point in points.iter() {
        grid.entry(point.date.month())
            .or_default()
            .insert(point.date.year(), *point);
    }

    grid.into_iter()
        .map(|(month, years)| HeatmapRow {
            month,
            cells: years
                .into_iter()
                .map(|(year, point)| HeatmapCell {
                    year,
                    date: point.date,
                    value: point.value,
                })
                .collect(),
        })
        .collect()
}

/// 고정 폭 값 히스토그램을 만듭니다.
///
/// 구간은 최솟값에서 시작합니다. 포인트가 없는 구간은 결과에서 빠집니다.
///
/// # 에러
///
/// 폭이 0 이하이거나, 구간 수가 [`MAX_HISTOGRAM_BINS`]를 넘거나
/// `Decimal` 범위로 계산할 수 없으면 `EquityError::InvalidBinWidth`.
pub fn value_histogram<S>(series: &S, bin_width: Decimal) -> EquityResult<Vec<HistogramBin>>
where
    S: ValueSeries + ?Sized,
{
    if bin_width <= Decimal::ZERO {
        return Err(EquityError::InvalidBinWidth(format!(
            "구간 폭은 양수여야 합니다: {}",
            bin_width
        )));
    }

    let points = series.dated_points();
    let Some(first) = points.first() else {
        return Ok(Vec::new());
    };

    let (min, max) = points.iter().fold((first.value, first.value), |(lo, hi), p| {
        (lo.min(p.value), hi.max(p.value))
    });

    let too_many_bins = || {
        EquityError::InvalidBinWidth(format!(
            "구간 수가 너무 많습니다 (폭 {}, 범위 {}..{})",
            bin_width, min, max
        ))
    };

    let bin_count = max
        .checked_sub(min)
        .and_then(|span| span.checked_div(bin_width))
        .and_then(|bins| bins.ceil().to_usize())
        .filter(|n| *n <= MAX_HISTOGRAM_BINS)
        .ok_or_else(too_many_bins)?
        .max(1);

    let mut counts = vec![0usize; bin_count];
    for point in points.iter() {
        let index = point
            .value
            .checked_sub(min)
            .and_then(|offset| offset.checked_div(bin_width))
            .and_then(|position| position.floor().to_usize())
            .unwrap_or(0)
            .min(bin_count - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(index, count)| {
            let start = bin_width
                .checked_mul(Decimal::from(index))
                .and_then(|offset| min.checked_add(offset))
                .ok_or_else(too_many_bins)?;
            let end = start.checked_add(bin_width).ok_or_else(too_many_bins)?;
            Ok(HistogramBin { start, end, count })
        })
        .collect()
}
