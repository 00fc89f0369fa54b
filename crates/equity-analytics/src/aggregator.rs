//! 종목 간 합산 (Cross-Security Aggregator).
//!
//! 한 기업의 여러 종목(보통주, 우선주 등) 시계열을 날짜별로 합산합니다.
//!
//! - 달력은 모든 입력 시계열 날짜의 합집합입니다.
//! - 각 날짜의 합계는 그 날짜에 값을 보고한 종목만 더합니다.
//!   이전 값을 끌어오거나 보간하지 않습니다.
//! - 종목별 내역(breakdown)을 함께 보관하므로 특정 종목 열만 꺼낼 수 있습니다.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use equity_core::{AggregatedHistory, AggregatedPoint, DatedPoint, SecurityId, SecuritySeries};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// 종목 시계열 목록을 날짜별 합산 이력으로 만듭니다.
///
/// 같은 종목 식별자가 두 번 들어오면 겹치는 날짜에서는 나중 시계열의 값이
/// 남고, 합계는 항상 내역에서 다시 계산됩니다.
/// 합계가 `Decimal` 범위를 넘는 날짜는 경고를 남기고 제외합니다.
pub fn aggregate(series_list: &[SecuritySeries]) -> AggregatedHistory {
    let mut calendar: BTreeMap<NaiveDate, BTreeMap<SecurityId, Decimal>> = BTreeMap::new();

    for series in series_list {
        for point in series.points() {
            calendar
                .entry(point.date)
                .or_default()
                .insert(series.security_id().clone(), point.value);
        }
    }

    let points: Vec<AggregatedPoint> = calendar
        .into_iter()
        .filter_map(|(date, breakdown)| {
            let securities = breakdown.len();
            let point = AggregatedPoint::from_breakdown(date, breakdown);
            if point.is_none() {
                warn!(%date, securities, "Aggregate total overflowed, date skipped");
            }
            point
        })
        .collect();

    debug!(
        input_series = series_list.len(),
        dates = points.len(),
        "Aggregated share-class series"
    );

    AggregatedHistory::new(points)
}

/// 날짜별 종목 비중 (합계 대비 %, 합계가 0인 날짜는 제외).
///
/// 계산 범위를 넘는 종목은 해당 날짜의 비중에서 빠집니다.
pub fn share_weights(
    history: &AggregatedHistory,
) -> Vec<(NaiveDate, BTreeMap<SecurityId, Decimal>)> {
    history
        .points()
        .iter()
        .filter(|p| !p.total.is_zero())
        .map(|p| {
            let weights = p
                .breakdown
                .iter()
                .filter_map(|(id, value)| {
                    let weight = value
                        .checked_div(p.total)?
                        .checked_mul(Decimal::ONE_HUNDRED)?;
                    Some((id.clone(), weight.round_dp(4)))
                })
                .collect();
            (p.date, weights)
        })
        .collect()
}

/// 기준 종목 대비 비교 종목의 괴리율(%) 시계열.
///
/// `(base - other) / base * 100`. 두 종목이 모두 값을 보고한 날짜만
/// 포함하며, 기준 값이 0이거나 계산 범위를 넘는 날짜는 제외합니다.
/// 보통주 대비 우선주 할인율 계산에 사용합니다.
pub fn class_gap(base: &SecuritySeries, other: &SecuritySeries) -> Vec<DatedPoint> {
    base.points()
        .iter()
        .filter(|p| !p.value.is_zero())
        .filter_map(|p| {
            let other_value = other.value_on(p.date)?;
            let gap = p
                .value
                .checked_sub(other_value)?
                .checked_div(p.value)?
                .checked_mul(Decimal::ONE_HUNDRED)?;
            Some(DatedPoint::new(p.date, gap.round_dp(4)))
        })
        .collect()
}
