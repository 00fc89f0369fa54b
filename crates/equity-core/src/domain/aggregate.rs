//! 기업 합산 시계열 타입.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use super::selection::Focus;
use super::series::{DatedPoint, ValueSeries};
use crate::types::SecurityId;

/// 한 날짜의 합산 값과 종목별 구성.
///
/// `total`은 항상 `breakdown` 값의 합입니다. 해당 날짜에 값이 없는 종목은
/// 0으로 채우지 않고 `breakdown`에서 빠집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    /// 날짜
    pub date: NaiveDate,
    /// 합계
    pub total: Decimal,
    /// 종목별 값
    pub breakdown: BTreeMap<SecurityId, Decimal>,
}

impl AggregatedPoint {
    /// 종목별 값에서 합산 포인트를 생성합니다.
    ///
    /// 합계가 `Decimal` 범위를 넘으면 `None`.
    pub fn from_breakdown(
        date: NaiveDate,
        breakdown: BTreeMap<SecurityId, Decimal>,
    ) -> Option<Self> {
        let total = breakdown
            .values()
            .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))?;
        Some(Self {
            date,
            total,
            breakdown,
        })
    }

    /// 분석 대상에 해당하는 값.
    ///
    /// 특정 종목이 이 날짜에 값을 보고하지 않았다면 `None`입니다.
    pub fn value_for(&self, focus: &Focus) -> Option<Decimal> {
        match focus {
            Focus::Aggregate => Some(self.total),
            Focus::Focused(id) => self.breakdown.get(id).copied(),
        }
    }

    /// 이 날짜에 값을 보고한 종목 수.
    pub fn reporting_count(&self) -> usize {
        self.breakdown.len()
    }
}

/// 기업 합산 시계열 (날짜 오름차순).
///
/// 구성 종목은 식별자로만 참조합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedHistory {
    points: Vec<AggregatedPoint>,
}

impl AggregatedHistory {
    /// 합산 포인트 목록으로 생성합니다. 날짜순으로 정렬됩니다.
    pub fn new(mut points: Vec<AggregatedPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    /// 모든 포인트.
    pub fn points(&self) -> &[AggregatedPoint] {
        &self.points
    }

    /// 포인트 수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 가장 최근 포인트.
    pub fn last(&self) -> Option<&AggregatedPoint> {
        self.points.last()
    }

    /// 한 번이라도 값을 보고한 종목 목록.
    pub fn securities(&self) -> BTreeSet<SecurityId> {
        self.points
            .iter()
            .flat_map(|p| p.breakdown.keys().cloned())
            .collect()
    }

    /// 분석 대상에 해당하는 열을 단일 시계열로 꺼냅니다.
    ///
    /// - `Focus::Aggregate`: 날짜별 합계
    /// - `Focus::Focused(id)`: 해당 종목이 값을 보고한 날짜만
    pub fn column(&self, focus: &Focus) -> Vec<DatedPoint> {
        self.points
            .iter()
            .filter_map(|p| p.value_for(focus).map(|v| DatedPoint::new(p.date, v)))
            .collect()
    }

    /// 날짜별 합계 시계열.
    pub fn totals(&self) -> Vec<DatedPoint> {
        self.column(&Focus::Aggregate)
    }
}

impl ValueSeries for AggregatedHistory {
    fn dated_points(&self) -> Cow<'_, [DatedPoint]> {
        Cow::Owned(self.totals())
    }
}
