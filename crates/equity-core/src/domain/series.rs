//! 종목 시계열 타입.
//!
//! 정규화를 거친 시계열만 이 타입으로 표현되며, 이후 모든 분석 단계는
//! 검증된 `DatedPoint` 시퀀스만 다룹니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::types::SecurityId;

/// 날짜가 붙은 단일 값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedPoint {
    /// 날짜
    pub date: NaiveDate,
    /// 값 (항상 유한한 값)
    pub value: Decimal,
}

impl DatedPoint {
    /// 새 포인트를 생성합니다.
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        Self { date, value }
    }
}

/// 날짜 오름차순 포인트를 제공하는 시계열.
///
/// 기간 분석과 분포 변환은 단일 종목 시계열과 기업 합산 시계열을
/// 모두 이 trait을 통해 받습니다.
pub trait ValueSeries {
    /// 날짜 오름차순, 중복 없는 포인트 목록.
    fn dated_points(&self) -> Cow<'_, [DatedPoint]>;
}

/// 슬라이스는 이미 날짜순으로 정렬되어 있다고 가정합니다.
impl ValueSeries for [DatedPoint] {
    fn dated_points(&self) -> Cow<'_, [DatedPoint]> {
        Cow::Borrowed(self)
    }
}

impl ValueSeries for Vec<DatedPoint> {
    fn dated_points(&self) -> Cow<'_, [DatedPoint]> {
        Cow::Borrowed(self.as_slice())
    }
}

/// 한 종목의 시계열.
///
/// 날짜 오름차순, 날짜 중복 없음. 생성 후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecuritySeries {
    /// 소유 종목
    security_id: SecurityId,
    /// 날짜순 포인트
    points: Vec<DatedPoint>,
}

impl SecuritySeries {
    /// 포인트 목록에서 시계열을 생성합니다.
    ///
    /// 입력 순서는 상관없습니다. 같은 날짜가 여러 번 나오면
    /// 나중에 나온 값이 남습니다.
    pub fn from_points<I>(security_id: impl Into<SecurityId>, points: I) -> Self
    where
        I: IntoIterator<Item = DatedPoint>,
    {
        let mut by_date = BTreeMap::new();
        for point in points {
            by_date.insert(point.date, point.value);
        }

        Self {
            security_id: security_id.into(),
            points: by_date
                .into_iter()
                .map(|(date, value)| DatedPoint::new(date, value))
                .collect(),
        }
    }

    /// 빈 시계열을 생성합니다.
    pub fn empty(security_id: impl Into<SecurityId>) -> Self {
        Self {
            security_id: security_id.into(),
            points: Vec::new(),
        }
    }

    /// 소유 종목 식별자.
    pub fn security_id(&self) -> &SecurityId {
        &self.security_id
    }

    /// 모든 포인트.
    pub fn points(&self) -> &[DatedPoint] {
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

    /// 가장 오래된 포인트.
    pub fn first(&self) -> Option<&DatedPoint> {
        self.points.first()
    }

    /// 가장 최근 포인트.
    pub fn last(&self) -> Option<&DatedPoint> {
        self.points.last()
    }

    /// 정확히 해당 날짜의 값. 앞뒤 날짜로 채우지 않습니다.
    pub fn value_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// 첫 날짜와 마지막 날짜.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

impl ValueSeries for SecuritySeries {
    fn dated_points(&self) -> Cow<'_, [DatedPoint]> {
        Cow::Borrowed(&self.points)
    }
}
