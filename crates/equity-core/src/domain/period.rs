//! 기간 분석 관련 타입.
//!
//! - `PeriodWindow`: 이름이 붙은 과거 조회 기간 (0개월 = 현재값)
//! - `PeriodAnalysis`: 현재값, 기간별 평균, 전체 최소/최대, 순위

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::series::DatedPoint;
use crate::error::{EquityError, EquityResult};

/// 표준 기간 (개월). 현재, 12개월, 3/5/10/20/30년.
const CANONICAL_MONTHS: [u32; 7] = [0, 12, 36, 60, 120, 240, 360];

/// 과거 조회 기간 정의.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// 표시 라벨 (결과에서 기간을 찾는 키)
    pub label: String,
    /// 조회 개월 수. 0이면 평균이 아니라 현재값.
    pub months: u32,
}

impl PeriodWindow {
    /// 새 기간을 생성합니다.
    pub fn new(label: impl Into<String>, months: u32) -> Self {
        Self {
            label: label.into(),
            months,
        }
    }

    /// 현재값 기간.
    pub fn current() -> Self {
        Self::new("current", 0)
    }

    /// 표준 라벨을 붙인 N개월 기간 ("12m", "3y" 등).
    pub fn trailing_months(months: u32) -> Self {
        if months == 0 {
            return Self::current();
        }
        let label = if months >= 24 && months % 12 == 0 {
            format!("{}y", months / 12)
        } else {
            format!("{}m", months)
        };
        Self::new(label, months)
    }

    /// 현재값 기간인지 여부.
    pub fn is_current(&self) -> bool {
        self.months == 0
    }

    /// 표준 기간 목록: 현재, 12개월, 3년, 5년, 10년, 20년, 30년.
    pub fn canonical() -> Vec<Self> {
        CANONICAL_MONTHS
            .iter()
            .map(|&m| Self::trailing_months(m))
            .collect()
    }

    /// `max_months` 이하의 표준 기간만.
    pub fn canonical_up_to(max_months: u32) -> Vec<Self> {
        CANONICAL_MONTHS
            .iter()
            .filter(|&&m| m <= max_months)
            .map(|&m| Self::trailing_months(m))
            .collect()
    }

    /// 기간 목록을 검증합니다.
    ///
    /// 빈 라벨이나 중복 라벨은 결과에서 기간을 구분할 수 없으므로
    /// 호출 측 실수로 취급합니다.
    pub fn validate_all(windows: &[PeriodWindow]) -> EquityResult<()> {
        let mut seen = HashSet::new();
        for window in windows {
            if window.label.trim().is_empty() {
                return Err(EquityError::InvalidWindow(format!(
                    "{}개월 기간의 라벨이 비어 있습니다",
                    window.months
                )));
            }
            if !seen.insert(window.label.as_str()) {
                return Err(EquityError::InvalidWindow(format!(
                    "중복된 기간 라벨: {}",
                    window.label
                )));
            }
        }
        Ok(())
    }
}

/// 기간별 결과 값.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodValue {
    /// 기간 라벨
    pub label: String,
    /// 조회 개월 수 (0 = 현재값)
    pub months: u32,
    /// 평균 또는 현재값
    pub value: Decimal,
    /// 계산에 사용된 포인트 수
    pub sample_count: usize,
}

/// 전체 기간 최소/최대.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMax {
    /// 최소값
    pub min: Decimal,
    /// 최소값 날짜 (같은 값이 여러 번이면 가장 이른 날짜)
    pub min_date: NaiveDate,
    /// 최대값
    pub max: Decimal,
    /// 최대값 날짜 (같은 값이 여러 번이면 가장 이른 날짜)
    pub max_date: NaiveDate,
}

/// 외부 순위 소스가 제공하는 순위 스냅샷.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSnapshot {
    /// 현재 순위 (1 = 최상위)
    pub current_rank: u32,
    /// 이전 스냅샷 순위
    #[serde(default)]
    pub prior_rank: Option<u32>,
}

/// 순위와 순위 변동.
///
/// `delta = current - prior`. 음수면 순위가 올라간 것입니다.
/// 이전 순위가 없으면 변동도 `None`입니다 (0으로 표시하지 않음).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDelta {
    /// 현재 순위
    pub current: u32,
    /// 이전 순위
    pub prior: Option<u32>,
    /// 순위 변동
    pub delta: Option<i64>,
}

impl RankDelta {
    /// 순위가 올라갔는지 여부. 변동을 알 수 없으면 `None`.
    pub fn improved(&self) -> Option<bool> {
        self.delta.map(|d| d < 0)
    }
}

impl From<RankSnapshot> for RankDelta {
    fn from(snapshot: RankSnapshot) -> Self {
        Self {
            current: snapshot.current_rank,
            prior: snapshot.prior_rank,
            delta: snapshot
                .prior_rank
                .map(|prior| i64::from(snapshot.current_rank) - i64::from(prior)),
        }
    }
}

/// 기간 분석 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAnalysis {
    /// 분석 기준일
    pub as_of: Option<NaiveDate>,
    /// 기준일 시점의 최신 포인트
    pub latest: Option<DatedPoint>,
    /// 기간별 값 (조회 구간이 빈 기간은 제외)
    pub periods: Vec<PeriodValue>,
    /// 전체 이력의 최소/최대
    pub min_max: Option<MinMax>,
    /// 순위 (외부 제공 시)
    pub rank: Option<RankDelta>,
}

impl PeriodAnalysis {
    /// 최신 값.
    pub fn latest_value(&self) -> Option<Decimal> {
        self.latest.map(|p| p.value)
    }

    /// 라벨로 기간 결과를 찾습니다.
    pub fn period(&self, label: &str) -> Option<&PeriodValue> {
        self.periods.iter().find(|p| p.label == label)
    }

    /// 표시할 데이터가 전혀 없는지 여부.
    pub fn is_empty(&self) -> bool {
        self.latest.is_none() && self.periods.is_empty() && self.min_max.is_none()
    }
}
