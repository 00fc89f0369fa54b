//! 밸류에이션 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 원시 행 정규화 (날짜 해석, 비유한 값 제거, 날짜 중복 정리)
//! - 종목 간 합산 (보통주 + 우선주 → 기업 합계, 종목별 내역 보존)
//! - 기간 분석 (현재값, 기간 평균, 최소/최대, 순위 변동)
//! - 분포 변환 (월 × 연도 히트맵, 값 히스토그램)
//! - 종목 선택 상태 머신 (주소 ↔ 분석 대상)
//! - 기업 분석 서비스 (조회부터 보고서까지)
//!
//! # Re-exports
//!
//! - [`normalizer`]: `normalize`, `NormalizeSummary`
//! - [`aggregator`]: `aggregate`, `share_weights`, `class_gap`
//! - [`period`]: `PeriodCalculator`, `analyze`
//! - [`distribution`]: `calendar_heatmap`, `value_histogram`
//! - [`selection`]: `SelectionMachine`, `NavigationContext`, `NavigationTarget`
//! - [`service`]: `CompanyAnalytics`, `CompanyReport`

pub mod aggregator;
pub mod distribution;
pub mod error;
pub mod normalizer;
pub mod period;
pub mod selection;
pub mod service;

pub use aggregator::{aggregate, class_gap, share_weights};
pub use distribution::{
    calendar_heatmap, value_histogram, HeatmapCell, HeatmapRow, HistogramBin, MAX_HISTOGRAM_BINS,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use normalizer::{
    normalize, normalize_row, normalize_with_summary, parse_date, parse_value, DropReason,
    NormalizeSummary,
};
pub use period::{analyze, min_max, trailing_cutoff, PeriodCalculator};
pub use selection::{
    NavigationContext, NavigationTarget, SelectionEvent, SelectionMachine, Transition,
};
pub use service::{ClassSummary, CompanyAnalytics, CompanyHistory, CompanyReport};
