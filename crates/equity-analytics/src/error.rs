//! 분석 서비스 에러 타입.

use equity_core::EquityError;
use equity_data::DataError;
use thiserror::Error;

/// 기업 분석 서비스에서 발생할 수 있는 에러.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// 데이터 조회 에러
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// 분석 파라미터/설정 에러
    #[error("Analytics error: {0}")]
    Equity(#[from] EquityError),

    /// 해석할 수 없는 주소
    #[error("Invalid navigation path: {0}")]
    InvalidPath(String),
}

/// 분석 서비스 Result 타입.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    /// 대상 기업이나 종목이 없어서 발생한 에러인지 확인.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalyticsError::Data(DataError::NotFound(_)))
    }
}
