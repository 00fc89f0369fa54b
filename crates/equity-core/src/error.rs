//! 분석 엔진의 에러 타입.
//!
//! 데이터 품질 문제(잘못된 날짜, 비유한 값, 빈 입력 등)는 에러가 아니라
//! 결과에서 누락되는 방식으로 처리됩니다. 여기 정의된 에러는
//! 잘못된 호출(기간 정의 오류, 구간 폭 오류)이나 설정 문제만 나타냅니다.

use thiserror::Error;

/// 핵심 분석 에러.
#[derive(Debug, Error)]
pub enum EquityError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 기간 정의
    #[error("잘못된 기간 정의: {0}")]
    InvalidWindow(String),

    /// 잘못된 히스토그램 구간 폭
    #[error("잘못된 구간 폭: {0}")]
    InvalidBinWidth(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 분석 작업을 위한 Result 타입.
pub type EquityResult<T> = Result<T, EquityError>;

impl EquityError {
    /// 호출 측 실수로 인한 에러인지 확인합니다.
    ///
    /// 이런 에러는 재시도해도 같은 결과가 나옵니다.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            EquityError::InvalidWindow(_) | EquityError::InvalidBinWidth(_)
        )
    }
}

impl From<serde_json::Error> for EquityError {
    fn from(err: serde_json::Error) -> Self {
        EquityError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for EquityError {
    fn from(err: config::ConfigError) -> Self {
        EquityError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_programmer_error() {
        let window_err = EquityError::InvalidWindow("empty label".to_string());
        assert!(window_err.is_programmer_error());

        let config_err = EquityError::Config("missing file".to_string());
        assert!(!config_err.is_programmer_error());
    }

    #[test]
    fn test_error_display() {
        let err = EquityError::InvalidBinWidth("0".to_string());
        assert_eq!(err.to_string(), "잘못된 구간 폭: 0");
    }
}
