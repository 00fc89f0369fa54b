//! # Equity Core
//!
//! 종목/기업 밸류에이션 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 식별자, 주식 종류(보통주/우선주), 기업 구성
//! - 지표(시가총액, PER, PBR, BPS, EPS, DPS, 배당수익률) 정의
//! - 시계열 포인트, 종목 시계열, 기업 합산 시계열
//! - 기간 분석 결과 및 순위 타입
//! - 분석 대상(포커스) 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
