//! 밸류에이션 분석 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - JSON 데이터셋 기반 기업 합산 이력 출력
//! - 기간 분석, 히트맵, 히스토그램 보고서
//! - 주소/클릭 기반 선택 상태 시뮬레이션

pub mod commands;
