//! 데이터 접근 계층.
//!
//! 이 crate는 다음을 제공합니다:
//! - 원시 시계열 제공자 trait (`SeriesSource`)
//! - 메모리/JSON 데이터셋 제공자
//! - 기업 단위 병렬 조회 (종목별 실패는 제외 처리)

pub mod error;
pub mod loader;
pub mod memory;
pub mod source;

pub use error::{DataError, Result};
pub use loader::{fetch_company_rows, CompanyRows, SecurityRows};
pub use memory::{Dataset, InMemorySeriesSource};
pub use source::SeriesSource;
