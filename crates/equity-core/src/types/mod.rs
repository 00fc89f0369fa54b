//! 분석 엔진 전반에서 사용되는 공통 타입.

mod metric;
mod security;

pub use metric::*;
pub use security::*;
