//! 밸류에이션 분석을 위한 도메인 모델.

mod aggregate;
mod period;
mod raw;
mod selection;
mod series;

pub use aggregate::*;
pub use period::*;
pub use raw::*;
pub use selection::*;
pub use series::*;
