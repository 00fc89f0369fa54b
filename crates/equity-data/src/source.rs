//! 원시 데이터 제공자 trait.
//!
//! 실제 저장소/쿼리 계층은 이 trait 뒤에 숨습니다.
//! 분석 엔진은 기업 구성, 종목별 원시 행, 순위 스냅샷만 요청합니다.

use std::sync::Arc;

use async_trait::async_trait;
use equity_core::{Company, Metric, RankSnapshot, RawRow, SecurityId};

use crate::error::Result;

/// 원시 시계열 제공자.
///
/// 구현체는 요청 간 공유되므로 `Send + Sync`여야 합니다.
/// 타임아웃/재시도는 구현체의 책임입니다.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// 기업과 소속 종목 목록을 조회합니다.
    async fn fetch_company(&self, company_id: &str) -> Result<Company>;

    /// 한 종목의 지표 원시 행을 조회합니다.
    ///
    /// 데이터가 없으면 빈 목록을 반환합니다.
    async fn fetch_rows(&self, security_id: &SecurityId, metric: Metric) -> Result<Vec<RawRow>>;

    /// 지표 기준 시장 전체 순위 스냅샷을 조회합니다.
    ///
    /// 순위 소스가 없는 제공자는 기본 구현(`None`)을 그대로 씁니다.
    async fn fetch_rank(
        &self,
        _security_id: &SecurityId,
        _metric: Metric,
    ) -> Result<Option<RankSnapshot>> {
        Ok(None)
    }
}

#[async_trait]
impl<S: SeriesSource + ?Sized> SeriesSource for Arc<S> {
    async fn fetch_company(&self, company_id: &str) -> Result<Company> {
        (**self).fetch_company(company_id).await
    }

    async fn fetch_rows(&self, security_id: &SecurityId, metric: Metric) -> Result<Vec<RawRow>> {
        (**self).fetch_rows(security_id, metric).await
    }

    async fn fetch_rank(
        &self,
        security_id: &SecurityId,
        metric: Metric,
    ) -> Result<Option<RankSnapshot>> {
        (**self).fetch_rank(security_id, metric).await
    }
}
