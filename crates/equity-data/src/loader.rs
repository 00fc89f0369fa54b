//! 기업 단위 원시 행 병렬 조회.
//!
//! 종목별 조회는 서로 독립적이므로 동시에 요청하고, 모든 요청이 끝날 때까지
//! 기다린 뒤(join) 결과를 돌려줍니다. 한 종목의 조회 실패는 전체를 중단시키지
//! 않고 "해당 종목은 데이터 없음"으로 처리합니다.

use equity_core::{Company, Metric, RawRow, SecurityId};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::source::SeriesSource;

/// 한 종목의 원시 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRows {
    /// 종목 식별자
    pub security_id: SecurityId,
    /// 원시 행
    pub rows: Vec<RawRow>,
}

/// 기업 단위 조회 결과.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyRows {
    /// 성공한 종목 (기업의 종목 순서 유지)
    pub securities: Vec<SecurityRows>,
    /// 조회에 실패한 종목
    pub failed: Vec<SecurityId>,
}

impl CompanyRows {
    /// 모든 종목 조회가 성공했는지 여부.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 기업의 모든 종목에 대해 지표 원시 행을 병렬로 조회합니다.
///
/// # 인자
///
/// * `source` - 원시 데이터 제공자
/// * `company` - 대상 기업
/// * `metric` - 조회할 지표
///
/// # 반환
///
/// 모든 조회가 끝난 뒤의 결과. 실패한 종목은 `failed`에 모입니다.
pub async fn fetch_company_rows<S>(source: &S, company: &Company, metric: Metric) -> CompanyRows
where
    S: SeriesSource + ?Sized,
{
    let futures: Vec<_> = company
        .share_classes
        .iter()
        .map(|class| async move {
            let result = source.fetch_rows(&class.security_id, metric).await;
            (class.security_id.clone(), result)
        })
        .collect();

    // 모든 종목 조회가 끝날 때까지 대기
    let results = join_all(futures).await;

    let mut company_rows = CompanyRows::default();
    for (security_id, result) in results {
        match result {
            Ok(rows) => {
                debug!(
                    company = %company.company_id,
                    security_id = %security_id,
                    metric = %metric,
                    row_count = rows.len(),
                    "Loaded raw rows"
                );
                company_rows.securities.push(SecurityRows { security_id, rows });
            }
            Err(e) => {
                warn!(
                    company = %company.company_id,
                    security_id = %security_id,
                    metric = %metric,
                    error = %e,
                    "Failed to load raw rows, security excluded from aggregation"
                );
                company_rows.failed.push(security_id);
            }
        }
    }

    company_rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySeriesSource;
    use equity_core::{RawValue, ShareClass, ShareClassKind};

    fn company() -> Company {
        Company::new("C1", "테스트")
            .with_share_class(ShareClass::new(
                "COMMON",
                ShareClassKind::Common,
                "000001",
                "KOSPI",
                "테스트",
            ))
            .with_share_class(ShareClass::new(
                "PREF",
                ShareClassKind::Preferred,
                "000005",
                "KOSPI",
                "테스트우",
            ))
    }

    fn row(date: &str, value: i64) -> RawRow {
        RawRow::new(date, Some(RawValue::Integer(value)))
    }

    #[tokio::test]
    async fn test_fetch_all_share_classes() {
        let source = InMemorySeriesSource::new()
            .with_rows("COMMON", Metric::MarketCap, vec![row("2024-01-02", 100)])
            .with_rows("PREF", Metric::MarketCap, vec![row("2024-01-02", 10)]);

        let result = fetch_company_rows(&source, &company(), Metric::MarketCap).await;

        assert!(result.is_complete());
        let ids: Vec<&str> = result
            .securities
            .iter()
            .map(|s| s.security_id.as_str())
            .collect();
        assert_eq!(ids, vec!["COMMON", "PREF"]);
    }

    #[tokio::test]
    async fn test_failed_security_is_excluded() {
        let source = InMemorySeriesSource::new()
            .with_rows("COMMON", Metric::MarketCap, vec![row("2024-01-02", 100)])
            .with_rows("PREF", Metric::MarketCap, vec![row("2024-01-02", 10)])
            .with_failure("PREF");

        let result = fetch_company_rows(&source, &company(), Metric::MarketCap).await;

        assert!(!result.is_complete());
        assert_eq!(result.securities.len(), 1);
        assert_eq!(result.failed, vec![SecurityId::new("PREF")]);
    }

    #[tokio::test]
    async fn test_company_without_share_classes() {
        let source = InMemorySeriesSource::new();
        let empty = Company::new("C2", "빈 기업");

        let result = fetch_company_rows(&source, &empty, Metric::Close).await;
        assert!(result.securities.is_empty());
        assert!(result.is_complete());
    }
}
