//! 메모리/JSON 파일 기반 데이터 제공자.
//!
//! 데이터셋 파일 형식:
//!
//! ```json
//! {
//!   "companies": [
//!     { "company_id": "C-SAMSUNG", "name": "삼성전자", "share_classes": [
//!         { "security_id": "KRX-005930", "type": "common", "ticker": "005930",
//!           "exchange": "KOSPI", "name": "삼성전자" } ] }
//!   ],
//!   "series": { "KRX-005930": { "market-cap": [ { "date": "2024-01-02", "value": 100 } ] } },
//!   "ranks": { "KRX-005930": { "market-cap": { "current_rank": 1, "prior_rank": 1 } } }
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use equity_core::{Company, Metric, RankSnapshot, RawRow, SecurityId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DataError, Result};
use crate::source::SeriesSource;

/// 데이터셋 (기업 구성 + 종목별 원시 행 + 순위).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// 기업 목록
    #[serde(default)]
    pub companies: Vec<Company>,
    /// 종목 → 지표 → 원시 행
    #[serde(default)]
    pub series: HashMap<SecurityId, HashMap<Metric, Vec<RawRow>>>,
    /// 종목 → 지표 → 순위 스냅샷
    #[serde(default)]
    pub ranks: HashMap<SecurityId, HashMap<Metric, RankSnapshot>>,
}

impl Dataset {
    /// JSON 문자열에서 데이터셋을 파싱합니다.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSON 파일에서 데이터셋을 읽습니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let dataset = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            companies = dataset.companies.len(),
            securities = dataset.series.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }
}

/// 메모리 데이터 제공자.
///
/// 테스트와 CLI에서 사용합니다. `with_failure`로 지정한 종목은
/// 조회 시 `FetchError`를 반환합니다.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesSource {
    dataset: Dataset,
    failing: HashSet<SecurityId>,
}

impl InMemorySeriesSource {
    /// 빈 제공자를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 데이터셋에서 제공자를 생성합니다.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            dataset,
            failing: HashSet::new(),
        }
    }

    /// JSON 데이터셋 파일에서 제공자를 생성합니다.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_dataset(Dataset::load(path).await?))
    }

    /// 기업을 추가합니다.
    pub fn with_company(mut self, company: Company) -> Self {
        self.dataset.companies.push(company);
        self
    }

    /// 종목의 지표 원시 행을 설정합니다.
    pub fn with_rows(
        mut self,
        security_id: impl Into<SecurityId>,
        metric: Metric,
        rows: Vec<RawRow>,
    ) -> Self {
        self.dataset
            .series
            .entry(security_id.into())
            .or_default()
            .insert(metric, rows);
        self
    }

    /// 종목의 순위 스냅샷을 설정합니다.
    pub fn with_rank(
        mut self,
        security_id: impl Into<SecurityId>,
        metric: Metric,
        snapshot: RankSnapshot,
    ) -> Self {
        self.dataset
            .ranks
            .entry(security_id.into())
            .or_default()
            .insert(metric, snapshot);
        self
    }

    /// 해당 종목 조회가 실패하도록 설정합니다.
    pub fn with_failure(mut self, security_id: impl Into<SecurityId>) -> Self {
        self.failing.insert(security_id.into());
        self
    }

    /// 내부 데이터셋.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl SeriesSource for InMemorySeriesSource {
    async fn fetch_company(&self, company_id: &str) -> Result<Company> {
        self.dataset
            .companies
            .iter()
            .find(|c| c.company_id == company_id)
            .cloned()
            .ok_or_else(|| DataError::NotFound(format!("company {}", company_id)))
    }

    async fn fetch_rows(&self, security_id: &SecurityId, metric: Metric) -> Result<Vec<RawRow>> {
        if self.failing.contains(security_id) {
            return Err(DataError::FetchError(format!(
                "simulated failure for {} ({})",
                security_id, metric
            )));
        }

        Ok(self
            .dataset
            .series
            .get(security_id)
            .and_then(|by_metric| by_metric.get(&metric))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_rank(
        &self,
        security_id: &SecurityId,
        metric: Metric,
    ) -> Result<Option<RankSnapshot>> {
        if self.failing.contains(security_id) {
            return Err(DataError::FetchError(format!(
                "simulated failure for {} rank ({})",
                security_id, metric
            )));
        }

        Ok(self
            .dataset
            .ranks
            .get(security_id)
            .and_then(|by_metric| by_metric.get(&metric))
            .copied())
    }
}
