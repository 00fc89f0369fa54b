//! 기업 분석 서비스.
//!
//! 데이터 제공자([`SeriesSource`])에서 기업의 종목별 원시 행을 받아
//! 정규화 → 합산 → 선택 상태 결정 → 기간/분포 분석까지 한 번에 수행합니다.
//!
//! 종목 하나의 조회 실패는 전체를 실패시키지 않고 해당 종목만 제외됩니다.
//! 순위 조회 실패는 "순위 없음"으로 처리됩니다.

use chrono::NaiveDate;
use equity_core::{
    security_span, AggregatedHistory, AnalyticsConfig, AppConfig, Company, DatedPoint,
    EquityError, Focus, Metric, NavigationConfig, PeriodAnalysis, RankSnapshot, SecurityId,
    SecuritySeries, SelectionState, ShareClassKind,
};
use equity_data::{fetch_company_rows, SeriesSource};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};

use crate::aggregator::aggregate;
use crate::distribution::{calendar_heatmap, value_histogram, HeatmapRow, HistogramBin};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::normalizer::normalize;
use crate::period::PeriodCalculator;
use crate::selection::{NavigationContext, NavigationTarget, SelectionMachine};

/// 기업의 지표 이력 (종목별 시계열 + 합산).
#[derive(Debug, Clone, Serialize)]
pub struct CompanyHistory {
    /// 기업
    pub company: Company,
    /// 지표
    pub metric: Metric,
    /// 조회에 성공한 종목별 시계열 (기업의 종목 순서)
    pub series: Vec<SecuritySeries>,
    /// 조회에 실패해 제외된 종목
    pub failed: Vec<SecurityId>,
    /// 날짜별 합산 이력
    pub history: AggregatedHistory,
}

impl CompanyHistory {
    /// 종목 시계열을 찾습니다.
    pub fn series_for(&self, security_id: &SecurityId) -> Option<&SecuritySeries> {
        self.series.iter().find(|s| s.security_id() == security_id)
    }
}

/// 종목 요약 카드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    /// 종목 식별자
    pub security_id: SecurityId,
    /// 종목 유형
    pub kind: ShareClassKind,
    /// 종목명
    pub name: String,
    /// 최신 포인트 (데이터 없으면 `None`)
    pub latest: Option<DatedPoint>,
}

/// 기업 분석 보고서.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyReport {
    /// 기업 식별자
    pub company_id: String,
    /// 기업명
    pub company_name: String,
    /// 지표
    pub metric: Metric,
    /// 선택 상태
    pub selection: SelectionState,
    /// 현재 선택을 다시 불러오는 주소
    pub navigation_target: Option<String>,
    /// 선택 대상의 기간 분석
    pub analysis: PeriodAnalysis,
    /// 선택 대상의 월 × 연도 히트맵
    pub heatmap: Vec<HeatmapRow>,
    /// 선택 대상의 값 히스토그램 (구간 폭이 없는 지표는 빈 목록)
    pub histogram: Vec<HistogramBin>,
    /// 종목별 요약
    pub classes: Vec<ClassSummary>,
    /// 조회에 실패해 제외된 종목
    pub failed: Vec<SecurityId>,
}

/// 기업 분석 서비스.
pub struct CompanyAnalytics<S> {
    /// 원시 데이터 제공자
    source: S,
    /// 분석 설정
    analytics: AnalyticsConfig,
    /// 주소 설정
    navigation: NavigationConfig,
}

impl<S: SeriesSource> CompanyAnalytics<S> {
    /// 기본 설정으로 서비스를 생성합니다.
    pub fn new(source: S) -> Self {
        Self {
            source,
            analytics: AnalyticsConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }

    /// 애플리케이션 설정을 적용합니다.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.analytics = config.analytics.clone();
        self.navigation = config.navigation.clone();
        self
    }

    /// 데이터 제공자.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// 주소 설정.
    pub fn navigation_config(&self) -> &NavigationConfig {
        &self.navigation
    }

    /// 기업 정보를 조회합니다.
    pub async fn company(&self, company_id: &str) -> AnalyticsResult<Company> {
        Ok(self.source.fetch_company(company_id).await?)
    }

    /// 기업의 지표 이력을 조회하고 합산합니다.
    pub async fn history(
        &self,
        company_id: &str,
        metric: Metric,
    ) -> AnalyticsResult<CompanyHistory> {
        let span = security_span!("company_history", company_id, metric);
        async {
            let company = self.company(company_id).await?;
            Ok::<_, AnalyticsError>(self.load_history(company, metric).await)
        }
        .instrument(span)
        .await
    }

    /// 주소 문자열로 분석 보고서를 만듭니다.
    pub async fn report_for_path(
        &self,
        company_id: &str,
        metric: Metric,
        path: &str,
        as_of: Option<NaiveDate>,
    ) -> AnalyticsResult<CompanyReport> {
        let context = NavigationContext::from_path(path, &self.navigation)
            .ok_or_else(|| AnalyticsError::InvalidPath(path.to_string()))?;
        self.report(company_id, metric, &context, as_of).await
    }

    /// 분석 보고서를 만듭니다.
    ///
    /// # 인자
    ///
    /// * `company_id` - 기업 식별자
    /// * `metric` - 분석 지표
    /// * `context` - 페이지 주소 정보 (선택 상태 결정에 사용)
    /// * `as_of` - 기준일 (없으면 마지막 데이터 날짜)
    pub async fn report(
        &self,
        company_id: &str,
        metric: Metric,
        context: &NavigationContext,
        as_of: Option<NaiveDate>,
    ) -> AnalyticsResult<CompanyReport> {
        let span = security_span!("company_report", company_id, metric, context.security_id);
        self.build_report(company_id, metric, Some(context), as_of)
            .instrument(span)
            .await
    }

    /// 기업 합산 보기 보고서를 만듭니다 (주소 없이).
    pub async fn aggregate_report(
        &self,
        company_id: &str,
        metric: Metric,
        as_of: Option<NaiveDate>,
    ) -> AnalyticsResult<CompanyReport> {
        let span = security_span!("company_report", company_id, metric, Focus::Aggregate);
        self.build_report(company_id, metric, None, as_of)
            .instrument(span)
            .await
    }

    async fn build_report(
        &self,
        company_id: &str,
        metric: Metric,
        context: Option<&NavigationContext>,
        as_of: Option<NaiveDate>,
    ) -> AnalyticsResult<CompanyReport> {
        // 설정 오류는 데이터 조회 전에 확인
        let calculator = PeriodCalculator::new(self.analytics.windows_for(metric))?;
        let bin_width = self.analytics.bin_width_for(metric);
        if let Some(width) = bin_width.filter(|w| *w <= Decimal::ZERO) {
            return Err(EquityError::InvalidBinWidth(format!(
                "구간 폭은 양수여야 합니다: {}",
                width
            ))
            .into());
        }

        let company = self.company(company_id).await?;
        let machine = SelectionMachine::new(&company);
        let selection = context
            .map(|context| machine.resolve(context))
            .unwrap_or_else(SelectionState::aggregate_from_url);

        let rank_target = selection
            .focus
            .security_id()
            .cloned()
            .or_else(|| company.representative_common().map(|c| c.security_id.clone()));

        // 시계열과 순위를 동시에 조회
        let (history, rank) = futures::join!(
            self.load_history(company.clone(), metric),
            self.load_rank(rank_target.as_ref(), metric)
        );

        let column = history.history.column(&selection.focus);
        let analysis = calculator.analyze(&column, as_of, rank);
        let heatmap = calendar_heatmap(&column);
        // 값 범위가 너무 넓으면 히스토그램만 비움
        let histogram = match bin_width {
            Some(width) => value_histogram(&column, width).unwrap_or_else(|e| {
                warn!(error = %e, "Histogram skipped");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let navigation_target = canonical_target(&machine, &company, &selection.focus)
            .map(|target| target.to_path(&self.navigation));

        let classes = company
            .share_classes
            .iter()
            .map(|class| ClassSummary {
                security_id: class.security_id.clone(),
                kind: class.kind,
                name: class.name.clone(),
                latest: history
                    .series_for(&class.security_id)
                    .and_then(|s| s.last().copied()),
            })
            .collect();

        info!(
            focus = %selection.focus,
            points = column.len(),
            periods = analysis.periods.len(),
            failed = history.failed.len(),
            "Company report built"
        );

        Ok(CompanyReport {
            company_id: company.company_id.clone(),
            company_name: company.name.clone(),
            metric,
            selection,
            navigation_target,
            analysis,
            heatmap,
            histogram,
            classes,
            failed: history.failed,
        })
    }

    async fn load_history(&self, company: Company, metric: Metric) -> CompanyHistory {
        let rows = fetch_company_rows(&self.source, &company, metric).await;

        let series: Vec<SecuritySeries> = rows
            .securities
            .iter()
            .map(|security| normalize(security.security_id.clone(), &security.rows))
            .collect();
        let history = aggregate(&series);

        debug!(
            securities = series.len(),
            failed = rows.failed.len(),
            dates = history.len(),
            "Company history loaded"
        );

        CompanyHistory {
            company,
            metric,
            series,
            failed: rows.failed,
            history,
        }
    }

    async fn load_rank(
        &self,
        security_id: Option<&SecurityId>,
        metric: Metric,
    ) -> Option<RankSnapshot> {
        let security_id = security_id?;
        match self.source.fetch_rank(security_id, metric).await {
            Ok(rank) => rank,
            Err(e) => {
                warn!(
                    security_id = %security_id,
                    error = %e,
                    "Failed to load rank, continuing without rank"
                );
                None
            }
        }
    }
}

/// 현재 선택을 재현하는 주소.
fn canonical_target(
    machine: &SelectionMachine<'_>,
    company: &Company,
    focus: &Focus,
) -> Option<NavigationTarget> {
    match focus {
        Focus::Aggregate => machine.aggregate_target(),
        Focus::Focused(id) => company.share_class(id.as_str()).map(|class| NavigationTarget {
            security_id: class.security_id.clone(),
            focus: class.is_common(),
        }),
    }
}
