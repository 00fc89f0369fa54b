//! 합산 이력과 분석 보고서 명령.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use equity_analytics::{CompanyAnalytics, CompanyReport, HeatmapRow, HistogramBin};
use equity_core::{
    AggregatedHistory, AppConfig, Metric, PeriodAnalysis, SecurityId, SelectionState,
};
use equity_data::InMemorySeriesSource;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// 보고서 요청.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// 기업 식별자
    pub company: String,
    /// 지표
    pub metric: Metric,
    /// 페이지 주소 (없으면 기업 합산 보기)
    pub url: Option<String>,
    /// 기준일
    pub as_of: Option<NaiveDate>,
}

/// `aggregate` 명령 출력.
#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub company_id: String,
    pub metric: Metric,
    pub failed: Vec<SecurityId>,
    pub points: AggregatedHistory,
}

/// `heatmap` 명령 출력.
#[derive(Debug, Serialize)]
pub struct HeatmapOutput {
    pub company_id: String,
    pub metric: Metric,
    pub selection: SelectionState,
    pub rows: Vec<HeatmapRow>,
}

/// `histogram` 명령 출력.
#[derive(Debug, Serialize)]
pub struct HistogramOutput {
    pub company_id: String,
    pub metric: Metric,
    pub selection: SelectionState,
    pub bin_width: Option<Decimal>,
    pub bins: Vec<HistogramBin>,
}

/// `analyze` 명령 출력.
#[derive(Debug, Serialize)]
pub struct AnalysisOutput {
    pub company_id: String,
    pub metric: Metric,
    pub selection: SelectionState,
    pub navigation_target: Option<String>,
    pub analysis: PeriodAnalysis,
}

/// 데이터셋 파일로 분석 서비스를 생성합니다.
pub async fn open_service(
    data: &Path,
    config: &AppConfig,
) -> Result<CompanyAnalytics<InMemorySeriesSource>> {
    let source = InMemorySeriesSource::from_json_file(data)
        .await
        .with_context(|| format!("Failed to load dataset: {}", data.display()))?;

    info!(
        path = %data.display(),
        companies = source.dataset().companies.len(),
        "Dataset loaded"
    );

    Ok(CompanyAnalytics::new(source).with_config(config))
}

/// 기업 합산 이력을 조회합니다.
pub async fn aggregate_history(
    service: &CompanyAnalytics<InMemorySeriesSource>,
    company: &str,
    metric: Metric,
) -> Result<HistoryOutput> {
    let history = service.history(company, metric).await?;

    Ok(HistoryOutput {
        company_id: history.company.company_id,
        metric,
        failed: history.failed,
        points: history.history,
    })
}

/// 요청에 맞는 보고서를 만듭니다.
pub async fn build_report(
    service: &CompanyAnalytics<InMemorySeriesSource>,
    request: &ReportRequest,
) -> Result<CompanyReport> {
    let report = match &request.url {
        Some(url) => {
            service
                .report_for_path(&request.company, request.metric, url, request.as_of)
                .await?
        }
        None => {
            service
                .aggregate_report(&request.company, request.metric, request.as_of)
                .await?
        }
    };
    Ok(report)
}

impl From<CompanyReport> for AnalysisOutput {
    fn from(report: CompanyReport) -> Self {
        Self {
            company_id: report.company_id,
            metric: report.metric,
            selection: report.selection,
            navigation_target: report.navigation_target,
            analysis: report.analysis,
        }
    }
}

impl From<CompanyReport> for HeatmapOutput {
    fn from(report: CompanyReport) -> Self {
        Self {
            company_id: report.company_id,
            metric: report.metric,
            selection: report.selection,
            rows: report.heatmap,
        }
    }
}

/// 히스토그램 출력을 만듭니다.
pub fn histogram_output(report: CompanyReport, bin_width: Option<Decimal>) -> HistogramOutput {
    HistogramOutput {
        company_id: report.company_id,
        metric: report.metric,
        selection: report.selection,
        bin_width,
        bins: report.histogram,
    }
}
