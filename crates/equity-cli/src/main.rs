//! 밸류에이션 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 현대차 시가총액 합산 이력 (보통주 + 우선주)
//! equity -d data/dataset.json aggregate -c C-HYUNDAI -m market-cap
//!
//! # 삼성전자우 PER 기간 분석
//! equity -d data/dataset.json analyze -c C-SAMSUNG -m per --url /security/KRX-005935
//!
//! # 배당수익률 히스토그램 (구간 폭 0.25%p)
//! equity -d data/dataset.json histogram -c C-SAMSUNG -m dividend-yield --bin-width 0.25
//!
//! # 보통주 페이지에서 우선주 칩 클릭
//! equity -d data/dataset.json select -c C-SAMSUNG --url /security/KRX-005930 --click KRX-005935
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, warn};

use equity_cli::commands::output::{render, OutputFormat};
use equity_cli::commands::report::{
    aggregate_history, build_report, histogram_output, open_service, AnalysisOutput,
    HeatmapOutput, ReportRequest,
};
use equity_cli::commands::select::{simulate, Click};
use equity_core::logging::{init_logging, LogConfig};
use equity_core::{AppConfig, Metric, SecurityId};
use equity_data::SeriesSource;

#[derive(Parser)]
#[command(name = "equity")]
#[command(about = "Equity valuation analytics CLI - 종목/기업 밸류에이션 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON 데이터셋 경로
    #[arg(short, long, global = true, default_value = "data/dataset.json")]
    data: PathBuf,

    /// 설정 파일 (기본: config/default.toml, 없으면 기본값)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 출력 형식 (pretty, json)
    #[arg(short, long, global = true, default_value = "pretty")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 기업 합산 이력 (날짜별 합계와 종목별 내역)
    Aggregate {
        /// 기업 식별자
        #[arg(short, long)]
        company: String,

        /// 지표 (close, market-cap, per, pbr, bps, eps, dps, dividend-yield)
        #[arg(short, long)]
        metric: Metric,
    },

    /// 기간 분석 (현재값, 기간 평균, 최소/최대, 순위)
    Analyze {
        /// 기업 식별자
        #[arg(short, long)]
        company: String,

        /// 지표
        #[arg(short, long)]
        metric: Metric,

        /// 페이지 주소 (예: /security/KRX-005930?focus=true). 없으면 기업 합산
        #[arg(long)]
        url: Option<String>,

        /// 기준일 (YYYY-MM-DD, 기본: 마지막 데이터 날짜)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// 월 × 연도 히트맵
    Heatmap {
        /// 기업 식별자
        #[arg(short, long)]
        company: String,

        /// 지표
        #[arg(short, long)]
        metric: Metric,

        /// 페이지 주소
        #[arg(long)]
        url: Option<String>,
    },

    /// 값 히스토그램
    Histogram {
        /// 기업 식별자
        #[arg(short, long)]
        company: String,

        /// 지표
        #[arg(short, long)]
        metric: Metric,

        /// 페이지 주소
        #[arg(long)]
        url: Option<String>,

        /// 구간 폭 (기본: 지표별 기본값 또는 설정 파일)
        #[arg(long)]
        bin_width: Option<Decimal>,
    },

    /// 주소 로드 후 클릭을 적용한 선택 상태
    Select {
        /// 기업 식별자
        #[arg(short, long)]
        company: String,

        /// 페이지 주소
        #[arg(long)]
        url: String,

        /// 클릭할 종목
        #[arg(long, conflicts_with = "aggregate")]
        click: Option<String>,

        /// 합산 칩 클릭
        #[arg(long, default_value = "false")]
        aggregate: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };

    // 설정 파일 값 위에 RUST_LOG / LOG_FORMAT
    init_logging(LogConfig::from_settings(&config.logging).with_env_overrides())
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    // 히스토그램 구간 폭은 서비스 생성 전에 반영
    if let Commands::Histogram {
        metric,
        bin_width: Some(width),
        ..
    } = &cli.command
    {
        config.analytics.bin_widths.insert(*metric, *width);
    }

    let service = open_service(&cli.data, &config).await?;

    let rendered = match cli.command {
        Commands::Aggregate { company, metric } => {
            let output = aggregate_history(&service, &company, metric).await?;
            if !output.failed.is_empty() {
                warn!(failed = ?output.failed, "Some securities could not be loaded");
            }
            render(&output, cli.format)?
        }

        Commands::Analyze {
            company,
            metric,
            url,
            as_of,
        } => {
            let request = ReportRequest {
                company,
                metric,
                url,
                as_of,
            };
            let report = build_report(&service, &request).await?;
            render(&AnalysisOutput::from(report), cli.format)?
        }

        Commands::Heatmap {
            company,
            metric,
            url,
        } => {
            let request = ReportRequest {
                company,
                metric,
                url,
                as_of: None,
            };
            let report = build_report(&service, &request).await?;
            render(&HeatmapOutput::from(report), cli.format)?
        }

        Commands::Histogram {
            company,
            metric,
            url,
            ..
        } => {
            let bin_width = config.analytics.bin_width_for(metric);
            if bin_width.is_none() {
                info!(metric = %metric, "No bin width for metric, histogram will be empty");
            }
            let request = ReportRequest {
                company,
                metric,
                url,
                as_of: None,
            };
            let report = build_report(&service, &request).await?;
            render(&histogram_output(report, bin_width), cli.format)?
        }

        Commands::Select {
            company,
            url,
            click,
            aggregate,
        } => {
            let company = service.source().fetch_company(&company).await?;
            let click = match (click, aggregate) {
                (Some(id), _) => Some(Click::ShareClass(SecurityId::new(id))),
                (None, true) => Some(Click::Aggregate),
                (None, false) => None,
            };
            let output = simulate(&company, service.navigation_config(), &url, click)?;
            render(&output, cli.format)?
        }
    };

    println!("{}", rendered);
    Ok(())
}
