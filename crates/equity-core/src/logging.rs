//! tracing 로깅 초기화.
//!
//! 설정 파일의 `[logging]` 섹션을 기본으로 하고, `RUST_LOG`/`LOG_FORMAT`
//! 환경 변수가 있으면 그 값을 우선합니다. 로그는 stderr로 나갑니다.

use crate::config::LoggingConfig;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식 (개발용)
    Pretty,
    /// 로그 집계용 JSON 형식 (운영용)
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::Pretty
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 로그 레벨 필터 (예: "info", "debug", "equity_analytics=debug")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// span 이벤트 포함 여부 (진입/종료)
    pub with_span_events: bool,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
    /// 스레드 ID 포함 여부
    pub with_thread_ids: bool,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_span_events: false,
            with_file: true,
            with_thread_ids: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 설정 파일의 로깅 섹션에서 설정을 생성합니다.
    ///
    /// 알 수 없는 형식 문자열은 pretty로 대체합니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format.parse().unwrap_or_default(),
            ..Default::default()
        }
    }

    /// `RUST_LOG`, `LOG_FORMAT` 환경 변수로 덮어씁니다.
    pub fn with_env_overrides(self) -> Self {
        let level = std::env::var("RUST_LOG").ok();
        let format = std::env::var("LOG_FORMAT").ok();
        self.with_overrides(level, format.as_deref())
    }

    /// 주어진 값이 있을 때만 레벨과 형식을 바꿉니다.
    ///
    /// 빈 레벨이나 알 수 없는 형식은 무시합니다.
    pub fn with_overrides(mut self, level: Option<String>, format: Option<&str>) -> Self {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.and_then(|f| f.parse().ok()) {
            self.format = format;
        }
        self
    }
}

/// 주어진 설정으로 로깅 시스템을 초기화합니다.
///
/// # 예제
///
/// ```no_run
/// use equity_core::logging::{init_logging, LogConfig};
/// use equity_core::LoggingConfig;
///
/// let config = LogConfig::from_settings(&LoggingConfig::default()).with_env_overrides();
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let span_events = if config.with_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    // 공통 옵션은 형식과 무관하게 한 번만 설정. stdout은 결과 출력용
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .with_thread_ids(config.with_thread_ids)
        .with_target(config.with_target)
        .with_span_events(span_events);
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).try_init()?,
        LogFormat::Json => registry.with(fmt_layer.json()).try_init()?,
        LogFormat::Compact => registry.with(fmt_layer.compact()).try_init()?,
    }

    tracing::info!(
        format = ?config.format,
        level = %config.level,
        "Logging initialized"
    );

    Ok(())
}

/// 종목/지표 컨텍스트 필드가 포함된 span을 생성하는 매크로.
#[macro_export]
macro_rules! security_span {
    ($name:expr, $company:expr) => {
        tracing::info_span!($name, company = %$company)
    };
    ($name:expr, $company:expr, $metric:expr) => {
        tracing::info_span!($name, company = %$company, metric = %$metric)
    };
    ($name:expr, $company:expr, $metric:expr, $focus:expr) => {
        tracing::info_span!(
            $name,
            company = %$company,
            metric = %$metric,
            focus = %$focus
        )
    };
}
