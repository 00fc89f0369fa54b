//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 기본값 → 설정 파일(TOML) → `EQUITY__` 접두사 환경 변수 순으로 덮어씁니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::domain::PeriodWindow;
use crate::types::Metric;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 분석 설정
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// 내비게이션(URL) 설정
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 분석 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// 기간 목록 재정의. 비어 있으면 지표별 기본값을 사용합니다.
    #[serde(default)]
    pub windows: Vec<PeriodWindow>,
    /// 지표별 히스토그램 구간 폭 재정의
    #[serde(default)]
    pub bin_widths: HashMap<Metric, Decimal>,
}

impl AnalyticsConfig {
    /// 지표에 적용할 기간 목록.
    pub fn windows_for(&self, metric: Metric) -> Vec<PeriodWindow> {
        if self.windows.is_empty() {
            metric.default_windows()
        } else {
            self.windows.clone()
        }
    }

    /// 지표에 적용할 히스토그램 구간 폭.
    pub fn bin_width_for(&self, metric: Metric) -> Option<Decimal> {
        self.bin_widths
            .get(&metric)
            .copied()
            .or_else(|| metric.default_bin_width())
    }
}

/// 내비게이션(URL) 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavigationConfig {
    /// 종목 페이지 경로 접두사
    pub path_prefix: String,
    /// 포커스 신호 쿼리 파라미터 이름
    pub focus_param: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/security".to_string(),
            focus_param: "focus".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::builder()?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(Self::env_source())
            .build()?
            .try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다. 파일이 없으면 기본값을 사용합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(Self::env_source())
            .build()?
            .try_deserialize()
    }

    fn builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("navigation.path_prefix", "/security")?
            .set_default("navigation.focus_param", "focus")
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix("EQUITY")
            .separator("__")
            .try_parsing(true)
    }
}
