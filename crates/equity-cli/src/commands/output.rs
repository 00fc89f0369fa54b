//! 명령 결과 출력.

use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 들여쓰기된 JSON
    #[default]
    Pretty,
    /// 한 줄 JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" | "compact" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Use: pretty, json", s)),
        }
    }
}

/// 값을 JSON 문자열로 변환합니다.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
        OutputFormat::Json => serde_json::to_string(value),
    }
    .context("Failed to serialize command output")
}
