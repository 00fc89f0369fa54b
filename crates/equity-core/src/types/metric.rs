//! 밸류에이션 지표 정의.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::PeriodWindow;

/// 종목별 시계열로 제공되는 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// 종가
    Close,
    /// 시가총액
    MarketCap,
    /// 주가수익비율
    Per,
    /// 주가순자산비율
    Pbr,
    /// 주당순자산
    Bps,
    /// 주당순이익
    Eps,
    /// 주당배당금
    Dps,
    /// 배당수익률 (%)
    DividendYield,
}

impl Metric {
    /// 모든 지표.
    pub const ALL: [Metric; 8] = [
        Metric::Close,
        Metric::MarketCap,
        Metric::Per,
        Metric::Pbr,
        Metric::Bps,
        Metric::Eps,
        Metric::Dps,
        Metric::DividendYield,
    ];

    /// 직렬화/CLI에서 쓰는 키.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Close => "close",
            Metric::MarketCap => "market-cap",
            Metric::Per => "per",
            Metric::Pbr => "pbr",
            Metric::Bps => "bps",
            Metric::Eps => "eps",
            Metric::Dps => "dps",
            Metric::DividendYield => "dividend-yield",
        }
    }

    /// 한글 표시 이름.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Close => "종가",
            Metric::MarketCap => "시가총액",
            Metric::Per => "PER",
            Metric::Pbr => "PBR",
            Metric::Bps => "BPS",
            Metric::Eps => "EPS",
            Metric::Dps => "DPS",
            Metric::DividendYield => "배당수익률",
        }
    }

    /// 기업 단위로 합산했을 때 의미가 있는 지표인지 여부.
    ///
    /// 시가총액은 종목별 합이 곧 기업 시가총액이지만,
    /// 비율/주당 지표의 합은 참고용 값입니다.
    pub fn is_additive(self) -> bool {
        matches!(self, Metric::MarketCap)
    }

    /// 분포 차트의 기본 구간 폭.
    ///
    /// 가격 단위 지표는 종목마다 스케일이 달라 기본값이 없습니다.
    pub fn default_bin_width(self) -> Option<Decimal> {
        match self {
            Metric::DividendYield => Some(dec!(0.5)),
            Metric::Per => Some(dec!(1)),
            Metric::Pbr => Some(dec!(0.1)),
            Metric::Close | Metric::MarketCap | Metric::Bps | Metric::Eps | Metric::Dps => None,
        }
    }

    /// 지표별 기본 기간 목록.
    ///
    /// 재무 비율/주당 지표는 10년까지, 가격과 시가총액은 30년까지 봅니다.
    pub fn default_windows(self) -> Vec<PeriodWindow> {
        match self {
            Metric::Close | Metric::MarketCap => PeriodWindow::canonical(),
            Metric::Per
            | Metric::Pbr
            | Metric::Bps
            | Metric::Eps
            | Metric::Dps
            | Metric::DividendYield => PeriodWindow::canonical_up_to(120),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "close" | "price" => Ok(Metric::Close),
            "market-cap" | "marketcap" => Ok(Metric::MarketCap),
            "per" => Ok(Metric::Per),
            "pbr" => Ok(Metric::Pbr),
            "bps" => Ok(Metric::Bps),
            "eps" => Ok(Metric::Eps),
            "dps" => Ok(Metric::Dps),
            "dividend-yield" | "dy" => Ok(Metric::DividendYield),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}
