//! 종목 및 주식 종류 정의.
//!
//! 이 모듈은 종목 관련 타입을 정의합니다:
//! - `SecurityId` - 종목 식별자
//! - `ShareClassKind` - 주식 종류 (보통주, 우선주, 기타)
//! - `ShareClass` - 한 기업이 발행한 개별 종목
//! - `Company` - 기업과 소속 종목 목록

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// 종목 식별자.
///
/// 저장소가 부여한 종목 ID를 그대로 감쌉니다 (예: `KRX-005930`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityId(String);

impl SecurityId {
    /// 새 종목 식별자를 생성합니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 문자열 참조를 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecurityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SecurityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SecurityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SecurityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 주식 종류.
///
/// 원천 데이터는 "보통주"/"우선주" 같은 한글 라벨을 쓰기도 하므로
/// 역직렬화 시 두 표기를 모두 받습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareClassKind {
    /// 보통주
    #[serde(alias = "보통주")]
    Common,
    /// 우선주
    #[serde(alias = "우선주")]
    Preferred,
    /// 기타 (전환우선주, 신형우선주 등)
    #[serde(alias = "기타")]
    Other,
}

impl ShareClassKind {
    /// 보통주인지 여부를 반환합니다.
    pub fn is_common(self) -> bool {
        matches!(self, ShareClassKind::Common)
    }

    /// 한글 표시 이름.
    pub fn display_name(self) -> &'static str {
        match self {
            ShareClassKind::Common => "보통주",
            ShareClassKind::Preferred => "우선주",
            ShareClassKind::Other => "기타",
        }
    }
}

impl fmt::Display for ShareClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareClassKind::Common => write!(f, "common"),
            ShareClassKind::Preferred => write!(f, "preferred"),
            ShareClassKind::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ShareClassKind {
    type Err = std::convert::Infallible;

    /// 알 수 없는 라벨은 `Other`로 분류합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "common" | "보통주" => ShareClassKind::Common,
            "preferred" | "우선주" => ShareClassKind::Preferred,
            _ => ShareClassKind::Other,
        })
    }
}

/// 한 기업이 발행한 개별 종목 (주식 종류).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareClass {
    /// 종목 식별자
    pub security_id: SecurityId,
    /// 주식 종류
    #[serde(rename = "type")]
    pub kind: ShareClassKind,
    /// 종목 코드 (예: 005930)
    pub ticker: String,
    /// 거래소 (예: KOSPI, KOSDAQ)
    pub exchange: String,
    /// 종목명
    pub name: String,
}

impl ShareClass {
    /// 새 종목을 생성합니다.
    pub fn new(
        security_id: impl Into<SecurityId>,
        kind: ShareClassKind,
        ticker: impl Into<String>,
        exchange: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            security_id: security_id.into(),
            kind,
            ticker: ticker.into(),
            exchange: exchange.into(),
            name: name.into(),
        }
    }

    /// 보통주인지 여부를 반환합니다.
    pub fn is_common(&self) -> bool {
        self.kind.is_common()
    }
}

/// 기업과 소속 종목 목록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// 기업 식별자
    pub company_id: String,
    /// 기업명
    pub name: String,
    /// 소속 종목 목록 (표시 순서)
    #[serde(default)]
    pub share_classes: Vec<ShareClass>,
}

impl Company {
    /// 새 기업을 생성합니다.
    pub fn new(company_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            name: name.into(),
            share_classes: Vec::new(),
        }
    }

    /// 종목을 추가합니다.
    pub fn with_share_class(mut self, share_class: ShareClass) -> Self {
        self.share_classes.push(share_class);
        self
    }

    /// 종목 식별자로 종목을 찾습니다.
    pub fn share_class(&self, security_id: &str) -> Option<&ShareClass> {
        self.share_classes
            .iter()
            .find(|c| c.security_id.as_str() == security_id)
    }

    /// 기업을 대표하는 종목을 반환합니다.
    ///
    /// 첫 번째 보통주, 보통주가 없으면 첫 번째 종목입니다.
    pub fn representative_common(&self) -> Option<&ShareClass> {
        self.share_classes
            .iter()
            .find(|c| c.is_common())
            .or_else(|| self.share_classes.first())
    }

    /// 소속 종목 식별자 목록.
    pub fn security_ids(&self) -> Vec<SecurityId> {
        self.share_classes
            .iter()
            .map(|c| c.security_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samsung() -> Company {
        Company::new("C-SAMSUNG", "삼성전자")
            .with_share_class(ShareClass::new(
                "KRX-005935",
                ShareClassKind::Preferred,
                "005935",
                "KOSPI",
                "삼성전자우",
            ))
            .with_share_class(ShareClass::new(
                "KRX-005930",
                ShareClassKind::Common,
                "005930",
                "KOSPI",
                "삼성전자",
            ))
    }

    #[test]
    fn test_representative_common() {
        let company = samsung();
        let rep = company.representative_common().unwrap();
        assert_eq!(rep.security_id.as_str(), "KRX-005930");
    }

    #[test]
    fn test_representative_without_common() {
        let company = Company::new("C-X", "X").with_share_class(ShareClass::new(
            "P1",
            ShareClassKind::Preferred,
            "000001",
            "KOSPI",
            "X우",
        ));
        assert_eq!(
            company.representative_common().unwrap().security_id.as_str(),
            "P1"
        );
        assert!(Company::new("C-Y", "Y").representative_common().is_none());
    }

    #[test]
    fn test_share_class_kind_korean_labels() {
        let kind: ShareClassKind = serde_json::from_str("\"우선주\"").unwrap();
        assert_eq!(kind, ShareClassKind::Preferred);
        let kind: ShareClassKind = serde_json::from_str("\"common\"").unwrap();
        assert_eq!(kind, ShareClassKind::Common);
        assert_eq!("전환우선주".parse::<ShareClassKind>().unwrap(), ShareClassKind::Other);
    }

    #[test]
    fn test_share_class_deserialize() {
        let json = r#"{
            "security_id": "KRX-005930",
            "type": "보통주",
            "ticker": "005930",
            "exchange": "KOSPI",
            "name": "삼성전자"
        }"#;
        let class: ShareClass = serde_json::from_str(json).unwrap();
        assert!(class.is_common());
        assert_eq!(class.security_id, SecurityId::new("KRX-005930"));
    }
}
