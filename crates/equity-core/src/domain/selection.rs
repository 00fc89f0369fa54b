//! 분석 대상(포커스) 타입.
//!
//! 차트, 요약 카드, 순위 패널이 모두 같은 대상을 보도록
//! "기업 합산"과 "특정 종목" 두 가지 상태만 허용합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::SecurityId;

/// 현재 분석 대상.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "security_id", rename_all = "snake_case")]
pub enum Focus {
    /// 기업 합산 (모든 종목의 합)
    #[default]
    Aggregate,
    /// 특정 종목
    Focused(SecurityId),
}

impl Focus {
    /// 기업 합산 상태인지 여부.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Focus::Aggregate)
    }

    /// 특정 종목 상태라면 해당 종목 식별자.
    pub fn security_id(&self) -> Option<&SecurityId> {
        match self {
            Focus::Aggregate => None,
            Focus::Focused(id) => Some(id),
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Focus::Aggregate => write!(f, "aggregate"),
            Focus::Focused(id) => write!(f, "{}", id),
        }
    }
}

/// 선택 상태가 어디서 결정되었는지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// 페이지 로드 시 URL에서 복원
    Url,
    /// 사용자 클릭
    Click,
}

/// 선택 상태.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// 분석 대상
    pub focus: Focus,
    /// 결정 출처
    pub source: SelectionSource,
}

impl SelectionState {
    /// 새 선택 상태를 생성합니다.
    pub fn new(focus: Focus, source: SelectionSource) -> Self {
        Self { focus, source }
    }

    /// URL에서 복원된 기업 합산 상태.
    pub fn aggregate_from_url() -> Self {
        Self::new(Focus::Aggregate, SelectionSource::Url)
    }

    /// 차트에서 강조할 종목 식별자. 기업 합산이면 `None`.
    pub fn highlighted_id(&self) -> Option<&SecurityId> {
        self.focus.security_id()
    }

    /// 기업 합산 상태인지 여부.
    pub fn is_aggregate(&self) -> bool {
        self.focus.is_aggregate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_focus() {
        assert_eq!(Focus::default(), Focus::Aggregate);
    }

    #[test]
    fn test_display() {
        assert_eq!(Focus::Aggregate.to_string(), "aggregate");
        assert_eq!(Focus::Focused(SecurityId::new("KRX-005930")).to_string(), "KRX-005930");
    }

    #[test]
    fn test_highlighted_id() {
        let state = SelectionState::new(
            Focus::Focused(SecurityId::new("KRX-005935")),
            SelectionSource::Click,
        );
        assert_eq!(state.highlighted_id().unwrap().as_str(), "KRX-005935");
        assert!(SelectionState::aggregate_from_url().highlighted_id().is_none());
    }

    #[test]
    fn test_focus_serde() {
        let json = serde_json::to_string(&Focus::Focused(SecurityId::new("A"))).unwrap();
        assert_eq!(json, r#"{"kind":"focused","security_id":"A"}"#);
        let back: Focus = serde_json::from_str(r#"{"kind":"aggregate"}"#).unwrap();
        assert_eq!(back, Focus::Aggregate);
    }
}
