//! 종목 선택 상태 머신 (Selection State Machine).
//!
//! 사용자가 보고 있는 대상이 "기업 합산"인지 "특정 종목"인지를 결정하고,
//! 클릭에 따라 이동할 주소를 계산합니다.
//!
//! # 상태 결정 규칙 (주소 로드)
//!
//! | 주소 종목 | focus 신호 | 결과 |
//! |-----------|-----------|------|
//! | 보통주 | 없음 | 기업 합산 |
//! | 보통주 | 있음 | 해당 종목 |
//! | 우선주/기타 | 무관 | 해당 종목 |
//! | 기업에 없는 종목 | 무관 | 기업 합산 |
//!
//! # 클릭
//!
//! - 종목 클릭: 해당 종목으로 이동. 보통주면 focus 신호를 붙입니다.
//! - 합산 클릭: 대표 보통주 주소로 focus 신호 없이 이동.
//!
//! 이벤트 처리는 현재 상태와 무관하며, 여러 클릭이 연달아 오면
//! 마지막 이벤트의 결과만 의미가 있습니다.

use std::fmt;

use equity_core::{
    Company, Focus, NavigationConfig, SecurityId, SelectionSource, SelectionState,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 페이지 로드 시점의 주소 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    /// 주소에 포함된 종목
    pub security_id: SecurityId,
    /// focus 신호 여부
    pub focus_signal: bool,
}

impl NavigationContext {
    /// 새 주소 정보를 생성합니다.
    pub fn new(security_id: impl Into<SecurityId>, focus_signal: bool) -> Self {
        Self {
            security_id: security_id.into(),
            focus_signal,
        }
    }

    /// 주소 문자열을 해석합니다.
    ///
    /// `{path_prefix}/{종목}` 형식이어야 하며, 쿼리에 `focus_param`이 있고
    /// 값이 `false`/`0`/`no`/`off`가 아니면 focus 신호로 봅니다.
    /// 형식이 맞지 않으면 `None`.
    pub fn from_path(path: &str, config: &NavigationConfig) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let prefix = config.path_prefix.trim_end_matches('/');
        let encoded = path
            .strip_prefix(prefix)?
            .strip_prefix('/')?
            .trim_end_matches('/');
        if encoded.is_empty() || encoded.contains('/') {
            return None;
        }
        let security_id = urlencoding::decode(encoded).ok()?.into_owned();

        let focus_signal = query
            .map(|q| query_flag(q, &config.focus_param))
            .unwrap_or(false);

        Some(Self::new(security_id, focus_signal))
    }
}

fn query_flag(query: &str, name: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
        .last()
        .map(|value| {
            !matches!(
                value.to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            )
        })
        .unwrap_or(false)
}

/// 이동할 주소.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    /// 대상 종목
    pub security_id: SecurityId,
    /// focus 신호 부착 여부
    pub focus: bool,
}

impl NavigationTarget {
    /// 주소 문자열로 변환합니다.
    pub fn to_path(&self, config: &NavigationConfig) -> String {
        let mut path = format!(
            "{}/{}",
            config.path_prefix.trim_end_matches('/'),
            urlencoding::encode(self.security_id.as_str())
        );
        if self.focus {
            path.push_str(&format!("?{}=true", config.focus_param));
        }
        path
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path(&NavigationConfig::default()))
    }
}

/// 선택 이벤트.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum SelectionEvent {
    /// 주소로 페이지 로드
    Load(NavigationContext),
    /// 종목 칩 클릭
    SelectShareClass(SecurityId),
    /// 합산 칩 클릭
    SelectAggregate,
}

/// 이벤트 처리 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// 새 선택 상태
    pub state: SelectionState,
    /// 이동할 주소 (로드 이벤트나 종목이 없는 기업이면 `None`)
    pub navigation: Option<NavigationTarget>,
}

/// 선택 상태 머신.
///
/// 기업의 종목 구성만 참조하며 내부 상태를 갖지 않습니다.
#[derive(Debug, Clone, Copy)]
pub struct SelectionMachine<'a> {
    company: &'a Company,
}

impl<'a> SelectionMachine<'a> {
    /// 기업에 대한 상태 머신을 생성합니다.
    pub fn new(company: &'a Company) -> Self {
        Self { company }
    }

    /// 주소로부터 초기 선택 상태를 결정합니다.
    pub fn resolve(&self, context: &NavigationContext) -> SelectionState {
        let focus = match self.company.share_class(context.security_id.as_str()) {
            Some(class) if class.is_common() && !context.focus_signal => Focus::Aggregate,
            Some(class) => Focus::Focused(class.security_id.clone()),
            None => {
                debug!(
                    company = %self.company.company_id,
                    security_id = %context.security_id,
                    "Security not in company, falling back to aggregate"
                );
                Focus::Aggregate
            }
        };

        SelectionState::new(focus, SelectionSource::Url)
    }

    /// 이벤트를 처리합니다.
    pub fn apply(&self, event: SelectionEvent) -> Transition {
        match event {
            SelectionEvent::Load(context) => Transition {
                state: self.resolve(&context),
                navigation: None,
            },
            SelectionEvent::SelectShareClass(security_id) => {
                match self.company.share_class(security_id.as_str()) {
                    Some(class) => Transition {
                        state: SelectionState::new(
                            Focus::Focused(class.security_id.clone()),
                            SelectionSource::Click,
                        ),
                        navigation: Some(NavigationTarget {
                            security_id: class.security_id.clone(),
                            focus: class.is_common(),
                        }),
                    },
                    None => {
                        debug!(
                            company = %self.company.company_id,
                            security_id = %security_id,
                            "Clicked security not in company, selecting aggregate"
                        );
                        self.select_aggregate()
                    }
                }
            }
            SelectionEvent::SelectAggregate => self.select_aggregate(),
        }
    }

    /// 이벤트 목록을 순서대로 처리하고 마지막 결과를 돌려줍니다.
    pub fn apply_all<I>(&self, events: I) -> Option<Transition>
    where
        I: IntoIterator<Item = SelectionEvent>,
    {
        events.into_iter().map(|event| self.apply(event)).last()
    }

    /// 합산 보기로 이동할 주소 (대표 보통주, focus 신호 없음).
    pub fn aggregate_target(&self) -> Option<NavigationTarget> {
        self.company
            .representative_common()
            .map(|class| NavigationTarget {
                security_id: class.security_id.clone(),
                focus: false,
            })
    }

    fn select_aggregate(&self) -> Transition {
        Transition {
            state: SelectionState::new(Focus::Aggregate, SelectionSource::Click),
            navigation: self.aggregate_target(),
        }
    }
}
