//! 선택 상태 시뮬레이션 명령.
//!
//! 주소로 페이지를 연 뒤 클릭 하나를 적용했을 때의 상태와 이동 주소를 보여줍니다.

use anyhow::{anyhow, Result};
use equity_analytics::{NavigationContext, SelectionEvent, SelectionMachine, Transition};
use equity_core::{Company, NavigationConfig, SecurityId};
use serde::Serialize;

/// 클릭 동작.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Click {
    /// 종목 칩
    ShareClass(SecurityId),
    /// 합산 칩
    Aggregate,
}

impl From<Click> for SelectionEvent {
    fn from(click: Click) -> Self {
        match click {
            Click::ShareClass(id) => SelectionEvent::SelectShareClass(id),
            Click::Aggregate => SelectionEvent::SelectAggregate,
        }
    }
}

/// `select` 명령 출력.
#[derive(Debug, Serialize)]
pub struct SelectOutput {
    /// 주소 로드 직후
    pub initial: Transition,
    /// 클릭 적용 후
    pub after_click: Option<Transition>,
    /// 클릭으로 이동할 주소
    pub navigate_to: Option<String>,
}

/// 주소 로드와 클릭을 순서대로 적용합니다.
pub fn simulate(
    company: &Company,
    navigation: &NavigationConfig,
    url: &str,
    click: Option<Click>,
) -> Result<SelectOutput> {
    let context = NavigationContext::from_path(url, navigation)
        .ok_or_else(|| anyhow!("Invalid navigation path: {}", url))?;
    let machine = SelectionMachine::new(company);

    let initial = machine.apply(SelectionEvent::Load(context));
    let after_click = click.map(|click| machine.apply(click.into()));
    let navigate_to = after_click
        .as_ref()
        .and_then(|t| t.navigation.as_ref())
        .map(|target| target.to_path(navigation));

    Ok(SelectOutput {
        initial,
        after_click,
        navigate_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use equity_core::{Focus, ShareClass, ShareClassKind};

    fn company() -> Company {
        Company::new("C1", "테스트")
            .with_share_class(ShareClass::new(
                "A",
                ShareClassKind::Common,
                "000001",
                "KOSPI",
                "테스트",
            ))
            .with_share_class(ShareClass::new(
                "B",
                ShareClassKind::Preferred,
                "000005",
                "KOSPI",
                "테스트우",
            ))
    }

    #[test]
    fn test_simulate_load_only() {
        let output =
            simulate(&company(), &NavigationConfig::default(), "/security/A", None).unwrap();

        assert!(output.initial.state.is_aggregate());
        assert!(output.after_click.is_none());
        assert!(output.navigate_to.is_none());
    }

    #[test]
    fn test_simulate_click_common() {
        let output = simulate(
            &company(),
            &NavigationConfig::default(),
            "/security/B",
            Some(Click::ShareClass("A".into())),
        )
        .unwrap();

        assert_eq!(output.initial.state.focus, Focus::Focused("B".into()));
        assert_eq!(output.navigate_to.as_deref(), Some("/security/A?focus=true"));
    }

    #[test]
    fn test_simulate_click_aggregate() {
        let output = simulate(
            &company(),
            &NavigationConfig::default(),
            "/security/B",
            Some(Click::Aggregate),
        )
        .unwrap();

        assert_eq!(output.navigate_to.as_deref(), Some("/security/A"));
    }

    #[test]
    fn test_simulate_invalid_path() {
        let result = simulate(&company(), &NavigationConfig::default(), "nope", None);
        assert!(result.is_err());
    }
}
