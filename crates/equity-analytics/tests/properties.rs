//! 정규화/합산 성질 테스트 (proptest)

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use equity_analytics::{aggregate, analyze, normalize, value_histogram, MAX_HISTOGRAM_BINS};
use equity_core::{DatedPoint, PeriodWindow, RawDate, RawRow, RawValue, SecuritySeries};
use proptest::prelude::*;
use rust_decimal::Decimal;

// -- Strategy helpers --

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base_date() + Days::new(offset)
}

/// 최대 60일 범위의 (날짜 오프셋, 값) 행. 값은 소수 둘째 자리까지.
fn arb_rows() -> impl Strategy<Value = Vec<(u64, i64)>> {
    prop::collection::vec((0u64..60, -1_000_000i64..1_000_000), 0..40)
}

fn to_raw(rows: &[(u64, i64)]) -> Vec<RawRow> {
    rows.iter()
        .map(|(offset, cents)| {
            RawRow::new(
                RawDate::Date(day(*offset)),
                Some(RawValue::Text(Decimal::new(*cents, 2).to_string())),
            )
        })
        .collect()
}

fn arb_company_rows() -> impl Strategy<Value = Vec<Vec<(u64, i64)>>> {
    prop::collection::vec(arb_rows(), 1..5)
}

fn normalize_all(company: &[Vec<(u64, i64)>]) -> Vec<SecuritySeries> {
    company
        .iter()
        .enumerate()
        .map(|(i, rows)| normalize(format!("S{}", i), &to_raw(rows)))
        .collect()
}

proptest! {
    /// 모든 날짜에서 합계는 내역 값의 합.
    #[test]
    fn total_equals_breakdown_sum(company in arb_company_rows()) {
        let history = aggregate(&normalize_all(&company));

        for point in history.points() {
            let sum: Decimal = point.breakdown.values().copied().sum();
            prop_assert_eq!(point.total, sum);
            prop_assert!(!point.breakdown.is_empty());
        }
    }

    /// 원본에 없는 날짜에는 해당 종목이 내역에 나타나지 않음.
    #[test]
    fn no_fabricated_continuity(company in arb_company_rows()) {
        let series = normalize_all(&company);
        let history = aggregate(&series);

        for s in &series {
            let own_dates: BTreeSet<NaiveDate> = s.points().iter().map(|p| p.date).collect();
            for point in history.points() {
                let present = point.breakdown.contains_key(s.security_id());
                prop_assert_eq!(present, own_dates.contains(&point.date));
            }
        }
    }

    /// 같은 입력으로 두 번 돌리면 같은 결과.
    #[test]
    fn normalize_and_aggregate_idempotent(company in arb_company_rows()) {
        let first = aggregate(&normalize_all(&company));
        let second = aggregate(&normalize_all(&company));
        prop_assert_eq!(first, second);
    }

    /// 같은 날짜의 행이 여러 개면 마지막 행의 값이 남음.
    #[test]
    fn duplicate_dates_keep_last(rows in arb_rows()) {
        let series = normalize("S", &to_raw(&rows));

        let mut expected: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for (offset, cents) in &rows {
            expected.insert(day(*offset), Decimal::new(*cents, 2));
        }

        let actual: BTreeMap<NaiveDate, Decimal> =
            series.points().iter().map(|p| (p.date, p.value)).collect();
        prop_assert_eq!(actual, expected);
    }

    /// 최소/최대는 기간과 무관하게 전체 이력 기준.
    #[test]
    fn min_max_covers_whole_history(rows in arb_rows()) {
        prop_assume!(!rows.is_empty());
        let series = normalize("S", &to_raw(&rows));
        let windows = vec![PeriodWindow::current(), PeriodWindow::trailing_months(1)];

        let analysis = analyze(&series, &windows, None, None).unwrap();
        let mm = analysis.min_max.unwrap();

        let values: Vec<Decimal> = series.points().iter().map(|p| p.value).collect();
        prop_assert_eq!(Some(&mm.min), values.iter().min());
        prop_assert_eq!(Some(&mm.max), values.iter().max());
        for period in &analysis.periods {
            prop_assert!(period.sample_count > 0);
        }
    }

    /// 구간 수 상한 안에서는 항상 성공하고, 구간 합은 포인트 수와 같음.
    #[test]
    fn histogram_counts_every_point(rows in arb_rows(), width_cents in 1i64..100_000) {
        let series = normalize("S", &to_raw(&rows));
        let width = Decimal::new(width_cents, 2);

        let values: Vec<Decimal> = series.points().iter().map(|p| p.value).collect();
        let within_limit = match (values.iter().min(), values.iter().max()) {
            (Some(min), Some(max)) => {
                ((*max - *min) / width).ceil() <= Decimal::from(MAX_HISTOGRAM_BINS)
            }
            _ => true,
        };

        let result = value_histogram(&series, width);
        prop_assert_eq!(result.is_ok(), within_limit);

        if let Ok(bins) = result {
            let total: usize = bins.iter().map(|b| b.count).sum();
            prop_assert_eq!(total, series.len());

            let points: Vec<DatedPoint> = series.points().to_vec();
            for point in &points {
                prop_assert!(bins.iter().any(|b| b.start <= point.value && point.value <= b.end));
            }
        }
    }
}
