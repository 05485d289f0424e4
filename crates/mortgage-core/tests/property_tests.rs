use mortgage_core::amortization::payment::{self, PaymentSolverInput, SolvingMode};
use mortgage_core::amortization::schedule::{self, ScheduleInput};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Principal in whole currency units.
fn principal_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..2_000_000).prop_map(Decimal::from)
}

/// Per-period rate between 0 and 1%, in millionths.
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..10_000).prop_map(|bp| Decimal::new(i64::from(bp), 6))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cumulative_interest_never_decreases(
        principal in principal_strategy(),
        rate in rate_strategy(),
        payment in 0u32..20_000,
        extra in 0u32..2_000,
        n in 0u32..400,
    ) {
        let sched = schedule::generate_schedule(&ScheduleInput {
            principal,
            period_rate: rate,
            payment: Decimal::from(payment),
            extra_per_period: Decimal::from(extra),
            total_payments: n,
            calendar: None,
        })
        .unwrap();

        prop_assert!(sched.periods.len() <= n as usize);
        for w in sched.periods.windows(2) {
            prop_assert!(w[1].cumulative_interest >= w[0].cumulative_interest);
            prop_assert!(w[1].remaining_balance >= Decimal::ZERO);
        }
    }

    #[test]
    fn schedule_is_deterministic(
        principal in principal_strategy(),
        rate in rate_strategy(),
        years in 1u32..40,
    ) {
        let solver = PaymentSolverInput {
            principal,
            period_rate: rate,
            term_years: Decimal::from(years),
            periods_per_year: Decimal::from(12),
            mode: SolvingMode::Default,
        };
        let sol = payment::solve_payment(&solver).unwrap();
        let input = ScheduleInput {
            principal,
            period_rate: rate,
            payment: sol.payment(),
            extra_per_period: Decimal::ZERO,
            total_payments: sol.total_payments(),
            calendar: None,
        };
        let a = schedule::generate_schedule(&input).unwrap();
        let b = schedule::generate_schedule(&input).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn locked_payment_recovers_term(
        principal in 1_000u32..2_000_000,
        rate in rate_strategy(),
        years in 1u32..40,
    ) {
        let principal = Decimal::from(principal);
        let level = payment::solve_payment(&PaymentSolverInput {
            principal,
            period_rate: rate,
            term_years: Decimal::from(years),
            periods_per_year: Decimal::from(12),
            mode: SolvingMode::LockFrequency,
        })
        .unwrap();
        let solved = payment::solve_payment(&PaymentSolverInput {
            principal,
            period_rate: rate,
            term_years: Decimal::ZERO,
            periods_per_year: Decimal::from(12),
            mode: SolvingMode::LockPayment { target_payment: level.payment() },
        })
        .unwrap();
        let drift = i64::from(level.total_payments()) - i64::from(solved.total_payments());
        prop_assert!(drift.abs() <= 1, "drift {} periods", drift);
    }
}
