//! Amortization engine for equal-installment (annuity) loans.
//!
//! Everything here is pure arithmetic on `f64`: no I/O, no shared state, safe
//! to call from any number of request handlers at once. Degenerate inputs
//! (non-positive principal, zero term) produce a zero payment rather than an
//! error.

use shared::{InstallmentResult, LoanInput, ScheduleRow};

/// Convert a percentage rate into a decimal rate, clamping negatives to zero
fn decimal_rate(monthly_rate_percent: f64) -> f64 {
    if monthly_rate_percent.is_finite() && monthly_rate_percent > 0.0 {
        monthly_rate_percent / 100.0
    } else {
        0.0
    }
}

/// `1 - (1+r)^-n`, or `None` when the rate is too small to amortize
/// differently from a zero rate
fn annuity_denominator(r: f64, n: f64) -> Option<f64> {
    if r == 0.0 {
        return None;
    }
    // expm1/ln_1p keep precision for small rates and never overflow for long terms
    let denominator = -(-n * r.ln_1p()).exp_m1();
    (denominator.is_finite() && denominator > 0.0).then_some(denominator)
}

/// Fixed monthly installment for an annuity loan.
///
/// `principal * r / (1 - (1+r)^-n)` with `r = monthly_rate_percent / 100`,
/// which tends to `principal * r` for very long terms. A zero rate amortizes
/// linearly (`principal / n`).
pub fn compute_monthly_payment(
    principal: f64,
    monthly_rate_percent: f64,
    term_months: u32,
) -> f64 {
    if principal.is_nan() || principal <= 0.0 || term_months == 0 {
        return 0.0;
    }

    let n = term_months as f64;
    let r = decimal_rate(monthly_rate_percent);
    match annuity_denominator(r, n) {
        Some(denominator) => principal * r / denominator,
        None => principal / n,
    }
}

/// Monthly installment and total repayment for a loan
pub fn compute_installment(input: &LoanInput) -> InstallmentResult {
    let monthly_payment =
        compute_monthly_payment(input.principal, input.monthly_rate_percent, input.term_months);
    if monthly_payment == 0.0 {
        return InstallmentResult::zero();
    }

    InstallmentResult {
        monthly_payment,
        total_payment: monthly_payment * input.term_months as f64,
    }
}

/// Month-by-month breakdown of interest, principal and remaining balance.
///
/// Returns one row per month, or no rows when the payment is zero. The
/// balance after month `k` is the present value of the installments still
/// due, so it reaches exactly zero in the last month. Interest is charged on
/// the opening balance and components are floored at zero.
pub fn build_amortization_schedule(
    principal: f64,
    monthly_rate_percent: f64,
    term_months: u32,
) -> Vec<ScheduleRow> {
    let installment = compute_monthly_payment(principal, monthly_rate_percent, term_months);
    if installment <= 0.0 {
        return Vec::new();
    }

    let n = term_months as f64;
    let r = decimal_rate(monthly_rate_percent);
    let denominator = annuity_denominator(r, n);
    let balance_after = |month: u32| {
        let left = (term_months - month) as f64;
        let remaining = match denominator {
            Some(denominator) => principal * -(-left * r.ln_1p()).exp_m1() / denominator,
            None => principal * left / n,
        };
        remaining.max(0.0)
    };

    let mut balance = principal;
    (1..=term_months)
        .map(|month| {
            let remaining_balance = balance_after(month);
            let interest_component = if denominator.is_some() {
                (balance * r).max(0.0)
            } else {
                0.0
            };
            let principal_component = (balance - remaining_balance).max(0.0);
            balance = remaining_balance;

            ScheduleRow {
                month,
                installment,
                principal_component,
                interest_component,
                remaining_balance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn annuity(principal: f64, r: f64, n: i32) -> f64 {
        principal * (r * (1.0 + r).powi(n)) / ((1.0 + r).powi(n) - 1.0)
    }

    #[test]
    fn test_reference_example() {
        let payment = compute_monthly_payment(100_000.0, 0.99, 48);
        let expected = annuity(100_000.0, 0.0099, 48);

        assert!((payment - expected).abs() < 0.005);
        assert!((payment - 2627.50).abs() < 0.005);

        let result = compute_installment(&LoanInput {
            principal: 100_000.0,
            monthly_rate_percent: 0.99,
            term_months: 48,
        });
        assert_eq!(result.monthly_payment, payment);
        assert!((result.total_payment - payment * 48.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_principal_or_term_yields_zero() {
        assert_eq!(compute_monthly_payment(0.0, 0.99, 48), 0.0);
        assert_eq!(compute_monthly_payment(-500.0, 0.99, 48), 0.0);
        assert_eq!(compute_monthly_payment(100_000.0, 0.99, 0), 0.0);
        assert_eq!(compute_monthly_payment(f64::NAN, 0.99, 12), 0.0);

        let result = compute_installment(&LoanInput {
            principal: 0.0,
            monthly_rate_percent: 1.5,
            term_months: 12,
        });
        assert_eq!(result, InstallmentResult::zero());
    }

    #[test]
    fn test_zero_rate_is_linear() {
        assert_eq!(compute_monthly_payment(12_000.0, 0.0, 12), 1000.0);
        assert_eq!(compute_monthly_payment(10_000.0, 0.0, 3), 10_000.0 / 3.0);
        // Negative rates are treated as zero
        assert_eq!(compute_monthly_payment(12_000.0, -1.0, 12), 1000.0);
    }

    #[test]
    fn test_tiny_rate_does_not_divide_by_zero() {
        let payment = compute_monthly_payment(12_000.0, 1e-15, 12);
        assert!(payment.is_finite());
        assert!((payment - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_total_never_below_principal() {
        for &principal in &[1.0, 999.99, 50_000.0, 1_250_000.0] {
            for &rate in &[0.0, 0.01, 0.5, 0.99, 2.79, 5.0] {
                for &term in &[1u32, 6, 12, 36, 48, 120] {
                    let payment = compute_monthly_payment(principal, rate, term);
                    assert!(
                        payment * term as f64 >= principal - TOLERANCE,
                        "principal {} rate {} term {}",
                        principal,
                        rate,
                        term
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_month_term_repays_with_one_period_interest() {
        let payment = compute_monthly_payment(10_000.0, 2.0, 1);
        assert!((payment - 10_200.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_pure_function() {
        let first = compute_monthly_payment(250_000.0, 1.19, 36);
        let second = compute_monthly_payment(250_000.0, 1.19, 36);
        assert_eq!(first, second);
        assert_eq!(
            build_amortization_schedule(250_000.0, 1.19, 36),
            build_amortization_schedule(250_000.0, 1.19, 36)
        );
    }

    #[test]
    fn test_schedule_repays_principal() {
        let schedule = build_amortization_schedule(100_000.0, 0.99, 48);
        assert_eq!(schedule.len(), 48);
        assert_eq!(schedule[0].month, 1);
        assert_eq!(schedule[47].month, 48);

        let repaid: f64 = schedule.iter().map(|row| row.principal_component).sum();
        assert!((repaid - 100_000.0).abs() < 0.01);

        let last = schedule.last().unwrap();
        assert!(last.remaining_balance < 0.01);
    }

    #[test]
    fn test_schedule_rows_split_installment() {
        let schedule = build_amortization_schedule(75_000.0, 1.5, 24);
        for row in &schedule {
            assert!(
                (row.principal_component + row.interest_component - row.installment).abs() < 1e-6
            );
            assert!(row.remaining_balance >= 0.0);
        }

        // First month's interest is charged on the full principal
        assert!((schedule[0].interest_component - 1125.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_schedule_balance_strictly_decreases() {
        let schedule = build_amortization_schedule(40_000.0, 2.0, 18);
        let mut previous = 40_000.0;
        for row in &schedule[..schedule.len() - 1] {
            assert!(row.remaining_balance < previous);
            previous = row.remaining_balance;
        }
    }

    #[test]
    fn test_schedule_interest_shrinks_principal_grows() {
        let schedule = build_amortization_schedule(100_000.0, 0.99, 48);
        for pair in schedule.windows(2) {
            assert!(pair[1].interest_component < pair[0].interest_component);
            assert!(pair[1].principal_component > pair[0].principal_component);
        }
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = build_amortization_schedule(1200.0, 0.0, 12);
        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|row| row.interest_component == 0.0));
        assert!(schedule.iter().all(|row| (row.principal_component - 100.0).abs() < TOLERANCE));
        assert!(schedule.last().unwrap().remaining_balance < TOLERANCE);
    }

    #[test]
    fn test_long_term_payment_tends_to_interest_only() {
        // (1+r)^n is far beyond f64 range here
        let payment = compute_monthly_payment(100_000.0, 1.0, 100_000);
        assert!(payment.is_finite());
        assert!((payment - 1000.0).abs() < 1e-6);
        assert!(payment * 100_000.0 >= 100_000.0);
    }

    #[test]
    fn test_long_term_schedule_repays_principal() {
        let schedule = build_amortization_schedule(100_000.0, 1.0, 100_000);
        assert_eq!(schedule.len(), 100_000);

        let first = &schedule[0];
        assert!((first.interest_component - 1000.0).abs() < TOLERANCE);
        assert!((first.installment - 1000.0).abs() < 1e-6);

        let repaid: f64 = schedule.iter().map(|row| row.principal_component).sum();
        assert!((repaid - 100_000.0).abs() < 0.01);
        assert!(schedule.last().unwrap().remaining_balance < 0.01);
        assert!(schedule.iter().all(|row| row.remaining_balance <= 100_000.0));
    }

    #[test]
    fn test_degenerate_schedule_is_empty() {
        assert!(build_amortization_schedule(0.0, 0.99, 12).is_empty());
        assert!(build_amortization_schedule(10_000.0, 0.99, 0).is_empty());
    }
}
