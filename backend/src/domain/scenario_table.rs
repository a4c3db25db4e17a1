//! Down-payment scenario table: installments for every combination of a
//! fixed set of down-payment percentages and a fixed set of loan terms.

use std::collections::BTreeMap;

use shared::DownPaymentScenarioRow;

use super::amortization::compute_monthly_payment;

/// Build one row per down-payment percentage, each holding the monthly
/// installment for every term.
///
/// Percentages are whole percents of `total_price` (20 means 20%).
pub fn build_scenario_table(
    total_price: f64,
    monthly_rate_percent: f64,
    down_payment_percents: &[u32],
    terms: &[u32],
) -> Vec<DownPaymentScenarioRow> {
    down_payment_percents
        .iter()
        .map(|&percent| {
            let down_payment = total_price * percent as f64 / 100.0;
            let loan_amount = total_price - down_payment;

            let installments: BTreeMap<u32, f64> = terms
                .iter()
                .map(|&term| {
                    (term, compute_monthly_payment(loan_amount, monthly_rate_percent, term))
                })
                .collect();

            DownPaymentScenarioRow {
                down_payment_percent: percent,
                down_payment,
                loan_amount,
                installments,
            }
        })
        .collect()
}
