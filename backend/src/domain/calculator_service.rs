//! Loan calculator domain logic.
//!
//! Sits between the REST layer and the pure amortization engine: resolves the
//! loan product and rate, validates request values, applies the brokerage
//! fee rules and prepares tr-TR display strings. The engine itself stays free
//! of configuration.

use shared::{
    InstallmentRequest, InstallmentResponse, LoanInput, LoanProduct, RateBasis,
    ScenarioTableRequest, ScenarioTableResponse, ScheduleResponse,
};
use tracing::debug;

use crate::config::CalculatorConfig;
use crate::domain::amortization::{build_amortization_schedule, compute_installment};
use crate::domain::formatting::{format_percent, format_try};
use crate::domain::scenario_table::build_scenario_table;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CalculatorError {
    #[error("Unknown loan product: {0}")]
    UnknownProduct(String),
    #[error("{0} must be a finite number")]
    NonFiniteInput(&'static str),
    #[error("Term of {term} months exceeds the maximum of {max} months")]
    TermTooLong { term: u32, max: u32 },
    #[error("Monthly rate of {rate}% is outside the accepted range 0-{max}%")]
    RateOutOfRange { rate: f64, max: f64 },
}

/// Calculator service that owns the product catalog and fee rules
#[derive(Clone)]
pub struct LoanCalculatorService {
    config: CalculatorConfig,
}

impl Default for LoanCalculatorService {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl LoanCalculatorService {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn products(&self) -> &[LoanProduct] {
        &self.config.products
    }

    /// Look up a product by id, defaulting to the first configured product
    pub fn resolve_product(
        &self,
        product_id: Option<&str>,
    ) -> Result<&LoanProduct, CalculatorError> {
        match product_id {
            Some(id) => self
                .config
                .products
                .iter()
                .find(|product| product.id == id)
                .ok_or_else(|| CalculatorError::UnknownProduct(id.to_string())),
            None => self
                .config
                .products
                .first()
                .ok_or_else(|| CalculatorError::UnknownProduct("<default>".to_string())),
        }
    }

    /// Monthly rate in percent for a request, falling back to the product default
    pub fn resolve_monthly_rate(
        &self,
        product: &LoanProduct,
        rate_percent: Option<f64>,
        basis: RateBasis,
    ) -> Result<f64, CalculatorError> {
        let monthly = match rate_percent {
            None => return Ok(product.default_monthly_rate_percent),
            Some(rate) if !rate.is_finite() => {
                return Err(CalculatorError::NonFiniteInput("ratePercent"))
            }
            Some(rate) => match basis {
                RateBasis::Monthly => rate,
                RateBasis::Annual => rate / 12.0,
            },
        };

        let max = self.config.max_monthly_rate_percent;
        if monthly < 0.0 || monthly > max {
            return Err(CalculatorError::RateOutOfRange { rate: monthly, max });
        }
        Ok(monthly)
    }

    /// Validate a request and turn it into normalized engine input
    pub fn resolve_loan_input(
        &self,
        request: &InstallmentRequest,
    ) -> Result<(LoanInput, &LoanProduct), CalculatorError> {
        if !request.principal.is_finite() {
            return Err(CalculatorError::NonFiniteInput("principal"));
        }

        let product = self.resolve_product(request.product_id.as_deref())?;
        if request.term_months > product.max_term_months {
            return Err(CalculatorError::TermTooLong {
                term: request.term_months,
                max: product.max_term_months,
            });
        }

        let monthly_rate_percent =
            self.resolve_monthly_rate(product, request.rate_percent, request.rate_basis)?;

        let input = LoanInput {
            // Negative amounts are normalized to a zero loan
            principal: request.principal.max(0.0),
            monthly_rate_percent,
            term_months: request.term_months,
        };
        Ok((input, product))
    }

    /// One-off brokerage fee for a financed amount
    pub fn arrangement_fee(&self, principal: f64) -> f64 {
        if principal <= 0.0 {
            return 0.0;
        }
        let fee = &self.config.arrangement_fee;
        let rate = if principal >= fee.reduced_threshold {
            fee.reduced_rate_percent
        } else {
            fee.standard_rate_percent
        };
        principal * rate / 100.0
    }

    /// Installment summary for the calculator widget
    pub fn calculate_installment(
        &self,
        request: &InstallmentRequest,
    ) -> Result<InstallmentResponse, CalculatorError> {
        let (input, product) = self.resolve_loan_input(request)?;
        let result = compute_installment(&input);

        let (total_interest, arrangement_fee) = if result.monthly_payment > 0.0 {
            (
                (result.total_payment - input.principal).max(0.0),
                self.arrangement_fee(input.principal),
            )
        } else {
            (0.0, 0.0)
        };

        debug!(
            "Installment for {} ({}): {:.2} x {} months",
            product.id, input.principal, result.monthly_payment, input.term_months
        );

        Ok(InstallmentResponse {
            input,
            result,
            total_interest,
            arrangement_fee,
            total_cost: result.total_payment + arrangement_fee,
            meets_minimum_amount: input.principal >= product.min_amount,
            monthly_payment_formatted: format_try(result.monthly_payment),
            total_payment_formatted: format_try(result.total_payment),
            rate_formatted: format_percent(input.monthly_rate_percent),
        })
    }

    /// Full payment plan ("Ödeme Planı") for a request
    pub fn build_schedule(
        &self,
        request: &InstallmentRequest,
    ) -> Result<ScheduleResponse, CalculatorError> {
        let (input, _) = self.resolve_loan_input(request)?;
        let rows = build_amortization_schedule(
            input.principal,
            input.monthly_rate_percent,
            input.term_months,
        );

        let total_interest = rows.iter().map(|row| row.interest_component).sum();
        let total_principal = rows.iter().map(|row| row.principal_component).sum();
        let monthly_payment = rows.first().map(|row| row.installment).unwrap_or(0.0);

        Ok(ScheduleResponse {
            input,
            monthly_payment,
            rows,
            total_interest,
            total_principal,
        })
    }

    /// Installment grid across the configured down-payment percentages and terms
    pub fn build_scenarios(
        &self,
        request: &ScenarioTableRequest,
    ) -> Result<ScenarioTableResponse, CalculatorError> {
        if !request.total_price.is_finite() {
            return Err(CalculatorError::NonFiniteInput("totalPrice"));
        }

        let product = self.resolve_product(request.product_id.as_deref())?;
        let monthly_rate_percent =
            self.resolve_monthly_rate(product, request.rate_percent, request.rate_basis)?;
        let total_price = request.total_price.max(0.0);

        let rows = build_scenario_table(
            total_price,
            monthly_rate_percent,
            &self.config.down_payment_percents,
            &self.config.terms,
        );

        Ok(ScenarioTableResponse {
            total_price,
            monthly_rate_percent,
            terms: self.config.terms.clone(),
            rows,
        })
    }
}
