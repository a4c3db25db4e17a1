use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Inputs for an equal-installment (annuity) loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    /// Financed amount in TRY
    pub principal: f64,
    /// Monthly interest rate as a percentage (0.99 means 0.99% per month)
    pub monthly_rate_percent: f64,
    /// Number of monthly installments
    pub term_months: u32,
}

/// Fixed monthly installment and the total repaid over the loan's life
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentResult {
    pub monthly_payment: f64,
    /// Always `monthly_payment * term_months`
    pub total_payment: f64,
}

impl InstallmentResult {
    pub fn zero() -> Self {
        Self {
            monthly_payment: 0.0,
            total_payment: 0.0,
        }
    }
}

/// One month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    /// 1-based month index
    pub month: u32,
    pub installment: f64,
    pub principal_component: f64,
    pub interest_component: f64,
    /// Balance left after this month's payment, never negative
    pub remaining_balance: f64,
}

/// One row of the down-payment scenario table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownPaymentScenarioRow {
    pub down_payment_percent: u32,
    pub down_payment: f64,
    pub loan_amount: f64,
    /// Monthly installment keyed by term in months
    pub installments: BTreeMap<u32, f64>,
}

/// How a user-supplied rate should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBasis {
    #[default]
    Monthly,
    /// Yearly nominal rate, divided by 12 before use
    Annual,
}

impl fmt::Display for RateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateBasis::Monthly => write!(f, "monthly"),
            RateBasis::Annual => write!(f, "annual"),
        }
    }
}

/// Request body for the installment and schedule endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentRequest {
    /// Loan product id; the first configured product is used when absent
    #[serde(default)]
    pub product_id: Option<String>,
    pub principal: f64,
    /// Interest rate; the product's default monthly rate is used when absent
    #[serde(default)]
    pub rate_percent: Option<f64>,
    #[serde(default)]
    pub rate_basis: RateBasis,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentResponse {
    /// Input after product and rate resolution
    pub input: LoanInput,
    pub result: InstallmentResult,
    pub total_interest: f64,
    /// One-off brokerage fee charged on the financed amount
    pub arrangement_fee: f64,
    /// Total repayment plus the arrangement fee
    pub total_cost: f64,
    /// Whether the principal reaches the product's minimum loan amount
    pub meets_minimum_amount: bool,
    pub monthly_payment_formatted: String,
    pub total_payment_formatted: String,
    pub rate_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub input: LoanInput,
    pub monthly_payment: f64,
    pub rows: Vec<ScheduleRow>,
    pub total_interest: f64,
    pub total_principal: f64,
}

/// Request body for the down-payment scenario endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTableRequest {
    /// Vehicle price before any down payment
    pub total_price: f64,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub rate_percent: Option<f64>,
    #[serde(default)]
    pub rate_basis: RateBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTableResponse {
    pub total_price: f64,
    pub monthly_rate_percent: f64,
    /// Column order for `installments` in each row
    pub terms: Vec<u32>,
    pub rows: Vec<DownPaymentScenarioRow>,
}

/// A loan product offered in the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProduct {
    pub id: String,
    pub name: String,
    pub default_monthly_rate_percent: f64,
    /// Smallest loan the brokerage arranges for this product
    pub min_amount: f64,
    pub max_term_months: u32,
}

/// Buy/sell quote returned by a single rate source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateData {
    pub buy_rate: f64,
    pub sell_rate: f64,
    /// Daily change in percent
    #[serde(default)]
    pub change: f64,
}

/// Quotes keyed by symbol (USD, EUR, GBP, GA, BTC)
pub type RateTable = BTreeMap<String, RateData>;

/// One entry of the market-data ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataItem {
    pub id: u32,
    pub symbol: String,
    pub name: String,
    pub buy_rate: f64,
    pub sell_rate: f64,
    pub change: f64,
    pub is_positive: bool,
    /// tr-TR formatted buy rate, set for large values such as BTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_rate_formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_rate_formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramPost {
    pub id: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    /// Permalink to the post
    pub url: String,
    /// RFC 3339 publish time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
    pub code: String,
}

/// Promotional card shown in the product dropdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub image_url: String,
    pub button_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHighlight {
    pub title: String,
    pub description: String,
}

/// Static marketing content for the landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub banks: Vec<Bank>,
    pub car_brands: Vec<String>,
    pub promotions: Vec<Promotion>,
    pub services: Vec<ServiceHighlight>,
    pub contact_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installment_request_defaults() {
        let json = r#"{"principal": 100000, "termMonths": 48}"#;
        let request: InstallmentRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.product_id, None);
        assert_eq!(request.rate_percent, None);
        assert_eq!(request.rate_basis, RateBasis::Monthly);
        assert_eq!(request.term_months, 48);
    }

    #[test]
    fn test_rate_basis_lowercase() {
        let basis: RateBasis = serde_json::from_str("\"annual\"").unwrap();
        assert_eq!(basis, RateBasis::Annual);
        assert_eq!(basis.to_string(), "annual");
    }

    #[test]
    fn test_market_data_item_camel_case_and_optional_fields() {
        let item = MarketDataItem {
            id: 1,
            symbol: "USD".to_string(),
            name: "Amerikan Doları".to_string(),
            buy_rate: 43.4918,
            sell_rate: 43.5038,
            change: 0.03,
            is_positive: true,
            buy_rate_formatted: None,
            sell_rate_formatted: None,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["buyRate"], 43.4918);
        assert_eq!(value["isPositive"], true);
        assert!(value.get("buyRateFormatted").is_none());
    }

    #[test]
    fn test_scenario_row_installments_keyed_by_term() {
        let mut installments = BTreeMap::new();
        installments.insert(12, 1000.0);
        installments.insert(48, 300.0);
        let row = DownPaymentScenarioRow {
            down_payment_percent: 20,
            down_payment: 200.0,
            loan_amount: 800.0,
            installments,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["installments"]["12"], 1000.0);
        assert_eq!(value["downPaymentPercent"], 20);
    }
}
