//! # Domain Module
//!
//! Business logic of the Oto Finans Global site, independent of HTTP and of
//! the concrete data providers.
//!
//! ## Module Organization
//!
//! - **amortization**: pure annuity engine (payment, totals, schedule)
//! - **scenario_table**: down-payment × term installment grid
//! - **calculator_service**: product/rate resolution, validation and fees
//! - **formatting**: tr-TR number and currency display
//! - **market_data**: currency and crypto ticker with fallback rates
//! - **instagram**: latest posts for the gallery section
//! - **catalog**: banks, car brands, promotions and service highlights
//!
//! The engine modules are synchronous and have no configuration; the
//! services wrap them with configuration and logging.

pub mod amortization;
pub mod calculator_service;
pub mod catalog;
pub mod formatting;
pub mod instagram;
pub mod market_data;
pub mod scenario_table;

pub use calculator_service::{CalculatorError, LoanCalculatorService};
pub use catalog::CatalogService;
pub use instagram::InstagramService;
pub use market_data::MarketDataService;
