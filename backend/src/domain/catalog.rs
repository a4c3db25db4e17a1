//! Static marketing content: partner banks, car brands, promotions and
//! service highlights.

use std::collections::HashSet;

use shared::{Bank, SiteContent};

use crate::config::CatalogConfig;

#[derive(Clone)]
pub struct CatalogService {
    content: SiteContent,
}

impl CatalogService {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            content: SiteContent {
                banks: dedupe_banks(&config.banks),
                car_brands: config.car_brands.clone(),
                promotions: config.promotions.clone(),
                services: config.services.clone(),
                contact_phone: config.contact_phone.clone(),
            },
        }
    }

    pub fn site_content(&self) -> &SiteContent {
        &self.content
    }
}

/// Drop repeated bank codes, keeping the first occurrence
fn dedupe_banks(banks: &[Bank]) -> Vec<Bank> {
    let mut seen = HashSet::new();
    banks
        .iter()
        .filter(|bank| seen.insert(bank.code.as_str()))
        .cloned()
        .collect()
}
