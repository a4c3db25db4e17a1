//! # Application Configuration
//!
//! All tunable constants of the site live here: server binding, calculator
//! products and scenario grids, market-data source order and fallback rates,
//! Instagram credentials and the marketing catalog.
//!
//! Configuration is resolved once at startup:
//!
//! 1. Built-in defaults (`Default` impls below)
//! 2. YAML file named by `OTOFINANS_CONFIG`, if set
//! 3. Environment overrides (`OTOFINANS_BIND`, `OTOFINANS_STATIC_DIR`,
//!    `INSTAGRAM_ACCESS_TOKEN`)
//!
//! The result is validated and shared read-only as `Arc<AppConfig>`.
//!
//! ## YAML Format
//!
//! ```yaml
//! server:
//!   bind_address: "0.0.0.0:3000"
//! market_data:
//!   currency_sources: [truncgil, genelpara]
//!   source_timeout_secs: 3
//! instagram:
//!   public_profile_fallback: true
//! ```
//!
//! Any section or field left out keeps its default.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shared::{Bank, LoanProduct, Promotion, RateData, RateTable, ServiceHighlight};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "OTOFINANS_CONFIG";
pub const BIND_ENV: &str = "OTOFINANS_BIND";
pub const STATIC_DIR_ENV: &str = "OTOFINANS_STATIC_DIR";
pub const INSTAGRAM_TOKEN_ENV: &str = "INSTAGRAM_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub calculator: CalculatorConfig,
    pub market_data: MarketDataConfig,
    pub instagram: InstagramConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Resolve configuration from defaults, the optional YAML file and the
    /// process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                info!("{} not set, using built-in configuration", CONFIG_PATH_ENV);
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML config file; missing fields fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Overriding bind address from {}", BIND_ENV);
            self.server.bind_address = bind.trim().to_string();
        }
        if let Some(dir) = lookup(STATIC_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.static_dir = PathBuf::from(dir.trim());
        }
        if let Some(token) = lookup(INSTAGRAM_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Instagram access token provided via environment");
            self.instagram.access_token = Some(token.trim().to_string());
        }
    }

    /// Reject configurations the services cannot work with
    pub fn validate(&self) -> Result<()> {
        let calculator = &self.calculator;
        if calculator.products.is_empty() {
            bail!("calculator.products must contain at least one product");
        }
        if calculator.terms.iter().any(|&t| t == 0) || calculator.terms.is_empty() {
            bail!("calculator.terms must be a non-empty list of positive month counts");
        }
        if has_duplicates(&calculator.terms) {
            bail!("calculator.terms must not repeat a term");
        }
        if calculator.down_payment_percents.iter().any(|&p| p >= 100) {
            bail!("calculator.down_payment_percents must all be below 100");
        }
        if has_duplicates(&calculator.down_payment_percents) {
            bail!("calculator.down_payment_percents must not repeat a percentage");
        }
        for product in &calculator.products {
            if product.max_term_months == 0 {
                bail!("product {} has a zero max_term_months", product.id);
            }
            if !product.default_monthly_rate_percent.is_finite()
                || product.default_monthly_rate_percent < 0.0
            {
                bail!("product {} has an invalid default rate", product.id);
            }
        }
        if self.market_data.source_timeout_secs == 0 || self.instagram.timeout_secs == 0 {
            bail!("source timeouts must be positive");
        }
        if self.market_data.display_items.iter().any(|item| item.decimals > 8) {
            bail!("market_data.display_items decimals must be at most 8");
        }
        Ok(())
    }
}

fn has_duplicates(values: &[u32]) -> bool {
    let mut seen = HashSet::new();
    !values.iter().all(|value| seen.insert(value))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Origin allowed by CORS, normally the frontend dev server
    pub cors_origin: String,
    /// Directory holding the built frontend bundle
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            static_dir: PathBuf::from("../frontend/dist"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub products: Vec<LoanProduct>,
    pub down_payment_percents: Vec<u32>,
    pub terms: Vec<u32>,
    pub arrangement_fee: ArrangementFeeConfig,
    /// Upper bound accepted for a monthly rate, in percent
    pub max_monthly_rate_percent: f64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        // 9.99% yearly, the advertised starting rate
        let default_rate = 9.99 / 12.0;
        let product = |id: &str, name: &str| LoanProduct {
            id: id.to_string(),
            name: name.to_string(),
            default_monthly_rate_percent: default_rate,
            min_amount: 50_000.0,
            max_term_months: 120,
        };

        Self {
            products: vec![
                product("tasit-kredisi", "Taşıt Kredisi"),
                product("ticari-arac-kredisi", "Ticari Araç Kredisi"),
                product("motosiklet-kredisi", "Motosiklet Kredisi"),
            ],
            down_payment_percents: vec![20, 30, 40, 50, 60, 70],
            terms: vec![12, 18, 24, 36, 48],
            arrangement_fee: ArrangementFeeConfig::default(),
            max_monthly_rate_percent: 100.0,
        }
    }
}

/// Brokerage fee charged once on the financed amount
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangementFeeConfig {
    pub standard_rate_percent: f64,
    /// Applies from `reduced_threshold` upwards
    pub reduced_rate_percent: f64,
    pub reduced_threshold: f64,
}

impl Default for ArrangementFeeConfig {
    fn default() -> Self {
        Self {
            standard_rate_percent: 2.5,
            reduced_rate_percent: 2.0,
            reduced_threshold: 250_000.0,
        }
    }
}

/// Known rate providers, in the order they appear in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "truncgil")]
    Truncgil,
    #[serde(rename = "genelpara")]
    GenelPara,
    #[serde(rename = "coingecko")]
    CoinGecko,
    #[serde(rename = "coingecko_24h")]
    CoinGecko24h,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceEndpoints {
    pub truncgil_url: String,
    pub genelpara_url: String,
    pub coingecko_url: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            truncgil_url: "https://finans.truncgil.com/v4/today.json".to_string(),
            genelpara_url: "https://api.genelpara.com/json/?list=all".to_string(),
            coingecko_url:
                "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=try"
                    .to_string(),
        }
    }
}

/// How a rate table entry is shown in the ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Key in the merged rate table
    pub key: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    /// Also emit tr-TR formatted rate strings
    #[serde(default)]
    pub formatted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub currency_sources: Vec<SourceKind>,
    pub crypto_sources: Vec<SourceKind>,
    pub source_timeout_secs: u64,
    pub endpoints: SourceEndpoints,
    /// Sell-side markup applied to the crypto mid price
    pub crypto_spread: f64,
    pub fallback_rates: RateTable,
    pub display_items: Vec<DisplayItem>,
}

impl MarketDataConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        let rate = |buy_rate: f64, sell_rate: f64, change: f64| RateData {
            buy_rate,
            sell_rate,
            change,
        };
        let mut fallback_rates = RateTable::new();
        fallback_rates.insert("USD".to_string(), rate(43.4918, 43.5038, 0.03));
        fallback_rates.insert("EUR".to_string(), rate(51.4746, 51.4821, 0.04));
        fallback_rates.insert("GBP".to_string(), rate(59.7531, 60.0526, 0.26));
        fallback_rates.insert("BTC".to_string(), rate(3_500_000.0, 3_517_500.0, 2.5));

        let item = |key: &str, name: &str, decimals: u32, formatted: bool| DisplayItem {
            key: key.to_string(),
            symbol: key.to_string(),
            name: name.to_string(),
            decimals,
            formatted,
        };

        Self {
            currency_sources: vec![SourceKind::Truncgil, SourceKind::GenelPara],
            crypto_sources: vec![SourceKind::CoinGecko, SourceKind::CoinGecko24h],
            source_timeout_secs: 5,
            endpoints: SourceEndpoints::default(),
            crypto_spread: 0.005,
            fallback_rates,
            display_items: vec![
                item("USD", "Amerikan Doları", 4, false),
                item("EUR", "Euro", 4, false),
                item("GBP", "İngiliz Poundu", 4, false),
                item("BTC", "Bitcoin", 2, true),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstagramConfig {
    pub username: String,
    /// Graph API token; without it the feed degrades to the public profile
    /// endpoint (if enabled) or to an empty list
    pub access_token: Option<String>,
    pub public_profile_fallback: bool,
    pub limit: usize,
    pub timeout_secs: u64,
    pub graph_api_url: String,
    pub public_profile_base_url: String,
}

impl InstagramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            username: "otofinansglobal".to_string(),
            access_token: None,
            public_profile_fallback: false,
            limit: 6,
            timeout_secs: 8,
            graph_api_url: "https://graph.instagram.com/me/media".to_string(),
            public_profile_base_url: "https://www.instagram.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Carousel order, repeats allowed
    pub banks: Vec<Bank>,
    pub car_brands: Vec<String>,
    pub promotions: Vec<Promotion>,
    pub services: Vec<ServiceHighlight>,
    pub contact_phone: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let banks = [
            ("Akbank", "AKB"),
            ("Garanti BBVA", "GRT"),
            ("İş Bankası", "İSB"),
            ("Halkbank", "HLK"),
            ("Ziraat Bankası", "ZRT"),
            ("Finansbank", "FNS"),
            ("TEB", "TEB"),
            ("Denizbank", "DNZ"),
            ("Şekerbank", "ŞEK"),
            ("ICBC Turkey", "ICB"),
            // The carousel repeats the head of the list so it loops seamlessly
            ("Akbank", "AKB"),
            ("Garanti BBVA", "GRT"),
            ("İş Bankası", "İSB"),
            ("Halkbank", "HLK"),
            ("Ziraat Bankası", "ZRT"),
        ]
        .into_iter()
        .map(|(name, code)| Bank {
            name: name.to_string(),
            code: code.to_string(),
        })
        .collect();

        let car_brands = [
            "Toyota", "Honda", "Ford", "BMW", "Mercedes-Benz", "Audi", "Volkswagen",
            "Hyundai", "Kia", "Mazda", "Renault", "Peugeot", "Citroen", "Fiat",
            "Opel", "Suzuki", "Dacia", "Skoda", "SEAT", "Porsche", "Volvo",
            "Tesla", "MG", "BYD", "GAC", "Geely", "Jeep", "Chevrolet",
            "Nissan", "Subaru", "Mitsubishi", "Isuzu", "Dodge", "Cadillac",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let promotions = vec![
            Promotion {
                id: 1,
                title: "20 Yaşa Kadar Tüm Araçlarda Kredi".to_string(),
                subtitle: Some("30 Dakika'da Kredi Hazır!".to_string()),
                image_url: "https://images.unsplash.com/photo-1552820728-8ac41f1ce891?w=400&h=300&fit=crop".to_string(),
                button_text: "Hemen Başvur".to_string(),
            },
            Promotion {
                id: 2,
                title: "30 Dakika'da Taşıt Kredisi Hazır".to_string(),
                subtitle: None,
                image_url: "https://images.unsplash.com/photo-1619405399517-d4dc2500d5f9?w=400&h=300&fit=crop".to_string(),
                button_text: "Hemen Başvur".to_string(),
            },
            Promotion {
                id: 3,
                title: "Ön Onaylı +800.000TL Kredi Limiti".to_string(),
                subtitle: Some("Günü Yüksek Kredi İmkanı".to_string()),
                image_url: "https://images.unsplash.com/photo-1606611281537-bbb6bfa74edf?w=400&h=300&fit=crop".to_string(),
                button_text: "Hemen Başvur".to_string(),
            },
        ];

        let services = [
            (
                "Esnek Ödeme",
                "İster senetle ister esnek ödeme ile bütçenize göre ödeme planı oluşturun.",
            ),
            (
                "Hızlı Değerlendirme",
                "Verileriniz en yüksek güvenlik standartlarıyla korunur",
            ),
            (
                "Güvenli Süreç",
                "%9.99'dan başlayan uygun faiz oranlarından yararlanın",
            ),
        ]
        .into_iter()
        .map(|(title, description)| ServiceHighlight {
            title: title.to_string(),
            description: description.to_string(),
        })
        .collect();

        Self {
            banks,
            car_brands,
            promotions,
            services,
            contact_phone: "+905324098440".to_string(),
        }
    }
}
