use std::env;

use common_policy::PolicyConfig;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub warning_band_multiplier: f64,
    pub reorder_webhook_url: Option<String>,
    pub reorder_webhook_bearer: Option<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let warning_band_multiplier = env::var("REORDER_WARNING_BAND_MULTIPLIER")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(PolicyConfig::DEFAULT_WARNING_BAND_MULTIPLIER)
            .max(1.0);
        let reorder_webhook_url = env::var("REORDER_WEBHOOK_URL").ok();
        let reorder_webhook_bearer = env::var("REORDER_WEBHOOK_BEARER").ok();

        Self {
            warning_band_multiplier,
            reorder_webhook_url,
            reorder_webhook_bearer,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            warning_band_multiplier: PolicyConfig::DEFAULT_WARNING_BAND_MULTIPLIER,
            reorder_webhook_url: None,
            reorder_webhook_bearer: None,
        }
    }
}
