use crate::config::Settings;

/// Resolved settings with the API key masked.
pub fn show_settings(settings: &Settings) -> String {
    let api_key = settings
        .masked_api_key()
        .unwrap_or_else(|| "not configured".to_string());
    let timeout = settings
        .timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "none".to_string());

    format!(
        "API key:  {}\nBase URL: {}\nModel:    {}\nTimeout:  {}",
        api_key, settings.base_url, settings.model, timeout
    )
}
