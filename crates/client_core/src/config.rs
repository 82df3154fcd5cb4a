use std::{collections::HashMap, fs};

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8001".into(),
        }
    }
}

/// Resolves settings once at startup: built-in defaults, overlaid by a
/// `client.toml` next to the process, overlaid by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("INTERVIEWS_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url);
    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_base_url") {
            settings.api_base_url = v.clone();
        }
    }
}

/// Endpoint paths are joined with a leading slash, so the base must not end
/// with one.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().api_base_url;
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://analysis.internal:8001///"),
            "http://analysis.internal:8001"
        );
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        assert_eq!(normalize_base_url("   "), Settings::default().api_base_url);
    }

    #[test]
    fn file_overrides_replace_the_base_url() {
        let mut settings = Settings::default();
        apply_file_overrides(&mut settings, "api_base_url = \"http://10.0.0.5:9000\"\n");
        assert_eq!(settings.api_base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn unknown_file_keys_are_ignored() {
        let mut settings = Settings::default();
        apply_file_overrides(&mut settings, "unrelated = \"value\"\n");
        assert_eq!(settings.api_base_url, Settings::default().api_base_url);
    }
}
