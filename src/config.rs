use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub network: NetworkConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
    pub carousel: CarouselConfig,
    pub timing: TimingConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Bearer token issued by the authentication service.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// "fr" or "en"
    pub language: String,
    /// Viewport width used for carousel breakpoints in headless mode.
    pub viewport_width: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: "fr".to_string(),
            viewport_width: 1280.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CarouselConfig {
    pub tick_interval_ms: u64,
    /// Wait before jumping back to the equivalent real slide, matches the slide transition.
    pub snap_delay_ms: u64,
    pub restore_transition_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 4000,
            snap_delay_ms: 500,
            restore_transition_ms: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub notice_clear_ms: u64,
    pub login_redirect_ms: u64,
    pub chart_redraw_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            notice_clear_ms: 3000,
            login_redirect_ms: 2000,
            chart_redraw_ms: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub sidebar_width: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 860.0,
            sidebar_width: 240.0,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("amcham-directory");

        let builder = Config::builder()
            // 1. Built-in defaults
            .set_default("api.base_url", "https://wakana.online/annuaire-amcham/api")?
            .set_default("network.request_timeout_secs", 30)?
            .set_default("network.connect_timeout_secs", 10)?
            .set_default("session.token", None::<String>)?
            .set_default("session.expires_at", None::<String>)?
            .set_default("ui.language", "fr")?
            .set_default("ui.viewport_width", 1280.0)?
            .set_default("carousel.tick_interval_ms", 4000)?
            .set_default("carousel.snap_delay_ms", 500)?
            .set_default("carousel.restore_transition_ms", 50)?
            .set_default("timing.notice_clear_ms", 3000)?
            .set_default("timing.login_redirect_ms", 2000)?
            .set_default("timing.chart_redraw_ms", 100)?
            .set_default("window.width", 1280.0)?
            .set_default("window.height", 860.0)?
            .set_default("window.sidebar_width", 240.0)?
            // 2. Local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))
            // 3. User config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))
            // 4. Environment variables (AMCHAM__API__BASE_URL=...)
            .add_source(Environment::with_prefix("AMCHAM").separator("__"));

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_carousel_config_defaults() {
        let config = CarouselConfig::default();
        assert_eq!(config.tick_interval_ms, 4000);
        assert_eq!(config.restore_transition_ms, 50);
        assert!(config.snap_delay_ms < config.tick_interval_ms);
    }

    #[test]
    fn test_timing_config_defaults() {
        let config = TimingConfig::default();
        assert_eq!(config.notice_clear_ms, 3000);
        assert_eq!(config.login_redirect_ms, 2000);
        assert!((100..=300).contains(&config.chart_redraw_ms));
    }

    #[test]
    fn test_ui_config_defaults_to_french() {
        let config = UiConfig::default();
        assert_eq!(config.language, "fr");
        assert!(config.viewport_width >= 1024.0);
    }

    #[test]
    fn test_session_config_default_has_no_token() {
        let config = SessionConfig::default();
        assert!(config.token.is_none());
        assert!(config.expires_at.is_none());
    }

    #[test]
    fn test_config_load_with_defaults() {
        let result = AppConfig::load();
        assert!(result.is_ok(), "defaults alone should deserialize");
    }

    #[test]
    fn test_loaded_config_has_expected_structure() {
        let config = AppConfig::load().expect("Config should load");

        assert!(!config.api.base_url.is_empty());
        assert!(config.network.request_timeout_secs > 0);
        assert!(config.carousel.tick_interval_ms > 0);
        assert!(config.timing.notice_clear_ms > 0);
        assert!(config.window.width > 0.0);
    }

    /// Helper to set and remove an environment variable around a closure.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        // SAFETY: Test environment, the key is unique to this test
        unsafe {
            std::env::set_var(key, value);
        }
        let result = f();
        unsafe {
            std::env::remove_var(key);
        }
        result
    }

    #[test]
    fn test_env_var_overrides_base_url() {
        let config = with_env_var("AMCHAM__API__BASE_URL", "https://test.example.com/api", || {
            AppConfig::load().expect("Config should load")
        });

        assert_eq!(config.api.base_url, "https://test.example.com/api");
    }

    #[test]
    fn test_env_var_overrides_tick_interval() {
        let config = with_env_var("AMCHAM__CAROUSEL__TICK_INTERVAL_MS", "2500", || {
            AppConfig::load().expect("Config should load")
        });

        assert_eq!(config.carousel.tick_interval_ms, 2500);
    }
}
