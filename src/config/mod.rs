pub mod runtime;
pub use runtime::EnvOverrides;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

pub use crate::layout::StoreLayout;

/// Complete viewer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub layout: StoreLayout,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulation server endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// WebSocket endpoint streaming simulation state
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Base URL of the HTTP API (accident control)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Delay before reconnecting after the socket closes (milliseconds)
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_ws_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            api_url: default_api_url(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

/// Motion animation settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    /// Distance travelled per frame, in scene units
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Frame interval (milliseconds)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_speed() -> f64 {
    2.0
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

/// Pointer interaction settings
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionConfig {
    /// Hit radius around each customer marker, in scene units
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f64,
}

fn default_hit_radius() -> f64 {
    25.0
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hit_radius: default_hit_radius(),
        }
    }
}

/// Presentation surface settings
#[derive(Debug, Clone, Deserialize)]
pub struct PresentationConfig {
    /// Number of technical log lines shown in the log surface
    #[serde(default = "default_log_tail")]
    pub log_tail: usize,
}

fn default_log_tail() -> usize {
    10
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            log_tail: default_log_tail(),
        }
    }
}

/// Start-command parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Initial value of the customer-count field
    #[serde(default = "default_customer_count")]
    pub default_customer_count: u32,
    /// Largest customer count accepted by the start command
    #[serde(default = "default_max_customers")]
    pub max_customers: u32,
}

fn default_customer_count() -> u32 {
    10
}

fn default_max_customers() -> u32 {
    10_000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_customer_count: default_customer_count(),
            max_customers: default_max_customers(),
        }
    }
}

/// Log output settings (the terminal belongs to the UI, so logs go to a file)
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_file() -> String {
    "storeview.log".to_string()
}

fn default_log_filter() -> String {
    "storeview=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

impl ViewerConfig {
    /// Reject values the animator and hit-testing cannot work with
    pub fn validate(&self) -> Result<()> {
        let speed = self.animation.speed;
        if !speed.is_finite() || speed <= 0.0 {
            bail!("animation.speed must be a positive number (got {})", speed);
        }
        let radius = self.interaction.hit_radius;
        if !radius.is_finite() || radius < 0.0 {
            bail!("interaction.hit_radius must be zero or positive (got {})", radius);
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            animation: AnimationConfig::default(),
            layout: StoreLayout::default(),
            interaction: InteractionConfig::default(),
            presentation: PresentationConfig::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ViewerConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}
