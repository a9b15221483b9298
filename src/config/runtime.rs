use super::ViewerConfig;

/// Overrides read from environment variables. Applied on top of the config
/// file; CLI flags are applied after these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub ws_url: Option<String>,
    pub api_url: Option<String>,
    pub frame_interval_ms: Option<u64>,
    pub speed: Option<f64>,
}

impl EnvOverrides {
    /// Build from env vars. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = Self::default();

        if let Some(v) = lookup("STOREVIEW_WS_URL") {
            if !v.is_empty() {
                overrides.ws_url = Some(v);
            }
        }
        if let Some(v) = lookup("STOREVIEW_API_URL") {
            if !v.is_empty() {
                overrides.api_url = Some(v);
            }
        }
        if let Some(v) = lookup("STOREVIEW_FRAME_INTERVAL_MS") {
            if let Ok(n) = v.parse::<u64>() {
                overrides.frame_interval_ms = Some(n);
            }
        }
        if let Some(v) = lookup("STOREVIEW_SPEED") {
            if let Ok(s) = v.parse::<f64>() {
                if s.is_finite() && s > 0.0 {
                    overrides.speed = Some(s);
                }
            }
        }

        overrides
    }

    pub fn apply(&self, config: &mut ViewerConfig) {
        if let Some(ref url) = self.ws_url {
            config.server.ws_url = url.clone();
        }
        if let Some(ref url) = self.api_url {
            config.server.api_url = url.clone();
        }
        if let Some(ms) = self.frame_interval_ms {
            config.animation.frame_interval_ms = ms;
        }
        if let Some(speed) = self.speed {
            config.animation.speed = speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_vars_no_overrides() {
        let overrides = EnvOverrides::from_lookup(lookup_from(&[]));
        assert_eq!(overrides, EnvOverrides::default());
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = EnvOverrides::from_lookup(lookup_from(&[
            ("STOREVIEW_WS_URL", "ws://10.0.0.5:8080/ws"),
            ("STOREVIEW_FRAME_INTERVAL_MS", "40"),
            ("STOREVIEW_SPEED", "3.5"),
        ]));

        let mut config = ViewerConfig::default();
        overrides.apply(&mut config);

        assert_eq!(config.server.ws_url, "ws://10.0.0.5:8080/ws");
        assert_eq!(config.server.api_url, "http://localhost:8080");
        assert_eq!(config.animation.frame_interval_ms, 40);
        assert_eq!(config.animation.speed, 3.5);
    }

    #[test]
    fn test_unparsable_values_ignored() {
        let overrides = EnvOverrides::from_lookup(lookup_from(&[
            ("STOREVIEW_FRAME_INTERVAL_MS", "fast"),
            ("STOREVIEW_SPEED", "-1"),
        ]));

        assert_eq!(overrides.frame_interval_ms, None);
        assert_eq!(overrides.speed, None);
    }
}
