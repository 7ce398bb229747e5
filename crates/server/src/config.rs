use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; each service
/// supplies its own default port.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`; `*` allows any.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root of the shared data directory (default: `data`).
    pub data_dir: PathBuf,
    /// Multiplier on simulated stage durations (default: `1.0`, `0` disables sleeping).
    pub stage_delay_scale: f64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `HOST`                 | `0.0.0.0`        |
    /// | `PORT`                 | `default_port`   |
    /// | `CORS_ORIGINS`         | `*`              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`             |
    /// | `DATA_DIR`             | `data`           |
    /// | `STAGE_DELAY_SCALE`    | `1.0`            |
    pub fn from_env(default_port: u16) -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| default_port.to_string())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));

        let stage_delay_scale: f64 = std::env::var("STAGE_DELAY_SCALE")
            .unwrap_or_else(|_| "1.0".into())
            .parse()
            .expect("STAGE_DELAY_SCALE must be a number");
        assert!(
            stage_delay_scale.is_finite() && stage_delay_scale >= 0.0,
            "STAGE_DELAY_SCALE must be a non-negative number"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            data_dir,
            stage_delay_scale,
        }
    }

    /// Override the port from a positional command-line argument, if given.
    pub fn with_port_arg(mut self, arg: Option<String>) -> Self {
        if let Some(arg) = arg {
            self.port = arg
                .parse()
                .unwrap_or_else(|_| panic!("Port argument '{arg}' must be a valid u16"));
        }
        self
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 5000,
            cors_origins: vec!["*".into()],
            request_timeout_secs: 30,
            data_dir: PathBuf::from("data"),
            stage_delay_scale: 0.0,
        }
    }

    #[test]
    fn origins_are_trimmed_and_filtered() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            ["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn port_argument_overrides_port() {
        let config = config().with_port_arg(Some("8080".into()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.with_port_arg(None).port, 8080);
    }

    #[test]
    fn wildcard_allows_any_origin() {
        assert!(config().allows_any_origin());
        let mut restricted = config();
        restricted.cors_origins = vec!["http://localhost:5173".into()];
        assert!(!restricted.allows_any_origin());
    }
}
