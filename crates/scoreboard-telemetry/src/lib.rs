use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Configuration for the telemetry subsystem.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default log level. Overridden by RUST_LOG env var.
    pub log_level: Level,
    /// Per-module level overrides (e.g. "scoreboard_server" => DEBUG).
    pub module_levels: Vec<(String, Level)>,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            module_levels: Vec::new(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Filter directive built from the configured levels, e.g. `info,scoreboard_server=debug`.
    pub fn directive(&self) -> String {
        let mut filter_str = self.log_level.to_string().to_lowercase();
        for (module, level) in &self.module_levels {
            filter_str.push_str(&format!(",{}={}", module, level.to_string().to_lowercase()));
        }
        filter_str
    }
}

/// Returned by [`init_telemetry`]; records what was installed.
#[derive(Debug)]
pub struct TelemetryGuard {
    filter: String,
    from_env: bool,
    installed: bool,
}

impl TelemetryGuard {
    /// The active filter directive.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Whether RUST_LOG took precedence over the configured levels.
    pub fn from_env(&self) -> bool {
        self.from_env
    }

    /// False when a global subscriber was already set (e.g. in tests).
    pub fn installed(&self) -> bool {
        self.installed
    }
}

/// Initialize the telemetry subsystem. Call once at startup. Logs go to
/// stderr so command output on stdout stays clean.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    let (env_filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(config.directive()), false),
    };
    let filter = env_filter.to_string();

    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_list(true)
            .with_filter(env_filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(env_filter)
            .boxed()
    };

    let installed = tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_ok();
    if !installed {
        eprintln!("scoreboard-telemetry: global subscriber already set, keeping it");
    }

    TelemetryGuard {
        filter,
        from_env,
        installed,
    }
}

/// Parse a level name as accepted in settings files (`"warn"`, `"DEBUG"`, ...).
pub fn parse_level(raw: &str) -> Option<Level> {
    raw.trim().parse::<Level>().ok()
}
