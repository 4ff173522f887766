use std::collections::HashMap;
use tracing::Level;

/// Per-scope log filtering.
///
/// Parsed from a comma separated spec such as `"warn,tour=debug,locomotion=trace"`:
/// a bare level sets the global level, `scope=level` overrides a single scope.
/// Unparseable entries are ignored so a typo never silences the whole runtime.
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_spec(spec: &str) -> Self {
        let mut config = Self::new();
        config.apply_spec(spec);
        config
    }

    pub fn from_env(env_var_name: &str) -> Self {
        match std::env::var(env_var_name) {
            Ok(spec) => Self::from_spec(&spec),
            Err(_) => Self::new(),
        }
    }

    fn apply_spec(&mut self, spec: &str) {
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((scope, level)) => {
                    if let Some(level) = parse_level(level) {
                        self.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Some(level) = parse_level(part) {
                        self.global_level = level;
                    }
                }
            }
        }
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        level <= self.level_for(scope)
    }

    pub fn level_for(&self, scope: &str) -> Level {
        self.scope_levels
            .get(scope)
            .copied()
            .unwrap_or(self.global_level)
    }

    pub fn set_global_level(&mut self, level: Level) {
        self.global_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(level_str: &str) -> Option<Level> {
    level_str.trim().parse::<Level>().ok()
}

/// Install the fmt subscriber (once) and the scope config read from `env_var_name`,
/// e.g. `init_logging("TOUR_LOG")`.
pub fn init_logging(env_var_name: &str) -> LogConfig {
    install(LogConfig::from_env(env_var_name))
}

/// Like [`init_logging`], but an explicit `spec` (from a command line flag) wins over
/// the environment.
pub fn init_logging_with_spec(spec: Option<&str>, env_var_name: &str) -> LogConfig {
    match spec {
        Some(spec) => install(LogConfig::from_spec(spec)),
        None => init_logging(env_var_name),
    }
}

fn install(config: LogConfig) -> LogConfig {
    // Scope gating happens in `scoped_log!`; the subscriber lets everything through
    // unless RUST_LOG narrows it further.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trace"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    super::set_log_config(config.clone());
    config
}
