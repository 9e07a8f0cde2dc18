// trace.rs - Opt-in diagnostic tracing to stderr.
//
// RUBY_FLAVOR_TRACE=1 enables every phase; a comma-separated list such
// as `parse,bailout` enables only those. Unset or `0` disables tracing.

use std::sync::OnceLock;

pub const ENV_VAR: &str = "RUBY_FLAVOR_TRACE";

#[derive(Debug)]
struct TraceConfig {
    all: bool,
    phases: Vec<String>,
}

impl TraceConfig {
    fn from_value(value: &str) -> Self {
        match value.trim() {
            "" | "0" => TraceConfig {
                all: false,
                phases: Vec::new(),
            },
            "1" | "all" => TraceConfig {
                all: true,
                phases: Vec::new(),
            },
            list => TraceConfig {
                all: false,
                phases: list
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
        }
    }

    fn enables(&self, phase: &str) -> bool {
        self.all || self.phases.iter().any(|p| p == phase)
    }
}

fn config() -> &'static TraceConfig {
    static CONFIG: OnceLock<TraceConfig> = OnceLock::new();
    CONFIG.get_or_init(|| TraceConfig::from_value(&std::env::var(ENV_VAR).unwrap_or_default()))
}

pub fn is_enabled(phase: &str) -> bool {
    config().enables(phase)
}

macro_rules! trace_log {
    ($phase:expr, $($arg:tt)*) => {
        if $crate::trace::is_enabled($phase) {
            eprintln!("[TRACE:{}] {}", $phase, format!($($arg)*));
        }
    };
}
pub(crate) use trace_log;
