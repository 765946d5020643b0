//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Default filter directive for an environment when `RUST_LOG` is unset.
#[must_use]
pub fn default_directive(env: Environment) -> &'static str {
    match env {
        Environment::Local | Environment::Dev => "debug",
        Environment::Prod => "info",
    }
}

/// Installs the global subscriber: plain text on `local`, JSON elsewhere.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(env)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env {
        Environment::Local => builder.init(),
        Environment::Dev | Environment::Prod => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_prod_drops_debug_logs() {
        assert_eq!(default_directive(Environment::Local), "debug");
        assert_eq!(default_directive(Environment::Dev), "debug");
        assert_eq!(default_directive(Environment::Prod), "info");
    }
}
