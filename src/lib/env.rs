//! Environment lookup with shell `${VAR:-default}` semantics.
use std::collections::BTreeMap;

/// Read-only view of environment variables.
pub trait EnvSource {
    /// Raw value, if the variable exists at all.
    fn raw(&self, key: &str) -> Option<String>;

    /// Value only when present and non-empty.
    fn get(&self, key: &str) -> Option<String> {
        self.raw(key).filter(|value| !value.is_empty())
    }

    /// Value when present and non-empty, otherwise `default`.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn raw(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn raw(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_value_falls_back_to_default() {
        let source = env(&[("LEARNING_RATE", "")]);
        assert_eq!(source.get_or("LEARNING_RATE", "2e-5"), "2e-5");
        assert_eq!(EnvSource::get(&source, "LEARNING_RATE"), None);
        assert_eq!(source.raw("LEARNING_RATE"), Some(String::new()));
    }

    #[test]
    fn explicit_value_wins_over_default() {
        let source = env(&[("MAX_STEPS", "10")]);
        assert_eq!(source.get_or("MAX_STEPS", "1000000"), "10");
    }
}
