// src/credentials.rs
// RapidAPI key resolution. Absence is a supported state, not an error:
// every downstream layer treats `Absent` as "demo data only" for the
// lifetime of the process.

pub const ENV_API_KEY: &str = "RAPIDAPI_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Present(String),
    Absent,
}

impl Credential {
    /// Read the API key from the environment (populated by `dotenvy` in dev,
    /// by the platform secret store in prod). Missing or blank -> `Absent`.
    pub fn resolve() -> Self {
        Self::from_env_var(ENV_API_KEY)
    }

    pub fn from_env_var(name: &str) -> Self {
        match std::env::var(name) {
            Ok(v) if !v.trim().is_empty() => Credential::Present(v),
            _ => Credential::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Credential::Absent)
    }

    /// The secret itself; never logged, never serialized.
    pub fn secret(&self) -> Option<&str> {
        match self {
            Credential::Present(s) => Some(s.as_str()),
            Credential::Absent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn missing_and_blank_vars_resolve_to_absent() {
        std::env::remove_var("USD_MONITOR_TEST_KEY");
        assert!(Credential::from_env_var("USD_MONITOR_TEST_KEY").is_absent());

        std::env::set_var("USD_MONITOR_TEST_KEY", "   ");
        assert!(Credential::from_env_var("USD_MONITOR_TEST_KEY").is_absent());
        std::env::remove_var("USD_MONITOR_TEST_KEY");
    }

    #[serial_test::serial]
    #[test]
    fn present_value_is_kept_verbatim() {
        std::env::set_var("USD_MONITOR_TEST_KEY", "rapid-123");
        let cred = Credential::from_env_var("USD_MONITOR_TEST_KEY");
        assert_eq!(cred.secret(), Some("rapid-123"));
        assert!(!cred.is_absent());
        std::env::remove_var("USD_MONITOR_TEST_KEY");
    }
}
