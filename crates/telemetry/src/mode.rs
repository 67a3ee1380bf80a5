//! Deployment mode detection.

/// Variable naming the deployment environment.
pub const DEPLOY_ENV: &str = "TETHER_ENV";

/// Whether this process runs as a production deployment.
///
/// Resolved once at startup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    Production,
    Development,
}

impl DeployMode {
    /// Resolve the mode from [`DEPLOY_ENV`], falling back to the build profile.
    pub fn detect() -> Self {
        Self::resolve(std::env::var(DEPLOY_ENV).ok().as_deref())
    }

    /// Resolve the mode from an optional deployment value.
    ///
    /// Unset or unrecognised values fall back to [`DeployMode::from_build`].
    pub fn resolve(value: Option<&str>) -> Self {
        value
            .and_then(Self::parse)
            .unwrap_or_else(Self::from_build)
    }

    /// Release builds are production builds.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            DeployMode::Development
        } else {
            DeployMode::Production
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(DeployMode::Production),
            "development" | "dev" => Some(DeployMode::Development),
            _ => None,
        }
    }

    pub fn is_production(self) -> bool {
        self == DeployMode::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeployMode::Production => "production",
            DeployMode::Development => "development",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values() {
        assert_eq!(DeployMode::resolve(Some("production")), DeployMode::Production);
        assert_eq!(DeployMode::resolve(Some(" PROD ")), DeployMode::Production);
        assert_eq!(DeployMode::resolve(Some("Development")), DeployMode::Development);
        assert_eq!(DeployMode::resolve(Some("dev")), DeployMode::Development);
    }

    #[test]
    fn test_unknown_falls_back_to_build() {
        assert_eq!(DeployMode::resolve(None), DeployMode::from_build());
        assert_eq!(DeployMode::resolve(Some("staging")), DeployMode::from_build());
        assert_eq!(DeployMode::from_build().is_production(), !cfg!(debug_assertions));
    }
}
