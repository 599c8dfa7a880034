//! The seam between the session and the host's execution environment.
//!
//! The session never probes the environment itself; it consumes facts
//! through the [`Environment`] trait. Resolvers are expected to be cheap and
//! side-effect free. Each version resolver is called at most once per
//! session; the CI and opt-out predicates are consulted on every
//! launch/completion call.

/// Facts about the execution environment consumed by the analytics session.
pub trait Environment: Send + Sync {
    /// Version of the runlane tool itself.
    fn tool_version(&self) -> anyhow::Result<String>;

    /// Version of the underlying runtime executing Lanefiles.
    fn runtime_version(&self) -> anyhow::Result<String>;

    /// Host operating system version.
    fn os_version(&self) -> anyhow::Result<String>;

    /// Detected IDE version.
    fn ide_version(&self) -> anyhow::Result<String>;

    /// Whether the current run executes under a CI system.
    fn is_ci(&self) -> bool;

    /// Whether the user opted out of usage collection.
    fn is_opted_out(&self) -> bool;

    /// OAuth application name the delivery layer authenticates as.
    fn oauth_app_name(&self) -> Option<String>;
}

/// Environment variables that indicate a CI system.
const CI_ENV_VARS: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "TRAVIS",
    "CIRCLECI",
    "JENKINS_URL",
    "TF_BUILD",
    "BUILDKITE",
    "TEAMCITY_VERSION",
];

/// Opt-out switch for usage collection.
const OPT_OUT_ENV_VAR: &str = "RUNLANE_OPT_OUT_USAGE";

/// Detect a CI system from the standard environment variables.
pub fn detect_ci() -> bool {
    CI_ENV_VARS.iter().any(|var| env_flag_set(var))
}

/// Detect the `RUNLANE_OPT_OUT_USAGE` opt-out switch.
pub fn detect_opt_out() -> bool {
    env_flag_set(OPT_OUT_ENV_VAR)
}

fn env_flag_set(var: &str) -> bool {
    std::env::var(var).is_ok_and(|value| flag_enabled(&value))
}

/// A set variable counts as enabled unless it spells out a falsy value.
/// Jenkins exports a URL, most other CI systems export "true" or "1".
fn flag_enabled(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Host-configured [`Environment`].
///
/// The four versions are supplied up front by the host (the CLI entry point
/// knows them); a version left unset resolves to an error rather than a
/// made-up default. CI and opt-out detection read the process environment.
pub struct HostEnvironment {
    tool_version: Option<String>,
    runtime_version: Option<String>,
    os_version: Option<String>,
    ide_version: Option<String>,
    oauth_app_name: Option<String>,
}

impl HostEnvironment {
    pub fn builder() -> HostEnvironmentBuilder {
        HostEnvironmentBuilder::default()
    }
}

fn resolve(fact: &'static str, value: &Option<String>) -> anyhow::Result<String> {
    value
        .clone()
        .ok_or_else(|| anyhow::anyhow!("{} was not supplied by the host", fact))
}

impl Environment for HostEnvironment {
    fn tool_version(&self) -> anyhow::Result<String> {
        resolve("tool version", &self.tool_version)
    }

    fn runtime_version(&self) -> anyhow::Result<String> {
        resolve("runtime version", &self.runtime_version)
    }

    fn os_version(&self) -> anyhow::Result<String> {
        resolve("OS version", &self.os_version)
    }

    fn ide_version(&self) -> anyhow::Result<String> {
        resolve("IDE version", &self.ide_version)
    }

    fn is_ci(&self) -> bool {
        detect_ci()
    }

    fn is_opted_out(&self) -> bool {
        detect_opt_out()
    }

    fn oauth_app_name(&self) -> Option<String> {
        self.oauth_app_name.clone()
    }
}

#[derive(Default)]
pub struct HostEnvironmentBuilder {
    tool_version: Option<String>,
    runtime_version: Option<String>,
    os_version: Option<String>,
    ide_version: Option<String>,
    oauth_app_name: Option<String>,
}

impl HostEnvironmentBuilder {
    pub fn tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = Some(version.into());
        self
    }

    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    pub fn os_version(mut self, version: impl Into<String>) -> Self {
        self.os_version = Some(version.into());
        self
    }

    pub fn ide_version(mut self, version: impl Into<String>) -> Self {
        self.ide_version = Some(version.into());
        self
    }

    pub fn oauth_app_name(mut self, name: impl Into<String>) -> Self {
        self.oauth_app_name = Some(name.into());
        self
    }

    pub fn build(self) -> HostEnvironment {
        HostEnvironment {
            tool_version: self.tool_version,
            runtime_version: self.runtime_version,
            os_version: self.os_version,
            ide_version: self.ide_version,
            oauth_app_name: self.oauth_app_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_enabled_values() {
        assert!(flag_enabled("true"));
        assert!(flag_enabled("TRUE"));
        assert!(flag_enabled("1"));
        assert!(flag_enabled("https://jenkins.example.com/"));
        assert!(!flag_enabled(""));
        assert!(!flag_enabled("0"));
        assert!(!flag_enabled("false"));
        assert!(!flag_enabled("False"));
    }

    #[test]
    fn test_host_environment_resolves_supplied_versions() {
        let env = HostEnvironment::builder()
            .tool_version("2.5.0")
            .runtime_version("2.4.0")
            .os_version("10.12")
            .ide_version("Xcode 9")
            .oauth_app_name("runlane-tests")
            .build();

        assert_eq!(env.tool_version().unwrap(), "2.5.0");
        assert_eq!(env.runtime_version().unwrap(), "2.4.0");
        assert_eq!(env.os_version().unwrap(), "10.12");
        assert_eq!(env.ide_version().unwrap(), "Xcode 9");
        assert_eq!(env.oauth_app_name().as_deref(), Some("runlane-tests"));
    }

    #[test]
    fn test_host_environment_missing_version_is_an_error() {
        let env = HostEnvironment::builder().tool_version("2.5.0").build();

        assert!(env.tool_version().is_ok());
        let err = env.ide_version().unwrap_err();
        assert!(err.to_string().contains("IDE version"));
        assert!(env.oauth_app_name().is_none());
    }
}
