//! Case-count and forking overrides for `proptest` suites.
//!
//! Suites call [`ProptestRunProfile::load`] with their own defaults; CI
//! raises the case count or enables forking through the environment.

use std::env;

/// Overrides the number of cases per property. Must parse as a positive `u32`.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Enables running each case in a forked process. Accepts `1/0`, `true/false`,
/// `yes/no` and `on/off` in any case.
pub const CKNN_PBT_FORK_ENV_KEY: &str = "CKNN_PBT_FORK";

/// Effective settings for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the process environment.
    ///
    /// Unset or malformed variables fall back to the given defaults; a
    /// malformed value is reported with a `warn!` event.
    ///
    /// ```
    /// use cknn_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Like [`Self::load`] but resolves variables through `lookup`.
    #[must_use]
    pub fn from_lookup(
        default_cases: u32,
        default_fork: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self {
            cases: resolve(&lookup, PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: resolve(&lookup, CKNN_PBT_FORK_ENV_KEY, default_fork, parse_flag),
        }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn cases(&self) -> u32 { self.cases }

    #[rustfmt::skip]
    #[must_use]
    pub fn fork(&self) -> bool { self.fork }
}

fn resolve<T: Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    parse: fn(&str) -> Option<T>,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(raw.trim()).unwrap_or_else(|| {
        tracing::warn!(env = key, raw = %raw, "ignoring malformed property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|cases| *cases > 0)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
