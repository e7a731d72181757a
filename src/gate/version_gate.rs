//! Version gate - the publish/no-publish decision
//!
//! The comparison is structured semver precedence, never a lexical string
//! sort: `1.10.0` must order above `1.9.0`.

use semver::Version;

/// Gate result together with the two compared versions.
///
/// Kept only for operator-facing diagnostics; nothing downstream branches
/// on anything but `publish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishDecision {
    pub publish: bool,
    pub source: Version,
    pub registry: Option<Version>,
}

impl PublishDecision {
    /// Human-readable reason for the decision
    pub fn reason(&self) -> String {
        match (&self.registry, self.publish) {
            (None, _) => format!(
                "no published version found; bootstrap publish of {}",
                self.source
            ),
            (Some(registry), true) => format!(
                "source {} is ahead of registry {}; publishing",
                self.source, registry
            ),
            (Some(registry), false) => format!(
                "source {} is not ahead of registry {}; skipping",
                self.source, registry
            ),
        }
    }
}

/// Pure publish gate
pub struct VersionGate;

impl Default for VersionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionGate {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether the source version may be published over the version
    /// currently on the registry.
    ///
    /// The gate opens iff the source is strictly greater under semver
    /// precedence. An absent registry version always opens the gate: a
    /// package with no prior release is the bootstrap case, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_gate::gate::VersionGate;
    /// use semver::Version;
    ///
    /// let gate = VersionGate::new();
    ///
    /// let source = Version::parse("1.10.0").unwrap();
    /// let registry = Version::parse("1.9.0").unwrap();
    /// assert!(gate.decide(&source, Some(&registry)).publish);
    ///
    /// assert!(gate.decide(&source, None).publish);
    /// ```
    pub fn decide(&self, source: &Version, registry: Option<&Version>) -> PublishDecision {
        let publish = match registry {
            None => true,
            Some(registry) => source > registry,
        };

        PublishDecision {
            publish,
            source: source.clone(),
            registry: registry.cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_higher_source_opens_gate() {
        let gate = VersionGate::new();

        assert!(gate.decide(&v("2.0.0"), Some(&v("1.9.5"))).publish);
        assert!(gate.decide(&v("1.2.1"), Some(&v("1.2.0"))).publish);
        assert!(gate.decide(&v("1.3.0"), Some(&v("1.2.9"))).publish);
    }

    #[test]
    fn test_equal_version_closes_gate() {
        let gate = VersionGate::new();

        assert!(!gate.decide(&v("1.2.0"), Some(&v("1.2.0"))).publish);
    }

    #[test]
    fn test_lower_source_closes_gate() {
        let gate = VersionGate::new();

        assert!(!gate.decide(&v("1.1.0"), Some(&v("1.2.0"))).publish);
        assert!(!gate.decide(&v("0.9.9"), Some(&v("1.0.0"))).publish);
    }

    #[test]
    fn test_absent_registry_version_always_opens_gate() {
        let gate = VersionGate::new();

        assert!(gate.decide(&v("1.0.0"), None).publish);
        assert!(gate.decide(&v("0.0.1"), None).publish);
    }

    #[test]
    fn test_numeric_not_lexical_ordering() {
        let gate = VersionGate::new();

        // A lexical string sort would get both of these wrong.
        assert!(gate.decide(&v("1.10.0"), Some(&v("1.9.0"))).publish);
        assert!(!gate.decide(&v("1.9.0"), Some(&v("1.10.0"))).publish);
    }

    #[test]
    fn test_prerelease_orders_below_release() {
        let gate = VersionGate::new();

        assert!(gate.decide(&v("1.0.0"), Some(&v("1.0.0-rc.1"))).publish);
        assert!(!gate.decide(&v("1.0.0-rc.1"), Some(&v("1.0.0"))).publish);
    }

    #[test]
    fn test_decision_retains_compared_versions() {
        let gate = VersionGate::new();

        let decision = gate.decide(&v("1.2.0"), Some(&v("1.1.0")));

        assert_eq!(decision.source, v("1.2.0"));
        assert_eq!(decision.registry, Some(v("1.1.0")));
    }

    #[test]
    fn test_reason_distinguishes_outcomes() {
        let gate = VersionGate::new();

        let open = gate.decide(&v("1.2.0"), Some(&v("1.1.0")));
        let closed = gate.decide(&v("1.1.0"), Some(&v("1.2.0")));
        let bootstrap = gate.decide(&v("1.0.0"), None);

        assert!(open.reason().contains("publishing"));
        assert!(closed.reason().contains("skipping"));
        assert!(bootstrap.reason().contains("bootstrap"));
    }
}
