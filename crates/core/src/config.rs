use serde::Deserialize;

/// What to do with a prefixed tag or attribute name whose prefix has no
/// namespace binding anywhere in scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamespacePolicy {
    /// Fall back to an unqualified name that keeps the prefix as written.
    #[default]
    Permissive,
    /// Fail the build with `BuildError::UnboundPrefix`.
    Strict,
}

/// Configuration for a build run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    pub namespace_policy: NamespacePolicy,
}

impl BuildConfig {
    pub fn strict() -> Self {
        Self {
            namespace_policy: NamespacePolicy::Strict,
        }
    }
}
