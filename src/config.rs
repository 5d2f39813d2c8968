use crate::PresencePolicy;

/// Environment variable read by [`ProcessEnvironment`].
pub const STRICT_ENV_VAR: &str = "RULESCRIBE_STRICT";

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Segments allowed in one field path, counting the prefixes contributed by
/// enclosing nested validators.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 64;

/// Decides whether inference failures propagate (strict) or degrade into a
/// warning and a generic schema.
pub trait Environment {
    fn is_strict(&self) -> bool;
}

impl Environment for bool {
    fn is_strict(&self) -> bool {
        *self
    }
}

/// Strict when `RULESCRIBE_STRICT` is `1`, `true` or `yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn is_strict(&self) -> bool {
        std::env::var(STRICT_ENV_VAR).is_ok_and(|v| is_truthy(&v))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Inference settings shared by every route analysed with one
/// [`Inferrer`](crate::Inferrer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    presence_policy: PresencePolicy,
    max_nesting_depth: usize,
    max_path_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presence_policy: PresencePolicy::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }
}

impl Config {
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    #[must_use]
    pub fn presence_policy(&self) -> PresencePolicy {
        self.presence_policy
    }

    /// How many nested validators may be stacked inside each other.
    #[must_use]
    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    #[must_use]
    pub fn max_path_depth(&self) -> usize {
        self.max_path_depth
    }
}

/// Builder for [`Config`].
///
/// ```
/// use rulescribe::{Config, PresencePolicy};
///
/// let config = Config::builder()
///     .presence_policy(PresencePolicy::Accumulate)
///     .max_nesting_depth(4)
///     .build();
/// assert_eq!(config.max_nesting_depth(), 4);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[must_use]
    pub fn presence_policy(mut self, policy: PresencePolicy) -> Self {
        self.config.presence_policy = policy;
        self
    }

    #[must_use]
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }

    #[must_use]
    pub fn max_path_depth(mut self, depth: usize) -> Self {
        self.config.max_path_depth = depth;
        self
    }

    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
