use std::fmt;

/// A rule token outside the known vocabulary.
///
/// Never fatal: token lists keep it as [`RuleToken::Unknown`](crate::RuleToken::Unknown)
/// and schema building ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedToken {
    name: String,
    args: Vec<String>,
}

impl UnrecognizedToken {
    pub(crate) fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Keep the token as an opaque [`RuleToken::Unknown`](crate::RuleToken::Unknown).
    #[must_use]
    pub fn into_token(self) -> crate::RuleToken {
        crate::RuleToken::Unknown {
            name: self.name,
            args: self.args,
        }
    }
}

impl fmt::Display for UnrecognizedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized rule token '{}'", self.name)
    }
}

impl std::error::Error for UnrecognizedToken {}
