//! Source expression values for directive declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single value in a directive's source list.
///
/// Reserved keywords (`self`, `none`, nonces, hashes) are wrapped in single
/// quotes when rendered; raw tokens (origins, schemes, `*`) pass through
/// verbatim. Raw tokens are not sanitized in any way, so callers must keep
/// directive-terminating characters such as `;` out of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// A reserved keyword, single-quoted on output.
    Keyword(String),
    /// A free-form token, emitted as-is.
    Raw(String),
}

impl Source {
    /// A reserved keyword, rendered as `'name'`.
    pub fn keyword(name: impl Into<String>) -> Self {
        Source::Keyword(name.into())
    }

    /// A free-form token, rendered verbatim.
    pub fn raw(token: impl Into<String>) -> Self {
        Source::Raw(token.into())
    }

    /// The `'self'` keyword.
    pub fn self_origin() -> Self {
        Source::keyword("self")
    }

    /// The `'none'` keyword.
    pub fn none() -> Self {
        Source::keyword("none")
    }

    /// The `'unsafe-inline'` keyword.
    pub fn unsafe_inline() -> Self {
        Source::keyword("unsafe-inline")
    }

    /// The `'unsafe-eval'` keyword.
    pub fn unsafe_eval() -> Self {
        Source::keyword("unsafe-eval")
    }

    /// The `'strict-dynamic'` keyword.
    pub fn strict_dynamic() -> Self {
        Source::keyword("strict-dynamic")
    }

    /// The `*` wildcard token.
    pub fn wildcard() -> Self {
        Source::raw("*")
    }

    /// A `'nonce-<value>'` keyword.
    pub fn nonce(value: &str) -> Self {
        Source::Keyword(format!("nonce-{}", value))
    }

    /// A `'sha256-<digest>'` keyword.
    pub fn sha256(digest: &str) -> Self {
        Source::Keyword(format!("sha256-{}", digest))
    }

    /// A `'sha384-<digest>'` keyword.
    pub fn sha384(digest: &str) -> Self {
        Source::Keyword(format!("sha384-{}", digest))
    }

    /// A `'sha512-<digest>'` keyword.
    pub fn sha512(digest: &str) -> Self {
        Source::Keyword(format!("sha512-{}", digest))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Keyword(name) => write!(f, "'{}'", name),
            Source::Raw(token) => f.write_str(token),
        }
    }
}

impl From<&str> for Source {
    fn from(token: &str) -> Self {
        Source::Raw(token.to_string())
    }
}

impl From<String> for Source {
    fn from(token: String) -> Self {
        Source::Raw(token)
    }
}
