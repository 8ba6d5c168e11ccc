//! Policy builder errors.

/// Errors raised by policy builder operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CspError {
    /// A directive was declared on a policy that has already been compiled.
    /// The cached header string is unaffected by the rejected call.
    #[error("policy already compiled, cannot declare `{directive}`")]
    AlreadyCompiled { directive: &'static str },
}

/// Result type for policy builder operations.
pub type CspResult<T> = Result<T, CspError>;
