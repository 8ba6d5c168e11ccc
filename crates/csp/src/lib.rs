//! Rampart CSP
//!
//! A fluent builder for the `Content-Security-Policy` HTTP response header.
//! Directives accumulate in declaration order and compile exactly once into a
//! deterministic header string; after compilation the policy is frozen.
//!
//! ```
//! use rampart_csp::{CspBuilder, FetchDirective, MetaDirective, Source};
//!
//! let mut csp = CspBuilder::new();
//! csp.fetch(FetchDirective::Default, [Source::self_origin()])?
//!     .fetch(FetchDirective::Script, [Source::raw("https://cdn.example.com")])?
//!     .meta(MetaDirective::UpgradeInsecureRequests)?;
//!
//! assert_eq!(
//!     csp.compile(),
//!     "default-src 'self'; script-src https://cdn.example.com; upgrade-insecure-requests"
//! );
//! # Ok::<(), rampart_csp::CspError>(())
//! ```

pub mod builder;
pub mod directive;
pub mod error;
pub mod source;

pub use builder::CspBuilder;
pub use directive::{FetchDirective, MetaDirective, ValueDirective};
pub use error::{CspError, CspResult};
pub use source::Source;

/// Name of the enforcing response header.
pub const CONTENT_SECURITY_POLICY: &str = "Content-Security-Policy";

/// Name of the report-only response header.
pub const CONTENT_SECURITY_POLICY_REPORT_ONLY: &str = "Content-Security-Policy-Report-Only";
