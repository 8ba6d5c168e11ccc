//! CSP directive name tables.
//!
//! The three directive categories are closed enums, so an unknown directive
//! name is unrepresentable rather than a runtime error. Each variant knows
//! the exact key it renders as in the header.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fetch directives control which sources a resource type may be loaded
/// from. Declared by base name; the rendered key carries a `-src` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchDirective {
    Child,
    Connect,
    Default,
    Font,
    Frame,
    Img,
    Manifest,
    Media,
    Object,
    Script,
    Style,
    Worker,
}

impl FetchDirective {
    /// The directive key as it appears in the header.
    pub fn name(self) -> &'static str {
        match self {
            FetchDirective::Child => "child-src",
            FetchDirective::Connect => "connect-src",
            FetchDirective::Default => "default-src",
            FetchDirective::Font => "font-src",
            FetchDirective::Frame => "frame-src",
            FetchDirective::Img => "img-src",
            FetchDirective::Manifest => "manifest-src",
            FetchDirective::Media => "media-src",
            FetchDirective::Object => "object-src",
            FetchDirective::Script => "script-src",
            FetchDirective::Style => "style-src",
            FetchDirective::Worker => "worker-src",
        }
    }
}

impl fmt::Display for FetchDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value directives take source lists like fetch directives but keep their
/// full hyphenated name, with no suffix transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueDirective {
    BaseUri,
    FormAction,
    FrameAncestors,
    PluginTypes,
    ReportUri,
    RequireSriFor,
}

impl ValueDirective {
    /// The directive key as it appears in the header.
    pub fn name(self) -> &'static str {
        match self {
            ValueDirective::BaseUri => "base-uri",
            ValueDirective::FormAction => "form-action",
            ValueDirective::FrameAncestors => "frame-ancestors",
            ValueDirective::PluginTypes => "plugin-types",
            ValueDirective::ReportUri => "report-uri",
            ValueDirective::RequireSriFor => "require-sri-for",
        }
    }
}

impl fmt::Display for ValueDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Meta directives are boolean: their presence alone changes browser
/// behavior, and they render as the bare directive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetaDirective {
    BlockAllMixedContent,
    UpgradeInsecureRequests,
}

impl MetaDirective {
    /// The directive key as it appears in the header.
    pub fn name(self) -> &'static str {
        match self {
            MetaDirective::BlockAllMixedContent => "block-all-mixed-content",
            MetaDirective::UpgradeInsecureRequests => "upgrade-insecure-requests",
        }
    }
}

impl fmt::Display for MetaDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
