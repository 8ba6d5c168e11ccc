#![no_main]
//! Policy builder fuzzing
//!
//! Drives arbitrary declaration sequences through the builder and checks:
//! - the rendered header grammar (no stray separators)
//! - compile idempotence
//! - the post-compile freeze (declarations must fail, cache must survive)
//! - fork independence from the original builder
//!
//! The builder deliberately performs no sanitization of raw tokens, so the
//! fuzzer plays a well-behaved caller: fuzzed tokens are stripped of the
//! separator characters the consumer contract reserves.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rampart_csp::{CspBuilder, CspError, FetchDirective, MetaDirective, Source, ValueDirective};

const FETCH_DIRECTIVES: [FetchDirective; 12] = [
    FetchDirective::Child,
    FetchDirective::Connect,
    FetchDirective::Default,
    FetchDirective::Font,
    FetchDirective::Frame,
    FetchDirective::Img,
    FetchDirective::Manifest,
    FetchDirective::Media,
    FetchDirective::Object,
    FetchDirective::Script,
    FetchDirective::Style,
    FetchDirective::Worker,
];

const VALUE_DIRECTIVES: [ValueDirective; 6] = [
    ValueDirective::BaseUri,
    ValueDirective::FormAction,
    ValueDirective::FrameAncestors,
    ValueDirective::PluginTypes,
    ValueDirective::ReportUri,
    ValueDirective::RequireSriFor,
];

const META_DIRECTIVES: [MetaDirective; 2] = [
    MetaDirective::BlockAllMixedContent,
    MetaDirective::UpgradeInsecureRequests,
];

/// Strips the characters the consumer contract keeps out of tokens.
/// Returns `None` when nothing usable remains.
fn sanitize_token(raw: &str) -> Option<String> {
    let token: String = raw.chars().filter(|c| *c != ';' && !c.is_whitespace()).collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// A single fuzzed source value.
#[derive(Debug, Clone, Arbitrary)]
enum FuzzSource {
    Keyword(String),
    Raw(String),
    Nonce(String),
}

impl FuzzSource {
    fn into_source(self) -> Option<Source> {
        match self {
            FuzzSource::Keyword(name) => sanitize_token(&name).map(Source::keyword),
            FuzzSource::Raw(token) => sanitize_token(&token).map(Source::raw),
            FuzzSource::Nonce(value) => sanitize_token(&value).map(|v| Source::nonce(&v)),
        }
    }
}

/// A single fuzzed declaration.
#[derive(Debug, Clone, Arbitrary)]
enum FuzzOp {
    Fetch(u8, Vec<FuzzSource>),
    Value(u8, Vec<FuzzSource>),
    Meta(u8),
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: FuzzInput| {
    let mut csp = CspBuilder::new();
    let mut declared_any = false;

    for op in input.ops.into_iter().take(64) {
        match op {
            FuzzOp::Fetch(index, sources) => {
                let directive = FETCH_DIRECTIVES[index as usize % FETCH_DIRECTIVES.len()];
                let sources: Vec<Source> = sources
                    .into_iter()
                    .take(16)
                    .filter_map(FuzzSource::into_source)
                    .collect();
                declared_any |= !sources.is_empty();
                csp.fetch(directive, sources)
                    .expect("declaration on a mutable builder must succeed");
            }
            FuzzOp::Value(index, sources) => {
                let directive = VALUE_DIRECTIVES[index as usize % VALUE_DIRECTIVES.len()];
                let sources: Vec<Source> = sources
                    .into_iter()
                    .take(16)
                    .filter_map(FuzzSource::into_source)
                    .collect();
                declared_any |= !sources.is_empty();
                csp.value(directive, sources)
                    .expect("declaration on a mutable builder must succeed");
            }
            FuzzOp::Meta(index) => {
                let directive = META_DIRECTIVES[index as usize % META_DIRECTIVES.len()];
                declared_any = true;
                csp.meta(directive)
                    .expect("declaration on a mutable builder must succeed");
            }
        }
    }

    let mut fork = csp.fork();

    let header = csp.compile().to_string();

    // Grammar invariants on the rendered header
    assert!(!header.contains(";;"));
    assert!(!header.starts_with(';'));
    assert!(!header.ends_with(';'));
    assert!(!header.ends_with(' '));
    assert_eq!(declared_any, !header.is_empty());

    // Compile must be idempotent
    assert_eq!(csp.compile(), header);
    assert_eq!(csp.header(), Some(header.as_str()));

    // The freeze must reject every further declaration without touching the cache
    let err = csp.meta(MetaDirective::BlockAllMixedContent).unwrap_err();
    assert!(matches!(err, CspError::AlreadyCompiled { .. }));
    assert!(csp
        .fetch(FetchDirective::Script, [Source::self_origin()])
        .is_err());
    assert_eq!(csp.compile(), header);

    // The pre-compile fork stays mutable and renders the same header
    assert!(!fork.is_compiled());
    assert_eq!(fork.compile(), header);
});
