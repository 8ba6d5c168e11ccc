//! The policy builder.
//!
//! Accumulates directive declarations in first-use order and compiles them
//! exactly once into the final header string. Compilation is a one-way
//! transition: afterwards the builder is frozen and any further declaration
//! fails with [`CspError::AlreadyCompiled`].

use log::{debug, warn};

use crate::directive::{FetchDirective, MetaDirective, ValueDirective};
use crate::error::{CspError, CspResult};
use crate::source::Source;

/// Internal key unifying the three directive categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKey {
    Fetch(FetchDirective),
    Value(ValueDirective),
    Meta(MetaDirective),
}

impl DirectiveKey {
    fn name(self) -> &'static str {
        match self {
            DirectiveKey::Fetch(directive) => directive.name(),
            DirectiveKey::Value(directive) => directive.name(),
            DirectiveKey::Meta(directive) => directive.name(),
        }
    }
}

/// Accumulated state for one directive.
#[derive(Debug, Clone)]
enum Entry {
    /// Space-separated source list, extended by repeated declarations.
    Sources(String),
    /// Presence flag for meta directives.
    Present,
}

/// Compile lifecycle. The `Mutable` to `Compiled` transition is one-way.
#[derive(Debug)]
enum State {
    Mutable,
    Compiled(String),
}

/// Builder for a `Content-Security-Policy` header value.
///
/// Declarations return `&mut Self` so they chain with `?`:
///
/// ```
/// use rampart_csp::{CspBuilder, FetchDirective, Source, ValueDirective};
///
/// let mut csp = CspBuilder::new();
/// csp.fetch(FetchDirective::Img, [Source::wildcard()])?
///     .value(ValueDirective::FrameAncestors, [Source::self_origin()])?;
///
/// assert_eq!(csp.compile(), "img-src *; frame-ancestors 'self'");
/// # Ok::<(), rampart_csp::CspError>(())
/// ```
#[derive(Debug)]
pub struct CspBuilder {
    /// Directive entries in first-use order. A key appears at most once;
    /// repeated declarations extend the existing entry in place.
    directives: Vec<(DirectiveKey, Entry)>,
    state: State,
}

impl CspBuilder {
    /// Returns a new, empty policy builder.
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            state: State::Mutable,
        }
    }

    /// Declare a fetch directive with one or more source values.
    ///
    /// Values accumulate under the `<base>-src` key in call order, each
    /// separated by a single space. An empty iterator leaves the policy
    /// untouched.
    pub fn fetch<I>(&mut self, directive: FetchDirective, sources: I) -> CspResult<&mut Self>
    where
        I: IntoIterator<Item = Source>,
    {
        self.accumulate(DirectiveKey::Fetch(directive), sources)
    }

    /// Declare a value directive with one or more source values.
    ///
    /// Identical accumulation and quoting semantics to [`fetch`](Self::fetch);
    /// the key is the directive's full hyphenated name.
    pub fn value<I>(&mut self, directive: ValueDirective, sources: I) -> CspResult<&mut Self>
    where
        I: IntoIterator<Item = Source>,
    {
        self.accumulate(DirectiveKey::Value(directive), sources)
    }

    /// Declare a meta directive. Idempotent: repeated declarations record a
    /// single entry at the position of the first.
    pub fn meta(&mut self, directive: MetaDirective) -> CspResult<&mut Self> {
        let key = DirectiveKey::Meta(directive);
        self.check_mutable(key)?;

        if !self.directives.iter().any(|(existing, _)| *existing == key) {
            self.directives.push((key, Entry::Present));
        }
        Ok(self)
    }

    /// Returns whether `compile` has run.
    pub fn is_compiled(&self) -> bool {
        matches!(self.state, State::Compiled(_))
    }

    /// The cached header string, or `None` before compilation. Once the
    /// policy is compiled this is the read path for shared references.
    pub fn header(&self) -> Option<&str> {
        match &self.state {
            State::Compiled(header) => Some(header),
            State::Mutable => None,
        }
    }

    /// Render the accumulated directives into the header string and freeze
    /// the builder.
    ///
    /// Idempotent: the first call computes and caches the result; every
    /// later call returns the cached string without recomputation.
    pub fn compile(&mut self) -> &str {
        if let State::Mutable = self.state {
            let header = self.render();
            debug!(
                "compiled CSP header: {} directives, {} bytes",
                self.directives.len(),
                header.len()
            );
            self.state = State::Compiled(header);
        }

        match &self.state {
            State::Compiled(header) => header,
            State::Mutable => unreachable!("state set to Compiled above"),
        }
    }

    /// Returns an independent, unfrozen copy of the current directive
    /// mapping.
    ///
    /// The copy always starts mutable with no cached result, even when the
    /// source is already compiled, so a shared policy prefix can branch into
    /// several variants.
    pub fn fork(&self) -> CspBuilder {
        CspBuilder {
            directives: self.directives.clone(),
            state: State::Mutable,
        }
    }

    fn check_mutable(&self, key: DirectiveKey) -> CspResult<()> {
        if self.is_compiled() {
            warn!("rejected declaration of `{}` on a compiled policy", key.name());
            return Err(CspError::AlreadyCompiled {
                directive: key.name(),
            });
        }
        Ok(())
    }

    fn accumulate<I>(&mut self, key: DirectiveKey, sources: I) -> CspResult<&mut Self>
    where
        I: IntoIterator<Item = Source>,
    {
        self.check_mutable(key)?;

        for source in sources {
            let rendered = source.to_string();
            match self.directives.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, Entry::Sources(accumulated))) => {
                    accumulated.push(' ');
                    accumulated.push_str(&rendered);
                }
                // fetch and value keys never map to a presence entry
                Some((_, Entry::Present)) => {}
                None => self.directives.push((key, Entry::Sources(rendered))),
            }
        }
        Ok(self)
    }

    fn render(&self) -> String {
        self.directives
            .iter()
            .map(|(key, entry)| match entry {
                Entry::Present => key.name().to_string(),
                Entry::Sources(values) => format!("{} {}", key.name(), values),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Default for CspBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_quoted_and_raw_tokens_are_not() {
        let mut csp = CspBuilder::new();
        csp.fetch(
            FetchDirective::Script,
            [Source::raw("https://cdn.example.com"), Source::self_origin()],
        )
        .unwrap();

        assert_eq!(csp.compile(), "script-src https://cdn.example.com 'self'");
    }

    #[test]
    fn repeated_declarations_accumulate_under_one_entry() {
        let mut csp = CspBuilder::new();
        csp.fetch(FetchDirective::Script, [Source::raw("a.com")]).unwrap();
        csp.fetch(FetchDirective::Script, [Source::raw("b.com")]).unwrap();

        assert_eq!(csp.compile(), "script-src a.com b.com");
    }

    #[test]
    fn output_order_is_first_use_order() {
        let mut csp = CspBuilder::new();
        csp.fetch(FetchDirective::Default, [Source::self_origin()]).unwrap();
        csp.value(ValueDirective::BaseUri, [Source::self_origin()]).unwrap();
        // a later contribution to an earlier directive must not move it
        csp.fetch(FetchDirective::Default, [Source::raw("data:")]).unwrap();

        assert_eq!(csp.compile(), "default-src 'self' data:; base-uri 'self'");
    }

    #[test]
    fn meta_directives_render_bare_and_deduplicate() {
        let mut csp = CspBuilder::new();
        csp.meta(MetaDirective::BlockAllMixedContent).unwrap();
        csp.meta(MetaDirective::BlockAllMixedContent).unwrap();

        assert_eq!(csp.compile(), "block-all-mixed-content");
    }

    #[test]
    fn empty_source_iterator_is_a_noop() {
        let mut csp = CspBuilder::new();
        csp.fetch(FetchDirective::Style, []).unwrap();

        assert_eq!(csp.compile(), "");
    }

    #[test]
    fn compile_is_idempotent() {
        let mut csp = CspBuilder::new();
        csp.fetch(FetchDirective::Img, [Source::wildcard()]).unwrap();

        let first = csp.compile().to_string();
        assert_eq!(csp.compile(), first);
        assert_eq!(csp.compile(), first);
    }

    #[test]
    fn declarations_chain_through_question_mark() -> CspResult<()> {
        let mut csp = CspBuilder::new();
        csp.fetch(FetchDirective::Default, [Source::self_origin()])?
            .value(ValueDirective::FormAction, [Source::self_origin()])?
            .meta(MetaDirective::UpgradeInsecureRequests)?;

        assert_eq!(
            csp.compile(),
            "default-src 'self'; form-action 'self'; upgrade-insecure-requests"
        );
        Ok(())
    }

    #[test]
    fn declarations_after_compile_fail_and_leave_the_cache_untouched() {
        let mut csp = CspBuilder::new();
        csp.fetch(FetchDirective::Default, [Source::self_origin()]).unwrap();
        let compiled = csp.compile().to_string();

        let err = csp.fetch(FetchDirective::Style, [Source::raw("x")]).unwrap_err();
        assert_eq!(
            err,
            CspError::AlreadyCompiled {
                directive: "style-src"
            }
        );

        let err = csp.meta(MetaDirective::BlockAllMixedContent).unwrap_err();
        assert_eq!(
            err,
            CspError::AlreadyCompiled {
                directive: "block-all-mixed-content"
            }
        );

        assert_eq!(csp.compile(), compiled);
    }

    #[test]
    fn is_compiled_tracks_the_lifecycle() {
        let mut csp = CspBuilder::new();
        assert!(!csp.is_compiled());
        assert_eq!(csp.header(), None);

        csp.meta(MetaDirective::UpgradeInsecureRequests).unwrap();
        csp.compile();

        assert!(csp.is_compiled());
        assert_eq!(csp.header(), Some("upgrade-insecure-requests"));
    }

    #[test]
    fn fork_is_independent_in_both_directions() {
        let mut base = CspBuilder::new();
        base.fetch(FetchDirective::Default, [Source::self_origin()]).unwrap();

        let mut variant = base.fork();
        variant.fetch(FetchDirective::Script, [Source::raw("a.com")]).unwrap();
        base.fetch(FetchDirective::Img, [Source::wildcard()]).unwrap();

        assert_eq!(base.compile(), "default-src 'self'; img-src *");
        assert_eq!(variant.compile(), "default-src 'self'; script-src a.com");
    }

    #[test]
    fn fork_of_a_compiled_builder_is_unfrozen() {
        let mut base = CspBuilder::new();
        base.fetch(FetchDirective::Default, [Source::self_origin()]).unwrap();
        base.compile();

        let mut variant = base.fork();
        assert!(!variant.is_compiled());
        assert_eq!(variant.header(), None);

        variant.fetch(FetchDirective::Font, [Source::raw("https://fonts.example")]).unwrap();
        assert_eq!(
            variant.compile(),
            "default-src 'self'; font-src https://fonts.example"
        );
    }
}
