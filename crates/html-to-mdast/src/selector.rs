//! Selector computation and match specifications.
//!
//! Every element has a canonical selector of the form
//! `tag#id.class1.class2[attr][attr="value"]`. Handlers are keyed by a
//! [`Matcher`], which is either a predicate, one or more literal selectors, or
//! a structured [`Pattern`] over the tag name, attribute names and classes.
//!
//! Patterns are exhaustive: every attribute and every class present on the
//! element must be accounted for by the pattern, either as required or as
//! optional. An element with an undeclared attribute does not match, so a more
//! permissive rule further down the table (or the default recursion) gets it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::hast::{Element, Node};

/// Predicate over attribute names or class tokens.
pub type KeyPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate over source nodes.
pub type NodePredicate = Arc<dyn Fn(&Node) -> bool + Send + Sync>;

/// Canonical selector of an element node; `None` for other node kinds.
pub fn selector(node: &Node) -> Option<String> {
    node.as_element().map(element_selector)
}

/// Canonical selector of an element.
pub fn element_selector(element: &Element) -> String {
    let props = &element.properties;
    let mut out = element.tag_name.clone();
    if let Some(id) = props.id().filter(|id| !id.is_empty()) {
        out.push('#');
        out.push_str(id);
    }
    for class in props.class_name() {
        out.push('.');
        out.push_str(class);
    }
    for (name, value) in props.attributes() {
        if name == "id" {
            continue;
        }
        out.push('[');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push(']');
    }
    out
}

/// One entry of a required or optional key list.
#[derive(Clone)]
pub enum KeyRule {
    /// A literal attribute name or class token.
    Name(String),
    /// Every key satisfying the predicate.
    Predicate(KeyPredicate),
}

impl KeyRule {
    /// A rule accepting keys that satisfy `predicate`.
    pub fn matching(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    /// A rule accepting every key.
    pub fn any() -> Self {
        Self::matching(|_| true)
    }
}

impl fmt::Debug for KeyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for KeyRule {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for KeyRule {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Check that `required` and `optional` account for exactly the keys in
/// `present`.
///
/// Every required key must be present. A required predicate must match at
/// least one present key and consumes all keys it matches. Optional names are
/// consumed if present; optional predicates consume every remaining key they
/// match. The check passes when no present key is left over.
pub fn is_exhaustive<'a>(
    present: impl IntoIterator<Item = &'a str>,
    required: &[KeyRule],
    optional: &[KeyRule],
) -> bool {
    let mut remaining: BTreeSet<&str> = present.into_iter().collect();

    for rule in required {
        match rule {
            KeyRule::Name(name) => {
                if !remaining.remove(name.as_str()) {
                    return false;
                }
            }
            KeyRule::Predicate(predicate) => {
                let before = remaining.len();
                remaining.retain(|key| !predicate(*key));
                if remaining.len() == before {
                    return false;
                }
            }
        }
    }

    for rule in optional {
        match rule {
            KeyRule::Name(name) => {
                remaining.remove(name.as_str());
            }
            KeyRule::Predicate(predicate) => remaining.retain(|key| !predicate(*key)),
        }
    }

    remaining.is_empty()
}

/// Structured match over tag name, attribute names and class tokens.
///
/// An empty `is` accepts any tag. Omitted key lists mean "none": a pattern
/// built with [`Pattern::tag`] alone only matches the bare element.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    /// Accepted tag names; empty accepts any.
    pub is: Vec<String>,
    /// Required attribute names (`class` excluded).
    pub has: Vec<KeyRule>,
    /// Optional attribute names.
    pub can_have: Vec<KeyRule>,
    /// Required class tokens.
    pub has_class: Vec<KeyRule>,
    /// Optional class tokens.
    pub can_have_class: Vec<KeyRule>,
}

impl Pattern {
    /// A pattern for any tag without attributes or classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pattern for one tag.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            is: vec![name.into()],
            ..Self::default()
        }
    }

    /// A pattern for any of several tags.
    pub fn tags<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Require an attribute.
    #[must_use]
    pub fn has(mut self, rule: impl Into<KeyRule>) -> Self {
        self.has.push(rule.into());
        self
    }

    /// Allow an attribute.
    #[must_use]
    pub fn can_have(mut self, rule: impl Into<KeyRule>) -> Self {
        self.can_have.push(rule.into());
        self
    }

    /// Allow any attribute.
    #[must_use]
    pub fn can_have_any_attribute(self) -> Self {
        self.can_have(KeyRule::any())
    }

    /// Require a class.
    #[must_use]
    pub fn has_class(mut self, rule: impl Into<KeyRule>) -> Self {
        self.has_class.push(rule.into());
        self
    }

    /// Allow a class.
    #[must_use]
    pub fn can_have_class(mut self, rule: impl Into<KeyRule>) -> Self {
        self.can_have_class.push(rule.into());
        self
    }

    /// Allow any class.
    #[must_use]
    pub fn can_have_any_class(self) -> Self {
        self.can_have_class(KeyRule::any())
    }

    /// Whether `element` satisfies the pattern.
    pub fn matches_element(&self, element: &Element) -> bool {
        if !self.is.is_empty() && !self.is.iter().any(|tag| *tag == element.tag_name) {
            return false;
        }
        let props = &element.properties;
        is_exhaustive(props.names(), &self.has, &self.can_have)
            && is_exhaustive(
                props.class_name().iter().map(String::as_str),
                &self.has_class,
                &self.can_have_class,
            )
    }
}

/// Which nodes a handler applies to.
#[derive(Clone)]
pub enum Matcher {
    /// Arbitrary predicate; the only variant that can match non-elements.
    Predicate(NodePredicate),
    /// Element whose canonical selector equals this string.
    Selector(String),
    /// Element whose canonical selector is one of these strings.
    Selectors(Vec<String>),
    /// Structured pattern.
    Pattern(Pattern),
}

impl Matcher {
    /// A matcher from a node predicate.
    pub fn predicate(predicate: impl Fn(&Node) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    /// Whether `node` is matched.
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Predicate(predicate) => predicate(node),
            Self::Selector(expected) => node
                .as_element()
                .is_some_and(|element| element_selector(element) == *expected),
            Self::Selectors(expected) => node.as_element().is_some_and(|element| {
                let selector = element_selector(element);
                expected.iter().any(|candidate| *candidate == selector)
            }),
            Self::Pattern(pattern) => node
                .as_element()
                .is_some_and(|element| pattern.matches_element(element)),
        }
    }
}

/// Whether `node` satisfies `matcher`.
pub fn matches(node: &Node, matcher: &Matcher) -> bool {
    matcher.matches(node)
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
            Self::Selectors(selectors) => f.debug_tuple("Selectors").field(selectors).finish(),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
        }
    }
}

impl From<&str> for Matcher {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Matcher {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<Vec<String>> for Matcher {
    fn from(selectors: Vec<String>) -> Self {
        Self::Selectors(selectors)
    }
}

impl<const N: usize> From<[&str; N]> for Matcher {
    fn from(selectors: [&str; N]) -> Self {
        Self::Selectors(selectors.iter().map(|s| (*s).to_string()).collect())
    }
}

impl From<Pattern> for Matcher {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}
