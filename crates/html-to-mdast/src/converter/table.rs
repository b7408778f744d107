//! Ordered handler table.
//!
//! Rules are tried in insertion order and the first rule whose matcher
//! accepts a node wins. Put specific rules before general fallbacks:
//!
//! ```ignore
//! let mut table = HandlerTable::new();
//! table
//!     .add("pre.shell", shell_block)
//!     .add(Pattern::tag("pre").can_have_any_class(), code_block);
//! ```

use std::fmt;

use crate::context::Context;
use crate::converter::main::Children;
use crate::error::Result;
use crate::hast::Node;
use crate::mdast::Handled;
use crate::selector::Matcher;

/// Handler signature.
///
/// Returning `Ok(None)` declines the node: the engine then behaves as if no
/// rule matched. `Ok(Some(Handled::Nodes(vec![])))` is valid, empty output.
pub type HandlerFn = dyn Fn(&Node, &mut Children<'_>, &Context) -> Result<Option<Handled>> + Send + Sync;

/// A matcher paired with its handler.
pub struct Rule {
    matcher: Matcher,
    handler: Box<HandlerFn>,
}

impl Rule {
    /// The matcher of this rule.
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Run the handler.
    pub fn handle(&self, node: &Node, children: &mut Children<'_>, ctx: &Context) -> Result<Option<Handled>> {
        (self.handler)(node, children, ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("matcher", &self.matcher).finish_non_exhaustive()
    }
}

/// Ordered list of rules with first-match-wins dispatch.
#[derive(Debug, Default)]
pub struct HandlerTable {
    rules: Vec<Rule>,
}

impl HandlerTable {
    /// An empty table; every element falls through to default recursion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Later rules only see nodes earlier rules did not match.
    pub fn add<M, F>(&mut self, matcher: M, handler: F) -> &mut Self
    where
        M: Into<Matcher>,
        F: Fn(&Node, &mut Children<'_>, &Context) -> Result<Option<Handled>> + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            matcher: matcher.into(),
            handler: Box::new(handler),
        });
        self
    }

    /// Builder form of [`HandlerTable::add`].
    #[must_use]
    pub fn with<M, F>(mut self, matcher: M, handler: F) -> Self
    where
        M: Into<Matcher>,
        F: Fn(&Node, &mut Children<'_>, &Context) -> Result<Option<Handled>> + Send + Sync + 'static,
    {
        self.add(matcher, handler);
        self
    }

    /// Append all rules of `fallback` after the existing ones.
    pub fn extend(&mut self, fallback: Self) -> &mut Self {
        self.rules.extend(fallback.rules);
        self
    }

    /// Insert all rules of `overrides` before the existing ones.
    pub fn prepend(&mut self, overrides: Self) -> &mut Self {
        let existing = std::mem::replace(&mut self.rules, overrides.rules);
        self.rules.extend(existing);
        self
    }

    /// First rule matching `node`.
    pub fn find(&self, node: &Node) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matcher.matches(node))
    }

    /// Position of the first rule matching `node`.
    pub fn position(&self, node: &Node) -> Option<usize> {
        self.rules.iter().position(|rule| rule.matcher.matches(node))
    }

    /// Rules in dispatch order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
