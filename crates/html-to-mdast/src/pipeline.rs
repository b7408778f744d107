//! Plugin-style entry points.
//!
//! [`configure`] produces either a [`Mutate`] transform, which returns the
//! destination tree for further in-process stages, or a [`Bridge`] transform,
//! which hands the tree to a separate downstream [`Destination`] and reports
//! completion through a callback.

use log::warn;

use crate::converter::{HandlerTable, to_mdast_with_options};
use crate::error::{BoxError, ConversionError, Result};
use crate::options::ConversionOptions;
use crate::{hast, mdast};

/// A downstream processor that consumes destination trees.
pub trait Destination {
    /// Per-document state forwarded by the caller, such as a virtual file.
    type File;

    /// Process a converted tree.
    fn run(&self, tree: mdast::Node, file: &mut Self::File) -> std::result::Result<(), BoxError>;
}

/// Placeholder destination for mutate-only use of [`configure`].
///
/// Uninhabited: a [`Transform<NoDestination>`] is always [`Transform::Mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDestination {}

impl Destination for NoDestination {
    type File = ();

    fn run(&self, _tree: mdast::Node, _file: &mut ()) -> std::result::Result<(), BoxError> {
        match *self {}
    }
}

/// Transform that returns the destination tree.
#[derive(Debug)]
pub struct Mutate {
    handlers: HandlerTable,
    options: ConversionOptions,
}

impl Mutate {
    /// Create a transform with its own handler table.
    pub fn new(handlers: HandlerTable, options: ConversionOptions) -> Self {
        Self { handlers, options }
    }

    /// Convert `tree`. The source tree is consumed since minification rewrites it.
    pub fn transform(&self, mut tree: hast::Node) -> Result<mdast::Node> {
        to_mdast_with_options(&mut tree, &self.handlers, &self.options).map(|conversion| conversion.tree)
    }

    /// The handler table.
    pub const fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// The conversion options.
    pub const fn options(&self) -> &ConversionOptions {
        &self.options
    }
}

/// Transform that forwards the destination tree to a [`Destination`].
#[derive(Debug)]
pub struct Bridge<D> {
    destination: D,
    inner: Mutate,
}

impl<D: Destination> Bridge<D> {
    /// Create a bridge to `destination`.
    pub fn new(destination: D, handlers: HandlerTable, options: ConversionOptions) -> Self {
        Self {
            destination,
            inner: Mutate::new(handlers, options),
        }
    }

    /// Convert `tree`, run the destination on the result and call `next`
    /// exactly once: with `None` on success, with the error otherwise.
    ///
    /// A conversion failure is reported through `next` as well; the destination
    /// does not run in that case.
    pub fn transform<N>(&self, tree: hast::Node, file: &mut D::File, next: N)
    where
        N: FnOnce(Option<ConversionError>),
    {
        let result = self.inner.transform(tree).and_then(|converted| {
            self.destination
                .run(converted, file)
                .map_err(ConversionError::Destination)
        });
        if let Err(err) = &result {
            warn!("bridged conversion failed: {err}");
        }
        next(result.err());
    }

    /// The downstream processor.
    pub const fn destination(&self) -> &D {
        &self.destination
    }
}

/// A configured transform.
#[derive(Debug)]
pub enum Transform<D = NoDestination> {
    /// Returns the destination tree.
    Mutate(Mutate),
    /// Hands the destination tree to a downstream processor.
    Bridge(Bridge<D>),
}

impl<D> Transform<D> {
    /// Whether this transform forwards to a destination.
    pub const fn is_bridge(&self) -> bool {
        matches!(self, Self::Bridge(_))
    }
}

/// Build a transform: bridge mode when a destination is given, mutate mode
/// otherwise.
pub fn configure<D: Destination>(
    destination: Option<D>,
    handlers: HandlerTable,
    options: ConversionOptions,
) -> Transform<D> {
    match destination {
        Some(destination) => Transform::Bridge(Bridge::new(destination, handlers, options)),
        None => Transform::Mutate(Mutate::new(handlers, options)),
    }
}

/// Build a mutate-mode transform without naming a destination type.
pub fn configure_mutate(handlers: HandlerTable, options: ConversionOptions) -> Mutate {
    Mutate::new(handlers, options)
}
