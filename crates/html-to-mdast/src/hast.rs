//! Source tree model: a parsed HTML syntax tree (hast).
//!
//! The engine only ever reads these nodes, apart from the single whitespace
//! minification pass in [`crate::minify`] which runs before transformation.
//! Nodes serialize to the usual hast JSON shape (`type`, `tagName`,
//! `properties`, `children`, `value`).

use std::borrow::Cow;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A node of the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Document root.
    Root(Root),
    /// An element such as `<p>` or `<a href>`.
    Element(Element),
    /// Character data.
    Text(Text),
    /// `<!-- ... -->`
    Comment(Comment),
    /// `<!doctype html>`
    Doctype,
}

/// Document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Top-level nodes.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Lowercase tag name.
    #[serde(rename = "tagName")]
    pub tag_name: String,
    /// Attributes and class list.
    #[serde(default)]
    pub properties: Properties,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Character data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// The text itself.
    pub value: String,
}

/// Comment contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment body without the delimiters.
    pub value: String,
}

impl Node {
    /// Create a root node.
    pub fn root(children: Vec<Self>) -> Self {
        Self::Root(Root { children })
    }

    /// Create an element without attributes.
    pub fn element(tag_name: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Element(Element::new(tag_name).with_children(children))
    }

    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Text { value: value.into() })
    }

    /// Create a comment node.
    pub fn comment(value: impl Into<String>) -> Self {
        Self::Comment(Comment { value: value.into() })
    }

    /// Whether this node is an element.
    pub const fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// The element, if this node is one.
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Tag name of an element node.
    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(|element| element.tag_name.as_str())
    }

    /// Properties of an element node.
    pub fn properties(&self) -> Option<&Properties> {
        self.as_element().map(|element| &element.properties)
    }

    /// Children of a root or element; empty for leaves.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Root(root) => &root.children,
            Self::Element(element) => &element.children,
            _ => &[],
        }
    }

    /// Mutable children of a root or element.
    pub(crate) const fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Root(root) => Some(&mut root.children),
            Self::Element(element) => Some(&mut element.children),
            _ => None,
        }
    }

    /// Text value of a text node. Empty text counts as no value.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.value.is_empty() => Some(&text.value),
            _ => None,
        }
    }

    /// Canonical selector of an element node, `None` for anything else.
    pub fn selector(&self) -> Option<String> {
        crate::selector::selector(self)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&text.value),
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Properties::default(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, keeping the position of an existing one.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.set(name, value);
        self
    }

    /// Append a class token.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.properties.class_name.push(class.into());
        self
    }

    /// Replace the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Element attributes.
///
/// Attributes keep their insertion order, which is also the order they appear
/// in a selector. The class list is stored separately as `className`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    class_name: Vec<String>,
    attributes: Vec<(String, String)>,
}

impl Properties {
    /// Set an attribute. `class` and `className` replace the class list.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if name == "class" || name == "className" {
            self.class_name = value.split_ascii_whitespace().map(str::to_string).collect();
            return;
        }
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Value of an attribute other than the class list.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Class tokens in document order.
    pub fn class_name(&self) -> &[String] {
        &self.class_name
    }

    /// Attribute names, excluding the class list.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(key, _)| key.as_str())
    }

    /// Attributes as name/value pairs, excluding the class list.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Whether there are no attributes and no classes.
    pub fn is_empty(&self) -> bool {
        self.class_name.is_empty() && self.attributes.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let class_entry = usize::from(!self.class_name.is_empty());
        let mut map = serializer.serialize_map(Some(self.attributes.len() + class_entry))?;
        if !self.class_name.is_empty() {
            map.serialize_entry("className", &self.class_name)?;
        }
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PropertiesVisitor)
    }
}

struct PropertiesVisitor;

impl<'de> Visitor<'de> for PropertiesVisitor {
    type Value = Properties;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of element properties")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut properties = Properties::default();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            if key == "className" || key == "class" {
                properties.class_name = class_tokens(&value);
            } else if let Some(value) = property_string(&value) {
                properties.set(attribute_name(&key), value);
            }
        }
        Ok(properties)
    }
}

/// hast property names whose HTML attribute differs by more than case.
const RENAMED_PROPERTIES: &[(&str, &str)] = &[
    ("acceptCharset", "accept-charset"),
    ("htmlFor", "for"),
    ("httpEquiv", "http-equiv"),
];

/// hast property names that are camel-cased HTML attributes.
const CAMEL_CASED_PROPERTIES: &[&str] = &[
    "accessKey",
    "allowFullScreen",
    "autoCapitalize",
    "autoComplete",
    "autoFocus",
    "autoPlay",
    "cellPadding",
    "cellSpacing",
    "charSet",
    "colSpan",
    "contentEditable",
    "crossOrigin",
    "dateTime",
    "encType",
    "enterKeyHint",
    "fetchPriority",
    "formAction",
    "formEncType",
    "formMethod",
    "formNoValidate",
    "formTarget",
    "frameBorder",
    "hrefLang",
    "inputMode",
    "isMap",
    "itemId",
    "itemProp",
    "itemRef",
    "itemScope",
    "itemType",
    "marginHeight",
    "marginWidth",
    "maxLength",
    "minLength",
    "noModule",
    "noValidate",
    "playsInline",
    "readOnly",
    "referrerPolicy",
    "rowSpan",
    "spellCheck",
    "srcDoc",
    "srcLang",
    "srcSet",
    "tabIndex",
    "useMap",
];

/// HTML attribute name for a hast property name, so hast JSON input and parsed
/// HTML key attributes the same way: `dataFooBar` becomes `data-foo-bar`,
/// `ariaLabel` becomes `aria-label`, `tabIndex` becomes `tabindex`. Names that
/// are already attribute names, and unknown names such as SVG `viewBox`, are
/// returned unchanged.
pub fn attribute_name(property: &str) -> Cow<'_, str> {
    if !property.contains(|c: char| c.is_ascii_uppercase()) {
        return Cow::Borrowed(property);
    }
    if let Some((_, name)) = RENAMED_PROPERTIES.iter().find(|(from, _)| *from == property) {
        return Cow::Borrowed(name);
    }
    if CAMEL_CASED_PROPERTIES.contains(&property) {
        return Cow::Owned(property.to_ascii_lowercase());
    }
    let dashed = ["data", "aria"].into_iter().find(|prefix| {
        property
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
    });
    match dashed {
        Some(prefix) => {
            let mut name = String::with_capacity(property.len() + 4);
            name.push_str(prefix);
            for c in property[prefix.len()..].chars() {
                if c.is_ascii_uppercase() {
                    name.push('-');
                    name.push(c.to_ascii_lowercase());
                } else {
                    name.push(c);
                }
            }
            Cow::Owned(name)
        }
        None => Cow::Borrowed(property),
    }
}

fn class_tokens(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(property_string).collect(),
        Value::String(s) => s.split_ascii_whitespace().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// `true` is presence (empty value), `false` and `null` remove the attribute.
fn property_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(property_string)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
