// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The generic value tree underneath every spec property.
//!
//! A [`Node`] is what a Vega-Lite property value looks like once leaf builders have normalized it:
//! either nothing at all ([`Node::Absent`]), a scalar, an ordered sequence of nodes, or a
//! name-to-node mapping. There is no way to hold an unwrapped raw collection inside a node; every
//! conversion wraps nested values recursively.
//!
//! Sequence and mapping payloads sit behind an [`Arc`], so cloning a node (and therefore cloning
//! any bag or view) shares the unmodified substructure instead of copying it.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// A scalar leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// An explicit `null`, distinct from an absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
}

/// A normalized, immutable spec value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Node {
    /// No value. Merging treats this as "keep the other side".
    #[default]
    Absent,
    /// A scalar leaf.
    Scalar(Scalar),
    /// An ordered sequence of nodes.
    Seq(Arc<[Node]>),
    /// A mapping from names to nodes.
    ///
    /// [`Node::map`] drops [`Node::Absent`] values and merging never adds one; a map built by hand
    /// that keeps them compares unequal to one without.
    Map(Arc<BTreeMap<String, Node>>),
}

static ABSENT: Node = Node::Absent;

impl Node {
    /// Builds a mapping node from name/value pairs.
    ///
    /// Absent values are dropped, so `{"a": absent}` and `{}` compare equal. Later pairs replace
    /// earlier pairs with the same name.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        let map: BTreeMap<String, Self> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| v.is_present())
            .collect();
        Self::Map(Arc::new(map))
    }

    /// Builds a sequence node.
    pub fn seq<V: Into<Self>>(items: impl IntoIterator<Item = V>) -> Self {
        let items: Vec<Self> = items.into_iter().map(Into::into).collect();
        Self::Seq(items.into())
    }

    /// Builds a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Str(value.into()))
    }

    /// An explicit `null` scalar.
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Returns `true` for [`Node::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` for anything but [`Node::Absent`].
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Returns the string payload of a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the items of a sequence.
    pub fn as_seq(&self) -> Option<&[Self]> {
        match self {
            Self::Seq(items) => Some(&**items),
            _ => None,
        }
    }

    /// Returns the entries of a mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(&**map),
            _ => None,
        }
    }

    /// Looks up `key` in a mapping.
    ///
    /// Returns [`Node::Absent`] when this is not a mapping or the key is missing.
    pub fn get(&self, key: &str) -> &Self {
        self.as_map().and_then(|m| m.get(key)).unwrap_or(&ABSENT)
    }

    /// Right-biased deep merge (`self × other`).
    ///
    /// - If `other` is absent, `self` is kept.
    /// - If both are mappings, the result holds the union of their names and each entry is merged
    ///   recursively.
    /// - Otherwise `other` replaces `self`. Sequences are leaves: they are never merged
    ///   element-wise.
    pub fn merge(&self, other: &Self) -> Self {
        match (self, other) {
            (_, Self::Absent) => self.clone(),
            (Self::Map(left), Self::Map(right)) => {
                if left.is_empty() {
                    return other.clone();
                }
                if right.is_empty() {
                    return self.clone();
                }
                let mut out = (**left).clone();
                for (key, value) in right.iter() {
                    let merged = match left.get(key) {
                        Some(existing) => existing.merge(value),
                        None => value.clone(),
                    };
                    out.insert(key.clone(), merged);
                }
                Self::Map(Arc::new(out))
            }
            _ => other.clone(),
        }
    }

    /// Whole-value replacement: `other` if present, `self` otherwise.
    pub fn replace(&self, other: &Self) -> Self {
        if other.is_present() {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// Returns `true` if merging `other` into `self` would overwrite a present leaf of `self`
    /// with a different value.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, _) | (_, Self::Absent) => false,
            (Self::Map(left), Self::Map(right)) => right
                .iter()
                .any(|(key, value)| left.get(key).is_some_and(|l| l.conflicts_with(value))),
            _ => self != other,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// A compact, JSON-like rendering, mainly for logs and demos.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Self::Scalar(Scalar::Int(value.into()))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Int(value))
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Self::Scalar(Scalar::Int(value.into()))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<&String> for Node {
    fn from(value: &String) -> Self {
        Self::string(value.as_str())
    }
}

impl From<&Node> for Node {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

/// `None` becomes [`Node::Absent`].
impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Self::seq(value)
    }
}

impl<T: Into<Node>, const N: usize> From<[T; N]> for Node {
    fn from(value: [T; N]) -> Self {
        Self::seq(value)
    }
}

impl<K: Into<String>, V: Into<Node>> From<BTreeMap<K, V>> for Node {
    fn from(value: BTreeMap<K, V>) -> Self {
        Self::map(value)
    }
}

/// Bare name tokens that normalize to their string form when wrapped in a [`Node`].
pub trait NameToken: Copy {
    /// The canonical string form of the token.
    fn name(self) -> &'static str;
}

/// Vega-Lite mark types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkType {
    /// `arc`
    Arc,
    /// `area`
    Area,
    /// `bar`
    Bar,
    /// `boxplot`
    Boxplot,
    /// `circle`
    Circle,
    /// `errorband`
    ErrorBand,
    /// `errorbar`
    ErrorBar,
    /// `geoshape`
    Geoshape,
    /// `image`
    Image,
    /// `line`
    Line,
    /// `point`
    Point,
    /// `rect`
    Rect,
    /// `rule`
    Rule,
    /// `square`
    Square,
    /// `text`
    Text,
    /// `tick`
    Tick,
    /// `trail`
    Trail,
}

impl NameToken for MarkType {
    fn name(self) -> &'static str {
        match self {
            Self::Arc => "arc",
            Self::Area => "area",
            Self::Bar => "bar",
            Self::Boxplot => "boxplot",
            Self::Circle => "circle",
            Self::ErrorBand => "errorband",
            Self::ErrorBar => "errorbar",
            Self::Geoshape => "geoshape",
            Self::Image => "image",
            Self::Line => "line",
            Self::Point => "point",
            Self::Rect => "rect",
            Self::Rule => "rule",
            Self::Square => "square",
            Self::Text => "text",
            Self::Tick => "tick",
            Self::Trail => "trail",
        }
    }
}

/// How a composite view resolves scales, axes, or legends across its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolveMode {
    /// Children share one scale/guide.
    Shared,
    /// Each child gets its own scale/guide.
    Independent,
}

impl NameToken for ResolveMode {
    fn name(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Independent => "independent",
        }
    }
}

impl From<MarkType> for Node {
    fn from(value: MarkType) -> Self {
        Self::string(value.name())
    }
}

impl From<ResolveMode> for Node {
    fn from(value: ResolveMode) -> Self {
        Self::string(value.name())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn construction_wraps_nested_values() {
        let node = Node::map([("x", Node::map([("field", "a")])), ("y", Node::from(vec![1, 2]))]);
        assert_eq!(node.get("x").get("field"), &Node::from("a"));
        assert_eq!(
            node.get("y").as_seq(),
            Some(&[Node::from(1), Node::from(2)][..])
        );
        assert!(node.get("z").is_absent(), "missing keys read as absent");
    }

    #[test]
    fn wrapping_a_node_is_idempotent() {
        let node = Node::map([("mark", MarkType::Bar)]);
        assert_eq!(Node::from(node.clone()), node);
        assert_eq!(Node::from(&node), node);
    }

    #[test]
    fn name_tokens_normalize_to_strings() {
        assert_eq!(Node::from(MarkType::ErrorBar), Node::from("errorbar"));
        assert_eq!(Node::from(ResolveMode::Independent).as_str(), Some("independent"));
    }

    #[test]
    fn absent_map_entries_are_dropped() {
        let with_absent = Node::map([("a", Node::from(1)), ("b", Node::Absent)]);
        assert_eq!(with_absent, Node::map([("a", 1)]));
        assert_eq!(Node::from(None::<i32>), Node::Absent);

        let merged = Node::map([("a", 1)]).merge(&Node::map([("b", Node::Absent)]));
        assert_eq!(merged, Node::map([("a", 1)]), "merging adds no absent entry");

        let by_hand = Node::Map(Arc::new(BTreeMap::from([
            (String::from("a"), Node::from(1)),
            (String::from("b"), Node::Absent),
        ])));
        assert_ne!(by_hand, Node::map([("a", 1)]));
    }

    #[test]
    fn merge_is_right_biased_and_deep() {
        let left = Node::map([
            ("x", Node::map([("field", "a"), ("type", "nominal")])),
            ("color", Node::from("red")),
        ]);
        let right = Node::map([
            ("x", Node::map([("type", "ordinal")])),
            ("size", Node::from(3)),
        ]);
        let merged = left.merge(&right);
        assert_eq!(
            merged,
            Node::map([
                ("x", Node::map([("field", "a"), ("type", "ordinal")])),
                ("color", Node::from("red")),
                ("size", Node::from(3)),
            ])
        );
    }

    #[test]
    fn absent_is_the_merge_identity() {
        let value = Node::map([("a", Node::seq([1, 2]))]);
        assert_eq!(value.merge(&Node::Absent), value);
        assert_eq!(Node::Absent.merge(&value), value);
    }

    #[test]
    fn sequences_and_mismatched_shapes_are_replaced() {
        let left = Node::seq([1, 2, 3]);
        let right = Node::seq([4]);
        assert_eq!(left.merge(&right), right);

        let scalar = Node::from("bar");
        let map = Node::map([("type", "bar"), ("color", "red")]);
        assert_eq!(scalar.merge(&map), map);
        assert_eq!(map.merge(&scalar), scalar);
    }

    #[test]
    fn merge_is_associative() {
        let a = Node::map([("x", Node::map([("field", "a")])), ("k", Node::from(1))]);
        let b = Node::map([("x", Node::map([("type", "q")])), ("k", Node::from(2))]);
        let c = Node::map([("x", Node::map([("field", "c")])), ("z", Node::null())]);
        assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
    }

    #[test]
    fn replace_never_deep_merges() {
        let left = Node::map([("url", "a.csv")]);
        let right = Node::map([("values", Node::seq([1]))]);
        assert_eq!(left.replace(&right), right);
        assert_eq!(left.replace(&Node::Absent), left);
    }

    #[test]
    fn conflicts_only_on_differing_leaves() {
        let left = Node::map([("axis", Node::map([("grid", true)]))]);
        let disjoint = Node::map([("legend", Node::map([("orient", "top")]))]);
        let clashing = Node::map([("axis", Node::map([("grid", false)]))]);
        assert!(!left.conflicts_with(&disjoint), "disjoint keys merge cleanly");
        assert!(left.conflicts_with(&clashing), "grid differs");
        assert!(!left.conflicts_with(&left.clone()), "equal values agree");
    }

    #[test]
    fn display_is_compact() {
        let node = Node::map([("a", Node::seq([Node::from(1), Node::null()])), ("b", "x".into())]);
        assert_eq!(node.to_string(), r#"{a: [1, null], b: "x"}"#);
    }
}
