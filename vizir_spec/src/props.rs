// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-field property bags.
//!
//! Every Vega-Lite object the composition algebra cares about has a fixed set of property names.
//! Those sets are modeled as plain structs with one [`Node`] per field, so callers get explicit
//! accessors. On top of that, [`Properties`] offers lookup by name against a static field table:
//! asking for a name the bag does not define fails with [`SpecError::MissingProperty`] instead of
//! being silently ignored.

extern crate alloc;

use hashbrown::HashSet;

use crate::{Node, SpecError};

/// Name-based access to a fixed set of [`Node`]-valued fields.
///
/// Implemented by every property bag and every view struct.
pub trait Properties: Clone {
    /// Human-readable name used in error messages.
    const TARGET: &'static str;
    /// Every field name this type defines, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Returns the field named `name`, or `None` if the type does not define it.
    fn field(&self, name: &str) -> Option<&Node>;

    /// Mutable counterpart of [`Properties::field`].
    fn field_mut(&mut self, name: &str) -> Option<&mut Node>;

    /// Returns the field named `name`.
    fn get(&self, name: &str) -> Result<&Node, SpecError> {
        self.field(name)
            .ok_or_else(|| SpecError::missing(Self::TARGET, name))
    }

    /// Returns a copy with the field named `name` set to `value`.
    fn with(&self, name: &str, value: impl Into<Node>) -> Result<Self, SpecError> {
        let mut out = self.clone();
        let slot = out
            .field_mut(name)
            .ok_or_else(|| SpecError::missing(Self::TARGET, name))?;
        *slot = value.into();
        Ok(out)
    }
}

/// A [`Properties`] type whose fields are all plain siblings that merge independently.
pub trait PropertyBag: Properties + Default + PartialEq {
    /// Builds a bag from name/value pairs.
    ///
    /// Unknown names fail with [`SpecError::MissingProperty`]; a name given twice fails with
    /// [`SpecError::DuplicateProperty`].
    fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, SpecError>
    where
        K: AsRef<str>,
        V: Into<Node>,
    {
        let mut out = Self::default();
        let mut seen: HashSet<&'static str> = HashSet::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            let Some(&known) = Self::FIELDS.iter().find(|f| **f == name) else {
                return Err(SpecError::missing(Self::TARGET, name));
            };
            if !seen.insert(known) {
                return Err(SpecError::DuplicateProperty {
                    target: Self::TARGET,
                    name: known,
                });
            }
            if let Some(slot) = out.field_mut(known) {
                *slot = value.into();
            }
        }
        Ok(out)
    }

    /// Returns `true` if every field is absent.
    fn is_empty(&self) -> bool {
        Self::FIELDS
            .iter()
            .all(|name| self.field(name).is_none_or(Node::is_absent))
    }

    /// Returns the name of the first field that holds a value.
    fn first_present(&self) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .copied()
            .find(|name| self.field(name).is_some_and(Node::is_present))
    }

    /// Field-wise right-biased merge (`self × other`).
    fn merged(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for name in Self::FIELDS {
            if let (Some(slot), Some(right)) = (out.field_mut(name), other.field(name)) {
                *slot = slot.merge(right);
            }
        }
        out
    }
}

macro_rules! property_bag {
    (
        $(#[$meta:meta])*
        $name:ident ($target:literal) {
            $( $(#[$field_meta:meta])* $field:ident, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: Node, )+
        }

        impl Properties for $name {
            const TARGET: &'static str = $target;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn field(&self, name: &str) -> Option<&Node> {
                match name {
                    $( stringify!($field) => Some(&self.$field), )+
                    _ => None,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
                match name {
                    $( stringify!($field) => Some(&mut self.$field), )+
                    _ => None,
                }
            }
        }

        impl PropertyBag for $name {}
    };
}

property_bag! {
    /// Properties that only exist on the top-level document.
    GlobalProps("global properties") {
        /// Grammar schema URL.
        schema,
        /// Background color of the whole visualization.
        background,
        /// Padding around the visualization.
        padding,
        /// Autosize behavior.
        autosize,
        /// Config object (theme-like defaults).
        config,
        /// Opaque user metadata.
        usermeta,
        /// Named inline datasets referenced by data sources.
        datasets,
    }
}

property_bag! {
    /// Properties every view shape carries.
    SharedProps("shared properties") {
        /// View name, used for selections and debugging.
        name,
        /// Free-form description.
        description,
        /// Title text or title object.
        title,
        /// Transform pipeline.
        transform,
        /// Parameters (signals and selections).
        params,
    }
}

property_bag! {
    /// Sub-view arrangement properties of facet, repeat and concat views.
    LayoutProps("layout properties") {
        /// Grid alignment of sub-views.
        align,
        /// Bounds calculation method.
        bounds,
        /// Whether sub-views are centered in their cells.
        center,
        /// Spacing between sub-views.
        spacing,
    }
}

property_bag! {
    /// Size, view background and projection of a plot area.
    FrameProps("frame properties") {
        /// Plot width.
        width,
        /// Plot height.
        height,
        /// View background/stroke styling.
        view,
        /// Geographic projection.
        projection,
    }
}

macro_rules! holder {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal)
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name(pub Node);

        impl $name {
            /// Wraps a value.
            pub fn new(value: impl Into<Node>) -> Self {
                Self(value.into())
            }

            /// Returns `true` if no value is held.
            pub fn is_absent(&self) -> bool {
                self.0.is_absent()
            }
        }

        impl Properties for $name {
            const TARGET: &'static str = $field;
            const FIELDS: &'static [&'static str] = &[$field];

            fn field(&self, name: &str) -> Option<&Node> {
                (name == $field).then_some(&self.0)
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
                (name == $field).then_some(&mut self.0)
            }
        }
    };
}

holder! {
    /// The data source of a view.
    ///
    /// Data sources are atomic: merging replaces the whole value instead of deep-merging it.
    Data("data")
}

holder! {
    /// The mark of a single view, either a type name or a mark definition object.
    Mark("mark")
}

holder! {
    /// The encoding channel mapping of a view.
    Encoding("encoding")
}

impl PropertyBag for Data {
    fn merged(&self, other: &Self) -> Self {
        Self(self.0.replace(&other.0))
    }
}

impl PropertyBag for Mark {}

impl PropertyBag for Encoding {}

/// Any bare property bag or holder that is not yet attached to a view.
///
/// Fragments cannot be concatenated or layered directly; they have to be canonicalized into a
/// [`View`](crate::View) first (see [`Fragment::canonicalize`]) or merged into an existing view
/// with [`View::merge_fragment`](crate::View::merge_fragment).
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// Shared per-view properties.
    Shared(SharedProps),
    /// Layout properties.
    Layout(LayoutProps),
    /// Frame properties.
    Frame(FrameProps),
    /// A data source.
    Data(Data),
    /// A mark.
    Mark(Mark),
    /// An encoding.
    Encoding(Encoding),
}

impl From<SharedProps> for Fragment {
    fn from(value: SharedProps) -> Self {
        Self::Shared(value)
    }
}

impl From<LayoutProps> for Fragment {
    fn from(value: LayoutProps) -> Self {
        Self::Layout(value)
    }
}

impl From<FrameProps> for Fragment {
    fn from(value: FrameProps) -> Self {
        Self::Frame(value)
    }
}

impl From<Data> for Fragment {
    fn from(value: Data) -> Self {
        Self::Data(value)
    }
}

impl From<Mark> for Fragment {
    fn from(value: Mark) -> Self {
        Self::Mark(value)
    }
}

impl From<Encoding> for Fragment {
    fn from(value: Encoding) -> Self {
        Self::Encoding(value)
    }
}
