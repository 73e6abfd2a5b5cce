// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View shapes.
//!
//! A [`View`] is one renderable Vega-Lite shape:
//! - [`SingleView`]: one mark with its data and encoding,
//! - [`LayerView`]: an ordered stack of overlaid single/layer views,
//! - [`FacetView`] / [`RepeatView`]: one inner single/layer view replicated over a field or a
//!   list of fields,
//! - [`ConcatView`]: independent views placed in a row, a column, or a wrapped grid.
//!
//! Facet, repeat and concat are the "layout family": they arrange several views and have no
//! single plot area, which is why they cannot be layered.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

use crate::{
    Data, Encoding, FrameProps, LayoutProps, Mark, Node, Properties, PropertyBag, SharedProps,
    SpecError,
};

/// Members of a [`LayerView`], bottom to top.
pub type Stack = SmallVec<[Panel; 2]>;

/// A fieldless tag naming each view shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// [`SingleView`].
    Single,
    /// [`LayerView`].
    Layer,
    /// [`FacetView`].
    Facet,
    /// [`RepeatView`].
    Repeat,
    /// [`ConcatView`] with [`ConcatKind::Row`].
    RowConcat,
    /// [`ConcatView`] with [`ConcatKind::Column`].
    ColumnConcat,
    /// [`ConcatView`] with [`ConcatKind::Grid`].
    GridConcat,
}

impl ViewKind {
    /// Returns `true` for facet, repeat and the concat family.
    pub fn is_layout(self) -> bool {
        !matches!(self, Self::Single | Self::Layer)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Layer => "layer",
            Self::Facet => "facet",
            Self::Repeat => "repeat",
            Self::RowConcat => "row concat",
            Self::ColumnConcat => "column concat",
            Self::GridConcat => "grid concat",
        })
    }
}

/// One mark, its data and its encoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SingleView {
    /// Name, description, title, transform and params.
    pub shared: SharedProps,
    /// Data source.
    pub data: Data,
    /// Mark type or mark definition.
    pub mark: Mark,
    /// Encoding channels.
    pub encoding: Encoding,
    /// Width, height, view styling and projection.
    pub frame: FrameProps,
}

impl SingleView {
    /// Creates a view drawing `mark`.
    pub fn new(mark: impl Into<Node>) -> Self {
        Self {
            mark: Mark::new(mark),
            ..Self::default()
        }
    }

    /// Returns a copy with the data source replaced.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Node>) -> Self {
        self.data = Data::new(data);
        self
    }

    /// Returns a copy with the encoding replaced.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<Node>) -> Self {
        self.encoding = Encoding::new(encoding);
        self
    }

    /// Returns a copy with the title replaced.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<Node>) -> Self {
        self.shared.title = title.into();
        self
    }
}

/// An ordered overlay of single and layer views; the first member renders at the bottom.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerView {
    /// Name, description, title, transform and params.
    pub shared: SharedProps,
    /// Data inherited by members that do not set their own.
    pub data: Data,
    /// Encoding inherited by members.
    pub encoding: Encoding,
    /// Members, bottom to top.
    pub stack: Stack,
    /// Width, height, view styling and projection.
    pub frame: FrameProps,
    /// Scale/axis/legend resolution across members.
    pub resolve: Node,
}

impl LayerView {
    /// Creates a layer with no properties of its own.
    pub fn new<P: Into<Panel>>(stack: impl IntoIterator<Item = P>) -> Self {
        Self {
            stack: stack.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns `true` if the layer carries any property besides its stack.
    pub fn has_own_properties(&self) -> bool {
        !self.shared.is_empty()
            || !self.data.is_absent()
            || !self.encoding.is_absent()
            || !self.frame.is_empty()
            || self.resolve.is_present()
    }
}

/// A view that can be a layer member or the inner view of a facet/repeat.
#[derive(Clone, Debug, PartialEq)]
pub enum Panel {
    /// A single view.
    Single(SingleView),
    /// A nested layer.
    Layer(Box<LayerView>),
}

impl Panel {
    /// Returns the shape of this panel.
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Single(_) => ViewKind::Single,
            Self::Layer(_) => ViewKind::Layer,
        }
    }

    /// The panel's own data source.
    pub fn data(&self) -> &Data {
        match self {
            Self::Single(single) => &single.data,
            Self::Layer(layer) => &layer.data,
        }
    }

    /// Splits off the panel's own data source, returning it with the data-less remainder.
    pub(crate) fn split_data(&self) -> (Data, Self) {
        let mut rest = self.clone();
        let data = match &mut rest {
            Self::Single(single) => core::mem::take(&mut single.data),
            Self::Layer(layer) => core::mem::take(&mut layer.data),
        };
        (data, rest)
    }

    /// Replicates this panel over the rows/columns described by `facet`.
    pub fn facet(self, facet: impl Into<Node>) -> FacetView {
        FacetView::new(self, facet)
    }

    /// Replicates this panel over the fields listed in `repeat`.
    pub fn repeat(self, repeat: impl Into<Node>) -> RepeatView {
        RepeatView::new(self, repeat)
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::Single(SingleView::default())
    }
}

impl From<SingleView> for Panel {
    fn from(value: SingleView) -> Self {
        Self::Single(value)
    }
}

impl From<LayerView> for Panel {
    fn from(value: LayerView) -> Self {
        Self::Layer(Box::new(value))
    }
}

/// One inner view replicated per value of a faceting field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacetView {
    /// Name, description, title, transform and params.
    pub shared: SharedProps,
    /// Sub-view arrangement.
    pub layout: LayoutProps,
    /// Data shared by every facet cell.
    pub data: Data,
    /// The replicated view.
    pub inner: Box<Panel>,
    /// Row/column field definition.
    pub facet: Node,
    /// Wrap count for a one-dimensional facet.
    pub columns: Node,
    /// Scale/axis/legend resolution across cells.
    pub resolve: Node,
}

impl FacetView {
    /// Creates a facet of `inner` over `facet`.
    pub fn new(inner: impl Into<Panel>, facet: impl Into<Node>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            facet: facet.into(),
            ..Self::default()
        }
    }
}

/// One inner view replicated per listed field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepeatView {
    /// Name, description, title, transform and params.
    pub shared: SharedProps,
    /// Sub-view arrangement.
    pub layout: LayoutProps,
    /// Data shared by every repeated view.
    pub data: Data,
    /// The replicated view.
    pub inner: Box<Panel>,
    /// Field list, or a `{row, column, layer}` mapping of field lists.
    pub repeat: Node,
    /// Wrap count for a flat field list.
    pub columns: Node,
    /// Scale/axis/legend resolution across repeated views.
    pub resolve: Node,
}

impl RepeatView {
    /// Creates a repeat of `inner` over `repeat`.
    pub fn new(inner: impl Into<Panel>, repeat: impl Into<Node>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            repeat: repeat.into(),
            ..Self::default()
        }
    }
}

/// How a [`ConcatView`] arranges its members.
#[derive(Clone, Debug, PartialEq)]
pub enum ConcatKind {
    /// Left to right.
    Row,
    /// Top to bottom.
    Column,
    /// Left to right, wrapping after `columns` members.
    Grid {
        /// Wrap count; absent means a single row.
        columns: Node,
    },
}

/// Independent views placed next to each other. Members share nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcatView {
    /// Row, column or grid placement.
    pub kind: ConcatKind,
    /// Name, description, title, transform and params.
    pub shared: SharedProps,
    /// Sub-view arrangement.
    pub layout: LayoutProps,
    /// Data inherited by members that do not set their own.
    pub data: Data,
    /// Members in placement order.
    pub members: Vec<View>,
    /// Scale/axis/legend resolution across members.
    pub resolve: Node,
}

impl ConcatView {
    /// Creates a concatenation with no properties of its own.
    pub fn new(kind: ConcatKind, members: Vec<View>) -> Self {
        Self {
            kind,
            shared: SharedProps::default(),
            layout: LayoutProps::default(),
            data: Data::default(),
            members,
            resolve: Node::Absent,
        }
    }

    /// Returns the concrete concat shape.
    pub fn view_kind(&self) -> ViewKind {
        match self.kind {
            ConcatKind::Row => ViewKind::RowConcat,
            ConcatKind::Column => ViewKind::ColumnConcat,
            ConcatKind::Grid { .. } => ViewKind::GridConcat,
        }
    }

    /// Returns `true` if the concatenation carries any property besides its members.
    pub fn has_own_properties(&self) -> bool {
        !self.shared.is_empty()
            || !self.layout.is_empty()
            || !self.data.is_absent()
            || self.resolve.is_present()
            || matches!(&self.kind, ConcatKind::Grid { columns } if columns.is_present())
    }
}

/// Any renderable view shape.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    /// A single view.
    Single(SingleView),
    /// A layered view.
    Layer(LayerView),
    /// A faceted view.
    Facet(FacetView),
    /// A repeated view.
    Repeat(RepeatView),
    /// A row, column or grid concatenation.
    Concat(ConcatView),
}

impl View {
    /// The identity of the merge operator: a single view with every field absent.
    pub fn empty() -> Self {
        Self::Single(SingleView::default())
    }

    /// Returns the shape of this view.
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Single(_) => ViewKind::Single,
            Self::Layer(_) => ViewKind::Layer,
            Self::Facet(_) => ViewKind::Facet,
            Self::Repeat(_) => ViewKind::Repeat,
            Self::Concat(concat) => concat.view_kind(),
        }
    }

    /// Returns the field names this view defines.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Single(_) => SingleView::FIELDS,
            Self::Layer(_) => LayerView::FIELDS,
            Self::Facet(_) => FacetView::FIELDS,
            Self::Repeat(_) => RepeatView::FIELDS,
            Self::Concat(ConcatView {
                kind: ConcatKind::Grid { .. },
                ..
            }) => ConcatView::FIELDS,
            Self::Concat(_) => &ConcatView::FIELDS[..ConcatView::FIELDS.len() - 1],
        }
    }

    /// Returns the field named `name`.
    ///
    /// Fails with [`SpecError::MissingProperty`] if this view shape does not define it.
    pub fn get(&self, name: &str) -> Result<&Node, SpecError> {
        match self {
            Self::Single(v) => v.get(name),
            Self::Layer(v) => v.get(name),
            Self::Facet(v) => v.get(name),
            Self::Repeat(v) => v.get(name),
            Self::Concat(v) => v.get(name),
        }
    }

    /// Returns a copy with the field named `name` set to `value`.
    pub fn with(&self, name: &str, value: impl Into<Node>) -> Result<Self, SpecError> {
        Ok(match self {
            Self::Single(v) => Self::Single(v.with(name, value)?),
            Self::Layer(v) => Self::Layer(v.with(name, value)?),
            Self::Facet(v) => Self::Facet(v.with(name, value)?),
            Self::Repeat(v) => Self::Repeat(v.with(name, value)?),
            Self::Concat(v) => Self::Concat(v.with(name, value)?),
        })
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self {
            Self::Single(v) => v.field_mut(name),
            Self::Layer(v) => v.field_mut(name),
            Self::Facet(v) => v.field_mut(name),
            Self::Repeat(v) => v.field_mut(name),
            Self::Concat(v) => v.field_mut(name),
        }
    }

    /// Converts a single or layer view into a [`Panel`].
    pub fn into_panel(self) -> Result<Panel, Self> {
        match self {
            Self::Single(single) => Ok(Panel::Single(single)),
            Self::Layer(layer) => Ok(Panel::Layer(Box::new(layer))),
            other => Err(other),
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<SingleView> for View {
    fn from(value: SingleView) -> Self {
        Self::Single(value)
    }
}

impl From<LayerView> for View {
    fn from(value: LayerView) -> Self {
        Self::Layer(value)
    }
}

impl From<FacetView> for View {
    fn from(value: FacetView) -> Self {
        Self::Facet(value)
    }
}

impl From<RepeatView> for View {
    fn from(value: RepeatView) -> Self {
        Self::Repeat(value)
    }
}

impl From<ConcatView> for View {
    fn from(value: ConcatView) -> Self {
        Self::Concat(value)
    }
}

impl From<Panel> for View {
    fn from(value: Panel) -> Self {
        match value {
            Panel::Single(single) => Self::Single(single),
            Panel::Layer(layer) => Self::Layer(*layer),
        }
    }
}

impl Properties for SingleView {
    const TARGET: &'static str = "single view";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "title",
        "transform",
        "params",
        "data",
        "mark",
        "encoding",
        "width",
        "height",
        "view",
        "projection",
    ];

    fn field(&self, name: &str) -> Option<&Node> {
        match name {
            "data" => Some(&self.data.0),
            "mark" => Some(&self.mark.0),
            "encoding" => Some(&self.encoding.0),
            _ => self.shared.field(name).or_else(|| self.frame.field(name)),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        match name {
            "data" => Some(&mut self.data.0),
            "mark" => Some(&mut self.mark.0),
            "encoding" => Some(&mut self.encoding.0),
            _ => match self.shared.field_mut(name) {
                Some(node) => Some(node),
                None => self.frame.field_mut(name),
            },
        }
    }
}

impl Properties for LayerView {
    const TARGET: &'static str = "layer view";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "title",
        "transform",
        "params",
        "data",
        "encoding",
        "width",
        "height",
        "view",
        "projection",
        "resolve",
    ];

    fn field(&self, name: &str) -> Option<&Node> {
        match name {
            "data" => Some(&self.data.0),
            "encoding" => Some(&self.encoding.0),
            "resolve" => Some(&self.resolve),
            _ => self.shared.field(name).or_else(|| self.frame.field(name)),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        match name {
            "data" => Some(&mut self.data.0),
            "encoding" => Some(&mut self.encoding.0),
            "resolve" => Some(&mut self.resolve),
            _ => match self.shared.field_mut(name) {
                Some(node) => Some(node),
                None => self.frame.field_mut(name),
            },
        }
    }
}

impl Properties for FacetView {
    const TARGET: &'static str = "facet view";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "title",
        "transform",
        "params",
        "align",
        "bounds",
        "center",
        "spacing",
        "data",
        "facet",
        "columns",
        "resolve",
    ];

    fn field(&self, name: &str) -> Option<&Node> {
        match name {
            "data" => Some(&self.data.0),
            "facet" => Some(&self.facet),
            "columns" => Some(&self.columns),
            "resolve" => Some(&self.resolve),
            _ => self.shared.field(name).or_else(|| self.layout.field(name)),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        match name {
            "data" => Some(&mut self.data.0),
            "facet" => Some(&mut self.facet),
            "columns" => Some(&mut self.columns),
            "resolve" => Some(&mut self.resolve),
            _ => match self.shared.field_mut(name) {
                Some(node) => Some(node),
                None => self.layout.field_mut(name),
            },
        }
    }
}

impl Properties for RepeatView {
    const TARGET: &'static str = "repeat view";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "title",
        "transform",
        "params",
        "align",
        "bounds",
        "center",
        "spacing",
        "data",
        "repeat",
        "columns",
        "resolve",
    ];

    fn field(&self, name: &str) -> Option<&Node> {
        match name {
            "data" => Some(&self.data.0),
            "repeat" => Some(&self.repeat),
            "columns" => Some(&self.columns),
            "resolve" => Some(&self.resolve),
            _ => self.shared.field(name).or_else(|| self.layout.field(name)),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        match name {
            "data" => Some(&mut self.data.0),
            "repeat" => Some(&mut self.repeat),
            "columns" => Some(&mut self.columns),
            "resolve" => Some(&mut self.resolve),
            _ => match self.shared.field_mut(name) {
                Some(node) => Some(node),
                None => self.layout.field_mut(name),
            },
        }
    }
}

/// `columns` is last so row and column concats can expose the prefix.
impl Properties for ConcatView {
    const TARGET: &'static str = "concat view";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "title",
        "transform",
        "params",
        "align",
        "bounds",
        "center",
        "spacing",
        "data",
        "resolve",
        "columns",
    ];

    fn field(&self, name: &str) -> Option<&Node> {
        match (name, &self.kind) {
            ("data", _) => Some(&self.data.0),
            ("resolve", _) => Some(&self.resolve),
            ("columns", ConcatKind::Grid { columns }) => Some(columns),
            ("columns", _) => None,
            _ => self.shared.field(name).or_else(|| self.layout.field(name)),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        match (name, &mut self.kind) {
            ("data", _) => Some(&mut self.data.0),
            ("resolve", _) => Some(&mut self.resolve),
            ("columns", ConcatKind::Grid { columns }) => Some(columns),
            ("columns", _) => None,
            _ => match self.shared.field_mut(name) {
                Some(node) => Some(node),
                None => self.layout.field_mut(name),
            },
        }
    }
}
