// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The merge operator (`×`): right-biased deep merge of views.
//!
//! On conflicting leaves the right operand wins, and an absent right-hand value keeps the
//! left-hand one. What differs between operand shapes is *where* each property lands:
//!
//! | left \ right   | single              | layer               | facet / repeat      | concat              |
//! |----------------|---------------------|---------------------|---------------------|---------------------|
//! | single         | field-wise          | mark → stack        | into inner          | into every member   |
//! | layer          | into every member   | error               | into inner          | into every member   |
//! | facet / repeat | into inner          | into inner          | same kind: field-wise, else error | error |
//! | concat         | into every member   | into every member   | error               | error               |
//!
//! When a plain (single or layer) view meets a layout-family view, the plain view is first
//! canonicalized into the layout's shape: its data is lifted to the layout's own data and the
//! rest becomes the inner view. It is then merged in as the right-hand operand on whichever side
//! it was written, so `plain × layout == layout × plain`.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::{
    ConcatView, FacetView, Fragment, LayerView, Node, Panel, Properties, PropertyBag, RepeatView,
    SingleView, SpecError, View, ViewKind,
};

impl SingleView {
    /// Field-wise merge of two single views.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            shared: self.shared.merged(&other.shared),
            data: self.data.merged(&other.data),
            mark: self.mark.merged(&other.mark),
            encoding: self.encoding.merged(&other.encoding),
            frame: self.frame.merged(&other.frame),
        }
    }

    /// `single × layer`: the mark is broadcast onto every stack member and the remaining
    /// properties merge into the layer's own, the layer's values winning.
    fn merge_into_layer(&self, layer: &LayerView) -> LayerView {
        LayerView {
            shared: self.shared.merged(&layer.shared),
            data: self.data.merged(&layer.data),
            encoding: self.encoding.merged(&layer.encoding),
            stack: layer.stack.iter().map(|m| self.broadcast_mark(m)).collect(),
            frame: self.frame.merged(&layer.frame),
            resolve: layer.resolve.clone(),
        }
    }

    fn broadcast_mark(&self, member: &Panel) -> Panel {
        match member {
            Panel::Single(single) => {
                let mut single = single.clone();
                single.mark = self.mark.merged(&single.mark);
                Panel::Single(single)
            }
            Panel::Layer(layer) => {
                let mut layer = layer.clone();
                layer.stack = layer.stack.iter().map(|m| self.broadcast_mark(m)).collect();
                Panel::Layer(layer)
            }
        }
    }
}

impl LayerView {
    /// `layer × single`: the single view merges into each stack member; the layer's own
    /// properties are left alone.
    fn merge_each(&self, single: &SingleView) -> Self {
        let mut out = self.clone();
        out.stack = self
            .stack
            .iter()
            .map(|member| match member {
                Panel::Single(m) => Panel::Single(m.merge(single)),
                Panel::Layer(m) => Panel::Layer(Box::new(m.merge_each(single))),
            })
            .collect();
        out
    }
}

impl Panel {
    /// Merges two panels.
    ///
    /// Fails with [`SpecError::Composition`] for `layer × layer`.
    pub fn merge(&self, other: &Self) -> Result<Self, SpecError> {
        match (self, other) {
            (Self::Single(a), Self::Single(b)) => Ok(Self::Single(a.merge(b))),
            (Self::Single(a), Self::Layer(b)) => Ok(Self::Layer(Box::new(a.merge_into_layer(b)))),
            (Self::Layer(a), Self::Single(b)) => Ok(Self::Layer(Box::new(a.merge_each(b)))),
            (Self::Layer(_), Self::Layer(_)) => Err(SpecError::Composition {
                left: ViewKind::Layer,
                right: ViewKind::Layer,
            }),
        }
    }
}

impl FacetView {
    /// Canonicalizes a plain view into facet shape: data lifted, the rest as the inner view.
    pub fn from_panel(panel: &Panel) -> Self {
        let (data, inner) = panel.split_data();
        Self {
            data,
            inner: Box::new(inner),
            ..Self::default()
        }
    }

    /// Field-wise merge of two facets; the inner views merge recursively.
    pub fn merge(&self, other: &Self) -> Result<Self, SpecError> {
        Ok(Self {
            shared: self.shared.merged(&other.shared),
            layout: self.layout.merged(&other.layout),
            data: self.data.merged(&other.data),
            inner: Box::new(self.inner.merge(&other.inner)?),
            facet: self.facet.merge(&other.facet),
            columns: self.columns.merge(&other.columns),
            resolve: self.resolve.merge(&other.resolve),
        })
    }
}

impl RepeatView {
    /// Canonicalizes a plain view into repeat shape: data lifted, the rest as the inner view.
    pub fn from_panel(panel: &Panel) -> Self {
        let (data, inner) = panel.split_data();
        Self {
            data,
            inner: Box::new(inner),
            ..Self::default()
        }
    }

    /// Field-wise merge of two repeats; the inner views merge recursively.
    pub fn merge(&self, other: &Self) -> Result<Self, SpecError> {
        Ok(Self {
            shared: self.shared.merged(&other.shared),
            layout: self.layout.merged(&other.layout),
            data: self.data.merged(&other.data),
            inner: Box::new(self.inner.merge(&other.inner)?),
            repeat: self.repeat.merge(&other.repeat),
            columns: self.columns.merge(&other.columns),
            resolve: self.resolve.merge(&other.resolve),
        })
    }
}

impl ConcatView {
    /// Merges a plain view into every member. The plain view's data goes to the concat's own
    /// data instead of to the members.
    fn merge_plain(&self, panel: &Panel) -> Result<Self, SpecError> {
        let (data, rest) = panel.split_data();
        let rest = View::from(rest);
        let members = self
            .members
            .iter()
            .map(|member| member.merge(&rest))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            kind: self.kind.clone(),
            shared: self.shared.clone(),
            layout: self.layout.clone(),
            data: self.data.merged(&data),
            members,
            resolve: self.resolve.clone(),
        })
    }
}

/// A merge operand, with single and layer views folded into a [`Panel`].
enum Operand<'a> {
    Plain(Panel),
    Facet(&'a FacetView),
    Repeat(&'a RepeatView),
    Concat(&'a ConcatView),
}

impl View {
    /// The merge operator (`self × other`).
    ///
    /// Fails with [`SpecError::Composition`] for `layer × layer`, for any two concat views, and
    /// for two layout-family views of different kinds.
    pub fn merge(&self, other: &Self) -> Result<Self, SpecError> {
        let incompatible = || SpecError::Composition {
            left: self.kind(),
            right: other.kind(),
        };
        match (self.operand(), other.operand()) {
            (Operand::Plain(a), Operand::Plain(b)) => Ok(a.merge(&b)?.into()),

            (Operand::Facet(a), Operand::Facet(b)) => Ok(Self::Facet(a.merge(b)?)),
            (Operand::Repeat(a), Operand::Repeat(b)) => Ok(Self::Repeat(a.merge(b)?)),
            (Operand::Concat(_), Operand::Concat(_)) => Err(incompatible()),

            (Operand::Facet(layout), Operand::Plain(plain))
            | (Operand::Plain(plain), Operand::Facet(layout)) => {
                Ok(Self::Facet(layout.merge(&FacetView::from_panel(&plain))?))
            }
            (Operand::Repeat(layout), Operand::Plain(plain))
            | (Operand::Plain(plain), Operand::Repeat(layout)) => {
                Ok(Self::Repeat(layout.merge(&RepeatView::from_panel(&plain))?))
            }
            (Operand::Concat(layout), Operand::Plain(plain))
            | (Operand::Plain(plain), Operand::Concat(layout)) => {
                Ok(Self::Concat(layout.merge_plain(&plain)?))
            }

            (Operand::Facet(_), Operand::Repeat(_) | Operand::Concat(_))
            | (Operand::Repeat(_), Operand::Facet(_) | Operand::Concat(_))
            | (Operand::Concat(_), Operand::Facet(_) | Operand::Repeat(_)) => Err(incompatible()),
        }
    }

    /// Merges a bare property bag or holder into this view's own fields (`self × fragment`).
    ///
    /// Every present value lands in the field of the same name on this view, never in an inner
    /// view or a member. Data is replaced whole; everything else is deep-merged with the fragment
    /// winning. A present value whose field this view shape does not define fails with
    /// [`SpecError::MissingProperty`], e.g. a mark on a layer or a width on a facet.
    pub fn merge_fragment(&self, fragment: &Fragment) -> Result<Self, SpecError> {
        match fragment {
            Fragment::Shared(bag) => self.merge_fields(bag, Node::merge),
            Fragment::Layout(bag) => self.merge_fields(bag, Node::merge),
            Fragment::Frame(bag) => self.merge_fields(bag, Node::merge),
            Fragment::Data(data) => self.merge_fields(data, Node::replace),
            Fragment::Mark(mark) => self.merge_fields(mark, Node::merge),
            Fragment::Encoding(encoding) => self.merge_fields(encoding, Node::merge),
        }
    }

    fn merge_fields<P: Properties>(
        &self,
        fragment: &P,
        combine: fn(&Node, &Node) -> Node,
    ) -> Result<Self, SpecError> {
        let mut out = self.clone();
        for &name in P::FIELDS {
            let Some(value) = fragment.field(name).filter(|v| v.is_present()) else {
                continue;
            };
            let slot = out
                .field_mut(name)
                .ok_or_else(|| SpecError::missing(self.target(), name))?;
            *slot = combine(slot, value);
        }
        Ok(out)
    }

    fn operand(&self) -> Operand<'_> {
        match self {
            Self::Single(single) => Operand::Plain(Panel::Single(single.clone())),
            Self::Layer(layer) => Operand::Plain(Panel::Layer(Box::new(layer.clone()))),
            Self::Facet(facet) => Operand::Facet(facet),
            Self::Repeat(repeat) => Operand::Repeat(repeat),
            Self::Concat(concat) => Operand::Concat(concat),
        }
    }
}
