// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonicalization: coercing tree nodes into the most general view shape.
//!
//! Two flavors exist:
//! - [`Fragment::canonicalize`] turns a bare bag or holder into a [`View`] carrying it, so it can
//!   take part in view-level operators.
//! - [`View::canonicalize`] normalizes a finished tree before export: nested layers with no own
//!   properties are spliced into their parent and empty nested layers disappear. The rendered
//!   result is unchanged.

extern crate alloc;

use alloc::vec::Vec;

use crate::{
    ConcatKind, ConcatView, FacetView, Fragment, LayerView, Node, Panel, Properties, RepeatView,
    SingleView, Stack, View,
};

impl Fragment {
    /// Wraps this fragment in a view.
    ///
    /// Per-view properties become a [`SingleView`] holding them. Layout properties become an
    /// empty grid concatenation, the only shape besides facet/repeat that carries a layout
    /// without requiring an inner view.
    pub fn canonicalize(&self) -> View {
        let mut single = SingleView::default();
        match self {
            Self::Shared(shared) => single.shared = shared.clone(),
            Self::Frame(frame) => single.frame = frame.clone(),
            Self::Data(data) => single.data = data.clone(),
            Self::Mark(mark) => single.mark = mark.clone(),
            Self::Encoding(encoding) => single.encoding = encoding.clone(),
            Self::Layout(layout) => {
                let grid = ConcatKind::Grid {
                    columns: Node::Absent,
                };
                return View::Concat(ConcatView {
                    layout: layout.clone(),
                    ..ConcatView::new(grid, Vec::new())
                });
            }
        }
        View::Single(single)
    }
}

impl LayerView {
    /// Splices property-less nested layers and drops empty ones, recursively.
    pub fn canonicalize(&self) -> Self {
        let mut stack = Stack::new();
        for member in &self.stack {
            match member {
                Panel::Single(single) => stack.push(Panel::Single(single.clone())),
                Panel::Layer(layer) => {
                    let layer = layer.canonicalize();
                    if layer.stack.is_empty() {
                        continue;
                    }
                    if layer.has_own_properties() {
                        stack.push(Panel::from(layer));
                    } else {
                        stack.extend(layer.stack);
                    }
                }
            }
        }
        Self {
            stack,
            ..self.clone()
        }
    }
}

impl Panel {
    /// See [`View::canonicalize`].
    pub fn canonicalize(&self) -> Self {
        match self {
            Self::Single(single) => Self::Single(single.clone()),
            Self::Layer(layer) => Self::from(layer.canonicalize()),
        }
    }
}

impl View {
    /// Returns the canonical form of this tree, suitable for export.
    ///
    /// Every child view is canonicalized; see the module docs for the layer rules.
    pub fn canonicalize(&self) -> Self {
        match self {
            Self::Single(single) => Self::Single(single.clone()),
            Self::Layer(layer) => Self::Layer(layer.canonicalize()),
            Self::Facet(facet) => {
                let mut facet = facet.clone();
                *facet.inner = facet.inner.canonicalize();
                Self::Facet(facet)
            }
            Self::Repeat(repeat) => {
                let mut repeat = repeat.clone();
                *repeat.inner = repeat.inner.canonicalize();
                Self::Repeat(repeat)
            }
            Self::Concat(concat) => {
                let mut concat = concat.clone();
                concat.members = concat.members.iter().map(Self::canonicalize).collect();
                Self::Concat(concat)
            }
        }
    }

    /// Human-readable name of this view shape, as used in [`SpecError`](crate::SpecError).
    pub fn target(&self) -> &'static str {
        match self {
            Self::Single(_) => SingleView::TARGET,
            Self::Layer(_) => LayerView::TARGET,
            Self::Facet(_) => FacetView::TARGET,
            Self::Repeat(_) => RepeatView::TARGET,
            Self::Concat(_) => ConcatView::TARGET,
        }
    }
}
