// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vega-Lite-ish spec composition for VizIR.
//!
//! This crate models a visualization spec as an immutable tree and provides the algebra used to
//! build bigger specs out of smaller ones:
//! - **Merge** (`×`, [`View::merge`], `a * b`): right-biased deep merge of two views.
//! - **Layer** (`+`, [`View::layer`], `a + b`): overlay views in one plot area, left below right,
//!   promoting properties both sides agree on to the enclosing layer.
//! - **Concat** ([`View::row`], [`View::column`], [`View::grid`], `a | b`, `a & b`): place
//!   independent views next to each other.
//!
//! Leaf values are [`Node`]s. Views group them in fixed-field property bags, and a [`Document`]
//! adds document-wide properties on top of one root [`View`]. Exporting a finished tree is out of
//! scope; [`Document::canonicalize`] produces the normalized form an exporter should consume.
//!
//! Operators never modify their operands. Illegal combinations fail with [`SpecError`].

#![no_std]

extern crate alloc;

mod canonical;
mod concat;
mod document;
mod error;
mod layer;
mod merge;
mod node;
mod ops;
mod props;
mod resolve;
mod view;


pub use document::Document;
pub use error::{GlobalPropertyConflict, SpecError};
pub use node::{MarkType, NameToken, Node, ResolveMode, Scalar};
pub use props::{
    Data, Encoding, Fragment, FrameProps, GlobalProps, LayoutProps, Mark, Properties, PropertyBag,
    SharedProps,
};
pub use view::{
    ConcatKind, ConcatView, FacetView, LayerView, Panel, RepeatView, SingleView, Stack, View,
    ViewKind,
};
