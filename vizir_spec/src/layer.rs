// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer operator (`+`): overlay views, left below right.
//!
//! Layering always builds a new [`LayerView`]:
//! 1. **Promote**: every property set to the same value on both operands moves up to the new
//!    layer and is cleared on both operands. For a layer operand, only its own properties take
//!    part, never its members'.
//! 2. **Flatten or nest**: a single operand becomes one stack entry.
//!    - Next to a single, a layer operand that kept own properties after promotion is nested as
//!      one entry, so its members still see those properties; a layer operand with nothing left
//!      of its own has its members spliced in.
//!    - For two layers, the left layer's remaining own properties stay on the result and its
//!      members are spliced. The right layer is spliced too unless it still carries data, an
//!      encoding, a width or a height, in which case it is appended as one nested entry.
//!
//! Facet, repeat and concat views have no single plot area to draw on top of, so they cannot be
//! layered at all.

use core::mem;

use smallvec::SmallVec;

use crate::{LayerView, Node, Panel, Properties, PropertyBag, SpecError, Stack, View};

/// Properties a member can hand up to an enclosing layer. `mark` stays with its member.
const PROMOTABLE: &[&str] = &[
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
];

/// Moves every promotable property that is present and equal on both sides into `layer`.
fn promote<A, B>(left: &mut A, right: &mut B, layer: &mut LayerView) -> SmallVec<[&'static str; 4]>
where
    A: Properties,
    B: Properties,
{
    let mut promoted = SmallVec::new();
    for &name in PROMOTABLE {
        let (Some(l), Some(r)) = (left.field_mut(name), right.field_mut(name)) else {
            continue;
        };
        if l.is_absent() || *l != *r {
            continue;
        }
        let value = mem::take(l);
        *r = Node::Absent;
        if let Some(slot) = layer.field_mut(name) {
            *slot = value;
        }
        promoted.push(name);
    }
    promoted
}

impl Panel {
    /// The layer operator (`self + other`) on panels, which cannot fail.
    pub fn layer(&self, other: &Self) -> LayerView {
        let mut left = self.clone();
        let mut right = other.clone();
        let mut out = LayerView::default();
        let promoted = match (&mut left, &mut right) {
            (Self::Single(a), Self::Single(b)) => promote(a, b, &mut out),
            (Self::Single(a), Self::Layer(b)) => promote(a, &mut **b, &mut out),
            (Self::Layer(a), Self::Single(b)) => promote(&mut **a, b, &mut out),
            (Self::Layer(a), Self::Layer(b)) => promote(&mut **a, &mut **b, &mut out),
        };
        let (left_nested, right_nested) = match (left, right) {
            (Self::Layer(left), Self::Layer(right)) => (false, out.join_layers(*left, *right)),
            (left, right) => {
                let nested = (left.is_nested_layer(), right.is_nested_layer());
                out.stack = left.into_entries();
                out.stack.extend(right.into_entries());
                nested
            }
        };
        tracing::trace!(
            ?promoted,
            left_nested,
            right_nested,
            members = out.stack.len(),
            "layered views"
        );
        out
    }

    /// Whether this panel becomes one nested stack entry when layered.
    fn is_nested_layer(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Layer(layer) => layer.has_own_properties(),
        }
    }

    /// The stack entries this panel contributes to an enclosing layer.
    fn into_entries(self) -> Stack {
        match self {
            Self::Layer(layer) if !layer.has_own_properties() => layer.stack,
            entry => smallvec::smallvec![entry],
        }
    }
}

impl LayerView {
    /// Finishes `left + right` for two layers once promotion is done. Returns whether `right` was
    /// nested.
    fn join_layers(&mut self, left: Self, right: Self) -> bool {
        self.absorb_own(&left);
        self.stack = left.stack;
        if right.has_distinguishing_properties() {
            self.stack.push(Panel::from(right));
            return true;
        }
        self.absorb_own(&right);
        self.stack.extend(right.stack);
        false
    }

    /// Merges `other`'s own properties into this layer's, `other` winning.
    fn absorb_own(&mut self, other: &Self) {
        self.shared = self.shared.merged(&other.shared);
        self.data = self.data.merged(&other.data);
        self.encoding = self.encoding.merged(&other.encoding);
        self.frame = self.frame.merged(&other.frame);
        self.resolve = self.resolve.merge(&other.resolve);
    }

    /// Data, encoding and size change how members render, so a layer holding them stays nested.
    fn has_distinguishing_properties(&self) -> bool {
        !self.data.is_absent()
            || !self.encoding.is_absent()
            || self.frame.width.is_present()
            || self.frame.height.is_present()
    }
}

impl View {
    /// The layer operator (`self + other`): `self` renders below `other`.
    ///
    /// Fails with [`SpecError::Layering`] if either side is a facet, repeat or concat view.
    pub fn layer(&self, other: &Self) -> Result<Self, SpecError> {
        let not_layerable = |view: Self| SpecError::Layering { kind: view.kind() };
        let left = self.clone().into_panel().map_err(not_layerable)?;
        let right = other.clone().into_panel().map_err(not_layerable)?;
        Ok(Self::Layer(left.layer(&right)))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::{Data, FrameProps, MarkType, PropertyBag, SharedProps, SingleView, ViewKind};

    fn marks(layer: &LayerView) -> Vec<Node> {
        layer
            .stack
            .iter()
            .map(|m| match m {
                Panel::Single(s) => s.mark.0.clone(),
                Panel::Layer(_) => Node::from("<layer>"),
            })
            .collect()
    }

    fn layered(a: impl Into<View>, b: impl Into<View>) -> LayerView {
        match a.into().layer(&b.into()).unwrap() {
            View::Layer(layer) => layer,
            other => panic!("expected a layer, got {:?}", other.kind()),
        }
    }

    #[test]
    fn single_plus_single_keeps_order() {
        let out = layered(SingleView::new(MarkType::Bar), SingleView::new(MarkType::Line));
        assert_eq!(marks(&out), vec![Node::from("bar"), Node::from("line")]);
    }

    #[test]
    fn equal_properties_are_promoted() {
        let a = SingleView::new(MarkType::Bar)
            .with_data("d.csv")
            .with_title("same")
            .with_encoding(Node::map([("x", "a")]));
        let b = SingleView::new(MarkType::Line)
            .with_data("d.csv")
            .with_title("same")
            .with_encoding(Node::map([("x", "b")]));
        let out = layered(a, b);
        assert_eq!(out.data, Data::new("d.csv"));
        assert_eq!(out.shared.title, Node::from("same"));
        assert!(out.encoding.is_absent(), "differing encodings stay local");
        for member in &out.stack {
            let Panel::Single(s) = member else {
                panic!("members stay single");
            };
            assert!(s.data.is_absent(), "data moved to the layer");
            assert!(s.shared.title.is_absent(), "title moved to the layer");
            assert!(!s.encoding.is_absent(), "encoding stays");
        }
    }

    #[test]
    fn one_sided_properties_stay_local() {
        let a = SingleView::new(MarkType::Bar).with_title("only a");
        let b = SingleView::new(MarkType::Line);
        let out = layered(a.clone(), b.clone());
        assert!(!out.has_own_properties(), "nothing promoted");
        assert_eq!(out.stack.to_vec(), vec![Panel::from(a), Panel::from(b)]);
    }

    #[test]
    fn bare_layer_operand_is_spliced() {
        let ab = layered(SingleView::new(MarkType::Bar), SingleView::new(MarkType::Line));
        let out = layered(ab.clone(), SingleView::new(MarkType::Rule));
        assert_eq!(
            marks(&out),
            vec![Node::from("bar"), Node::from("line"), Node::from("rule")]
        );

        let out = layered(SingleView::new(MarkType::Rule), ab);
        assert_eq!(
            marks(&out),
            vec![Node::from("rule"), Node::from("bar"), Node::from("line")]
        );
    }

    #[test]
    fn layer_with_own_properties_is_nested() {
        let a = SingleView::new(MarkType::Bar).with_data("d.csv");
        let b = SingleView::new(MarkType::Line).with_data("d.csv");
        let ab = layered(a, b);
        let c = SingleView::new(MarkType::Rule).with_data("other.csv");
        let out = layered(ab.clone(), c.clone());
        assert!(out.data.is_absent(), "data differs, nothing promoted");
        assert_eq!(out.stack.to_vec(), vec![Panel::from(ab), Panel::from(c)]);
    }

    #[test]
    fn promotion_with_a_layer_can_empty_it() {
        let a = SingleView::new(MarkType::Bar).with_data("d.csv");
        let b = SingleView::new(MarkType::Line).with_data("d.csv");
        let c = SingleView::new(MarkType::Rule).with_data("d.csv");
        let out = layered(layered(a, b), c);
        assert_eq!(out.data, Data::new("d.csv"));
        assert_eq!(out.stack.len(), 3, "the emptied layer is flattened");
    }

    #[test]
    fn layer_plus_layer_promotes_then_flattens() {
        let shared = SharedProps::from_pairs([("title", "T")]).unwrap();
        let left = LayerView {
            shared: shared.clone(),
            ..LayerView::new([SingleView::new(MarkType::Bar)])
        };
        let right = LayerView {
            shared,
            ..LayerView::new([SingleView::new(MarkType::Line)])
        };
        let out = layered(left, right);
        assert_eq!(out.shared.title, Node::from("T"));
        assert_eq!(marks(&out), vec![Node::from("bar"), Node::from("line")]);
    }

    #[test]
    fn layer_plus_layer_nests_the_distinct_operand() {
        let left = LayerView::new([SingleView::new(MarkType::Bar)]);
        let right = LayerView {
            data: Data::new("r.csv"),
            ..LayerView::new([SingleView::new(MarkType::Line)])
        };
        let out = layered(left, right.clone());
        assert_eq!(
            out.stack.to_vec(),
            vec![
                Panel::from(SingleView::new(MarkType::Bar)),
                Panel::from(right)
            ]
        );
    }

    #[test]
    fn left_layer_properties_stay_on_the_result() {
        let left = LayerView {
            data: Data::new("l.csv"),
            ..LayerView::new([SingleView::new(MarkType::Bar)])
        };
        let right = LayerView::new([SingleView::new(MarkType::Line)]);
        let out = layered(left, right);
        assert_eq!(out.data, Data::new("l.csv"));
        assert_eq!(marks(&out), vec![Node::from("bar"), Node::from("line")]);
    }

    #[test]
    fn right_layer_without_data_or_size_is_flattened() {
        let left = LayerView::new([SingleView::new(MarkType::Bar)]);
        let right = LayerView {
            shared: SharedProps::from_pairs([("title", "R")]).unwrap(),
            resolve: Node::map([("scale", Node::map([("y", "independent")]))]),
            ..LayerView::new([SingleView::new(MarkType::Line)])
        };
        let out = layered(left, right);
        assert_eq!(out.shared.title, Node::from("R"));
        assert!(out.resolve.is_present());
        assert_eq!(marks(&out), vec![Node::from("bar"), Node::from("line")]);
    }

    #[test]
    fn right_layer_with_size_is_nested_below_left_leftovers() {
        let left = LayerView {
            data: Data::new("l.csv"),
            ..LayerView::new([SingleView::new(MarkType::Bar)])
        };
        let right = LayerView {
            frame: FrameProps::from_pairs([("width", 200)]).unwrap(),
            ..LayerView::new([SingleView::new(MarkType::Line)])
        };
        let out = layered(left, right.clone());
        assert_eq!(out.data, Data::new("l.csv"));
        assert!(out.frame.width.is_absent(), "width stays on the nested layer");
        assert_eq!(
            out.stack.to_vec(),
            vec![
                Panel::from(SingleView::new(MarkType::Bar)),
                Panel::from(right)
            ]
        );
    }

    #[test]
    fn layout_views_cannot_be_layered() {
        let single = View::from(SingleView::new(MarkType::Bar));
        let facet = View::from(Panel::from(SingleView::new(MarkType::Bar)).facet("f"));
        let row = View::row([SingleView::new(MarkType::Bar)]);
        assert_eq!(
            facet.layer(&single).unwrap_err(),
            SpecError::Layering {
                kind: ViewKind::Facet
            }
        );
        assert_eq!(
            single.layer(&row).unwrap_err(),
            SpecError::Layering {
                kind: ViewKind::RowConcat
            }
        );
    }

    #[test]
    fn operands_are_not_modified() {
        let a = SingleView::new(MarkType::Bar).with_data("d.csv");
        let b = SingleView::new(MarkType::Line).with_data("d.csv");
        let (va, vb) = (View::from(a.clone()), View::from(b.clone()));
        let _ = va.layer(&vb).unwrap();
        assert_eq!(va, View::from(a), "left untouched");
        assert_eq!(vb, View::from(b), "right untouched");
    }
}
