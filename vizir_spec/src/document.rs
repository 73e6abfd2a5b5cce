// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composition root: global properties plus one view.

extern crate alloc;

use alloc::vec::Vec;

use crate::{GlobalPropertyConflict, GlobalProps, Node, Properties, PropertyBag, SpecError, View};

/// A complete visualization: document-wide properties and exactly one root view.
///
/// Documents compose with the same operators as views. Merging combines global properties
/// field-wise with the right side winning. Layering and concatenation also combine them that way,
/// but a global property set to different values on both sides is reported as a
/// [`GlobalPropertyConflict`] and logged at warn level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// Schema, background, padding, autosize, config, usermeta and datasets.
    pub global: GlobalProps,
    /// The root view.
    pub root: View,
}

impl Document {
    /// Creates a document with no global properties.
    pub fn new(root: impl Into<View>) -> Self {
        Self {
            global: GlobalProps::default(),
            root: root.into(),
        }
    }

    /// Returns the property named `name`, looking at global properties first and the root view
    /// second.
    pub fn get(&self, name: &str) -> Result<&Node, SpecError> {
        match self.global.field(name) {
            Some(node) => Ok(node),
            None => self.root.get(name),
        }
    }

    /// Returns a copy with the property named `name` set to `value`, on the globals if they
    /// define it and on the root view otherwise.
    pub fn with(&self, name: &str, value: impl Into<Node>) -> Result<Self, SpecError> {
        if GlobalProps::FIELDS.contains(&name) {
            return Ok(Self {
                global: self.global.with(name, value)?,
                root: self.root.clone(),
            });
        }
        Ok(Self {
            global: self.global.clone(),
            root: self.root.with(name, value)?,
        })
    }

    /// The merge operator (`self × other`).
    pub fn merge(&self, other: &Self) -> Result<Self, SpecError> {
        Ok(Self {
            global: self.global.merged(&other.global),
            root: self.root.merge(&other.root)?,
        })
    }

    /// The layer operator (`self + other`) on the root views.
    ///
    /// Conflicting global properties are logged and resolved in favor of `other`.
    pub fn layer(&self, other: &Self) -> Result<Self, SpecError> {
        self.layer_with_conflicts(other).map(|(doc, _)| doc)
    }

    /// Like [`Document::layer`], also returning every global property conflict.
    pub fn layer_with_conflicts(
        &self,
        other: &Self,
    ) -> Result<(Self, Vec<GlobalPropertyConflict>), SpecError> {
        let root = self.root.layer(&other.root)?;
        let (global, conflicts) = self.combine_globals(other);
        Ok((Self { global, root }, conflicts))
    }

    /// Places the root views left to right (`self | other`).
    pub fn hconcat(&self, other: &Self) -> Self {
        self.hconcat_with_conflicts(other).0
    }

    /// Like [`Document::hconcat`], also returning every global property conflict.
    pub fn hconcat_with_conflicts(&self, other: &Self) -> (Self, Vec<GlobalPropertyConflict>) {
        let (global, conflicts) = self.combine_globals(other);
        let root = self.root.hconcat(&other.root);
        (Self { global, root }, conflicts)
    }

    /// Places the root views top to bottom (`self & other`).
    pub fn vconcat(&self, other: &Self) -> Self {
        self.vconcat_with_conflicts(other).0
    }

    /// Like [`Document::vconcat`], also returning every global property conflict.
    pub fn vconcat_with_conflicts(&self, other: &Self) -> (Self, Vec<GlobalPropertyConflict>) {
        let (global, conflicts) = self.combine_globals(other);
        let root = self.root.vconcat(&other.root);
        (Self { global, root }, conflicts)
    }

    /// Returns the canonical form of the root view, ready for export.
    pub fn canonicalize(&self) -> Self {
        Self {
            global: self.global.clone(),
            root: self.root.canonicalize(),
        }
    }

    fn combine_globals(&self, other: &Self) -> (GlobalProps, Vec<GlobalPropertyConflict>) {
        let mut conflicts = Vec::new();
        for &field in GlobalProps::FIELDS {
            let (Some(left), Some(right)) = (self.global.field(field), other.global.field(field))
            else {
                continue;
            };
            if left.conflicts_with(right) {
                tracing::warn!(
                    field,
                    left = %left,
                    right = %right,
                    "conflicting global property, keeping the right-hand value"
                );
                conflicts.push(GlobalPropertyConflict {
                    field,
                    left: left.clone(),
                    right: right.clone(),
                });
            }
        }
        (self.global.merged(&other.global), conflicts)
    }
}

impl From<View> for Document {
    fn from(root: View) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::{MarkType, SingleView, ViewKind};

    fn doc(mark: MarkType) -> Document {
        Document::new(SingleView::new(mark).with_data("d.csv"))
    }

    #[test]
    fn lookup_prefers_globals() {
        let d = doc(MarkType::Bar).with("background", "white").unwrap();
        assert_eq!(d.get("background").unwrap(), &Node::from("white"));
        assert_eq!(d.get("mark").unwrap(), &Node::from("bar"));
        assert_eq!(
            d.get("facet").unwrap_err(),
            SpecError::missing("single view", "facet")
        );
        let titled = d.with("title", "T").unwrap();
        assert_eq!(titled.root.get("title").unwrap(), &Node::from("T"));
        assert_eq!(titled.global, d.global, "globals untouched");
    }

    #[test]
    fn merge_combines_globals_and_roots() {
        let left = doc(MarkType::Bar).with("padding", 5).unwrap();
        let right = Document::new(SingleView::default().with_title("T"))
            .with("padding", 10)
            .unwrap();
        let merged = left.merge(&right).unwrap();
        assert_eq!(merged.global.padding, Node::from(10));
        assert_eq!(merged.get("mark").unwrap(), &Node::from("bar"));
        assert_eq!(merged.get("title").unwrap(), &Node::from("T"));
    }

    #[test]
    fn layering_reports_conflicting_globals() {
        let left = doc(MarkType::Bar)
            .with("background", "white")
            .unwrap()
            .with("padding", 5)
            .unwrap();
        let right = doc(MarkType::Line)
            .with("background", "black")
            .unwrap()
            .with("padding", 5)
            .unwrap();
        let (layered, conflicts) = left.layer_with_conflicts(&right).unwrap();
        assert_eq!(
            conflicts,
            [GlobalPropertyConflict {
                field: "background",
                left: Node::from("white"),
                right: Node::from("black"),
            }]
        );
        assert_eq!(layered.global.background, Node::from("black"), "right wins");
        assert_eq!(layered.global.padding, Node::from(5), "equal values agree");
        assert_eq!(layered.root.kind(), ViewKind::Layer);
    }

    #[test]
    fn one_sided_globals_do_not_conflict() {
        let left = doc(MarkType::Bar).with("schema", "v5").unwrap();
        let right = doc(MarkType::Line);
        let (joined, conflicts) = left.hconcat_with_conflicts(&right);
        assert!(conflicts.is_empty(), "absent never conflicts");
        assert_eq!(joined.global.schema, Node::from("v5"));
        assert_eq!(joined.root.kind(), ViewKind::RowConcat);
    }

    #[test]
    fn config_conflicts_compare_leaves() {
        let left = doc(MarkType::Bar)
            .with("config", Node::map([("axis", Node::map([("grid", true)]))]))
            .unwrap();
        let right = doc(MarkType::Line)
            .with("config", Node::map([("legend", Node::map([("orient", "top")]))]))
            .unwrap();
        let (stacked, conflicts) = left.vconcat_with_conflicts(&right);
        assert!(conflicts.is_empty(), "disjoint config entries merge");
        assert_eq!(stacked.global.config.get("axis").get("grid"), &Node::from(true));
        assert_eq!(
            stacked.global.config.get("legend").get("orient"),
            &Node::from("top")
        );
    }

    #[test]
    fn layout_roots_cannot_be_layered() {
        let row = doc(MarkType::Bar).hconcat(&doc(MarkType::Line));
        assert_eq!(
            row.layer(&doc(MarkType::Rule)).unwrap_err(),
            SpecError::Layering {
                kind: ViewKind::RowConcat
            }
        );
    }
}
