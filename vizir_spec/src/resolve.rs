// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale, axis and legend resolution on composite views.

use crate::{Node, ResolveMode, SpecError, View};

impl View {
    /// Returns a copy that resolves the scale of `channel` with `mode` across children.
    ///
    /// Fails with [`SpecError::MissingProperty`] on a single view, which has no children.
    pub fn resolve_scale(&self, channel: &str, mode: ResolveMode) -> Result<Self, SpecError> {
        self.resolve_entry("scale", channel, mode)
    }

    /// Returns a copy that resolves the axis of `channel` with `mode` across children.
    pub fn resolve_axis(&self, channel: &str, mode: ResolveMode) -> Result<Self, SpecError> {
        self.resolve_entry("axis", channel, mode)
    }

    /// Returns a copy that resolves the legend of `channel` with `mode` across children.
    pub fn resolve_legend(&self, channel: &str, mode: ResolveMode) -> Result<Self, SpecError> {
        self.resolve_entry("legend", channel, mode)
    }

    fn resolve_entry(
        &self,
        target: &str,
        channel: &str,
        mode: ResolveMode,
    ) -> Result<Self, SpecError> {
        let current = self.get("resolve")?;
        let entry = Node::map([(target, Node::map([(channel, mode)]))]);
        self.with("resolve", current.merge(&entry))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::{LayerView, MarkType, SingleView};

    #[test]
    fn entries_accumulate() {
        let layer = View::from(LayerView::new([
            SingleView::new(MarkType::Bar),
            SingleView::new(MarkType::Line),
        ]));
        let resolved = layer
            .resolve_scale("y", ResolveMode::Independent)
            .unwrap()
            .resolve_axis("y", ResolveMode::Independent)
            .unwrap()
            .resolve_scale("color", ResolveMode::Shared)
            .unwrap();
        let resolve = resolved.get("resolve").unwrap();
        assert_eq!(resolve.get("scale").get("y"), &Node::from("independent"));
        assert_eq!(resolve.get("scale").get("color"), &Node::from("shared"));
        assert_eq!(resolve.get("axis").get("y"), &Node::from("independent"));
        assert!(layer.get("resolve").unwrap().is_absent(), "original untouched");
    }

    #[test]
    fn later_modes_win() {
        let row = View::row([View::empty(), View::empty()]);
        let resolved = row
            .resolve_legend("color", ResolveMode::Shared)
            .unwrap()
            .resolve_legend("color", ResolveMode::Independent)
            .unwrap();
        assert_eq!(
            resolved.get("resolve").unwrap().get("legend").get("color"),
            &Node::from("independent")
        );
    }

    #[test]
    fn single_views_have_nothing_to_resolve() {
        let single = View::from(SingleView::new(MarkType::Point));
        assert_eq!(
            single.resolve_scale("x", ResolveMode::Shared).unwrap_err(),
            SpecError::missing("single view", "resolve")
        );
    }
}
