// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concatenation operators.
//!
//! Concatenation is purely structural: members are placed next to each other in the given
//! order and nothing is shared, promoted or merged between them.

extern crate alloc;

use alloc::vec::Vec;

use crate::{ConcatKind, ConcatView, Node, SpecError, View};

impl View {
    /// Places `members` left to right.
    pub fn row(members: impl IntoIterator<Item = impl Into<Self>>) -> Self {
        Self::Concat(ConcatView::new(ConcatKind::Row, collect(members)))
    }

    /// Places `members` top to bottom.
    pub fn column(members: impl IntoIterator<Item = impl Into<Self>>) -> Self {
        Self::Concat(ConcatView::new(ConcatKind::Column, collect(members)))
    }

    /// Places a matrix of views, row by row. The wrap count is the width of the rows.
    ///
    /// Fails with [`SpecError::RaggedGrid`] if the rows differ in width.
    pub fn grid<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, SpecError>
    where
        R: IntoIterator,
        R::Item: Into<Self>,
    {
        let mut members: Vec<Self> = Vec::new();
        let mut width = None;
        for (row, cells) in rows.into_iter().enumerate() {
            let before = members.len();
            members.extend(cells.into_iter().map(Into::into));
            let found = members.len() - before;
            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(SpecError::RaggedGrid {
                        row,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }
        let columns = width.map_or(Node::Absent, columns_node);
        Ok(Self::Concat(ConcatView::new(
            ConcatKind::Grid { columns },
            members,
        )))
    }

    /// Places `members` left to right, wrapping after `columns` members.
    pub fn concat(members: impl IntoIterator<Item = impl Into<Self>>, columns: u32) -> Self {
        Self::Concat(ConcatView::new(
            ConcatKind::Grid {
                columns: Node::from(columns),
            },
            collect(members),
        ))
    }

    /// `self | other`: appends to a row concat that has no properties of its own, otherwise
    /// starts a new two-member row.
    pub fn hconcat(&self, other: &Self) -> Self {
        self.append(other, ConcatKind::Row)
    }

    /// `self & other`: appends to a column concat that has no properties of its own, otherwise
    /// starts a new two-member column.
    pub fn vconcat(&self, other: &Self) -> Self {
        self.append(other, ConcatKind::Column)
    }

    fn append(&self, other: &Self, kind: ConcatKind) -> Self {
        match self {
            Self::Concat(concat) if concat.kind == kind && !concat.has_own_properties() => {
                let mut members = Vec::with_capacity(concat.members.len() + 1);
                members.extend(concat.members.iter().cloned());
                members.push(other.clone());
                Self::Concat(ConcatView::new(kind, members))
            }
            _ => Self::Concat(ConcatView::new(kind, alloc::vec![self.clone(), other.clone()])),
        }
    }
}

fn collect(members: impl IntoIterator<Item = impl Into<View>>) -> Vec<View> {
    members.into_iter().map(Into::into).collect()
}

/// A row holds at most `isize::MAX` members, so the conversion never saturates.
fn columns_node(columns: usize) -> Node {
    Node::from(i64::try_from(columns).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::{Fragment, FrameProps, LayerView, MarkType, PropertyBag, SingleView};

    fn view(mark: MarkType) -> View {
        View::from(SingleView::new(mark).with_data("d.csv"))
    }

    #[test]
    fn row_keeps_members_verbatim() {
        let (a, b, c) = (view(MarkType::Bar), view(MarkType::Line), view(MarkType::Point));
        let View::Concat(row) = View::row([a.clone(), b.clone(), c.clone()]) else {
            panic!("expected a concat");
        };
        assert_eq!(row.kind, ConcatKind::Row);
        assert_eq!(row.members, vec![a, b, c]);
        assert!(!row.has_own_properties(), "nothing is promoted to the concat");
    }

    #[test]
    fn column_accepts_any_view_shape() {
        let layer = View::from(LayerView::new([SingleView::new(MarkType::Bar)]));
        let row = View::row([view(MarkType::Bar)]);
        let View::Concat(column) = View::column([layer.clone(), row.clone()]) else {
            panic!("expected a concat");
        };
        assert_eq!(column.kind, ConcatKind::Column);
        assert_eq!(column.members, vec![layer, row]);
    }

    #[test]
    fn grid_infers_the_wrap_count() {
        let grid = View::grid([
            [view(MarkType::Bar), view(MarkType::Line)],
            [view(MarkType::Point), view(MarkType::Rule)],
        ])
        .unwrap();
        assert_eq!(grid.get("columns").unwrap(), &Node::from(2));
        let View::Concat(grid) = grid else {
            panic!("expected a concat");
        };
        assert_eq!(grid.members.len(), 4);
        assert_eq!(grid.members[2], view(MarkType::Point), "row-major order");
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let err = View::grid([
            vec![view(MarkType::Bar), view(MarkType::Line)],
            vec![view(MarkType::Point)],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SpecError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn generic_concat_matches_grid() {
        let members = [
            view(MarkType::Bar),
            view(MarkType::Line),
            view(MarkType::Point),
            view(MarkType::Rule),
        ];
        let generic = View::concat(members.clone(), 2);
        let grid = View::grid([
            [members[0].clone(), members[1].clone()],
            [members[2].clone(), members[3].clone()],
        ])
        .unwrap();
        assert_eq!(generic, grid);
    }

    #[test]
    fn operator_sugar_appends_to_bare_concats() {
        let (a, b, c) = (view(MarkType::Bar), view(MarkType::Line), view(MarkType::Point));
        let ab = a.hconcat(&b);
        assert_eq!(ab.hconcat(&c), View::row([a.clone(), b.clone(), c.clone()]));

        let titled = ab.with("title", "T").unwrap();
        let View::Concat(nested) = titled.hconcat(&c) else {
            panic!("expected a concat");
        };
        assert_eq!(nested.members, vec![titled.clone(), c.clone()]);

        let column = ab.vconcat(&c);
        assert_eq!(column, View::column([ab, c]), "a row inside a column");
    }

    #[test]
    fn fragments_are_canonicalized_before_concatenation() {
        let frame = FrameProps::from_pairs([("width", 100)]).unwrap();
        let member = Fragment::from(frame.clone()).canonicalize();
        let View::Concat(row) = View::row([member, view(MarkType::Bar)]) else {
            panic!("expected a concat");
        };
        assert_eq!(
            row.members[0],
            View::from(SingleView {
                frame,
                ..SingleView::default()
            })
        );
    }
}
