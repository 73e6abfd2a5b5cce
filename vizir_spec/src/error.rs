// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error and diagnostic types for spec composition.

extern crate alloc;

use alloc::string::String;
use core::fmt;

use crate::{Node, ViewKind};

/// Errors returned by composition operators and field lookups.
///
/// Every error describes a structurally invalid call: the caller has to restructure its inputs,
/// repeating the same call will fail the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The two operands of a merge cannot be combined into one view.
    Composition {
        /// Shape of the left operand.
        left: ViewKind,
        /// Shape of the right operand.
        right: ViewKind,
    },
    /// A layout-family view (facet, repeat, concat) was used as a layer operand.
    Layering {
        /// Shape of the offending operand.
        kind: ViewKind,
    },
    /// The target does not define a field with this name.
    MissingProperty {
        /// Human-readable name of the target (e.g. `"shared properties"` or `"single view"`).
        target: &'static str,
        /// The requested field name.
        name: String,
    },
    /// The same field was given twice while building a property bag.
    DuplicateProperty {
        /// Human-readable name of the target.
        target: &'static str,
        /// The repeated field name.
        name: &'static str,
    },
    /// A grid concatenation was given rows of different widths.
    RaggedGrid {
        /// Index of the first offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
}

impl SpecError {
    pub(crate) fn missing(target: &'static str, name: &str) -> Self {
        Self::MissingProperty {
            target,
            name: String::from(name),
        }
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composition { left, right } => {
                write!(f, "cannot merge a {left} view with a {right} view")
            }
            Self::Layering { kind } => write!(f, "a {kind} view cannot be layered"),
            Self::MissingProperty { target, name } => {
                write!(f, "`{name}` is not a property of {target}")
            }
            Self::DuplicateProperty { target, name } => {
                write!(f, "property `{name}` given twice for {target}")
            }
            Self::RaggedGrid {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid row {row} has {found} views, expected {expected} like the first row"
            ),
        }
    }
}

impl core::error::Error for SpecError {}

/// A non-fatal disagreement between the global properties of two documents.
///
/// Reported when documents are layered or concatenated and both sides set the same global
/// property to different leaf values. The right-hand value is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalPropertyConflict {
    /// Name of the global property.
    pub field: &'static str,
    /// Value carried by the left-hand document.
    pub left: Node,
    /// Value carried by the right-hand document, which wins.
    pub right: Node,
}

impl fmt::Display for GlobalPropertyConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "global property `{}` differs between documents ({} vs {}); keeping the right-hand value",
            self.field, self.left, self.right
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_both_operands() {
        let err = SpecError::Composition {
            left: ViewKind::Layer,
            right: ViewKind::Layer,
        };
        assert_eq!(err.to_string(), "cannot merge a layer view with a layer view");

        let err = SpecError::missing("layout properties", "mark");
        assert_eq!(err.to_string(), "`mark` is not a property of layout properties");
    }
}
