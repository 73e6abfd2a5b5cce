// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operator sugar on view and document references.
//!
//! | operator | method   | output                    |
//! |----------|----------|---------------------------|
//! | `a * b`  | `merge`  | `Result<_, SpecError>`    |
//! | `a + b`  | `layer`  | `Result<_, SpecError>`    |
//! | `a \| b` | `hconcat`| value                     |
//! | `a & b`  | `vconcat`| value                     |
//!
//! Operands are borrowed and never modified.

use core::ops::{Add, BitAnd, BitOr, Mul};

use crate::{Document, SpecError, View};

macro_rules! composition_ops {
    ($ty:ty) => {
        impl Mul for &$ty {
            type Output = Result<$ty, SpecError>;

            fn mul(self, rhs: Self) -> Self::Output {
                self.merge(rhs)
            }
        }

        impl Add for &$ty {
            type Output = Result<$ty, SpecError>;

            fn add(self, rhs: Self) -> Self::Output {
                self.layer(rhs)
            }
        }

        impl BitOr for &$ty {
            type Output = $ty;

            fn bitor(self, rhs: Self) -> Self::Output {
                self.hconcat(rhs)
            }
        }

        impl BitAnd for &$ty {
            type Output = $ty;

            fn bitand(self, rhs: Self) -> Self::Output {
                self.vconcat(rhs)
            }
        }
    };
}

composition_ops!(View);
composition_ops!(Document);
