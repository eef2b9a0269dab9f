//! Operator overloads for vectors.
//!
//! `+` and `-` check operand lengths, so their output is a `Result`. Scalar
//! multiplication cannot fail and returns the vector directly.

use std::ops::{Add, Mul, Sub};

use crate::{error::VectorError, vector::Vector1D};

impl Add<&Vector1D> for &Vector1D {
    type Output = Result<Vector1D, VectorError>;

    /// Elementwise sum, see [`Vector1D::add`].
    fn add(self, rhs: &Vector1D) -> Self::Output {
        Vector1D::add(self, rhs)
    }
}

impl Sub<&Vector1D> for &Vector1D {
    type Output = Result<Vector1D, VectorError>;

    /// Elementwise difference, see [`Vector1D::subtract`].
    fn sub(self, rhs: &Vector1D) -> Self::Output {
        self.subtract(rhs)
    }
}

impl Mul<f32> for &Vector1D {
    type Output = Vector1D;

    fn mul(self, scalar: f32) -> Self::Output {
        self.scale(scalar)
    }
}

impl Mul<f32> for Vector1D {
    type Output = Vector1D;

    /// Scales in place, reusing the buffer of the consumed operand.
    fn mul(mut self, scalar: f32) -> Self::Output {
        self.as_mut_slice().iter_mut().for_each(|x| *x *= scalar);
        self
    }
}
