use num_traits::Float;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Index, IndexMut, Mul, Sub};

/// A point in N-dimensional real vector space.
///
/// Used as the joint configuration of a mechanism: one value per joint.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RealVectorState<F: Float, const N: usize> {
    values: [F; N],
}

impl<F: Float, const N: usize> RealVectorState<F, N> {
    pub fn new(values: [F; N]) -> Self {
        Self { values }
    }

    /// The state with every component equal to zero.
    pub fn zeros() -> Self {
        Self {
            values: [F::zero(); N],
        }
    }

    pub fn values(&self) -> &[F; N] {
        &self.values
    }

    pub fn dot(&self, other: &Self) -> F {
        self.values
            .iter()
            .zip(other.values.iter())
            .fold(F::zero(), |acc, (&a, &b)| acc + a * b)
    }

    pub fn norm(&self) -> F {
        self.dot(self).sqrt()
    }

    pub fn euclidean_distance_squared(&self, other: &Self) -> F {
        let diff = *self - *other;
        diff.dot(&diff)
    }

    /// Distance between two configurations.
    pub fn euclidean_distance(&self, other: &Self) -> F {
        self.euclidean_distance_squared(other).sqrt()
    }

    /// Linear interpolation: `self` at `t = 0`, `other` at `t = 1`.
    pub fn lerp(&self, other: &Self, t: F) -> Self {
        *self + (*other - *self) * t
    }
}

impl<F: Float, const N: usize> Index<usize> for RealVectorState<F, N> {
    type Output = F;

    fn index(&self, index: usize) -> &F {
        &self.values[index]
    }
}

impl<F: Float, const N: usize> IndexMut<usize> for RealVectorState<F, N> {
    fn index_mut(&mut self, index: usize) -> &mut F {
        &mut self.values[index]
    }
}

impl<F: Float, const N: usize> Add for RealVectorState<F, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut values = self.values;
        for i in 0..N {
            values[i] = values[i] + rhs.values[i];
        }
        Self { values }
    }
}

impl<'a, F: Float, const N: usize> Add<&'a RealVectorState<F, N>> for &'a RealVectorState<F, N> {
    type Output = RealVectorState<F, N>;

    fn add(self, rhs: Self) -> RealVectorState<F, N> {
        *self + *rhs
    }
}

impl<F: Float, const N: usize> Sub for RealVectorState<F, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut values = self.values;
        for i in 0..N {
            values[i] = values[i] - rhs.values[i];
        }
        Self { values }
    }
}

impl<'a, F: Float, const N: usize> Sub<&'a RealVectorState<F, N>> for &'a RealVectorState<F, N> {
    type Output = RealVectorState<F, N>;

    fn sub(self, rhs: Self) -> RealVectorState<F, N> {
        *self - *rhs
    }
}

impl<F: Float, const N: usize> Mul<F> for RealVectorState<F, N> {
    type Output = Self;

    fn mul(self, rhs: F) -> Self {
        Self {
            values: self.values.map(|v| v * rhs),
        }
    }
}

impl<F: Float, const N: usize> Div<F> for RealVectorState<F, N> {
    type Output = Self;

    fn div(self, rhs: F) -> Self {
        Self {
            values: self.values.map(|v| v / rhs),
        }
    }
}

// serde only derives fixed-size arrays up to 32 elements, so states are
// written as an N-element tuple by hand.
impl<F: Float + Serialize, const N: usize> Serialize for RealVectorState<F, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(N)?;
        for value in &self.values {
            tuple.serialize_element(value)?;
        }
        tuple.end()
    }
}

struct StateVisitor<F, const N: usize> {
    _phantom: PhantomData<F>,
}

impl<'de, F: Float + Deserialize<'de>, const N: usize> Visitor<'de> for StateVisitor<F, N> {
    type Value = RealVectorState<F, N>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a sequence of {} numbers", N)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = [F::zero(); N];
        for (i, value) in values.iter_mut().enumerate() {
            *value = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i, &self))?;
        }
        Ok(RealVectorState::new(values))
    }
}

impl<'de, F: Float + Deserialize<'de>, const N: usize> Deserialize<'de> for RealVectorState<F, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(
            N,
            StateVisitor {
                _phantom: PhantomData,
            },
        )
    }
}
