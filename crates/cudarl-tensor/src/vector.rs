use rand::Rng;

use crate::{allocator::CpuAllocator, error::VectorError, storage::VectorStorage};

/// A dense, owned, one-dimensional vector of `f32` values.
///
/// `Vector1D` has value semantics: [`Clone`] allocates new storage and copies
/// every element, so two vectors never share memory. Moving a vector hands
/// over its buffer without copying; [`Vector1D::take`] does the same from
/// behind a `&mut` and leaves the source empty.
///
/// # Memory Layout
///
/// Elements live in one contiguous buffer owned by a [`VectorStorage`]. An
/// empty vector holds no allocation and [`Vector1D::as_ptr`] returns null.
///
/// # Examples
///
/// ```rust
/// use cudarl_tensor::Vector1D;
///
/// let a = Vector1D::from_values(&[1.0, 2.0, 3.0]);
/// let b = Vector1D::from_values(&[4.0, 5.0, 6.0]);
///
/// let sum = a.add(&b).unwrap();
/// assert_eq!(sum.as_slice(), &[5.0, 7.0, 9.0]);
/// assert_eq!(a.scale(2.0).render(), "Vector1D([2.0000, 4.0000, 6.0000])");
/// ```
pub struct Vector1D {
    storage: VectorStorage<CpuAllocator>,
}

impl Vector1D {
    /// Creates a vector with no elements and no storage.
    pub fn empty() -> Self {
        Self::from_storage(VectorStorage::empty(CpuAllocator))
    }

    /// Allocates a vector of `len` elements without initializing them.
    ///
    /// Unlike [`Vector1D::zeros`] no value is written, which makes this the
    /// cheapest way to obtain a buffer that is about to be overwritten.
    ///
    /// # Safety
    ///
    /// The elements are uninitialized memory, not zeros. Every element must be
    /// written with [`Vector1D::fill`] or [`Vector1D::set`] before any element
    /// is read, compared, rendered or used as an operand.
    ///
    /// # Example
    ///
    /// ```
    /// use cudarl_tensor::Vector1D;
    ///
    /// let mut v = unsafe { Vector1D::with_length(3) };
    /// assert_eq!(v.len(), 3);
    /// v.fill(0.5);
    /// assert_eq!(v.as_slice(), &[0.5, 0.5, 0.5]);
    /// ```
    pub unsafe fn with_length(len: usize) -> Self {
        Self::from_storage(VectorStorage::uninit(len, CpuAllocator))
    }

    /// Creates a vector holding a copy of `values`, in order.
    pub fn from_values(values: &[f32]) -> Self {
        Self::from_storage(VectorStorage::from_slice(values, CpuAllocator))
    }

    /// Creates a vector of `len` elements all set to `value`.
    pub fn full(len: usize, value: f32) -> Self {
        Self::from_storage(VectorStorage::from_elem(len, value, CpuAllocator))
    }

    /// Creates a vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::full(len, 0.0)
    }

    /// Creates a vector of `len` ones.
    pub fn ones(len: usize) -> Self {
        Self::full(len, 1.0)
    }

    /// Creates a vector of `len` values drawn uniformly from `[0, 1]`.
    ///
    /// Draws come from the calling thread's generator ([`rand::rng`]), which
    /// is seeded from the operating system on first use and keeps its state
    /// across calls.
    pub fn random(len: usize) -> Self {
        Self::random_with(len, &mut rand::rng())
    }

    /// Creates a vector of `len` values drawn uniformly from `[0, 1]` using `rng`.
    ///
    /// # Example
    ///
    /// ```
    /// use cudarl_tensor::Vector1D;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let a = Vector1D::random_with(4, &mut StdRng::seed_from_u64(7));
    /// let b = Vector1D::random_with(4, &mut StdRng::seed_from_u64(7));
    /// assert_eq!(a, b);
    /// ```
    pub fn random_with<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self::from_storage(VectorStorage::from_fn(len, CpuAllocator, |_| {
            rng.random::<f32>()
        }))
    }

    fn from_storage(storage: VectorStorage<CpuAllocator>) -> Self {
        Self { storage }
    }

    /// Returns the number of elements in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns a pointer to the first element, or null for an empty vector.
    #[inline]
    pub fn as_ptr(&self) -> *const f32 {
        self.storage.as_ptr()
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        self.storage.as_slice()
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.storage.as_mut_slice()
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.as_slice().iter()
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::OutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<f32, VectorError> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or(VectorError::out_of_range(index, self.len()))
    }

    /// Writes `value` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::OutOfRange`] if `index >= len`. The vector is
    /// left unchanged.
    ///
    /// Together with [`Vector1D::fill`] this is the only element write path that
    /// is sound on a vector from [`Vector1D::with_length`]. No safe API hands out
    /// `MaybeUninit` slots, so safe code cannot de-initialize an element:
    ///
    /// ```compile_fail
    /// #![forbid(unsafe_code)]
    /// use cudarl_tensor::Vector1D;
    ///
    /// let mut v = Vector1D::ones(4);
    /// v.as_uninit_mut()[1] = std::mem::MaybeUninit::uninit();
    /// ```
    ///
    /// ```compile_fail
    /// #![forbid(unsafe_code)]
    /// use cudarl_tensor::VectorStorage;
    ///
    /// let mut s = VectorStorage::from_elem(4, 1.0, cudarl_tensor::CpuAllocator);
    /// s.as_uninit_mut()[1] = std::mem::MaybeUninit::uninit();
    /// ```
    pub fn set(&mut self, index: usize, value: f32) -> Result<(), VectorError> {
        if self.storage.write(index, value) {
            Ok(())
        } else {
            Err(VectorError::out_of_range(index, self.len()))
        }
    }

    /// Overwrites every element with `value`.
    pub fn fill(&mut self, value: f32) {
        self.storage.fill(value);
    }

    /// Returns an independent copy of the elements.
    pub fn to_vec(&self) -> Vec<f32> {
        self.as_slice().to_vec()
    }

    /// Consumes the vector and returns its elements.
    pub fn into_vec(self) -> Vec<f32> {
        self.storage.into_vec()
    }

    /// Moves the buffer into a new vector, leaving `self` empty.
    ///
    /// # Example
    ///
    /// ```
    /// use cudarl_tensor::Vector1D;
    ///
    /// let mut a = Vector1D::from_values(&[1.0, 2.0]);
    /// let b = a.take();
    /// assert_eq!(b.as_slice(), &[1.0, 2.0]);
    /// assert!(a.is_empty());
    /// assert!(a.as_ptr().is_null());
    /// ```
    pub fn take(&mut self) -> Self {
        Self::from_storage(self.storage.take())
    }

    /// Apply a function to each element, producing a new vector.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        let src = self.as_slice();
        Self::from_storage(VectorStorage::from_fn(src.len(), CpuAllocator, |i| {
            f(src[i])
        }))
    }

    /// Apply a binary function to each pair of elements of `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ShapeMismatch`] if the lengths differ. The check
    /// happens before any element is touched.
    pub fn element_wise_op<F>(&self, other: &Vector1D, op: F) -> Result<Self, VectorError>
    where
        F: Fn(f32, f32) -> f32,
    {
        if self.len() != other.len() {
            return Err(VectorError::shape_mismatch(self.len(), other.len()));
        }

        let (lhs, rhs) = (self.as_slice(), other.as_slice());
        Ok(Self::from_storage(VectorStorage::from_fn(
            lhs.len(),
            CpuAllocator,
            |i| op(lhs[i], rhs[i]),
        )))
    }

    /// Elementwise sum of `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ShapeMismatch`] if the lengths differ.
    pub fn add(&self, other: &Vector1D) -> Result<Self, VectorError> {
        self.element_wise_op(other, |a, b| a + b)
    }

    /// Elementwise difference `self - other`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ShapeMismatch`] if the lengths differ.
    pub fn subtract(&self, other: &Vector1D) -> Result<Self, VectorError> {
        self.element_wise_op(other, |a, b| a - b)
    }

    /// Multiplies every element by `scalar`, producing a new vector.
    pub fn scale(&self, scalar: f32) -> Self {
        self.map(|x| x * scalar)
    }

    /// Renders the vector as `Vector1D([v0, v1, ...])` with four decimals per value.
    ///
    /// # Example
    ///
    /// ```
    /// use cudarl_tensor::Vector1D;
    ///
    /// let v = Vector1D::from_values(&[1.0, 2.5]);
    /// assert_eq!(v.render(), "Vector1D([1.0000, 2.5000])");
    /// ```
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Clone for Vector1D {
    fn clone(&self) -> Self {
        Self::from_storage(self.storage.clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.storage.clone_from(&source.storage);
    }
}

impl Default for Vector1D {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Vector1D {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl From<Vec<f32>> for Vector1D {
    fn from(values: Vec<f32>) -> Self {
        Self::from_values(&values)
    }
}

impl From<&[f32]> for Vector1D {
    fn from(values: &[f32]) -> Self {
        Self::from_values(values)
    }
}

impl FromIterator<f32> for Vector1D {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        let values: Vec<f32> = iter.into_iter().collect();
        Self::from_values(&values)
    }
}

impl<'a> IntoIterator for &'a Vector1D {
    type Item = &'a f32;
    type IntoIter = std::slice::Iter<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for Vector1D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vector1D")
            .field("len", &self.len())
            .field("data", &self.as_slice())
            .finish()
    }
}

impl std::fmt::Display for Vector1D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vector1D([")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v:.4}")?;
        }
        write!(f, "])")
    }
}
