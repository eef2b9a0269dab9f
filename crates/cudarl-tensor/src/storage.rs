//! Exclusively owned buffer management for vector data.
//!
//! This module provides the storage type behind [`crate::Vector1D`]. Every
//! storage owns its memory outright: clones are deep copies into fresh
//! allocations, and dropping a storage returns the memory to the allocator
//! that produced it.

use std::{alloc::Layout, mem::MaybeUninit, ptr::NonNull};

use crate::allocator::{AllocatorError, CpuAllocator, VectorAllocator};

/// Owned, contiguous buffer of `f32` values.
///
/// A zero-length storage holds no allocation at all; a non-empty storage
/// holds exactly `len` elements obtained from its allocator.
///
/// # Thread Safety
///
/// `VectorStorage` is `Send + Sync` when its allocator is, for the same
/// reason `Vec<f32>` is: the buffer is never aliased.
pub struct VectorStorage<A: VectorAllocator = CpuAllocator> {
    /// Pointer to the buffer, `None` iff `len == 0`.
    ptr: Option<NonNull<f32>>,
    /// Number of elements in the buffer.
    len: usize,
    /// The allocator that owns the buffer memory.
    alloc: A,
}

impl<A: VectorAllocator> VectorStorage<A> {
    /// Creates a storage with no elements and no allocation.
    pub fn empty(alloc: A) -> Self {
        Self {
            ptr: None,
            len: 0,
            alloc,
        }
    }

    /// Allocates a storage for `len` elements without initializing them.
    ///
    /// # Safety
    ///
    /// The contents are uninitialized. Every element must be written, through
    /// [`VectorStorage::write`] or [`VectorStorage::fill`], before the storage
    /// is read, compared or cloned into a vector that is read.
    pub unsafe fn uninit(len: usize, alloc: A) -> Self {
        Self::allocate(len, alloc)
    }

    /// Creates a storage of `len` elements all set to `value`.
    pub fn from_elem(len: usize, value: f32, alloc: A) -> Self {
        let mut storage = Self::allocate(len, alloc);
        storage.fill(value);
        storage
    }

    /// Creates a storage holding a copy of `data`.
    pub fn from_slice(data: &[f32], alloc: A) -> Self {
        let storage = Self::allocate(data.len(), alloc);
        if let Some(dst) = storage.ptr {
            // SAFETY: dst was just allocated for data.len() elements and cannot overlap data.
            unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), dst.as_ptr(), data.len()) };
        }
        storage
    }

    /// Creates a storage of `len` elements, writing `f(i)` at each index `i`.
    pub fn from_fn<F>(len: usize, alloc: A, mut f: F) -> Self
    where
        F: FnMut(usize) -> f32,
    {
        let mut storage = Self::allocate(len, alloc);
        for (i, slot) in storage.as_uninit_mut().iter_mut().enumerate() {
            slot.write(f(i));
        }
        storage
    }

    /// Returns the number of elements in the storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the storage holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the memory layout of the buffer, or `None` when nothing is allocated.
    pub fn layout(&self) -> Option<Layout> {
        self.ptr.map(|_| buffer_layout(self.len))
    }

    /// Returns a pointer to the first element, or null when the storage is empty.
    #[inline]
    pub fn as_ptr(&self) -> *const f32 {
        self.ptr
            .map_or(std::ptr::null(), |p| p.as_ptr() as *const f32)
    }

    /// Returns the storage data as a slice.
    pub fn as_slice(&self) -> &[f32] {
        match self.ptr {
            // SAFETY: ptr is valid for len initialized elements and exclusively owned.
            Some(ptr) => unsafe { std::slice::from_raw_parts(ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// Returns the storage data as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        match self.ptr {
            // SAFETY: ptr is valid for len initialized elements and we hold &mut self.
            Some(ptr) => unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// Returns the buffer as possibly-uninitialized slots.
    ///
    /// Every slot touched through this view must be left holding a value;
    /// storing `MaybeUninit::uninit()` would make later safe reads undefined.
    pub(crate) fn as_uninit_mut(&mut self) -> &mut [MaybeUninit<f32>] {
        match self.ptr {
            // SAFETY: MaybeUninit<f32> has the layout of f32 and carries no validity requirement.
            Some(ptr) => unsafe {
                std::slice::from_raw_parts_mut(ptr.as_ptr().cast::<MaybeUninit<f32>>(), self.len)
            },
            None => &mut [],
        }
    }

    /// Writes `value` at `index`, returning false if `index` is out of bounds.
    ///
    /// Sound on storage created with [`VectorStorage::uninit`].
    pub fn write(&mut self, index: usize, value: f32) -> bool {
        match self.as_uninit_mut().get_mut(index) {
            Some(slot) => {
                slot.write(value);
                true
            }
            None => false,
        }
    }

    /// Overwrites every element with `value`.
    ///
    /// Sound on storage created with [`VectorStorage::uninit`].
    pub fn fill(&mut self, value: f32) {
        self.as_uninit_mut().fill(MaybeUninit::new(value));
    }

    /// Moves the buffer out, leaving this storage empty.
    ///
    /// No element is copied and no memory is allocated.
    pub fn take(&mut self) -> Self {
        let empty = Self::empty(self.alloc.clone());
        std::mem::replace(self, empty)
    }

    /// Consumes the storage and returns its data as a vector.
    pub fn into_vec(self) -> Vec<f32> {
        self.as_slice().to_vec()
    }

    fn allocate(len: usize, alloc: A) -> Self {
        if len == 0 {
            return Self::empty(alloc);
        }

        let layout = buffer_layout(len);
        let ptr = match alloc.alloc(layout) {
            Ok(raw) => NonNull::new(raw.cast::<f32>()),
            Err(AllocatorError::NullPointer) => None,
            Err(AllocatorError::LayoutError(_)) => capacity_overflow(),
        };
        let Some(ptr) = ptr else {
            std::alloc::handle_alloc_error(layout)
        };

        log::trace!("allocated vector buffer: {len} elements, {} bytes", layout.size());

        Self {
            ptr: Some(ptr),
            len,
            alloc,
        }
    }

    /// Copies `source` into this storage. Both must have the same length.
    fn copy_from(&mut self, source: &Self) {
        debug_assert_eq!(self.len, source.len);
        if let (Some(dst), Some(src)) = (self.ptr, source.ptr) {
            // SAFETY: both buffers hold len elements; &mut self and &source cannot alias.
            unsafe { std::ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), self.len) };
        }
    }
}

fn buffer_layout(len: usize) -> Layout {
    match Layout::array::<f32>(len) {
        Ok(layout) => layout,
        Err(_) => capacity_overflow(),
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

// SAFETY: the buffer is exclusively owned, so sending the storage sends the data with it.
unsafe impl<A: VectorAllocator + Send> Send for VectorStorage<A> {}

// SAFETY: shared access only hands out &[f32]; mutation requires &mut self.
unsafe impl<A: VectorAllocator + Sync> Sync for VectorStorage<A> {}

impl<A: VectorAllocator> Drop for VectorStorage<A> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            let layout = buffer_layout(self.len);
            self.alloc.dealloc(ptr.as_ptr().cast::<u8>(), layout);
            log::trace!("released vector buffer: {} elements", self.len);
        }
    }
}

impl<A: VectorAllocator> Clone for VectorStorage<A> {
    /// Deep copy into a fresh allocation.
    fn clone(&self) -> Self {
        let mut storage = Self::allocate(self.len, self.alloc.clone());
        storage.copy_from(self);
        storage
    }

    /// Reuses the existing buffer when the lengths match.
    fn clone_from(&mut self, source: &Self) {
        if self.len == source.len {
            self.copy_from(source);
        } else {
            *self = source.clone();
        }
    }
}

impl<A: VectorAllocator + Default> Default for VectorStorage<A> {
    fn default() -> Self {
        Self::empty(A::default())
    }
}

impl<A: VectorAllocator> std::fmt::Debug for VectorStorage<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStorage")
            .field("ptr", &self.as_ptr())
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// Counts calls into the system allocator.
    #[derive(Clone, Default)]
    struct CountingAllocator {
        allocs: Arc<AtomicUsize>,
        deallocs: Arc<AtomicUsize>,
    }

    impl CountingAllocator {
        fn allocs(&self) -> usize {
            self.allocs.load(Ordering::SeqCst)
        }

        fn deallocs(&self) -> usize {
            self.deallocs.load(Ordering::SeqCst)
        }
    }

    impl VectorAllocator for CountingAllocator {
        fn alloc(&self, layout: Layout) -> Result<*mut u8, AllocatorError> {
            self.allocs.fetch_add(1, Ordering::SeqCst);
            CpuAllocator.alloc(layout)
        }

        fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            self.deallocs.fetch_add(1, Ordering::SeqCst);
            CpuAllocator.dealloc(ptr, layout)
        }
    }

    #[test]
    fn test_storage_from_slice() {
        let storage = VectorStorage::from_slice(&[1.0, 2.0, 3.0], CpuAllocator);
        assert_eq!(storage.len(), 3);
        assert!(!storage.is_empty());
        assert!(!storage.as_ptr().is_null());
        assert_eq!(storage.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_storage_empty_has_no_buffer() {
        let alloc = CountingAllocator::default();
        let storage = VectorStorage::from_slice(&[], alloc.clone());
        assert!(storage.is_empty());
        assert!(storage.as_ptr().is_null());
        assert!(storage.layout().is_none());
        assert_eq!(storage.as_slice(), &[] as &[f32]);
        drop(storage);
        assert_eq!(alloc.allocs(), 0);
        assert_eq!(alloc.deallocs(), 0);
    }

    #[test]
    fn test_storage_drop_releases_once() {
        let alloc = CountingAllocator::default();
        let storage = VectorStorage::from_elem(16, 1.0, alloc.clone());
        assert_eq!(storage.layout(), Layout::array::<f32>(16).ok());
        assert_eq!(alloc.allocs(), 1);
        drop(storage);
        assert_eq!(alloc.deallocs(), 1);
    }

    #[test]
    fn test_storage_clone_is_deep() {
        let alloc = CountingAllocator::default();
        let mut a = VectorStorage::from_slice(&[1.0, 2.0, 3.0], alloc.clone());
        let b = a.clone();
        assert_eq!(alloc.allocs(), 2);
        assert_ne!(a.as_ptr(), b.as_ptr());

        a.as_mut_slice()[0] = 10.0;
        assert_eq!(a.as_slice(), &[10.0, 2.0, 3.0]);
        assert_eq!(b.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_storage_clone_from_reuses_buffer() {
        let alloc = CountingAllocator::default();
        let source = VectorStorage::from_slice(&[4.0, 5.0], alloc.clone());
        let mut dest = VectorStorage::from_elem(2, 0.0, alloc.clone());
        let dest_ptr = dest.as_ptr();

        dest.clone_from(&source);
        assert_eq!(dest.as_slice(), &[4.0, 5.0]);
        assert_eq!(dest.as_ptr(), dest_ptr);
        assert_eq!(alloc.allocs(), 2);

        let mut shorter = VectorStorage::from_elem(1, 0.0, alloc.clone());
        shorter.clone_from(&source);
        assert_eq!(shorter.as_slice(), &[4.0, 5.0]);
        assert_eq!(alloc.allocs(), 4);
        assert_eq!(alloc.deallocs(), 1);
    }

    #[test]
    fn test_storage_move_does_not_allocate() {
        let alloc = CountingAllocator::default();
        let a = VectorStorage::from_slice(&[1.0, 2.0], alloc.clone());
        let ptr = a.as_ptr();
        let b = a;
        assert_eq!(b.as_ptr(), ptr);
        assert_eq!(alloc.allocs(), 1);
    }

    #[test]
    fn test_storage_take_leaves_empty() {
        let alloc = CountingAllocator::default();
        let mut a = VectorStorage::from_slice(&[1.0, 2.0, 3.0], alloc.clone());
        let ptr = a.as_ptr();

        let b = a.take();
        assert_eq!(b.as_ptr(), ptr);
        assert_eq!(b.as_slice(), &[1.0, 2.0, 3.0]);
        assert!(a.is_empty());
        assert!(a.as_ptr().is_null());
        assert_eq!(alloc.allocs(), 1);

        drop(a);
        assert_eq!(alloc.deallocs(), 0);
        drop(b);
        assert_eq!(alloc.deallocs(), 1);
    }

    #[test]
    fn test_storage_uninit_then_fill() {
        let mut storage = unsafe { VectorStorage::uninit(4, CpuAllocator) };
        assert_eq!(storage.len(), 4);
        storage.fill(7.5);
        assert_eq!(storage.as_slice(), &[7.5; 4]);
    }

    #[test]
    fn test_storage_uninit_then_write() {
        let mut storage = unsafe { VectorStorage::uninit(3, CpuAllocator) };
        assert!(storage.write(0, 1.0));
        assert!(storage.write(1, 2.0));
        assert!(storage.write(2, 3.0));
        assert!(!storage.write(3, 4.0));
        assert_eq!(storage.as_slice(), &[1.0, 2.0, 3.0]);
    }

    /// Rejects every layout as malformed.
    #[derive(Clone)]
    struct MalformedLayoutAllocator;

    impl VectorAllocator for MalformedLayoutAllocator {
        fn alloc(&self, _layout: Layout) -> Result<*mut u8, AllocatorError> {
            let err = Layout::from_size_align(4, 3).unwrap_err();
            Err(AllocatorError::LayoutError(err))
        }

        fn dealloc(&self, _ptr: *mut u8, _layout: Layout) {}
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_storage_layout_error_is_fatal() {
        let _ = VectorStorage::from_elem(4, 0.0, MalformedLayoutAllocator);
    }

    #[test]
    fn test_storage_layout_error_skipped_when_empty() {
        let storage = VectorStorage::from_elem(0, 0.0, MalformedLayoutAllocator);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_storage_from_fn() {
        let storage = VectorStorage::from_fn(4, CpuAllocator, |i| i as f32 * 0.5);
        assert_eq!(storage.as_slice(), &[0.0, 0.5, 1.0, 1.5]);
        assert_eq!(storage.into_vec(), vec![0.0, 0.5, 1.0, 1.5]);
    }
}
