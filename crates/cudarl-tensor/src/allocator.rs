use std::alloc;
use std::alloc::Layout;

use thiserror::Error;

/// Why a vector buffer could not be obtained.
#[derive(Debug, Error, PartialEq)]
pub enum AllocatorError {
    /// The element count produced a byte size or alignment the platform rejects.
    #[error("Invalid buffer layout {0}")]
    LayoutError(core::alloc::LayoutError),

    /// The allocator had no memory to hand out for the buffer.
    #[error("Null pointer")]
    NullPointer,
}

/// Source of the raw `f32` buffers behind [`crate::VectorStorage`].
///
/// The storage only ever asks for `Layout::array::<f32>(len)` with `len > 0`
/// and hands the same layout back on release. Returned memory is
/// uninitialized; the storage writes every element before exposing it.
pub trait VectorAllocator: Clone {
    /// Hands out a buffer matching `layout`.
    fn alloc(&self, layout: Layout) -> Result<*mut u8, AllocatorError>;

    /// Releases a buffer obtained from [`VectorAllocator::alloc`] with the same `layout`.
    fn dealloc(&self, ptr: *mut u8, layout: Layout);
}

/// Buffers from the global system allocator.
#[derive(Clone, Debug, Default)]
pub struct CpuAllocator;

impl VectorAllocator for CpuAllocator {
    /// Zero-sized layouts get a dangling, well-aligned pointer and no allocation.
    fn alloc(&self, layout: Layout) -> Result<*mut u8, AllocatorError> {
        if layout.size() == 0 {
            return Ok(layout.align() as *mut u8);
        }
        // SAFETY: layout has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        if ptr.is_null() {
            Err(AllocatorError::NullPointer)?
        }
        Ok(ptr)
    }

    /// Null pointers and zero-sized layouts are ignored.
    #[allow(clippy::not_unsafe_ptr_arg_deref)]
    fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if !ptr.is_null() && layout.size() != 0 {
            // SAFETY: ptr came from alloc::alloc with this non-zero layout.
            unsafe { alloc::dealloc(ptr, layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_allocator() -> Result<(), AllocatorError> {
        let allocator = CpuAllocator;
        let layout = Layout::array::<f32>(256).map_err(AllocatorError::LayoutError)?;
        let ptr = allocator.alloc(layout)?;
        assert!(!ptr.is_null());
        assert_eq!(ptr as usize % std::mem::align_of::<f32>(), 0);
        allocator.dealloc(ptr, layout);
        Ok(())
    }

    #[test]
    fn test_cpu_allocator_zero_sized() -> Result<(), AllocatorError> {
        let allocator = CpuAllocator;
        let layout = Layout::array::<f32>(0).map_err(AllocatorError::LayoutError)?;
        let ptr = allocator.alloc(layout)?;
        assert!(!ptr.is_null());
        allocator.dealloc(ptr, layout);
        Ok(())
    }

    #[test]
    fn test_cpu_allocator_dealloc_null_is_noop() {
        let allocator = CpuAllocator;
        let layout = Layout::new::<f32>();
        allocator.dealloc(std::ptr::null_mut(), layout);
    }
}
