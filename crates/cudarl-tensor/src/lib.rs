#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `cudarl-tensor` provides [`Vector1D`], a dense one-dimensional buffer of `f32`
//! values living in CPU memory. Every vector exclusively owns its storage: cloning
//! copies the data into a fresh allocation, moving hands the buffer over without
//! copying, and the memory is released when the owner is dropped.
//!
//! # Architecture
//!
//! - **Vector1D**: the public value type with constructors, indexed access and
//!   elementwise arithmetic
//! - **VectorStorage**: the owned buffer, generic over its allocator
//! - **VectorAllocator**: trait-based memory allocation, with [`CpuAllocator`] as
//!   the system-allocator implementation
//! - **VectorError**: the recoverable failures, out-of-range indices and length
//!   mismatches
//!
//! # Quick Start
//!
//! ```rust
//! use cudarl_tensor::{Vector1D, VectorError};
//!
//! let a = Vector1D::from_values(&[1.0, 2.0, 3.0]);
//! let b = Vector1D::ones(3);
//!
//! let sum = (&a + &b).unwrap();
//! assert_eq!(sum.render(), "Vector1D([2.0000, 3.0000, 4.0000])");
//!
//! let scaled = &a * 0.5;
//! assert_eq!(scaled.get(1), Ok(1.0));
//! assert_eq!(scaled.get(3), Err(VectorError::OutOfRange { index: 3, len: 3 }));
//!
//! let noise = Vector1D::random(8);
//! assert!(noise.iter().all(|&x| (0.0..=1.0).contains(&x)));
//! ```

/// Allocator module containing memory management utilities.
///
/// This module provides the [`VectorAllocator`] trait and the [`CpuAllocator`]
/// implementation backed by the system allocator.
pub mod allocator;

/// Error types for vector operations.
pub mod error;

/// Operator overloads (`+`, `-`, `*`) for [`Vector1D`].
pub mod ops;

/// Storage module containing the owned buffer implementation.
///
/// This module provides [`storage::VectorStorage`] which manages the memory
/// behind a vector through a [`VectorAllocator`].
pub mod storage;

/// Vector module containing the main [`Vector1D`] type.
pub mod vector;

pub use crate::allocator::{AllocatorError, CpuAllocator, VectorAllocator};
pub use crate::error::VectorError;
pub use crate::storage::VectorStorage;
pub use crate::vector::Vector1D;
