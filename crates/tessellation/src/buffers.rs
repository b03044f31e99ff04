//! Grow-only scratch storage for generated geometry.

use crate::error::TessellationError;

use bytemuck::{Pod, Zeroable};
use core::marker::PhantomData;
use core::mem::{align_of, size_of};

/// Alignment of the storage of every [`ScratchBuffer`], in bytes.
pub const SCRATCH_ALIGNMENT: usize = 16;

const MIN_BLOCKS: usize = 16;

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C, align(16))]
struct Block([u32; 4]);

/// A growable array of plain-old-data values stored with 16 bytes alignment.
///
/// Resetting the buffer keeps its allocation, so the memory use of a buffer is bounded
/// by the largest mesh it ever held. Growing the buffer is fallible.
pub struct ScratchBuffer<T> {
    blocks: Vec<Block>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> ScratchBuffer<T> {
    const ITEMS_PER_BLOCK: usize = {
        assert!(size_of::<T>() > 0);
        assert!(size_of::<Block>() % size_of::<T>() == 0);
        assert!(align_of::<T>() <= SCRATCH_ALIGNMENT);
        size_of::<Block>() / size_of::<T>()
    };

    pub fn new() -> Self {
        ScratchBuffer {
            blocks: Vec::new(),
            len: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of items the buffer can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() * Self::ITEMS_PER_BLOCK
    }

    /// Sets the length to zero without releasing memory.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Makes room for at least `additional` more items.
    ///
    /// The capacity at least doubles when the buffer grows.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TessellationError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(TessellationError::AllocationFailure)?;
        if required <= self.capacity() {
            return Ok(());
        }

        let required_blocks = required.div_ceil(Self::ITEMS_PER_BLOCK);
        let num_blocks = required_blocks
            .max(self.blocks.len() * 2)
            .max(MIN_BLOCKS);

        self.blocks
            .try_reserve_exact(num_blocks - self.blocks.len())
            .map_err(|_| TessellationError::AllocationFailure)?;
        self.blocks.resize(num_blocks, Block::zeroed());

        log::trace!(
            "Scratch buffer of {} grew to {} items",
            core::any::type_name::<T>(),
            self.capacity()
        );

        Ok(())
    }

    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), TessellationError> {
        if self.len == self.capacity() {
            self.reserve(1)?;
        }

        let idx = self.len;
        self.storage_mut()[idx] = value;
        self.len += 1;

        Ok(())
    }

    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), TessellationError> {
        self.reserve(values.len())?;
        let start = self.len;
        self.storage_mut()[start..start + values.len()].copy_from_slice(values);
        self.len += values.len();

        Ok(())
    }

    /// Resets the buffer and makes it hold `len` copies of `value`.
    pub fn fill(&mut self, value: T, len: usize) -> Result<(), TessellationError> {
        self.reset();
        self.reserve(len)?;
        self.storage_mut()[..len].fill(value);
        self.len = len;

        Ok(())
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &bytemuck::cast_slice(&self.blocks)[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.storage_mut()[..len]
    }

    #[inline]
    fn storage_mut(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(&mut self.blocks)
    }
}

impl<T: Pod> Default for ScratchBuffer<T> {
    fn default() -> Self {
        ScratchBuffer::new()
    }
}

impl<T: Pod + core::fmt::Debug> core::fmt::Debug for ScratchBuffer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

#[test]
fn scratch_buffer_alignment() {
    use crate::math::{point, Point};

    let mut points: ScratchBuffer<Point> = ScratchBuffer::new();
    let mut indices: ScratchBuffer<u16> = ScratchBuffer::new();
    for i in 0..1000 {
        points.push(point(i as f32, 0.0)).unwrap();
        indices.push(i as u16).unwrap();
        assert_eq!(points.as_slice().as_ptr() as usize % SCRATCH_ALIGNMENT, 0);
        assert_eq!(indices.as_slice().as_ptr() as usize % SCRATCH_ALIGNMENT, 0);
    }

    assert_eq!(points.len(), 1000);
    assert_eq!(points.as_slice()[999], point(999.0, 0.0));
    assert_eq!(indices.as_slice()[500], 500);
}

#[test]
fn scratch_block_layout() {
    assert_eq!(size_of::<Block>(), SCRATCH_ALIGNMENT);
    assert_eq!(align_of::<Block>(), SCRATCH_ALIGNMENT);
    assert_eq!(Block::zeroed().0, [0; 4]);

    // Wider items fill a whole block each.
    let mut buffer: ScratchBuffer<[f32; 4]> = ScratchBuffer::new();
    buffer.fill([1.0, 2.0, 3.0, 4.0], 3).unwrap();
    assert_eq!(buffer.capacity() % ScratchBuffer::<[f32; 4]>::ITEMS_PER_BLOCK, 0);
    assert_eq!(ScratchBuffer::<[f32; 4]>::ITEMS_PER_BLOCK, 1);
    assert_eq!(buffer.as_slice()[2], [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn scratch_buffer_reset_keeps_capacity() {
    let mut buffer: ScratchBuffer<u32> = ScratchBuffer::new();
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 0);

    buffer.extend_from_slice(&[1, 2, 3, 4, 5]).unwrap();
    let capacity = buffer.capacity();
    assert!(capacity >= 5);
    assert_eq!(buffer.as_slice(), &[1, 2, 3, 4, 5]);

    buffer.reset();
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), capacity);

    buffer.push(7).unwrap();
    assert_eq!(buffer.as_slice(), &[7]);
}

#[test]
fn scratch_buffer_growth_doubles() {
    let mut buffer: ScratchBuffer<u32> = ScratchBuffer::new();
    buffer.reserve(1).unwrap();
    let mut capacity = buffer.capacity();
    for i in 0..10_000 {
        buffer.push(i).unwrap();
        if buffer.capacity() != capacity {
            assert!(buffer.capacity() >= capacity * 2);
            capacity = buffer.capacity();
        }
    }
    assert_eq!(buffer.last(), Some(&9_999));
}

#[test]
fn scratch_buffer_overflow() {
    let mut buffer: ScratchBuffer<u32> = ScratchBuffer::new();
    buffer.push(1).unwrap();
    assert_eq!(
        buffer.reserve(usize::MAX),
        Err(TessellationError::AllocationFailure)
    );
    assert_eq!(buffer.as_slice(), &[1]);
}
