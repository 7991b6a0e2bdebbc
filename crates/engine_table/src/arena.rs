//! The packed row buffer.
//!
//! One contiguous allocation of `pitch * capacity` bytes holding the fixed
//! width cells of every row. Row `r`'s cell at offset `o` lives at byte
//! `r * pitch + o`.

use tracing::debug;

#[derive(Debug, Default)]
pub(crate) struct RowArena {
    bytes: Vec<u8>,
    pitch: usize,
    capacity: usize,
}

impl RowArena {
    pub(crate) fn pitch(&self) -> usize {
        self.pitch
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the pitch without moving data. Only valid while no rows are
    /// allocated.
    pub(crate) fn set_pitch(&mut self, pitch: usize) {
        debug_assert_eq!(self.capacity, 0);
        self.pitch = pitch;
    }

    /// Move to a new pitch and capacity, preserving the first `live_rows`
    /// rows. Each row keeps its old bytes as a prefix; the tail is zeroed.
    pub(crate) fn reallocate(&mut self, new_pitch: usize, new_capacity: usize, live_rows: usize) {
        debug_assert!(new_pitch >= self.pitch);
        debug_assert!(new_capacity >= live_rows);
        debug!(
            old_pitch = self.pitch,
            new_pitch,
            old_capacity = self.capacity,
            new_capacity,
            live_rows,
            "reallocating row buffer"
        );

        let mut bytes = vec![0u8; new_pitch * new_capacity];
        let old_pitch = self.pitch;
        if old_pitch == new_pitch {
            let len = live_rows * old_pitch;
            bytes[..len].copy_from_slice(&self.bytes[..len]);
        } else if old_pitch > 0 {
            for (dst, src) in bytes
                .chunks_exact_mut(new_pitch)
                .zip(self.bytes.chunks_exact(old_pitch))
                .take(live_rows)
            {
                dst[..old_pitch].copy_from_slice(src);
            }
        }

        self.bytes = bytes;
        self.pitch = new_pitch;
        self.capacity = new_capacity;
    }

    pub(crate) fn cell(&self, row: usize, offset: usize, size: usize) -> &[u8] {
        let start = row * self.pitch + offset;
        &self.bytes[start..start + size]
    }

    pub(crate) fn cell_mut(&mut self, row: usize, offset: usize, size: usize) -> &mut [u8] {
        let start = row * self.pitch + offset;
        &mut self.bytes[start..start + size]
    }

    /// Copy the whole packed part of row `src` over row `dst`.
    pub(crate) fn copy_row(&mut self, src: usize, dst: usize) {
        let pitch = self.pitch;
        self.bytes
            .copy_within(src * pitch..(src + 1) * pitch, dst * pitch);
    }

    /// Release the buffer. The pitch is kept for the next allocation.
    pub(crate) fn release(&mut self) {
        self.bytes = Vec::new();
        self.capacity = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_preserves_rows_with_block_copy() {
        let mut arena = RowArena::default();
        arena.set_pitch(4);
        arena.reallocate(4, 2, 0);
        arena.cell_mut(0, 0, 4).copy_from_slice(&[1, 2, 3, 4]);
        arena.cell_mut(1, 0, 4).copy_from_slice(&[5, 6, 7, 8]);

        arena.reallocate(4, 4, 2);
        assert_eq!(arena.capacity(), 4);
        assert_eq!(arena.cell(0, 0, 4), &[1, 2, 3, 4]);
        assert_eq!(arena.cell(1, 0, 4), &[5, 6, 7, 8]);
        assert_eq!(arena.cell(3, 0, 4), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_wider_pitch_uses_strided_copy() {
        let mut arena = RowArena::default();
        arena.set_pitch(4);
        arena.reallocate(4, 2, 0);
        arena.cell_mut(0, 0, 4).copy_from_slice(&[1, 1, 1, 1]);
        arena.cell_mut(1, 0, 4).copy_from_slice(&[2, 2, 2, 2]);

        arena.reallocate(12, 2, 2);
        assert_eq!(arena.pitch(), 12);
        assert_eq!(arena.cell(0, 0, 4), &[1, 1, 1, 1]);
        assert_eq!(arena.cell(1, 0, 4), &[2, 2, 2, 2]);
        assert_eq!(arena.cell(1, 4, 8), &[0; 8]);
    }

    #[test]
    fn test_zero_pitch_tracks_capacity() {
        let mut arena = RowArena::default();
        arena.reallocate(0, 10, 0);
        assert_eq!(arena.capacity(), 10);
        arena.reallocate(8, 10, 3);
        assert_eq!(arena.cell(2, 0, 8), &[0; 8]);
    }

    #[test]
    fn test_copy_row() {
        let mut arena = RowArena::default();
        arena.set_pitch(8);
        arena.reallocate(8, 2, 0);
        arena.cell_mut(0, 0, 8).copy_from_slice(&[9; 8]);
        arena.copy_row(0, 1);
        assert_eq!(arena.cell(1, 0, 8), &[9; 8]);
    }
}
