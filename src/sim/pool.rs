//! Piece recycling
//!
//! Pieces live in exactly one of two lists: `active` (in play, scanned every
//! update in list order) or `free` (hidden, waiting for reuse). The pool
//! grows to the peak number of pieces ever in play and never shrinks.

use serde::{Deserialize, Serialize};

use super::piece::Piece;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityPool {
    active: Vec<Piece>,
    free: Vec<Piece>,
    next_id: u32,
}

impl EntityPool {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            free: Vec::new(),
            next_id: 1,
        }
    }

    /// Take a hidden piece off the free list, or build a new one
    pub fn acquire(&mut self) -> Piece {
        if let Some(piece) = self.free.pop() {
            return piece;
        }
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        if id.is_power_of_two() && id >= 64 {
            log::info!("Piece pool grew to {} pieces", id);
        }
        Piece::new(id)
    }

    /// Put an acquired piece into play (appended to the scan order)
    pub fn activate(&mut self, piece: Piece) -> usize {
        self.active.push(piece);
        self.active.len() - 1
    }

    /// Take `active[index]` out of play and onto the free list
    pub fn release(&mut self, index: usize) {
        if index >= self.active.len() {
            log::debug!("release of missing active index {}", index);
            return;
        }
        let mut piece = self.active.remove(index);
        piece.hide();
        self.free.push(piece);
    }

    pub fn active(&self) -> &[Piece] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [Piece] {
        &mut self.active
    }

    pub fn get(&self, index: usize) -> Option<&Piece> {
        self.active.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Piece> {
        self.active.get_mut(index)
    }

    /// Active index of the piece with this id
    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.active.iter().position(|p| p.id == id)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Every piece object ever built (active + free + checked out)
    pub fn capacity(&self) -> usize {
        self.next_id.saturating_sub(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::piece::{PieceColor, PieceKind, PieceState};
    use glam::Vec2;

    fn throw(pool: &mut EntityPool) -> u32 {
        let mut piece = pool.acquire();
        piece.throw(PieceColor::White, Vec2::ZERO, 1.0, PieceKind::Pawn, 0);
        let id = piece.id;
        pool.activate(piece);
        id
    }

    #[test]
    fn test_release_then_reuse() {
        let mut pool = EntityPool::new();
        let a = throw(&mut pool);
        let b = throw(&mut pool);
        assert_ne!(a, b);

        pool.release(pool.index_of(a).unwrap());
        assert_eq!(pool.active_len(), 1);
        assert_eq!(pool.free_len(), 1);
        assert_eq!(pool.free[0].state, PieceState::Hidden);

        // Reuses the released object instead of growing
        let c = throw(&mut pool);
        assert_eq!(c, a);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_lists_stay_disjoint_and_never_shrink() {
        let mut pool = EntityPool::new();
        for _ in 0..10 {
            throw(&mut pool);
        }
        let mut total = pool.active_len() + pool.free_len();
        for i in [9, 3, 0, 5] {
            pool.release(i.min(pool.active_len() - 1));
            let now = pool.active_len() + pool.free_len();
            assert!(now >= total);
            total = now;

            for piece in pool.active() {
                assert!(pool.free.iter().all(|f| f.id != piece.id));
            }
        }
        assert_eq!(total, 10);
    }

    #[test]
    fn test_release_preserves_order() {
        let mut pool = EntityPool::new();
        let ids: Vec<u32> = (0..4).map(|_| throw(&mut pool)).collect();
        pool.release(1);
        let left: Vec<u32> = pool.active().iter().map(|p| p.id).collect();
        assert_eq!(left, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn test_release_out_of_range_is_noop() {
        let mut pool = EntityPool::new();
        pool.release(3);
        assert_eq!(pool.free_len(), 0);
    }
}
