//! Per-layer frame cursor

/// Position within one layer's frame sequence.
///
/// `current_frame_index` always stays below the sequence length (or at 0 for
/// an empty sequence).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerAnimationState {
    current_frame_index: usize,
    frame_sequence: Vec<u32>,
}

impl LayerAnimationState {
    pub fn new(frame_sequence: Vec<u32>) -> Self {
        Self {
            current_frame_index: 0,
            frame_sequence,
        }
    }

    pub fn index(&self) -> usize {
        self.current_frame_index
    }

    pub fn sequence(&self) -> &[u32] {
        &self.frame_sequence
    }

    /// Only multi-frame sequences advance.
    pub fn is_animated(&self) -> bool {
        self.frame_sequence.len() > 1
    }

    /// Step one frame, wrapping to 0 past the end. Returns whether it moved.
    pub fn advance(&mut self) -> bool {
        if !self.is_animated() {
            return false;
        }
        self.current_frame_index = (self.current_frame_index + 1) % self.frame_sequence.len();
        true
    }

    /// Frame number to draw (0 when there is no sequence).
    pub fn frame_value(&self) -> u32 {
        self.frame_sequence
            .get(self.current_frame_index)
            .copied()
            .unwrap_or(0)
    }

    /// True when the cursor sits on the last frame (always for static layers).
    pub fn last_frame_played(&self) -> bool {
        !self.is_animated() || self.current_frame_index + 1 == self.frame_sequence.len()
    }

    pub fn reset(&mut self, frame_sequence: Vec<u32>) {
        self.current_frame_index = 0;
        self.frame_sequence = frame_sequence;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_past_the_end() {
        let mut a = LayerAnimationState::new(vec![0, 3, 6]);
        assert_eq!((a.index(), a.frame_value()), (0, 0));
        a.advance();
        assert_eq!((a.index(), a.frame_value()), (1, 3));
        a.advance();
        assert_eq!((a.index(), a.frame_value()), (2, 6));
        assert!(a.last_frame_played());
        a.advance();
        assert_eq!((a.index(), a.frame_value()), (0, 0));
    }

    #[test]
    fn single_frame_never_moves() {
        let mut a = LayerAnimationState::new(vec![4]);
        assert!(!a.advance());
        assert_eq!(a.frame_value(), 4);
        let empty = LayerAnimationState::default();
        assert_eq!(empty.frame_value(), 0);
        assert!(empty.last_frame_played());
    }

    #[test]
    fn reset_rewinds() {
        let mut a = LayerAnimationState::new(vec![1, 2]);
        a.advance();
        a.reset(vec![5, 6, 7]);
        assert_eq!(a.index(), 0);
        assert_eq!(a.frame_value(), 5);
    }
}
