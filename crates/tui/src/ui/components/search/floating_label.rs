//! Floating label animation for the search box.
//!
//! The label rests inside the input while it is blurred and empty and floats
//! up into the border while the input is focused or holds text. The move is
//! spread over [`LABEL_FRAMES`] ticks unless animations are disabled.

pub const LABEL_FRAMES: u8 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatingLabel {
    frame: u8,
    raised: bool,
}

impl FloatingLabel {
    /// Point the label at its resting position. Without animations it jumps there.
    pub fn set_raised(&mut self, raised: bool, animated: bool) {
        self.raised = raised;
        if !animated {
            self.frame = self.target_frame();
        }
    }

    /// Advance one frame toward the target. Returns `true` if the label moved.
    pub fn tick(&mut self) -> bool {
        let target = self.target_frame();
        if self.frame == target {
            return false;
        }
        if self.frame < target {
            self.frame += 1;
        } else {
            self.frame -= 1;
        }
        true
    }

    fn target_frame(&self) -> u8 {
        if self.raised { LABEL_FRAMES } else { 0 }
    }

    /// 0.0 when resting inside the input, 1.0 when fully floated.
    pub fn progress(&self) -> f32 {
        f32::from(self.frame) / f32::from(LABEL_FRAMES)
    }

    pub fn is_animating(&self) -> bool {
        self.frame != self.target_frame()
    }
}
