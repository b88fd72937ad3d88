//! Frame pacing for the preview loop.
//!
//! While the camera is animating every frame is drawn, capped at the frame
//! interval. A still scene is redrawn as soon as its fingerprint changes (a
//! furniture frame advanced, the cursor moved) and otherwise only on the slow
//! idle refresh.

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    frame_interval_ms: u64,
    idle_refresh_ms: u64,
    last_render_ms: Option<u64>,
    last_fingerprint: u64,
}

impl RenderThrottle {
    pub fn new(frame_interval_ms: u64, idle_refresh_ms: u64) -> Self {
        Self {
            frame_interval_ms,
            idle_refresh_ms: idle_refresh_ms.max(frame_interval_ms),
            last_render_ms: None,
            last_fingerprint: 0,
        }
    }

    /// 60 fps cap, one idle redraw per second.
    pub fn preview() -> Self {
        Self::new(16, 1000)
    }

    /// Forget the last frame so the next call renders.
    pub fn invalidate(&mut self) {
        self.last_render_ms = None;
    }

    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, animating: bool) -> bool {
        let render = match self.last_render_ms {
            None => true,
            Some(last) => {
                let since = now_ms.saturating_sub(last);
                if since < self.frame_interval_ms {
                    false
                } else {
                    animating || fingerprint != self.last_fingerprint || since >= self.idle_refresh_ms
                }
            }
        };
        if render {
            self.last_render_ms = Some(now_ms);
            self.last_fingerprint = fingerprint;
        }
        render
    }
}

impl Default for RenderThrottle {
    fn default() -> Self {
        Self::preview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_always_renders() {
        let mut t = RenderThrottle::new(16, 1000);
        assert!(t.should_render(0, 1, false));
    }

    #[test]
    fn caps_animated_frames() {
        let mut t = RenderThrottle::new(16, 1000);
        assert!(t.should_render(0, 1, true));
        assert!(!t.should_render(10, 2, true));
        assert!(t.should_render(16, 2, true));
    }

    #[test]
    fn still_scene_waits_for_change_or_idle() {
        let mut t = RenderThrottle::new(16, 1000);
        assert!(t.should_render(0, 7, false));
        assert!(!t.should_render(100, 7, false));
        assert!(t.should_render(200, 8, false));
        assert!(!t.should_render(900, 8, false));
        assert!(t.should_render(1200, 8, false));
    }

    #[test]
    fn invalidate_forces_next_frame() {
        let mut t = RenderThrottle::preview();
        assert!(t.should_render(0, 1, false));
        t.invalidate();
        assert!(t.should_render(1, 1, false));
    }

    #[test]
    fn idle_refresh_never_below_frame_interval() {
        let mut t = RenderThrottle::new(50, 10);
        assert!(t.should_render(0, 1, false));
        assert!(!t.should_render(20, 1, false));
        assert!(t.should_render(50, 1, false));
    }
}
