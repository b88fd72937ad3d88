//! Camera module - pan, zoom and centering over the room scene
//!
//! The scene is placed on screen as
//!
//! ```text
//! screen = position + (local - pivot) * scale
//! ```
//!
//! `position` is where the pivot lands on screen; panning moves the pivot,
//! centering eases both. Dragging and zooming are independent flags. Every
//! animation is a tween advanced by [`Camera::update`]; a new tween on a
//! property replaces the running one.

use crate::raster::Transform;
use crate::tween::{Ease, Tween};
use crate::types::{
    Rect, Vec2, ZoomConfig, ZoomDirection, CENTER_DURATION_MS, CLICK_THRESHOLD_MS,
};

/// Visible area in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0).floor()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(800.0, 600.0)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    pivot: Vec2,
    scale: Vec2,
    zoom: ZoomConfig,
    dragging: bool,
    has_dragged: bool,
    zooming: bool,
    last_click_ms: Option<u64>,
    drag_enabled: bool,
    center_enabled: bool,
    position_tween: Option<Tween<Vec2>>,
    pivot_tween: Option<Tween<Vec2>>,
    scale_tween: Option<Tween<f64>>,
    /// Screen point kept fixed while a cursor zoom runs.
    zoom_anchor: Option<Vec2>,
    viewport: Viewport,
    bounds: Rect,
    centerings: u32,
}

impl Camera {
    pub fn new(viewport: Viewport, zoom: ZoomConfig, drag_enabled: bool, center_enabled: bool) -> Self {
        let level = zoom.clamp(zoom.level);
        Self {
            position: viewport.center(),
            pivot: Vec2::ZERO,
            scale: Vec2::new(level, level),
            zoom: ZoomConfig { level, ..zoom },
            dragging: false,
            has_dragged: false,
            zooming: false,
            last_click_ms: None,
            drag_enabled,
            center_enabled,
            position_tween: None,
            pivot_tween: None,
            scale_tween: None,
            zoom_anchor: None,
            viewport,
            bounds: Rect::default(),
            centerings: 0,
        }
    }

    /// Replace zoom/drag/center settings; a new level applies immediately.
    pub fn configure(&mut self, zoom: ZoomConfig, drag_enabled: bool, center_enabled: bool) {
        let level = zoom.clamp(zoom.level);
        if level != self.zoom.level {
            self.scale_tween = None;
            self.zoom_anchor = None;
            self.zooming = false;
            self.scale = Vec2::new(level, level);
        }
        self.zoom = ZoomConfig { level, ..zoom };
        self.drag_enabled = drag_enabled;
        self.center_enabled = center_enabled;
        if !drag_enabled {
            self.dragging = false;
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn zoom(&self) -> &ZoomConfig {
        &self.zoom
    }

    pub fn level(&self) -> f64 {
        self.zoom.level
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// True once the pointer moved the camera during the current press.
    pub fn has_dragged(&self) -> bool {
        self.has_dragged
    }

    pub fn is_zooming(&self) -> bool {
        self.zooming
    }

    pub fn is_centering(&self) -> bool {
        self.position_tween.is_some() || self.pivot_tween.is_some()
    }

    /// Number of centering animations started so far.
    pub fn centerings(&self) -> u32 {
        self.centerings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Room bounding box in scene space.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn transform(&self) -> Transform {
        Transform {
            offset: self.position - Vec2::new(self.pivot.x * self.scale.x, self.pivot.y * self.scale.y),
            scale: self.scale,
        }
    }

    pub fn to_screen(&self, local: Vec2) -> Vec2 {
        self.transform().apply(local)
    }

    pub fn to_local(&self, screen: Vec2) -> Vec2 {
        let d = screen - self.position;
        Vec2::new(
            d.x / self.scale.x + self.pivot.x,
            d.y / self.scale.y + self.pivot.y,
        )
    }

    /// Room bounds as they appear on screen.
    pub fn screen_bounds(&self) -> Rect {
        let top_left = self.to_screen(Vec2::new(self.bounds.x, self.bounds.y));
        Rect::new(
            top_left.x,
            top_left.y,
            self.bounds.width * self.scale.x,
            self.bounds.height * self.scale.y,
        )
    }

    pub fn is_out_of_bounds(&self) -> bool {
        !self.screen_bounds().intersects(&self.viewport.rect())
    }

    /// Press: starts a drag unless it follows the last click too closely.
    pub fn pointer_down(&mut self, now_ms: u64) -> bool {
        if !self.drag_enabled {
            return false;
        }
        let debounced = self
            .last_click_ms
            .map_or(true, |last| now_ms.saturating_sub(last) > CLICK_THRESHOLD_MS);
        if debounced {
            self.dragging = true;
        }
        self.dragging
    }

    /// Drag by a movement in device pixels.
    pub fn pointer_move(&mut self, movement: Vec2) -> bool {
        if !self.dragging {
            return false;
        }
        self.has_dragged = true;
        let dpr = self.viewport.dpr;
        self.pivot = self.pivot
            - Vec2::new(
                movement.x / (self.scale.x * dpr),
                movement.y / (self.scale.y * dpr),
            );
        self.pivot_tween = None;
        self.position_tween = None;
        true
    }

    /// Release; returns true when it started a centering animation.
    pub fn pointer_up(&mut self, now_ms: u64) -> bool {
        self.dragging = false;
        self.has_dragged = false;
        self.last_click_ms = Some(now_ms);
        if self.center_enabled && self.is_out_of_bounds() {
            self.center();
            return true;
        }
        false
    }

    /// Pan by a screen-space delta (keyboard nudges).
    pub fn pan(&mut self, delta: Vec2) {
        self.pivot = self.pivot - Vec2::new(delta.x / self.scale.x, delta.y / self.scale.y);
        self.pivot_tween = None;
        self.position_tween = None;
    }

    /// Wheel input; a positive `delta_y` zooms out.
    pub fn wheel(&mut self, delta_y: f64, cursor: Vec2) -> bool {
        if !self.zoom.zoom_type.accepts_wheel() || delta_y == 0.0 {
            return false;
        }
        self.zoom_step(delta_y < 0.0, cursor)
    }

    /// `+` zooms in, `-` zooms out.
    pub fn key(&mut self, key: char, cursor: Vec2) -> bool {
        if !self.zoom.zoom_type.accepts_keys() {
            return false;
        }
        match key {
            '+' | '=' => self.zoom_step(true, cursor),
            '-' | '_' => self.zoom_step(false, cursor),
            _ => false,
        }
    }

    /// Move one step toward `max` (in) or `min` (out).
    ///
    /// Returns false without starting a tween when the level is pinned at a
    /// boundary.
    pub fn zoom_step(&mut self, zoom_in: bool, cursor: Vec2) -> bool {
        let level = self.zoom.level;
        let step = if zoom_in { self.zoom.step } else { -self.zoom.step };
        let next = self.zoom.clamp(level + step);
        let pinned = level == self.zoom.min || level == self.zoom.max;
        if next == level && pinned {
            return false;
        }

        self.zoom.level = next;
        self.scale_tween = Some(Tween::new(
            self.scale.x,
            next,
            self.zoom.duration_ms,
            Ease::Power1Out,
        ));
        self.zooming = true;
        self.zoom_anchor = match self.zoom.direction {
            ZoomDirection::Cursor => {
                self.pivot_tween = None;
                Some(cursor)
            }
            ZoomDirection::Center => None,
        };
        true
    }

    /// Ease the room's bounding box to the middle of the viewport.
    pub fn center(&mut self) {
        let duration = CENTER_DURATION_MS;
        self.position_tween = Some(Tween::new(
            self.position,
            self.viewport.center(),
            duration,
            Ease::ExpoInOut,
        ));
        self.pivot_tween = Some(Tween::new(
            self.pivot,
            self.bounds.center().floor(),
            duration,
            Ease::ExpoInOut,
        ));
        self.centerings += 1;
    }

    /// Place the room in the middle of the viewport without animating.
    pub fn snap_to_center(&mut self) {
        self.position_tween = None;
        self.pivot_tween = None;
        self.position = self.viewport.center();
        self.pivot = self.bounds.center().floor();
    }

    /// Advance every running animation.
    pub fn update(&mut self, elapsed_ms: f64) {
        if let Some(tween) = self.scale_tween.as_mut() {
            let before = self.zoom_anchor.map(|a| {
                let d = a - self.position;
                Vec2::new(d.x / self.scale.x + self.pivot.x, d.y / self.scale.y + self.pivot.y)
            });
            let s = tween.advance(elapsed_ms);
            let finished = tween.is_finished();
            self.scale = Vec2::new(s, s);
            if let (Some(anchor), Some(before)) = (self.zoom_anchor, before) {
                let after = self.to_local(anchor);
                self.pivot = self.pivot + (before - after);
            }
            if finished {
                self.scale_tween = None;
                self.zoom_anchor = None;
                self.zooming = false;
                if self.center_enabled && self.is_out_of_bounds() {
                    self.center();
                }
            }
        }

        if let Some(tween) = self.position_tween.as_mut() {
            self.position = tween.advance(elapsed_ms);
            if tween.is_finished() {
                self.position_tween = None;
            }
        }
        if let Some(tween) = self.pivot_tween.as_mut() {
            self.pivot = tween.advance(elapsed_ms);
            if tween.is_finished() {
                self.pivot_tween = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        let mut c = Camera::new(Viewport::new(400.0, 300.0), ZoomConfig::default(), true, true);
        c.set_bounds(Rect::new(-64.0, -32.0, 128.0, 64.0));
        c
    }

    #[test]
    fn screen_and_local_are_inverse() {
        let mut c = camera();
        c.pan(Vec2::new(10.0, -4.0));
        let p = Vec2::new(17.0, 33.0);
        let back = c.to_local(c.to_screen(p));
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn drag_moves_pivot_against_movement() {
        let mut c = camera();
        assert!(c.pointer_down(1000));
        assert!(c.pointer_move(Vec2::new(20.0, 10.0)));
        assert!(c.has_dragged());
        assert_eq!(c.pivot(), Vec2::new(-20.0, -10.0));
        assert!(!c.pointer_up(1010));
        assert!(!c.is_dragging());
    }

    #[test]
    fn press_right_after_click_does_not_drag() {
        let mut c = camera();
        c.pointer_down(1000);
        c.pointer_up(1000);
        assert!(!c.pointer_down(1050));
        assert!(!c.pointer_move(Vec2::new(5.0, 5.0)));
        assert!(c.pointer_down(1200));
    }

    #[test]
    fn zoom_steps_and_settles() {
        let mut c = camera();
        assert!(c.key('+', Vec2::ZERO));
        assert!(c.is_zooming());
        assert_eq!(c.level(), 1.5);
        c.update(200.0);
        assert!(!c.is_zooming());
        assert_eq!(c.scale(), Vec2::new(1.5, 1.5));
    }

    #[test]
    fn cursor_zoom_keeps_anchor_fixed() {
        let zoom = ZoomConfig {
            direction: ZoomDirection::Cursor,
            ..ZoomConfig::default()
        };
        let mut c = Camera::new(Viewport::new(400.0, 300.0), zoom, true, false);
        let cursor = Vec2::new(300.0, 80.0);
        let before = c.to_local(cursor);
        assert!(c.wheel(-100.0, cursor));
        c.update(60.0);
        c.update(100.0);
        let after = c.to_local(cursor);
        assert!((before.x - after.x).abs() < 1e-6);
        assert!((before.y - after.y).abs() < 1e-6);
    }

    #[test]
    fn zoom_type_gates_inputs() {
        let zoom = ZoomConfig {
            zoom_type: crate::types::ZoomType::Keydown,
            ..ZoomConfig::default()
        };
        let mut c = Camera::new(Viewport::default(), zoom, true, true);
        assert!(!c.wheel(100.0, Vec2::ZERO));
        assert!(c.key('-', Vec2::ZERO));
    }

    #[test]
    fn dragging_far_away_recenters_once() {
        let mut c = camera();
        c.pointer_down(1000);
        c.pointer_move(Vec2::new(5000.0, 0.0));
        assert!(c.is_out_of_bounds());
        assert!(c.pointer_up(1100));
        assert_eq!(c.centerings(), 1);
        c.update(300.0);
        c.update(400.0);
        assert!(!c.is_centering());
        assert_eq!(c.centerings(), 1);
        assert!(c.viewport().rect().contains_rect(&c.screen_bounds()));
    }
}
