//! Raster module - software compositing of room parts and sprites
//!
//! Parts are filled as flat polygons (scanline, even-odd, pixel centers) in
//! ascending paint order; sprites follow on top in their own order. The
//! canvas is the offscreen buffer used by screenshots and the terminal
//! preview.

use std::fmt;
use std::io::Cursor;

use base64::Engine;
use image::{ImageBuffer, ImageFormat, Rgba};

use crate::parts::RoomPart;
use crate::types::{BlendMode, Rect, Vec2};

/// Scene-to-canvas mapping: `canvas = local * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub offset: Vec2,
    pub scale: Vec2,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        offset: Vec2::ZERO,
        scale: Vec2 { x: 1.0, y: 1.0 },
    };

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.scale.x + self.offset.x,
            p.y * self.scale.y + self.offset.y,
        )
    }

    /// Same mapping, shifted so `origin` lands at (0, 0).
    pub fn translated(&self, origin: Vec2) -> Transform {
        Transform {
            offset: self.offset - origin,
            scale: self.scale,
        }
    }
}

/// Largest canvas an offscreen render may allocate (8192 x 8192).
pub const MAX_CANVAS_PIXELS: usize = 8192 * 8192;

/// Pixel count of a `width` x `height` buffer, `None` on overflow.
pub fn pixel_count(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)
}

/// Errors raised while taking a screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotError {
    /// The requested region has no pixels.
    EmptyRegion,
    /// The requested region exceeds [`MAX_CANVAS_PIXELS`].
    RegionTooLarge { width: u32, height: u32 },
    /// PNG encoding failed.
    Encode(String),
}

impl fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenshotError::EmptyRegion => write!(f, "screenshot region is empty"),
            ScreenshotError::RegionTooLarge { width, height } => write!(
                f,
                "screenshot region {}x{} exceeds {} pixels",
                width, height, MAX_CANVAS_PIXELS
            ),
            ScreenshotError::Encode(msg) => write!(f, "failed to encode screenshot: {}", msg),
        }
    }
}

impl std::error::Error for ScreenshotError {}

/// RGBA sprite bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl SpriteImage {
    pub fn solid(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgba(color, 255); width as usize * height as usize],
        }
    }

    fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Texture lookup by key.
pub trait SpriteAtlas {
    fn image(&self, key: &str) -> Option<&SpriteImage>;
}

/// Atlas without textures; sprites are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSprites;

impl SpriteAtlas for NoSprites {
    fn image(&self, _key: &str) -> Option<&SpriteImage> {
        None
    }
}

/// Atlas answering every key with one marker image.
#[derive(Debug, Clone)]
pub struct MarkerAtlas {
    pub marker: SpriteImage,
}

impl SpriteAtlas for MarkerAtlas {
    fn image(&self, _key: &str) -> Option<&SpriteImage> {
        Some(&self.marker)
    }
}

/// A positioned sprite on the object layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSprite {
    pub key: String,
    /// Top-left corner in scene space.
    pub position: Vec2,
    pub order: f64,
    pub alpha: f64,
    pub tint: Option<u32>,
    pub blend: BlendMode,
    pub flip: bool,
}

fn rgba(color: u32, alpha: u8) -> [u8; 4] {
    [
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
        alpha,
    ]
}

fn blend_channel(dst: u8, src: u8, a: f64, mode: BlendMode) -> u8 {
    let d = dst as f64;
    let s = src as f64;
    let out = match mode {
        BlendMode::Normal => s * a + d * (1.0 - a),
        BlendMode::Add => d + s * a,
        BlendMode::Multiply => d * (1.0 - a + a * s / 255.0),
        BlendMode::Screen => 255.0 - (255.0 - d) * (255.0 - s * a) / 255.0,
    };
    out.round().clamp(0.0, 255.0) as u8
}

/// RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Canvas {
    /// Transparent canvas. Sizes come from the viewport or terminal; use
    /// [`Canvas::try_new`] for caller-supplied regions.
    pub fn new(width: u32, height: u32) -> Self {
        let len = pixel_count(width, height).unwrap_or(usize::MAX);
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0]; len],
        }
    }

    /// Like [`Canvas::new`], but `None` above [`MAX_CANVAS_PIXELS`].
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        pixel_count(width, height)
            .filter(|&len| len <= MAX_CANVAS_PIXELS)
            .map(|len| Self {
                width,
                height,
                pixels: vec![[0, 0, 0, 0]; len],
            })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill with `color` at `alpha` (0..=1).
    pub fn clear(&mut self, color: u32, alpha: f64) {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.pixels.fill(rgba(color, a));
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4], alpha: f64, mode: BlendMode) {
        let a = alpha * src[3] as f64 / 255.0;
        if a <= 0.0 {
            return;
        }
        let i = y as usize * self.width as usize + x as usize;
        let dst = self.pixels[i];
        self.pixels[i] = [
            blend_channel(dst[0], src[0], a, mode),
            blend_channel(dst[1], src[1], a, mode),
            blend_channel(dst[2], src[2], a, mode),
            (dst[3] as f64 + (255.0 - dst[3] as f64) * a).round().min(255.0) as u8,
        ];
    }

    /// Scanline fill; `hole` is subtracted from the polygon.
    pub fn fill_polygon(&mut self, points: &[Vec2], hole: Option<&[Vec2]>, color: u32, alpha: f64) {
        if points.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let first = (min_y.floor().max(0.0)) as u32;
        let last = (max_y.ceil().min(self.height as f64)) as u32;
        let src = rgba(color, 255);

        let mut crossings: Vec<f64> = Vec::with_capacity(8);
        for py in first..last {
            let sy = py as f64 + 0.5;
            crossings.clear();
            push_crossings(points, sy, &mut crossings);
            if let Some(hole) = hole {
                push_crossings(hole, sy, &mut crossings);
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                let x0 = (span[0] - 0.5).ceil().max(0.0);
                let x1 = (span[1] - 0.5).ceil().min(self.width as f64);
                let mut px = x0;
                while px < x1 {
                    self.blend_pixel(px as u32, py, src, alpha, BlendMode::Normal);
                    px += 1.0;
                }
            }
        }
    }

    /// Draw `image` at `top_left`, scaled with nearest-neighbor sampling.
    pub fn draw_image(&mut self, image: &SpriteImage, top_left: Vec2, scale: Vec2, sprite: &StageSprite) {
        let w = image.width as f64 * scale.x;
        let h = image.height as f64 * scale.y;
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = top_left.x.floor().max(0.0) as i64;
        let y0 = top_left.y.floor().max(0.0) as i64;
        let x1 = ((top_left.x + w).ceil() as i64).min(self.width as i64);
        let y1 = ((top_left.y + h).ceil() as i64).min(self.height as i64);

        for py in y0..y1 {
            let v = ((py as f64 + 0.5 - top_left.y) / scale.y).floor();
            if v < 0.0 || v >= image.height as f64 {
                continue;
            }
            for px in x0..x1 {
                let mut u = ((px as f64 + 0.5 - top_left.x) / scale.x).floor();
                if u < 0.0 || u >= image.width as f64 {
                    continue;
                }
                if sprite.flip {
                    u = image.width as f64 - 1.0 - u;
                }
                let mut src = image.get(u as u32, v as u32);
                if let Some(tint) = sprite.tint {
                    let t = rgba(tint, 255);
                    for c in 0..3 {
                        src[c] = (src[c] as u16 * t[c] as u16 / 255) as u8;
                    }
                }
                self.blend_pixel(px as u32, py as u32, src, sprite.alpha, sprite.blend);
            }
        }
    }

    /// Encode as a PNG data URL.
    pub fn to_png_data_url(&self) -> Result<String, ScreenshotError> {
        if self.width == 0 || self.height == 0 {
            return Err(ScreenshotError::EmptyRegion);
        }
        let raw: Vec<u8> = self.pixels.iter().flatten().copied().collect();
        let image: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, raw)
                .ok_or_else(|| ScreenshotError::Encode("buffer size mismatch".into()))?;
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| ScreenshotError::Encode(e.to_string()))?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        ))
    }
}

fn push_crossings(points: &[Vec2], sy: f64, out: &mut Vec<f64>) {
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if (a.y > sy) != (b.y > sy) {
            out.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
        }
    }
}

/// Paint parts, then sprites, each in ascending order.
pub fn render_stage(
    canvas: &mut Canvas,
    parts: &[RoomPart],
    sprites: &[StageSprite],
    atlas: &dyn SpriteAtlas,
    transform: Transform,
) {
    let mut faces: Vec<_> = parts.iter().flat_map(RoomPart::faces).collect();
    faces.sort_by(|a, b| a.order.total_cmp(&b.order));

    let place = |points: &[Vec2]| -> Vec<Vec2> { points.iter().map(|p| transform.apply(*p)).collect() };
    for face in faces {
        let points = place(face.points.as_slice());
        let hole = face.hole.as_ref().map(|h| place(h.as_slice()));
        canvas.fill_polygon(&points, hole.as_deref(), face.color, 1.0);
    }

    let mut ordered: Vec<&StageSprite> = sprites.iter().collect();
    ordered.sort_by(|a, b| a.order.total_cmp(&b.order));
    for sprite in ordered {
        if let Some(image) = atlas.image(&sprite.key) {
            canvas.draw_image(image, transform.apply(sprite.position), transform.scale, sprite);
        }
    }
}

/// Pixel size of a region, rounded up.
pub fn region_size(region: Rect) -> (u32, u32) {
    (
        region.width.max(0.0).ceil() as u32,
        region.height.max(0.0).ceil() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::TilePart;
    use crate::types::{Material, TilePosition};

    fn square(x: f64, y: f64, s: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(x, y),
            Vec2::new(x + s, y),
            Vec2::new(x + s, y + s),
            Vec2::new(x, y + s),
        ]
    }

    #[test]
    fn fills_polygon_interior() {
        let mut c = Canvas::new(8, 8);
        c.fill_polygon(&square(2.0, 2.0, 4.0), None, 0xff0000, 1.0);
        assert_eq!(c.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(c.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn hole_stays_transparent() {
        let mut c = Canvas::new(10, 10);
        let hole = square(4.0, 4.0, 2.0);
        c.fill_polygon(&square(0.0, 0.0, 10.0), Some(&hole), 0x00ff00, 1.0);
        assert_eq!(c.pixel(1, 1), Some([0, 255, 0, 255]));
        assert_eq!(c.pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn additive_blend_brightens() {
        assert_eq!(blend_channel(100, 100, 1.0, BlendMode::Add), 200);
        assert_eq!(blend_channel(200, 100, 1.0, BlendMode::Add), 255);
        assert_eq!(blend_channel(100, 200, 0.5, BlendMode::Normal), 150);
    }

    #[test]
    fn later_orders_paint_on_top() {
        let m_back = Material::solid(0x0000ff);
        let m_front = Material::solid(0xff0000);
        let back = RoomPart::Tile(TilePart::new(TilePosition::new(0, 0, 0), 0, &m_back));
        let front = RoomPart::Tile(TilePart::new(TilePosition::new(0, 0, 1), 0, &m_front));
        let mut c = Canvas::new(64, 64);
        let t = Transform::IDENTITY.translated(Vec2::new(0.0, -40.0));
        // Supplied back-to-front reversed; ordering must still win.
        render_stage(&mut c, &[front, back], &[], &NoSprites, t);
        // Tile at z=1 sits 32px higher; its center is at (32, 8).
        assert_eq!(c.pixel(32, 8), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(32, 40), Some([0, 0, 255, 255]));
    }

    #[test]
    fn sprites_respect_alpha_and_flip() {
        let mut img = SpriteImage::solid(2, 1, 0xffffff);
        img.pixels[1] = [0, 0, 0, 255];
        let sprite = StageSprite {
            key: "a".into(),
            position: Vec2::ZERO,
            order: 0.0,
            alpha: 1.0,
            tint: None,
            blend: BlendMode::Normal,
            flip: true,
        };
        let mut c = Canvas::new(2, 1);
        c.draw_image(&img, Vec2::ZERO, Vec2::new(1.0, 1.0), &sprite);
        assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(c.pixel(1, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn try_new_caps_pixel_count() {
        assert!(Canvas::try_new(16, 16).is_some());
        assert!(Canvas::try_new(8193, 8192).is_none());
        assert!(Canvas::try_new(u32::MAX, u32::MAX).is_none());
        assert_eq!(pixel_count(70000, 70000), Some(4_900_000_000));
    }

    #[test]
    fn png_data_url() {
        let mut c = Canvas::new(3, 2);
        c.clear(0x123456, 1.0);
        let url = c.to_png_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(Canvas::new(0, 4).to_png_data_url(), Err(ScreenshotError::EmptyRegion));
    }
}
