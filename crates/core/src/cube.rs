//! Cube module - the isometric box primitive
//!
//! A cube is described by its size in tile units `(sx, sy, sz)` and the screen
//! position of its origin: the top-face corner with minimum world X and maximum
//! world Y. Relative to that origin the three visible faces are:
//!
//! ```text
//! TOP:   (0,0) (32sy,-16sy) (32(sx+sy),16(sx-sy)) (32sx,16sx)
//! LEFT:  (0,0) (0,32sz) (32sx,16sx+32sz) (32sx,16sx)
//! RIGHT: (32sx,16sx) (32sx,16sx+32sz) (32(sx+sy),16(sx-sy)+32sz) (32(sx+sy),16(sx-sy))
//! ```
//!
//! LEFT spans the X footprint, RIGHT spans the Y footprint. Both hang `sz`
//! height units below the top face.

use arrayvec::ArrayVec;

use crate::types::{
    CubeFace, Material, Rect, Vec2, Vec3, HEIGHT_UNIT, TILE_HALF_HEIGHT, TILE_HALF_WIDTH,
};

/// Four-corner polygon in screen pixels.
pub type Quad = ArrayVec<Vec2, 4>;

/// Project a continuous room-space point to screen pixels.
pub fn project(p: Vec3) -> Vec2 {
    Vec2::new(
        TILE_HALF_WIDTH * (p.x - p.y),
        TILE_HALF_HEIGHT * (p.x + p.y) - HEIGHT_UNIT * p.z,
    )
}

/// Scale an `0xRRGGBB` color by a brightness multiplier.
pub fn shade(color: u32, brightness: f64) -> u32 {
    let channel = |shift: u32| -> u32 {
        let c = ((color >> shift) & 0xff) as f64;
        ((c * brightness).round().clamp(0.0, 255.0) as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// One colored face of a cube, already placed in scene space.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub kind: CubeFace,
    pub points: Quad,
    /// Material color after the face's brightness multiplier.
    pub color: u32,
    pub texture: Option<String>,
    pub order: f64,
    /// Region cut out of the face (door opening).
    pub hole: Option<Quad>,
}

impl Face {
    pub fn bounds(&self) -> Rect {
        polygon_bounds(&self.points)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        if !contains_point(&self.points, p) {
            return false;
        }
        match &self.hole {
            Some(hole) => !contains_point(hole, p),
            None => true,
        }
    }
}

/// A box with its three visible faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub origin: Vec2,
    pub size: Vec3,
    pub faces: [Face; 3],
}

impl Cube {
    /// Build a cube at `origin` with one paint order per face (TOP, LEFT, RIGHT).
    pub fn new(origin: Vec2, size: Vec3, material: &Material, orders: [f64; 3]) -> Self {
        let faces = CubeFace::ALL.map(|kind| {
            let idx = face_index(kind);
            Face {
                kind,
                points: face_points(kind, size)
                    .into_iter()
                    .map(|p| p + origin)
                    .collect(),
                color: shade(material.color, kind.brightness()),
                texture: material.texture.clone(),
                order: orders[idx],
                hole: None,
            }
        });
        Self {
            origin,
            size,
            faces,
        }
    }

    /// Same order for every face.
    pub fn uniform(origin: Vec2, size: Vec3, material: &Material, order: f64) -> Self {
        Self::new(origin, size, material, [order; 3])
    }

    pub fn face(&self, kind: CubeFace) -> &Face {
        &self.faces[face_index(kind)]
    }

    pub fn face_mut(&mut self, kind: CubeFace) -> &mut Face {
        &mut self.faces[face_index(kind)]
    }

    pub fn bounds(&self) -> Rect {
        self.faces
            .iter()
            .map(Face::bounds)
            .fold(Rect::default(), |acc, r| acc.union(&r))
    }
}

fn face_index(kind: CubeFace) -> usize {
    match kind {
        CubeFace::Top => 0,
        CubeFace::Left => 1,
        CubeFace::Right => 2,
    }
}

/// Face corners relative to the cube origin.
pub fn face_points(kind: CubeFace, size: Vec3) -> [Vec2; 4] {
    let w = TILE_HALF_WIDTH;
    let h = TILE_HALF_HEIGHT;
    let u = HEIGHT_UNIT;
    let Vec3 {
        x: sx,
        y: sy,
        z: sz,
    } = size;
    let far = Vec2::new(w * (sx + sy), h * (sx - sy));
    match kind {
        CubeFace::Top => [
            Vec2::new(0.0, 0.0),
            Vec2::new(w * sy, -h * sy),
            far,
            Vec2::new(w * sx, h * sx),
        ],
        CubeFace::Left => [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, u * sz),
            Vec2::new(w * sx, h * sx + u * sz),
            Vec2::new(w * sx, h * sx),
        ],
        CubeFace::Right => [
            Vec2::new(w * sx, h * sx),
            Vec2::new(w * sx, h * sx + u * sz),
            Vec2::new(far.x, far.y + u * sz),
            far,
        ],
    }
}

pub fn polygon_bounds(points: &[Vec2]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

/// Even-odd point-in-polygon test.
pub fn contains_point(points: &[Vec2], p: Vec2) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
