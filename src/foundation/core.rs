/// Vertical offset applied to every sampled `z`, modelling the fixed scene depth.
pub const SCENE_DEPTH_OFFSET: i64 = -20;

/// Height the camera is always rendered at.
pub const CAMERA_HEIGHT: i64 = 10;

/// Fixed look-at target of the orbit scenario.
pub const LOOK_AT_TARGET: [i64; 3] = [0, -4, -20];

/// One discrete camera position on the horizontal orbit circle.
///
/// The height is not part of the pose; it is supplied at dispatch time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CameraPose {
    pub x: i64,
    pub z: i64,
}

impl CameraPose {
    pub const fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Closing/start frame of every trajectory: the orbit centre at scene depth.
    pub const fn seed() -> Self {
        Self::new(0, SCENE_DEPTH_OFFSET)
    }

    /// Full `[x, height, z]` position.
    pub fn with_height(self, height: i64) -> [i64; 3] {
        [self.x, height, self.z]
    }
}

impl std::fmt::Display for CameraPose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// A sub-pixel sample position inside a unit pixel cell.
///
/// Origin is the top-left corner, y grows downward as negative values, so
/// `dx` lies in `(0, 1)` and `dy` in `(-1, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn to_point(self) -> kurbo::Point {
        kurbo::Point::new(self.dx, self.dy)
    }
}
