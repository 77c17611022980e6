use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Camera position and orientation for ray-traced frames.
///
/// The orientation columns are (right, down, forward) in world space, so a
/// pixel offset `(sx, sy, focal)` in camera space maps directly to a world
/// direction with screen y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub orientation: Mat3,
}

impl CameraState {
    /// Create a camera at `position` looking at `target`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            orientation: Mat3::IDENTITY,
        };
        camera.look_at(target);
        camera
    }

    /// Re-orient the camera to face `target`, keeping world +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        // Looking straight along Y leaves no horizon; pick any right vector.
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let down = forward.cross(right);
        self.orientation = Mat3::from_cols(right, down, forward);
    }

    /// Orbit the camera position by `angle` radians around the vertical axis
    /// through `center`. Height is unchanged.
    pub fn orbit_y(&mut self, angle: f32, center: Vec3) {
        let p = self.position - center;
        let (sin, cos) = angle.sin_cos();
        let x = p.x * cos - p.z * sin;
        let z = p.x * sin + p.z * cos;
        self.position = center + Vec3::new(x, p.y, z);
    }

    /// Orbit the camera position by `angle` radians around the horizontal
    /// X axis through `center`.
    pub fn orbit_x(&mut self, angle: f32, center: Vec3) {
        let p = self.position - center;
        let (sin, cos) = angle.sin_cos();
        let y = p.y * cos + p.z * sin;
        let z = -p.y * sin + p.z * cos;
        self.position = center + Vec3::new(p.x, y, z);
    }

    /// Move the camera without changing where it faces.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Unit world-space direction of the primary ray through pixel (x, y).
    ///
    /// The image plane sits `focal` units in front of the camera and
    /// `scale` pixels span one world unit on it.
    pub fn primary_ray_direction(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        focal: f32,
        scale: f32,
    ) -> Vec3 {
        let canvas_x = (x as f32 - (width / 2) as f32) / scale;
        let canvas_y = (y as f32 - (height / 2) as f32) / scale;
        (self.orientation * Vec3::new(canvas_x, canvas_y, focal)).normalize()
    }

    /// World-space forward direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation.z_axis
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO)
    }
}
