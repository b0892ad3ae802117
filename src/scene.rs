//! What to draw each frame, independent of how it gets drawn.
//!
//! A [`SceneSource`] turns elapsed time and user input into a [`SceneFrame`]: a clear color plus
//! the uniforms for this frame. A [`DrawTarget`] takes that frame and puts it on screen. The two
//! never see each other's internals; the host owns one of each and passes frames between them.

use std::time::Duration;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::graphics::{ClearColor, UniformValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A direction key went down (`true`) or up (`false`).
    Direction(Direction, bool),
    /// Pointer drag, already scaled to radians.
    Look { yaw: f32, pitch: f32 },
}

/// Everything a draw target needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub clear_color: ClearColor,
    pub uniforms: Vec<(&'static str, UniformValue)>,
}

impl Default for SceneFrame {
    fn default() -> Self {
        Self {
            clear_color: ClearColor::BLACK,
            uniforms: Vec::new(),
        }
    }
}

/// Produces a drawable frame for a point in time.
pub trait SceneSource {
    fn handle_input(&mut self, _event: InputEvent) {}

    /// `elapsed` is measured from the first frame; `aspect` is width over height.
    fn frame_at(&mut self, elapsed: Duration, aspect: f32) -> SceneFrame;
}

/// Something that can put a [`SceneFrame`] on screen.
pub trait DrawTarget {
    type Error;

    fn draw(&mut self, frame: &SceneFrame) -> Result<(), Self::Error>;
}

/// The same frame every time.
pub struct StaticScene {
    frame: SceneFrame,
}

impl StaticScene {
    pub fn new(clear_color: ClearColor) -> Self {
        Self {
            frame: SceneFrame {
                clear_color,
                uniforms: Vec::new(),
            },
        }
    }
}

impl SceneSource for StaticScene {
    fn frame_at(&mut self, _elapsed: Duration, _aspect: f32) -> SceneFrame {
        self.frame.clone()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Forward => self.forward = pressed,
            Direction::Back => self.back = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }

    /// (forward, right) in -1..=1; opposite keys cancel.
    fn axes(&self) -> (f32, f32) {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        (axis(self.forward, self.back), axis(self.right, self.left))
    }
}

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// A first-person camera: direction keys move it, pointer drags turn it.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub fov: f32,
    pub clipping: (f32, f32),
    keys: DirectionKeys,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            // looking down -Z
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            speed: 2.5,
            fov: 45.0f32.to_radians(),
            clipping: (0.1, 100.0),
            keys: DirectionKeys::default(),
        }
    }
}

impl FlyCamera {
    pub fn keys(&self) -> DirectionKeys {
        self.keys
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Direction(direction, pressed) => self.keys.set(direction, pressed),
            InputEvent::Look { yaw, pitch } => {
                self.yaw += yaw;
                self.pitch = (self.pitch + pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
        }
    }

    pub fn front(&self) -> Vector3<f32> {
        Vector3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.front().cross(&Vector3::y()).normalize()
    }

    /// Moves according to the held direction keys for `dt`.
    pub fn update(&mut self, dt: Duration) {
        let (forward, right) = self.keys.axes();
        if forward == 0.0 && right == 0.0 {
            return;
        }

        let step = self.speed * dt.as_secs_f32();
        let motion = self.front() * forward + self.right() * right;
        self.position += motion.normalize() * step;
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &(self.position + self.front()), &Vector3::y())
    }

    pub fn projection(&self, aspect: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect.max(f32::EPSILON), self.fov, self.clipping.0, self.clipping.1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn camera_starts_looking_down_negative_z() {
        let camera = FlyCamera::default();
        let front = camera.front();
        assert!(close(front.x, 0.0) && close(front.y, 0.0) && close(front.z, -1.0));
    }

    #[test]
    fn forward_key_moves_along_the_view_direction() {
        let mut camera = FlyCamera::default();
        camera.handle_input(InputEvent::Direction(Direction::Forward, true));
        camera.update(Duration::from_secs(1));

        assert!(close(camera.position.z, 3.0 - camera.speed));
        assert!(close(camera.position.x, 0.0));

        camera.handle_input(InputEvent::Direction(Direction::Forward, false));
        let before = camera.position;
        camera.update(Duration::from_secs(1));
        assert_eq!(camera.position, before);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut camera = FlyCamera::default();
        camera.handle_input(InputEvent::Direction(Direction::Left, true));
        camera.handle_input(InputEvent::Direction(Direction::Right, true));
        let before = camera.position;
        camera.update(Duration::from_millis(500));
        assert_eq!(camera.position, before);
    }

    #[test]
    fn strafing_right_moves_along_positive_x() {
        let mut camera = FlyCamera::default();
        camera.handle_input(InputEvent::Direction(Direction::Right, true));
        camera.update(Duration::from_secs(1));
        assert!(camera.position.x > 0.0);
        assert!(close(camera.position.z, 3.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.handle_input(InputEvent::Look { yaw: 0.0, pitch: 10.0 });
        assert!(close(camera.pitch, PITCH_LIMIT));

        camera.handle_input(InputEvent::Look { yaw: 0.3, pitch: -20.0 });
        assert!(close(camera.pitch, -PITCH_LIMIT));
        assert!(close(camera.yaw, -std::f32::consts::FRAC_PI_2 + 0.3));
    }

    #[test]
    fn static_scene_repeats_itself() {
        let mut scene = StaticScene::new(ClearColor([0.1, 0.2, 0.3, 1.0]));
        let a = scene.frame_at(Duration::from_secs(0), 1.0);
        let b = scene.frame_at(Duration::from_secs(9), 2.0);
        assert_eq!(a, b);
        assert_eq!(a.clear_color, ClearColor([0.1, 0.2, 0.3, 1.0]));
    }
}
