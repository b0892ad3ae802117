//! The tutorial steps, each one expressed as data: shader sources, a vertex layout, vertex data,
//! a primitive kind, an optional texture and a scene that supplies per-frame uniforms.

use std::f32::consts::PI;
use std::fmt;
use std::mem::{offset_of, size_of};
use std::str::FromStr;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3, Vector3};

use crate::graphics::*;
use crate::scene::{FlyCamera, InputEvent, SceneFrame, SceneSource, StaticScene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lesson {
    Point,
    Triangle,
    Color,
    Texture,
    Lighting,
    Animate,
    Camera,
}

impl Lesson {
    pub const ALL: [Lesson; 7] = [
        Lesson::Point,
        Lesson::Triangle,
        Lesson::Color,
        Lesson::Texture,
        Lesson::Lighting,
        Lesson::Animate,
        Lesson::Camera,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Lesson::Point => "point",
            Lesson::Triangle => "triangle",
            Lesson::Color => "color",
            Lesson::Texture => "texture",
            Lesson::Lighting => "lighting",
            Lesson::Animate => "animate",
            Lesson::Camera => "camera",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Lesson::Point => "a handful of points, one position attribute",
            Lesson::Triangle => "a white triangle, the smallest complete pipeline",
            Lesson::Color => "per-vertex color interpolated across the triangle",
            Lesson::Texture => "a textured quad sampling a checkerboard",
            Lesson::Lighting => "a spinning cube with ambient, diffuse and specular light",
            Lesson::Animate => "a triangle rotated and pulsed from a time uniform",
            Lesson::Camera => "a field of cubes explored with WASD and mouse drag",
        }
    }

    pub fn config(self) -> Result<LessonConfig, GraphicsError> {
        match self {
            Lesson::Point => Ok(LessonConfig::new(
                include_str!("shaders/point.vert"),
                include_str!("shaders/white.frag"),
                DrawableBuffer::from_vertices(&POINTS[..], &position_2d_layout()?)?,
                PrimitiveKind::Points,
            )),
            Lesson::Triangle => Ok(LessonConfig::new(
                include_str!("shaders/flat.vert"),
                include_str!("shaders/white.frag"),
                DrawableBuffer::from_vertices(&TRIANGLE[..], &position_2d_layout()?)?,
                PrimitiveKind::Triangles,
            )),
            Lesson::Color => Ok(LessonConfig::new(
                include_str!("shaders/color.vert"),
                include_str!("shaders/color.frag"),
                DrawableBuffer::from_vertices(&COLOR_TRIANGLE[..], &ColorVertex::layout()?)?,
                PrimitiveKind::Triangles,
            )),
            Lesson::Texture => {
                let mut config = LessonConfig::new(
                    include_str!("shaders/texture.vert"),
                    include_str!("shaders/texture.frag"),
                    DrawableBuffer::from_vertices(&TEXTURED_QUAD[..], &TexturedVertex::layout()?)?,
                    PrimitiveKind::Triangles,
                );
                config.texture = Some(ImageData::checkerboard(64, 8, [240, 240, 240, 255], [40, 90, 160, 255])?);
                Ok(config)
            }
            Lesson::Lighting => {
                let mut config = LessonConfig::new(
                    include_str!("shaders/lit.vert"),
                    include_str!("shaders/lit.frag"),
                    DrawableBuffer::from_vertices(&CUBE[..], &NormalVertex::layout()?)?,
                    PrimitiveKind::Triangles,
                );
                config.depth_test = true;
                Ok(config)
            }
            Lesson::Animate => Ok(LessonConfig::new(
                include_str!("shaders/animate.vert"),
                include_str!("shaders/animate.frag"),
                DrawableBuffer::from_vertices(&COLOR_TRIANGLE[..], &ColorVertex::layout()?)?,
                PrimitiveKind::Triangles,
            )),
            Lesson::Camera => {
                let mut config = LessonConfig::new(
                    include_str!("shaders/lit.vert"),
                    include_str!("shaders/lit.frag"),
                    DrawableBuffer::from_vertices(&CUBE_FIELD[..], &NormalVertex::layout()?)?,
                    PrimitiveKind::Triangles,
                );
                config.depth_test = true;
                Ok(config)
            }
        }
    }

    pub fn scene(self) -> Box<dyn SceneSource> {
        match self {
            Lesson::Point | Lesson::Triangle | Lesson::Color => Box::new(StaticScene::new(BACKGROUND)),
            Lesson::Texture => Box::new(TextureScene),
            Lesson::Lighting => Box::new(LightingScene::default()),
            Lesson::Animate => Box::new(AnimateScene),
            Lesson::Camera => Box::new(CameraScene::default()),
        }
    }
}

impl fmt::Display for Lesson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Lesson {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lesson::ALL
            .iter()
            .copied()
            .find(|lesson| lesson.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown lesson `{}`", s))
    }
}

/// Everything needed to build a render context for one lesson.
#[derive(Debug, Clone)]
pub struct LessonConfig {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
    pub buffer: DrawableBuffer,
    pub primitive: PrimitiveKind,
    pub texture: Option<ImageData>,
    pub depth_test: bool,
}

impl LessonConfig {
    fn new(vertex: &str, fragment: &str, buffer: DrawableBuffer, primitive: PrimitiveKind) -> Self {
        Self {
            vertex: ShaderSource::vertex(vertex),
            fragment: ShaderSource::fragment(fragment),
            buffer,
            primitive,
            texture: None,
            depth_test: false,
        }
    }
}

const BACKGROUND: ClearColor = ClearColor([0.08, 0.09, 0.12, 1.0]);

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Position2d {
    position: [f32; 2],
}

fn position_2d_layout() -> Result<VertexLayout, LayoutError> {
    VertexLayout::builder(size_of::<Position2d>())
        .attribute(0, 2, offset_of!(Position2d, position))
        .build()
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ColorVertex {
    position: [f32; 2],
    color: [f32; 3],
}

impl ColorVertex {
    fn layout() -> Result<VertexLayout, LayoutError> {
        VertexLayout::builder(size_of::<Self>())
            .attribute(0, 2, offset_of!(ColorVertex, position))
            .attribute(1, 3, offset_of!(ColorVertex, color))
            .build()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct TexturedVertex {
    position: [f32; 2],
    tex_coord: [f32; 2],
}

impl TexturedVertex {
    fn layout() -> Result<VertexLayout, LayoutError> {
        VertexLayout::builder(size_of::<Self>())
            .attribute(0, 2, offset_of!(TexturedVertex, position))
            .attribute(1, 2, offset_of!(TexturedVertex, tex_coord))
            .build()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct NormalVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl NormalVertex {
    fn layout() -> Result<VertexLayout, LayoutError> {
        VertexLayout::builder(size_of::<Self>())
            .attribute(0, 3, offset_of!(NormalVertex, position))
            .attribute(1, 3, offset_of!(NormalVertex, normal))
            .build()
    }
}

const fn p(x: f32, y: f32) -> Position2d {
    Position2d { position: [x, y] }
}

const POINTS: [Position2d; 5] = [p(0.0, 0.0), p(-0.5, -0.5), p(0.5, -0.5), p(0.5, 0.5), p(-0.5, 0.5)];

const TRIANGLE: [Position2d; 3] = [p(-0.5, -0.5), p(0.5, -0.5), p(0.0, 0.5)];

const COLOR_TRIANGLE: [ColorVertex; 3] = [
    ColorVertex { position: [-0.5, -0.5], color: [1.0, 0.0, 0.0] },
    ColorVertex { position: [0.5, -0.5], color: [0.0, 1.0, 0.0] },
    ColorVertex { position: [0.0, 0.5], color: [0.0, 0.0, 1.0] },
];

const fn t(x: f32, y: f32, u: f32, v: f32) -> TexturedVertex {
    TexturedVertex { position: [x, y], tex_coord: [u, v] }
}

// Two triangles sharing the diagonal
const TEXTURED_QUAD: [TexturedVertex; 6] = [
    t(-0.75, 0.75, 0.0, 0.0),
    t(0.75, 0.75, 1.0, 0.0),
    t(0.75, -0.75, 1.0, 1.0),
    t(0.75, -0.75, 1.0, 1.0),
    t(-0.75, -0.75, 0.0, 1.0),
    t(-0.75, 0.75, 0.0, 0.0),
];

/// The six faces of a unit cube centred on `center`, two counter-clockwise triangles each.
fn cube_at(center: Vector3<f32>) -> Vec<NormalVertex> {
    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    let mut vertices = Vec::with_capacity(36);

    for (i, axis) in axes.iter().enumerate() {
        let u = axes[(i + 1) % 3];
        let v = axes[(i + 2) % 3];

        for &sign in &[1.0f32, -1.0] {
            let normal = axis * sign;
            let face = center + normal * 0.5;
            // Flip winding on the negative face so both stay counter-clockwise from outside
            let (u, v) = if sign > 0.0 { (u, v) } else { (v, u) };
            let corner = |a: f32, b: f32| {
                let position = face + u * (a * 0.5) + v * (b * 0.5);
                NormalVertex {
                    position: [position.x, position.y, position.z],
                    normal: [normal.x, normal.y, normal.z],
                }
            };

            vertices.extend_from_slice(&[
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
                corner(-1.0, -1.0),
            ]);
        }
    }

    vertices
}

lazy_static! {
    static ref CUBE: Vec<NormalVertex> = cube_at(Vector3::zeros());

    /// A 3x3 grid of cubes on the ground plane, two units apart.
    static ref CUBE_FIELD: Vec<NormalVertex> = (-1..=1)
        .flat_map(|x| (-1..=1).map(move |z| (x, z)))
        .flat_map(|(x, z)| cube_at(Vector3::new(x as f32 * 2.0, 0.0, z as f32 * 2.0 - 3.0)))
        .collect();
}

struct TextureScene;

impl SceneSource for TextureScene {
    fn frame_at(&mut self, _elapsed: Duration, _aspect: f32) -> SceneFrame {
        SceneFrame {
            clear_color: BACKGROUND,
            uniforms: vec![("u_texture", UniformValue::Int(0))],
        }
    }
}

struct AnimateScene;

impl SceneSource for AnimateScene {
    fn frame_at(&mut self, elapsed: Duration, _aspect: f32) -> SceneFrame {
        let time = elapsed.as_secs_f32();
        let model = Matrix4::new_rotation(Vector3::z() * (time * PI / 2.0));

        SceneFrame {
            clear_color: BACKGROUND,
            uniforms: vec![("u_model", model.into()), ("u_time", time.into())],
        }
    }
}

fn light_uniforms(view_position: Point3<f32>) -> Vec<(&'static str, UniformValue)> {
    vec![
        ("u_light_position", UniformValue::Vec3([1.2, 1.0, 2.0])),
        ("u_light_color", UniformValue::Vec3([1.0, 1.0, 1.0])),
        ("u_object_color", UniformValue::Vec3([1.0, 0.5, 0.31])),
        ("u_view_position", view_position.coords.into()),
    ]
}

struct LightingScene {
    eye: Point3<f32>,
}

impl Default for LightingScene {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 1.5, 3.5),
        }
    }
}

impl SceneSource for LightingScene {
    fn frame_at(&mut self, elapsed: Duration, aspect: f32) -> SceneFrame {
        let angle = elapsed.as_secs_f32() * 0.8;
        let model = Matrix4::new_rotation(Vector3::new(0.5, 1.0, 0.0).normalize() * angle);
        let view = Matrix4::look_at_rh(&self.eye, &Point3::origin(), &Vector3::y());
        let projection = Matrix4::new_perspective(aspect.max(f32::EPSILON), 45.0f32.to_radians(), 0.1, 100.0);

        let mut uniforms: Vec<(&'static str, UniformValue)> = vec![
            ("u_model", model.into()),
            ("u_view", view.into()),
            ("u_projection", projection.into()),
        ];
        uniforms.extend(light_uniforms(self.eye));

        SceneFrame {
            clear_color: BACKGROUND,
            uniforms,
        }
    }
}

#[derive(Default)]
struct CameraScene {
    camera: FlyCamera,
    last: Option<Duration>,
}

impl SceneSource for CameraScene {
    fn handle_input(&mut self, event: InputEvent) {
        self.camera.handle_input(event);
    }

    fn frame_at(&mut self, elapsed: Duration, aspect: f32) -> SceneFrame {
        let dt = elapsed.checked_sub(self.last.unwrap_or(elapsed)).unwrap_or_default();
        self.last = Some(elapsed);
        self.camera.update(dt);

        let mut uniforms: Vec<(&'static str, UniformValue)> = vec![
            ("u_model", Matrix4::identity().into()),
            ("u_view", self.camera.view().into()),
            ("u_projection", self.camera.projection(aspect).into()),
        ];
        uniforms.extend(light_uniforms(self.camera.position));

        SceneFrame {
            clear_color: BACKGROUND,
            uniforms,
        }
    }
}
