use glam::{Mat4, Vec2, Vec3, Vec4};

/// A value that can be uploaded to a named uniform.
///
/// Mirrors the `glUniform*` overloads a program exposes: one integer scalar
/// (also used for sampler units), float vectors of arity 1–4, and a
/// column-major 4×4 matrix uploaded without transposition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    /// Builds a float value from 1, 2, 3, 4 or 16 components.
    pub fn from_floats(components: &[f32]) -> Option<Self> {
        match *components {
            [x] => Some(Self::Float(x)),
            [x, y] => Some(Self::Vec2(Vec2::new(x, y))),
            [x, y, z] => Some(Self::Vec3(Vec3::new(x, y, z))),
            [x, y, z, w] => Some(Self::Vec4(Vec4::new(x, y, z, w))),
            _ if components.len() == 16 => Some(Self::Mat4(Mat4::from_cols_slice(components))),
            _ => None,
        }
    }

    /// GLSL type name, used in diagnostics.
    pub fn glsl_type(&self) -> &'static str {
        match self {
            UniformValue::Int(_) => "int",
            UniformValue::Float(_) => "float",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vec2> for UniformValue {
    fn from(value: Vec2) -> Self {
        Self::Vec2(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

impl From<&Mat4> for UniformValue {
    fn from(value: &Mat4) -> Self {
        Self::Mat4(*value)
    }
}
