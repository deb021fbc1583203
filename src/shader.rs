//! Lowering synthesized expressions into shader source.
//!
//! The fragment template defines one helper function per emit name and a
//! single placeholder where the expression is substituted. Two uniforms are
//! left for the rendering backend to bind before each draw:
//!
//! - `resolution` (`vec2`): canvas size in pixels
//! - `scale` (`float`): half-extent of the coordinate space, `x, y ∈ [-scale, scale]`

use std::borrow::Cow;

use crate::error::{RandomartError, Result};

/// Uniform carrying the canvas size in pixels.
pub const RESOLUTION_UNIFORM: &str = "resolution";

/// Uniform carrying the coordinate scale.
pub const SCALE_UNIFORM: &str = "scale";

/// Default placeholder in the fragment template.
pub const EXPRESSION_PLACEHOLDER: &str = "EXPRESSION";

/// Vertex attribute holding the fullscreen quad positions.
pub const POSITION_ATTRIBUTE: &str = "position";

/// Two triangles covering clip space, as `(x, y)` pairs.
pub const FULLSCREEN_QUAD: [f32; 12] = [
    1.0, 1.0, -1.0, 1.0, -1.0, -1.0, //
    -1.0, -1.0, 1.0, -1.0, 1.0, 1.0,
];

const GLSL_VERTEX: &str = r#"#version 100

attribute vec3 position;

void main()
{
    gl_Position = vec4(position.x, position.y, 0, 1.0);
}
"#;

const GLSL_FRAGMENT: &str = r#"#version 100

precision highp float;
uniform vec2 resolution;
uniform float scale;

#define M_PI 3.1415926535897932384626433832795

float get_x() {
    return (gl_FragCoord.x/resolution.x)*2.0*scale - scale;
}

float get_y() {
    return (gl_FragCoord.y/resolution.y)*2.0*scale - scale;
}

float get_abs_x() {
    return abs(get_x());
}

float get_abs_y() {
    return abs(get_y());
}

float get_distance() {
    return length(vec2(get_x(), get_y()));
}

float csin(float a) {
    return sin(a * M_PI);
}

float ccos(float a) {
    return cos(a * M_PI);
}

float ctan(float a) {
    return tan(a * M_PI);
}

float refl(float a) {
    return a;
}

float add(float a, float b) {
    return min(a + b, 1.0);
}

float mul(float a, float b) {
    return a * b;
}

float sqrt_abs(float a) {
    return sqrt(abs(a));
}

float A(float a) {
    return a;
}

vec4 E(float c1, float c2, float c3) {
    return vec4(c1, c2, c3, 1.0);
}

void main() {
    gl_FragColor = EXPRESSION;
}
"#;

/// A vertex/fragment template pair with one expression placeholder.
#[derive(Debug, Clone)]
pub struct ShaderTemplate {
    vertex: Cow<'static, str>,
    fragment: Cow<'static, str>,
    placeholder: Cow<'static, str>,
}

/// Shader sources ready for the rendering backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
    /// The expression substituted into the fragment source.
    pub expression: String,
}

impl ShaderTemplate {
    /// Create a template.
    ///
    /// The fragment source must contain `placeholder` exactly once.
    pub fn new(
        vertex: impl Into<Cow<'static, str>>,
        fragment: impl Into<Cow<'static, str>>,
        placeholder: impl Into<Cow<'static, str>>,
    ) -> Result<Self> {
        let template = Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            placeholder: placeholder.into(),
        };

        if template.placeholder.is_empty() {
            return Err(RandomartError::config("Shader placeholder must not be empty"));
        }

        let occurrences = template.fragment.matches(template.placeholder()).count();
        if occurrences != 1 {
            return Err(RandomartError::Config {
                message: format!(
                    "Fragment template must contain {} exactly once, found {}",
                    template.placeholder, occurrences
                ),
                help: Some("Use a placeholder that appears nowhere else in the source".to_string()),
            });
        }

        Ok(template)
    }

    /// The GLSL ES 1.00 template matching the builtin grammars.
    pub fn glsl() -> Self {
        Self {
            vertex: Cow::Borrowed(GLSL_VERTEX),
            fragment: Cow::Borrowed(GLSL_FRAGMENT),
            placeholder: Cow::Borrowed(EXPRESSION_PLACEHOLDER),
        }
    }

    /// Vertex shader source.
    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    /// Fragment template, placeholder included.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Placeholder replaced by the expression.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Substitute an expression into the fragment template.
    pub fn emit(&self, expression: &str) -> ShaderSource {
        let fragment = self.fragment.replacen(self.placeholder(), expression, 1);
        tracing::debug!(
            expression_len = expression.len(),
            fragment_len = fragment.len(),
            "emitted fragment shader"
        );
        ShaderSource {
            vertex: self.vertex.to_string(),
            fragment,
            expression: expression.to_string(),
        }
    }

    /// Check if the fragment template defines a function called `name`.
    ///
    /// Looks for definitions of the form `<type> name(...) {` on one line.
    pub fn defines_function(&self, name: &str) -> bool {
        self.fragment.lines().map(str::trim).any(|line| {
            if !line.ends_with('{') {
                return false;
            }
            let Some((head, _)) = line.split_once('(') else {
                return false;
            };
            let mut words = head.split_whitespace();
            matches!(
                (words.next(), words.next(), words.next()),
                (Some(ty), Some(function), None) if ty != "return" && function == name
            )
        })
    }
}

impl Default for ShaderTemplate {
    fn default() -> Self {
        Self::glsl()
    }
}
