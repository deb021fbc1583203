//! CPU reference backend.
//!
//! Evaluates the substituted expression per pixel with the same helper
//! functions as the GLSL template, following `gl_FragCoord` conventions
//! (pixel centres, origin at the bottom-left). Handy for tests, previews and
//! machines without a GPU.

use image::{Rgba, RgbaImage};
use palette::Srgb;
use thiserror::Error;

use super::expr::Expr;
use super::{RenderBackend, RenderRequest};

/// Errors raised by the software backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SoftwareError {
    #[error("Could not parse expression: {message}")]
    Parse { message: String },

    #[error("Unknown function {0}()")]
    UnknownFunction(String),

    #[error("{function}() takes {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
}

/// Helper functions available to expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    X,
    Y,
    AbsX,
    AbsY,
    Distance,
    Sin,
    Cos,
    Tan,
    Reflect,
    Add,
    Mul,
    SqrtAbs,
    Identity,
    Colour,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "get_x" => Self::X,
            "get_y" => Self::Y,
            "get_abs_x" => Self::AbsX,
            "get_abs_y" => Self::AbsY,
            "get_distance" => Self::Distance,
            "csin" => Self::Sin,
            "ccos" => Self::Cos,
            "ctan" => Self::Tan,
            "refl" => Self::Reflect,
            "add" => Self::Add,
            "mul" => Self::Mul,
            "sqrt_abs" => Self::SqrtAbs,
            "A" => Self::Identity,
            "E" => Self::Colour,
            _ => return None,
        })
    }

    fn arity(self) -> usize {
        match self {
            Self::X | Self::Y | Self::AbsX | Self::AbsY | Self::Distance => 0,
            Self::Sin | Self::Cos | Self::Tan | Self::Reflect | Self::SqrtAbs | Self::Identity => 1,
            Self::Add | Self::Mul => 2,
            Self::Colour => 3,
        }
    }
}

/// A type-checked scalar expression.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Constant(f32),
    Call { function: Function, args: Vec<Node> },
}

/// Coordinates of one fragment in scaled space.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    x: f32,
    y: f32,
}

/// A compiled colour expression: one scalar program per RGB channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    channels: [Node; 3],
}

impl Program {
    /// Parse and type-check an expression.
    ///
    /// The root must be a colour constructor `E(c1, c2, c3)` whose arguments
    /// are scalar expressions.
    pub fn compile(expression: &str) -> Result<Self, SoftwareError> {
        let Expr::Call { name, args } = Expr::parse(expression)? else {
            return Err(SoftwareError::TypeMismatch(
                "expression must produce a colour, found a number".to_string(),
            ));
        };

        let function = lookup(&name, args.len())?;
        if function != Function::Colour {
            return Err(SoftwareError::TypeMismatch(format!(
                "expression must produce a colour, found {}()",
                name
            )));
        }

        let mut nodes = args.iter().map(compile_scalar);
        match (nodes.next(), nodes.next(), nodes.next()) {
            (Some(r), Some(g), Some(b)) => Ok(Self {
                channels: [r?, g?, b?],
            }),
            _ => Err(SoftwareError::Arity {
                function: name,
                expected: 3,
                found: args.len(),
            }),
        }
    }

    /// Evaluate the RGB channels at a fragment.
    fn eval(&self, fragment: Fragment) -> [f32; 3] {
        [
            eval_scalar(&self.channels[0], fragment),
            eval_scalar(&self.channels[1], fragment),
            eval_scalar(&self.channels[2], fragment),
        ]
    }
}

fn lookup(name: &str, found: usize) -> Result<Function, SoftwareError> {
    let function =
        Function::from_name(name).ok_or_else(|| SoftwareError::UnknownFunction(name.to_string()))?;
    if function.arity() != found {
        return Err(SoftwareError::Arity {
            function: name.to_string(),
            expected: function.arity(),
            found,
        });
    }
    Ok(function)
}

fn compile_scalar(expr: &Expr) -> Result<Node, SoftwareError> {
    match expr {
        Expr::Number(value) => Ok(Node::Constant(*value)),
        Expr::Call { name, args } => {
            let function = lookup(name, args.len())?;
            if function == Function::Colour {
                return Err(SoftwareError::TypeMismatch(format!(
                    "{}() produces a colour where a scalar is expected",
                    name
                )));
            }
            let args = args.iter().map(compile_scalar).collect::<Result<_, _>>()?;
            Ok(Node::Call { function, args })
        }
    }
}

fn eval_scalar(node: &Node, fragment: Fragment) -> f32 {
    let (function, args) = match node {
        Node::Constant(value) => return *value,
        Node::Call { function, args } => (*function, args),
    };
    let arg = |i: usize| args.get(i).map_or(0.0, |n| eval_scalar(n, fragment));

    match function {
        Function::X => fragment.x,
        Function::Y => fragment.y,
        Function::AbsX => fragment.x.abs(),
        Function::AbsY => fragment.y.abs(),
        Function::Distance => fragment.x.hypot(fragment.y),
        Function::Sin => (arg(0) * std::f32::consts::PI).sin(),
        Function::Cos => (arg(0) * std::f32::consts::PI).cos(),
        Function::Tan => (arg(0) * std::f32::consts::PI).tan(),
        Function::Reflect | Function::Identity => arg(0),
        Function::Add => (arg(0) + arg(1)).min(1.0),
        Function::Mul => arg(0) * arg(1),
        Function::SqrtAbs => arg(0).abs().sqrt(),
        // Rejected by compile_scalar
        Function::Colour => 0.0,
    }
}

/// Map a channel onto `[0, 1]` the way a fixed-point framebuffer would.
fn clamp_channel(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Renders expressions on the CPU into an RGBA image.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareBackend;

impl SoftwareBackend {
    /// Create a software backend.
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for SoftwareBackend {
    type Image = RgbaImage;
    type Error = SoftwareError;

    fn render(&mut self, request: &RenderRequest<'_>) -> Result<RgbaImage, SoftwareError> {
        let (width, height) = (request.width, request.height);
        if width == 0 || height == 0 {
            return Err(SoftwareError::EmptyCanvas { width, height });
        }

        let program = Program::compile(&request.shader.expression)?;
        let scale = request.scale;
        let to_space = |coord: f32, extent: u32| (coord / extent as f32) * 2.0 * scale - scale;

        let image = RgbaImage::from_fn(width, height, |col, row| {
            // gl_FragCoord: pixel centres, y grows upwards
            let fragment = Fragment {
                x: to_space(col as f32 + 0.5, width),
                y: to_space((height - 1 - row) as f32 + 0.5, height),
            };
            let [r, g, b] = program.eval(fragment).map(clamp_channel);
            let rgb: Srgb<u8> = Srgb::new(r, g, b).into_format();
            Rgba([rgb.red, rgb.green, rgb.blue, 255])
        });

        Ok(image)
    }
}
