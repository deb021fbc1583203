//! Seed to image.
//!
//! Ties the pieces together: resolve the grammar, synthesize the expression,
//! emit the shader and hand it to the caller's backend. Nothing here retries
//! or substitutes another expression when a step fails.

use std::sync::Arc;

use crate::config::RandomartOptions;
use crate::error::{RandomartError, Result};
use crate::grammar::{Grammar, GrammarRegistry};
use crate::render::{ContextPool, RenderBackend, RenderRequest};
use crate::shader::{ShaderSource, ShaderTemplate};
use crate::synth::synthesize_from_seed;

/// A grammar registry paired with the template expressions are emitted into.
///
/// Cloning is cheap; the registry is shared.
#[derive(Debug, Clone)]
pub struct Randomart {
    registry: Arc<GrammarRegistry>,
    template: ShaderTemplate,
}

impl Randomart {
    /// Engine over the builtin grammars and the GLSL template.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(GrammarRegistry::with_builtins()?))
    }

    /// Engine over a custom registry and the GLSL template.
    pub fn with_registry(registry: impl Into<Arc<GrammarRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            template: ShaderTemplate::glsl(),
        }
    }

    /// Replace the shader template.
    pub fn with_template(mut self, template: ShaderTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }

    pub fn template(&self) -> &ShaderTemplate {
        &self.template
    }

    /// Synthesize the expression for these options.
    pub fn expression(&self, options: &RandomartOptions) -> Result<String> {
        let grammar = self.registry.get(&options.grammar)?;
        expression_for(&grammar, options)
    }

    /// Synthesize and emit the shader for these options.
    pub fn shader(&self, options: &RandomartOptions) -> Result<ShaderSource> {
        Ok(self.template.emit(&self.expression(options)?))
    }

    /// Render these options on a `width x height` canvas.
    pub fn generate<B>(
        &self,
        backend: &mut B,
        width: u32,
        height: u32,
        options: &RandomartOptions,
    ) -> Result<B::Image>
    where
        B: RenderBackend + ?Sized,
    {
        generate_with(&self.registry, &self.template, backend, width, height, options)
    }

    /// Render with a backend taken from `pool`, created on demand.
    ///
    /// Nothing is taken from or created for the pool until the shader has
    /// been synthesized. The backend goes back to the pool whether or not the
    /// draw succeeds.
    pub fn generate_pooled<B, F, E>(
        &self,
        pool: &mut ContextPool<B>,
        create: F,
        width: u32,
        height: u32,
        options: &RandomartOptions,
    ) -> Result<B::Image>
    where
        B: RenderBackend,
        F: FnOnce(u32, u32) -> std::result::Result<B, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let shader = prepare(&self.registry, &self.template, width, height, options)?;
        let mut backend = pool
            .acquire(width, height, create)
            .map_err(|e| RandomartError::Backend(Box::new(e)))?;
        let image = draw(&mut backend, &shader, width, height, options.scale);
        pool.release(width, height, backend);
        image
    }
}

/// Render a randomart image with the builtin grammars and the GLSL template.
///
/// Steps run in order and the first failure ends the call: canvas size check,
/// grammar lookup, synthesis, emission, then the backend draw. The backend is
/// only invoked once everything before it succeeded, and its error is
/// returned as [`RandomartError::Backend`].
pub fn randomart<B>(
    backend: &mut B,
    width: u32,
    height: u32,
    options: &RandomartOptions,
) -> Result<B::Image>
where
    B: RenderBackend + ?Sized,
{
    let registry = GrammarRegistry::builtin()?;
    generate_with(registry, &ShaderTemplate::glsl(), backend, width, height, options)
}

fn generate_with<B>(
    registry: &GrammarRegistry,
    template: &ShaderTemplate,
    backend: &mut B,
    width: u32,
    height: u32,
    options: &RandomartOptions,
) -> Result<B::Image>
where
    B: RenderBackend + ?Sized,
{
    let shader = prepare(registry, template, width, height, options)?;
    draw(backend, &shader, width, height, options.scale)
}

/// Every step before the backend: input checks, lookup, synthesis, emission.
fn prepare(
    registry: &GrammarRegistry,
    template: &ShaderTemplate,
    width: u32,
    height: u32,
    options: &RandomartOptions,
) -> Result<ShaderSource> {
    check_dimensions(width, height)?;
    options.check()?;

    let grammar = registry.get(&options.grammar)?;
    let expression = expression_for(&grammar, options)?;
    Ok(template.emit(&expression))
}

fn draw<B>(
    backend: &mut B,
    shader: &ShaderSource,
    width: u32,
    height: u32,
    scale: f32,
) -> Result<B::Image>
where
    B: RenderBackend + ?Sized,
{
    let request = RenderRequest {
        shader,
        width,
        height,
        scale,
    };
    backend
        .render(&request)
        .map_err(|e| RandomartError::Backend(Box::new(e)))
}

fn expression_for(grammar: &Grammar, options: &RandomartOptions) -> Result<String> {
    let expression = synthesize_from_seed(grammar, options.depth, &options.seed)?;
    if options.debug {
        tracing::info!(
            grammar = grammar.name(),
            seed = %options.seed,
            depth = options.depth,
            %expression,
            "randomart expression"
        );
    }
    Ok(expression)
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RandomartError::InvalidInput {
            message: format!("Canvas must be at least 1x1, got {}x{}", width, height),
        });
    }
    Ok(())
}
