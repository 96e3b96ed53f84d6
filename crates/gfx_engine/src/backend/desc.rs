//! Resource descriptions
//!
//! Plain-data descriptions the device validates before asking the backend
//! for a native resource. Validation returns a plain message string; the
//! device wraps it into its error type, keeping descriptor rules in one
//! place and error taxonomy in another.

use bitflags::bitflags;

use super::{ShaderHandle, TextureHandle};

bitflags! {
    /// Intended usages of a buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufferUsage: u32 {
        /// Bindable as a vertex buffer
        const VERTEX = 1 << 0;
        /// Bindable as an index buffer
        const INDEX = 1 << 1;
        /// Bindable as a uniform buffer
        const UNIFORM = 1 << 2;
        /// Bindable as a storage buffer
        const STORAGE = 1 << 3;
        /// Source of transfer commands
        const TRANSFER_SRC = 1 << 4;
        /// Destination of transfer commands
        const TRANSFER_DST = 1 << 5;
    }
}

bitflags! {
    /// Intended usages of a texture
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextureUsage: u32 {
        /// Sampled in shaders
        const SAMPLED = 1 << 0;
        /// Attached as a color render target
        const RENDER_TARGET = 1 << 1;
        /// Attached as a depth/stencil target
        const DEPTH_STENCIL = 1 << 2;
        /// Source of transfer commands
        const TRANSFER_SRC = 1 << 3;
        /// Destination of transfer commands
        const TRANSFER_DST = 1 << 4;
    }
}

/// Pixel format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit RGBA, unsigned normalized
    Rgba8,
    /// 8-bit BGRA, unsigned normalized (typical swapchain format)
    Bgra8,
    /// 16-bit float RGBA
    Rgba16Float,
    /// 32-bit float depth
    Depth32Float,
}

/// Texel filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest-texel sampling
    Nearest,
    /// Linear interpolation
    Linear,
}

/// Texture coordinate addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    /// Tile the texture
    Repeat,
    /// Tile with mirroring
    MirrorRepeat,
    /// Clamp to the edge texel
    ClampToEdge,
}

/// Pipeline stage a shader module targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
    /// Compute stage
    Compute,
}

/// Output blending mode of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// No blending
    Opaque,
    /// Standard alpha blending
    Alpha,
    /// Additive blending
    Additive,
}

/// Description of a buffer to create
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Intended usages
    pub usage: BufferUsage,
    /// Optional debug label
    pub label: Option<String>,
}

impl BufferDesc {
    /// Check the description for values no backend could accept
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("buffer size must be non-zero".to_string());
        }
        if self.usage.is_empty() {
            return Err("buffer usage must name at least one usage".to_string());
        }
        Ok(())
    }
}

/// Description of a texture to create
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Number of mip levels, at least 1
    pub mip_levels: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Intended usages
    pub usage: TextureUsage,
    /// Optional debug label
    pub label: Option<String>,
}

impl TextureDesc {
    /// Check the description for values no backend could accept
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "texture extent must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.mip_levels == 0 {
            return Err("texture must have at least one mip level".to_string());
        }
        if self.usage.is_empty() {
            return Err("texture usage must name at least one usage".to_string());
        }
        Ok(())
    }
}

/// Description of a sampler to create
#[derive(Debug, Clone)]
pub struct SamplerDesc {
    /// Filtering when the texture is minified
    pub min_filter: FilterMode,
    /// Filtering when the texture is magnified
    pub mag_filter: FilterMode,
    /// Coordinate addressing mode
    pub address_mode: AddressMode,
    /// Maximum anisotropy, 1.0 disables anisotropic filtering
    pub max_anisotropy: f32,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            address_mode: AddressMode::Repeat,
            max_anisotropy: 1.0,
        }
    }
}

impl SamplerDesc {
    /// Check the description for values no backend could accept
    pub fn validate(&self) -> Result<(), String> {
        if !(1.0..=16.0).contains(&self.max_anisotropy) {
            return Err(format!(
                "max_anisotropy must be within [1, 16], got {}",
                self.max_anisotropy
            ));
        }
        Ok(())
    }
}

/// Description of a framebuffer to create
///
/// Attachments are referenced by texture handle; the device checks that
/// every referenced texture is still live before forwarding to the backend.
#[derive(Debug, Clone)]
pub struct FramebufferDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color attachment textures
    pub color_attachments: Vec<TextureHandle>,
    /// Optional depth attachment texture
    pub depth_attachment: Option<TextureHandle>,
    /// Optional debug label
    pub label: Option<String>,
}

impl FramebufferDesc {
    /// Check the description for values no backend could accept
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "framebuffer extent must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.color_attachments.is_empty() && self.depth_attachment.is_none() {
            return Err("framebuffer must have at least one attachment".to_string());
        }
        Ok(())
    }
}

/// Description of a shader module to create
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Pipeline stage the module targets
    pub stage: ShaderStage,
    /// Entry point symbol, e.g. "main"
    pub entry_point: String,
    /// SPIR-V bytecode
    pub bytecode: Vec<u8>,
}

impl ShaderDesc {
    /// Check the description for values no backend could accept
    pub fn validate(&self) -> Result<(), String> {
        if self.entry_point.is_empty() {
            return Err("shader entry point must be non-empty".to_string());
        }
        if self.bytecode.is_empty() {
            return Err("shader bytecode must be non-empty".to_string());
        }
        // SPIR-V is a stream of 32-bit words.
        if self.bytecode.len() % 4 != 0 {
            return Err(format!(
                "shader bytecode length must be a multiple of 4, got {}",
                self.bytecode.len()
            ));
        }
        Ok(())
    }
}

/// Description of a pipeline to create
///
/// Shader stages are referenced by handle; the device checks that both
/// modules are still live before forwarding to the backend.
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    /// Vertex stage shader module
    pub vertex_shader: ShaderHandle,
    /// Fragment stage shader module
    pub fragment_shader: ShaderHandle,
    /// Whether depth testing is enabled
    pub depth_test: bool,
    /// Output blending mode
    pub blend: BlendMode,
    /// Optional debug label
    pub label: Option<String>,
}

impl PipelineDesc {
    /// Check the description for values no backend could accept
    pub fn validate(&self) -> Result<(), String> {
        if self.vertex_shader.is_invalid() || self.fragment_shader.is_invalid() {
            return Err("pipeline requires both vertex and fragment shader handles".to_string());
        }
        Ok(())
    }
}
