//! Backend abstraction for native resource creation
//!
//! This module defines the narrow trait a graphics backend must implement to
//! plug into the engine: one creation method per resource kind, nothing
//! else. Destruction is not part of the trait: native resource types clean
//! up in their `Drop` implementations, and the device's pools drive those
//! drops at release time.
//!
//! The typed handle newtypes for each resource kind also live here. They all
//! wrap the same `(index, generation)` pair, but as distinct nominal types
//! so a buffer handle can never be passed where a texture handle is
//! expected.

pub mod desc;
pub mod headless;

use thiserror::Error;

use crate::foundation::pool::PoolHandle;
use desc::{BufferDesc, FramebufferDesc, PipelineDesc, SamplerDesc, ShaderDesc, TextureDesc};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors a backend can raise while creating native resources
#[derive(Debug, Error)]
pub enum BackendError {
    /// The native API rejected the creation request
    #[error("failed to create {kind}: {reason}")]
    CreationFailed {
        /// Resource kind being created
        kind: &'static str,
        /// Backend-specific failure description
        reason: String,
    },

    /// The native allocator ran out of memory
    #[error("backend out of memory while creating {kind}")]
    OutOfMemory {
        /// Resource kind being created
        kind: &'static str,
    },
}

/// Native resource factory implemented by each graphics backend.
///
/// The engine talks to the backend exactly once per resource lifetime: at
/// creation. The returned native object is handed straight to a resource
/// pool, which owns it exclusively until release and disposes it by
/// dropping it.
pub trait GraphicsBackend {
    /// Native buffer object
    type Buffer;
    /// Native texture object
    type Texture;
    /// Native sampler object
    type Sampler;
    /// Native framebuffer object
    type Framebuffer;
    /// Native shader module object
    type Shader;
    /// Native pipeline state object
    type Pipeline;

    /// Human-readable backend name for logging
    fn name(&self) -> &str;

    /// Create a native buffer from a validated description
    fn create_buffer(&mut self, desc: &BufferDesc) -> BackendResult<Self::Buffer>;

    /// Create a native texture from a validated description
    fn create_texture(&mut self, desc: &TextureDesc) -> BackendResult<Self::Texture>;

    /// Create a native sampler from a validated description
    fn create_sampler(&mut self, desc: &SamplerDesc) -> BackendResult<Self::Sampler>;

    /// Create a native framebuffer from a validated description
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> BackendResult<Self::Framebuffer>;

    /// Create a native shader module from a validated description
    fn create_shader(&mut self, desc: &ShaderDesc) -> BackendResult<Self::Shader>;

    /// Create a native pipeline from a validated description
    fn create_pipeline(&mut self, desc: &PipelineDesc) -> BackendResult<Self::Pipeline>;

    /// Create the backbuffer-equivalent framebuffer used as the fallback
    /// render target when a caller presents a stale framebuffer handle
    fn create_default_framebuffer(&mut self) -> BackendResult<Self::Framebuffer>;
}

/// Handle to a buffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) PoolHandle);

/// Handle to a texture owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) PoolHandle);

/// Handle to a sampler owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerHandle(pub(crate) PoolHandle);

/// Handle to a framebuffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(pub(crate) PoolHandle);

/// Handle to a shader module owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub(crate) PoolHandle);

/// Handle to a pipeline owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(pub(crate) PoolHandle);

macro_rules! handle_common {
    ($name:ident) => {
        impl $name {
            /// Sentinel handle that never resolves, without a device lookup
            pub const INVALID: Self = Self(PoolHandle::INVALID);

            /// Whether this is the invalid sentinel
            #[must_use]
            pub const fn is_invalid(&self) -> bool {
                self.0.is_invalid()
            }

            /// Underlying pool handle, for diagnostics
            #[must_use]
            pub const fn raw(&self) -> PoolHandle {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

handle_common!(BufferHandle);
handle_common!(TextureHandle);
handle_common!(SamplerHandle);
handle_common!(FramebufferHandle);
handle_common!(ShaderHandle);
handle_common!(PipelineHandle);
