//! Graphics device facade
//!
//! The resource-owner layer over the generational pools. The device owns
//! the backend plus one [`ResourcePool`] per resource kind as plain fields
//! with an ordinary construction/teardown lifecycle; there is no global or
//! static resource state anywhere in the engine.
//!
//! ## Error asymmetry
//!
//! Creation is loud: a malformed description or a backend failure surfaces
//! immediately as a [`DeviceError`]. Lookup and destruction are quiet: a
//! stale handle yields `None`/`false`, never an error, because stale-handle
//! use is the designed-for outcome of the generational scheme, not an
//! exceptional condition. Callers are expected to check and fall back.
//!
//! ## Ownership
//!
//! A native resource handed to a pool belongs to the device until the
//! matching `destroy_*` call; it is disposed by dropping it there, in
//! [`GraphicsDevice::destroy_all`], or when the device itself is dropped.


use thiserror::Error;

use crate::backend::desc::{
    BufferDesc, FramebufferDesc, PipelineDesc, SamplerDesc, ShaderDesc, TextureDesc,
};
use crate::backend::{
    BackendError, BufferHandle, FramebufferHandle, GraphicsBackend, PipelineHandle, SamplerHandle,
    ShaderHandle, TextureHandle,
};
use crate::core::config::DeviceConfig;
use crate::foundation::pool::ResourcePool;

/// Errors raised by resource creation on the device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The resource description failed validation
    #[error("invalid resource description: {0}")]
    InvalidDescriptor(String),

    /// A framebuffer description referenced a dead texture handle
    #[error("framebuffer references a stale or destroyed texture attachment")]
    StaleAttachment,

    /// A pipeline description referenced a dead shader handle
    #[error("pipeline references a stale or destroyed shader module")]
    StaleShader,

    /// The backend failed to create the native resource
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Live resource counts per kind, as reported by [`GraphicsDevice::stats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStats {
    /// Live buffers
    pub buffers: usize,
    /// Live textures
    pub textures: usize,
    /// Live samplers
    pub samplers: usize,
    /// Live framebuffers (excluding the default framebuffer)
    pub framebuffers: usize,
    /// Live shader modules
    pub shaders: usize,
    /// Live pipelines
    pub pipelines: usize,
}

impl DeviceStats {
    /// Total live resources across all kinds
    #[must_use]
    pub const fn total(&self) -> usize {
        self.buffers
            + self.textures
            + self.samplers
            + self.framebuffers
            + self.shaders
            + self.pipelines
    }
}

/// Resource-owning facade over a graphics backend.
///
/// Each resource kind gets its own pool instance parameterized over the
/// backend's native type for that kind; the pool logic is shared, the
/// handle types are not.
pub struct GraphicsDevice<B: GraphicsBackend> {
    backend: B,
    buffers: ResourcePool<B::Buffer>,
    textures: ResourcePool<B::Texture>,
    samplers: ResourcePool<B::Sampler>,
    framebuffers: ResourcePool<B::Framebuffer>,
    shaders: ResourcePool<B::Shader>,
    pipelines: ResourcePool<B::Pipeline>,
    default_framebuffer: B::Framebuffer,
}

impl<B: GraphicsBackend> GraphicsDevice<B> {
    /// Create a device over `backend`, sizing each pool from `config`.
    ///
    /// Also creates the backbuffer-equivalent default framebuffer used as
    /// the graceful-degradation target by
    /// [`GraphicsDevice::framebuffer_or_default`].
    pub fn new(mut backend: B, config: &DeviceConfig) -> Result<Self, DeviceError> {
        let default_framebuffer = backend.create_default_framebuffer()?;
        log::info!("graphics device created over {} backend", backend.name());
        Ok(Self {
            backend,
            buffers: ResourcePool::with_capacity(config.initial_buffer_capacity),
            textures: ResourcePool::with_capacity(config.initial_texture_capacity),
            samplers: ResourcePool::with_capacity(config.initial_sampler_capacity),
            framebuffers: ResourcePool::with_capacity(config.initial_framebuffer_capacity),
            shaders: ResourcePool::with_capacity(config.initial_shader_capacity),
            pipelines: ResourcePool::with_capacity(config.initial_pipeline_capacity),
            default_framebuffer,
        })
    }

    /// Borrow the underlying backend, e.g. for diagnostics.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrow the underlying backend.
    ///
    /// This breaks the abstraction boundary, but backend-specific control
    /// (swapchain recreation, failure injection in tests) needs it.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // === Buffers ===

    /// Create a buffer and return a handle owning nothing but the right to
    /// look it up.
    pub fn create_buffer(&mut self, desc: &BufferDesc) -> Result<BufferHandle, DeviceError> {
        desc.validate().map_err(DeviceError::InvalidDescriptor)?;
        let native = self.backend.create_buffer(desc)?;
        let handle = BufferHandle(self.buffers.allocate(native));
        log::debug!("created buffer {:?} ({} bytes)", handle.raw(), desc.size);
        Ok(handle)
    }

    /// Look up a buffer; `None` if the handle is stale or invalid.
    pub fn buffer(&self, handle: BufferHandle) -> Option<&B::Buffer> {
        self.buffers.try_get(handle.0)
    }

    /// Whether `handle` still refers to a live buffer.
    pub fn buffer_is_valid(&self, handle: BufferHandle) -> bool {
        self.buffers.is_valid(handle.0)
    }

    /// Destroy a buffer. Returns `false` without side effects if the handle
    /// is stale or invalid.
    pub fn destroy_buffer(&mut self, handle: BufferHandle) -> bool {
        let released = self.buffers.release(handle.0);
        if released {
            log::debug!("destroyed buffer {:?}", handle.raw());
        } else {
            log::warn!("destroy_buffer ignored stale handle {:?}", handle.raw());
        }
        released
    }

    // === Textures ===

    /// Create a texture.
    pub fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle, DeviceError> {
        desc.validate().map_err(DeviceError::InvalidDescriptor)?;
        let native = self.backend.create_texture(desc)?;
        let handle = TextureHandle(self.textures.allocate(native));
        log::debug!(
            "created texture {:?} ({}x{})",
            handle.raw(),
            desc.width,
            desc.height
        );
        Ok(handle)
    }

    /// Look up a texture; `None` if the handle is stale or invalid.
    pub fn texture(&self, handle: TextureHandle) -> Option<&B::Texture> {
        self.textures.try_get(handle.0)
    }

    /// Whether `handle` still refers to a live texture.
    pub fn texture_is_valid(&self, handle: TextureHandle) -> bool {
        self.textures.is_valid(handle.0)
    }

    /// Destroy a texture. Returns `false` without side effects if the
    /// handle is stale or invalid.
    pub fn destroy_texture(&mut self, handle: TextureHandle) -> bool {
        let released = self.textures.release(handle.0);
        if released {
            log::debug!("destroyed texture {:?}", handle.raw());
        } else {
            log::warn!("destroy_texture ignored stale handle {:?}", handle.raw());
        }
        released
    }

    // === Samplers ===

    /// Create a sampler.
    pub fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerHandle, DeviceError> {
        desc.validate().map_err(DeviceError::InvalidDescriptor)?;
        let native = self.backend.create_sampler(desc)?;
        let handle = SamplerHandle(self.samplers.allocate(native));
        log::debug!("created sampler {:?}", handle.raw());
        Ok(handle)
    }

    /// Look up a sampler; `None` if the handle is stale or invalid.
    pub fn sampler(&self, handle: SamplerHandle) -> Option<&B::Sampler> {
        self.samplers.try_get(handle.0)
    }

    /// Whether `handle` still refers to a live sampler.
    pub fn sampler_is_valid(&self, handle: SamplerHandle) -> bool {
        self.samplers.is_valid(handle.0)
    }

    /// Destroy a sampler. Returns `false` without side effects if the
    /// handle is stale or invalid.
    pub fn destroy_sampler(&mut self, handle: SamplerHandle) -> bool {
        let released = self.samplers.release(handle.0);
        if released {
            log::debug!("destroyed sampler {:?}", handle.raw());
        } else {
            log::warn!("destroy_sampler ignored stale handle {:?}", handle.raw());
        }
        released
    }

    // === Framebuffers ===

    /// Create a framebuffer.
    ///
    /// Every attachment handle in the description must be live at creation
    /// time; a dead attachment is rejected with
    /// [`DeviceError::StaleAttachment`] before the backend is consulted.
    pub fn create_framebuffer(
        &mut self,
        desc: &FramebufferDesc,
    ) -> Result<FramebufferHandle, DeviceError> {
        desc.validate().map_err(DeviceError::InvalidDescriptor)?;
        for attachment in &desc.color_attachments {
            if !self.textures.is_valid(attachment.0) {
                return Err(DeviceError::StaleAttachment);
            }
        }
        if let Some(depth) = desc.depth_attachment {
            if !self.textures.is_valid(depth.0) {
                return Err(DeviceError::StaleAttachment);
            }
        }
        let native = self.backend.create_framebuffer(desc)?;
        let handle = FramebufferHandle(self.framebuffers.allocate(native));
        log::debug!(
            "created framebuffer {:?} ({}x{})",
            handle.raw(),
            desc.width,
            desc.height
        );
        Ok(handle)
    }

    /// Look up a framebuffer; `None` if the handle is stale or invalid.
    pub fn framebuffer(&self, handle: FramebufferHandle) -> Option<&B::Framebuffer> {
        self.framebuffers.try_get(handle.0)
    }

    /// Resolve a framebuffer, falling back to the default framebuffer when
    /// the handle is stale or invalid.
    ///
    /// This is the graceful-degradation path for render-target binding:
    /// rendering continues against the backbuffer-equivalent target instead
    /// of aborting. Prefer [`GraphicsDevice::framebuffer`] plus an explicit
    /// check when degraded output would hide a bug.
    pub fn framebuffer_or_default(&self, handle: FramebufferHandle) -> &B::Framebuffer {
        match self.framebuffers.try_get(handle.0) {
            Some(framebuffer) => framebuffer,
            None => {
                log::warn!(
                    "stale framebuffer handle {:?}; falling back to default framebuffer",
                    handle.raw()
                );
                &self.default_framebuffer
            }
        }
    }

    /// The backbuffer-equivalent default framebuffer.
    pub fn default_framebuffer(&self) -> &B::Framebuffer {
        &self.default_framebuffer
    }

    /// Whether `handle` still refers to a live framebuffer.
    pub fn framebuffer_is_valid(&self, handle: FramebufferHandle) -> bool {
        self.framebuffers.is_valid(handle.0)
    }

    /// Destroy a framebuffer. Returns `false` without side effects if the
    /// handle is stale or invalid.
    pub fn destroy_framebuffer(&mut self, handle: FramebufferHandle) -> bool {
        let released = self.framebuffers.release(handle.0);
        if released {
            log::debug!("destroyed framebuffer {:?}", handle.raw());
        } else {
            log::warn!("destroy_framebuffer ignored stale handle {:?}", handle.raw());
        }
        released
    }

    // === Shaders ===

    /// Create a shader module.
    pub fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderHandle, DeviceError> {
        desc.validate().map_err(DeviceError::InvalidDescriptor)?;
        let native = self.backend.create_shader(desc)?;
        let handle = ShaderHandle(self.shaders.allocate(native));
        log::debug!("created shader {:?} ({:?})", handle.raw(), desc.stage);
        Ok(handle)
    }

    /// Look up a shader module; `None` if the handle is stale or invalid.
    pub fn shader(&self, handle: ShaderHandle) -> Option<&B::Shader> {
        self.shaders.try_get(handle.0)
    }

    /// Whether `handle` still refers to a live shader module.
    pub fn shader_is_valid(&self, handle: ShaderHandle) -> bool {
        self.shaders.is_valid(handle.0)
    }

    /// Destroy a shader module. Returns `false` without side effects if the
    /// handle is stale or invalid.
    pub fn destroy_shader(&mut self, handle: ShaderHandle) -> bool {
        let released = self.shaders.release(handle.0);
        if released {
            log::debug!("destroyed shader {:?}", handle.raw());
        } else {
            log::warn!("destroy_shader ignored stale handle {:?}", handle.raw());
        }
        released
    }

    // === Pipelines ===

    /// Create a pipeline.
    ///
    /// Both shader modules named by the description must be live at
    /// creation time; a dead module is rejected with
    /// [`DeviceError::StaleShader`] before the backend is consulted.
    pub fn create_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineHandle, DeviceError> {
        desc.validate().map_err(DeviceError::InvalidDescriptor)?;
        if !self.shaders.is_valid(desc.vertex_shader.0)
            || !self.shaders.is_valid(desc.fragment_shader.0)
        {
            return Err(DeviceError::StaleShader);
        }
        let native = self.backend.create_pipeline(desc)?;
        let handle = PipelineHandle(self.pipelines.allocate(native));
        log::debug!("created pipeline {:?}", handle.raw());
        Ok(handle)
    }

    /// Look up a pipeline; `None` if the handle is stale or invalid.
    pub fn pipeline(&self, handle: PipelineHandle) -> Option<&B::Pipeline> {
        self.pipelines.try_get(handle.0)
    }

    /// Whether `handle` still refers to a live pipeline.
    pub fn pipeline_is_valid(&self, handle: PipelineHandle) -> bool {
        self.pipelines.is_valid(handle.0)
    }

    /// Destroy a pipeline. Returns `false` without side effects if the
    /// handle is stale or invalid.
    pub fn destroy_pipeline(&mut self, handle: PipelineHandle) -> bool {
        let released = self.pipelines.release(handle.0);
        if released {
            log::debug!("destroyed pipeline {:?}", handle.raw());
        } else {
            log::warn!("destroy_pipeline ignored stale handle {:?}", handle.raw());
        }
        released
    }

    // === Teardown ===

    /// Dispose every live resource of every kind.
    ///
    /// Pool generations survive, so handles retained across this call can
    /// never resolve against later occupants of the same slots.
    pub fn destroy_all(&mut self) {
        let stats = self.stats();
        self.buffers.clear();
        self.textures.clear();
        self.samplers.clear();
        self.framebuffers.clear();
        self.shaders.clear();
        self.pipelines.clear();
        log::info!("destroyed all device resources ({} live)", stats.total());
    }

    /// Live resource counts per kind.
    pub fn stats(&self) -> DeviceStats {
        DeviceStats {
            buffers: self.buffers.len(),
            textures: self.textures.len(),
            samplers: self.samplers.len(),
            framebuffers: self.framebuffers.len(),
            shaders: self.shaders.len(),
            pipelines: self.pipelines.len(),
        }
    }
}

impl<B: GraphicsBackend> Drop for GraphicsDevice<B> {
    fn drop(&mut self) {
        self.destroy_all();
        log::info!("graphics device shut down");
    }
}
