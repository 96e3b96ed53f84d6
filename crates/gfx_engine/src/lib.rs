//! # Gfx Engine
//!
//! A generational resource-handle pooling backbone for graphics backends.
//!
//! ## Features
//!
//! - **Generational Pools**: slot-recycling storage with use-after-free
//!   detection via per-slot generation counters
//! - **Typed Handles**: one nominal handle type per resource kind, so
//!   buffers, textures, samplers, framebuffers, shaders, and pipelines
//!   cannot be confused
//! - **Backend Abstraction**: backends implement one creation method per
//!   resource kind; disposal rides on `Drop`
//! - **Graceful Degradation**: stale render-target handles fall back to a
//!   default framebuffer instead of aborting
//! - **Headless Backend**: full resource-lifetime behavior without a GPU,
//!   for tests and server-side use
//!
//! ## Quick Start
//!
//! ```rust
//! use gfx_engine::prelude::*;
//!
//! fn main() -> Result<(), DeviceError> {
//!     let mut device = GraphicsDevice::new(HeadlessBackend::new(), &DeviceConfig::default())?;
//!
//!     let buffer = device.create_buffer(&BufferDesc {
//!         size: 1024,
//!         usage: BufferUsage::VERTEX,
//!         label: Some("triangle vertices".to_string()),
//!     })?;
//!
//!     assert!(device.buffer_is_valid(buffer));
//!     assert!(device.destroy_buffer(buffer));
//!
//!     // The handle is now stale: lookups fail quietly.
//!     assert!(device.buffer(buffer).is_none());
//!     Ok(())
//! }
//! ```

// Core engine modules
pub mod core;

pub mod backend;
pub mod device;
pub mod foundation;

/// Common imports for engine users
pub mod prelude {
    pub use crate::backend::desc::{
        AddressMode, BlendMode, BufferDesc, BufferUsage, FilterMode, FramebufferDesc,
        PipelineDesc, SamplerDesc, ShaderDesc, ShaderStage, TextureDesc, TextureFormat,
        TextureUsage,
    };
    pub use crate::backend::headless::HeadlessBackend;
    pub use crate::backend::{
        BackendError, BufferHandle, FramebufferHandle, GraphicsBackend, PipelineHandle,
        SamplerHandle, ShaderHandle, TextureHandle,
    };
    pub use crate::core::config::{ConfigError, DeviceConfig};
    pub use crate::device::{DeviceError, DeviceStats, GraphicsDevice};
    pub use crate::foundation::pool::{PoolHandle, ResourcePool};
}
