//! Headless backend
//!
//! A backend that fabricates native object ids without touching any
//! graphics API. It exists for tests, tooling, and server-side runs of the
//! engine: resource lifetimes behave exactly as with a real backend, and
//! every native object decrements a shared live counter when dropped, so
//! callers can observe exactly when disposal happens.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::desc::{BufferDesc, FramebufferDesc, PipelineDesc, SamplerDesc, ShaderDesc, TextureDesc};
use super::{BackendError, BackendResult, GraphicsBackend};

/// A fabricated native object: an id plus a live-count registration that is
/// withdrawn on drop.
#[derive(Debug)]
pub struct NativeObject {
    id: u64,
    live: Arc<AtomicUsize>,
}

impl NativeObject {
    fn new(id: u64, live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            live: Arc::clone(live),
        }
    }

    /// Backend-assigned object id; never zero.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for NativeObject {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Per-kind live-object counters shared with every object the backend
/// hands out.
#[derive(Debug, Default)]
struct LiveCounts {
    buffers: Arc<AtomicUsize>,
    textures: Arc<AtomicUsize>,
    samplers: Arc<AtomicUsize>,
    framebuffers: Arc<AtomicUsize>,
    shaders: Arc<AtomicUsize>,
    pipelines: Arc<AtomicUsize>,
}

/// Backend that fabricates native resources for GPU-less environments.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    live: LiveCounts,
    fail_next: bool,
}

impl HeadlessBackend {
    /// Create a headless backend. Object ids start at 1; id 0 is never
    /// issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next creation call fail, for exercising error paths.
    pub fn fail_next_creation(&mut self) {
        self.fail_next = true;
    }

    /// Number of native buffers currently alive (created, not yet dropped).
    #[must_use]
    pub fn live_buffers(&self) -> usize {
        self.live.buffers.load(Ordering::Relaxed)
    }

    /// Number of native textures currently alive.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.live.textures.load(Ordering::Relaxed)
    }

    /// Number of native samplers currently alive.
    #[must_use]
    pub fn live_samplers(&self) -> usize {
        self.live.samplers.load(Ordering::Relaxed)
    }

    /// Number of native framebuffers currently alive.
    #[must_use]
    pub fn live_framebuffers(&self) -> usize {
        self.live.framebuffers.load(Ordering::Relaxed)
    }

    /// Number of native shader modules currently alive.
    #[must_use]
    pub fn live_shaders(&self) -> usize {
        self.live.shaders.load(Ordering::Relaxed)
    }

    /// Number of native pipelines currently alive.
    #[must_use]
    pub fn live_pipelines(&self) -> usize {
        self.live.pipelines.load(Ordering::Relaxed)
    }

    /// Total native objects currently alive across all kinds.
    #[must_use]
    pub fn live_total(&self) -> usize {
        self.live_buffers()
            + self.live_textures()
            + self.live_samplers()
            + self.live_framebuffers()
            + self.live_shaders()
            + self.live_pipelines()
    }

    fn next_object(&mut self, kind: &'static str, live: &Arc<AtomicUsize>) -> BackendResult<NativeObject> {
        if self.fail_next {
            self.fail_next = false;
            return Err(BackendError::CreationFailed {
                kind,
                reason: "injected failure".to_string(),
            });
        }
        self.next_id += 1;
        Ok(NativeObject::new(self.next_id, live))
    }
}

impl GraphicsBackend for HeadlessBackend {
    type Buffer = NativeObject;
    type Texture = NativeObject;
    type Sampler = NativeObject;
    type Framebuffer = NativeObject;
    type Shader = NativeObject;
    type Pipeline = NativeObject;

    fn name(&self) -> &str {
        "headless"
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> BackendResult<Self::Buffer> {
        let live = Arc::clone(&self.live.buffers);
        let object = self.next_object("buffer", &live)?;
        log::trace!("headless: buffer {} ({} bytes)", object.id(), desc.size);
        Ok(object)
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> BackendResult<Self::Texture> {
        let live = Arc::clone(&self.live.textures);
        let object = self.next_object("texture", &live)?;
        log::trace!(
            "headless: texture {} ({}x{}, {:?})",
            object.id(),
            desc.width,
            desc.height,
            desc.format
        );
        Ok(object)
    }

    fn create_sampler(&mut self, _desc: &SamplerDesc) -> BackendResult<Self::Sampler> {
        let live = Arc::clone(&self.live.samplers);
        let object = self.next_object("sampler", &live)?;
        log::trace!("headless: sampler {}", object.id());
        Ok(object)
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> BackendResult<Self::Framebuffer> {
        let live = Arc::clone(&self.live.framebuffers);
        let object = self.next_object("framebuffer", &live)?;
        log::trace!(
            "headless: framebuffer {} ({}x{}, {} color attachments)",
            object.id(),
            desc.width,
            desc.height,
            desc.color_attachments.len()
        );
        Ok(object)
    }

    fn create_shader(&mut self, desc: &ShaderDesc) -> BackendResult<Self::Shader> {
        let live = Arc::clone(&self.live.shaders);
        let object = self.next_object("shader", &live)?;
        log::trace!(
            "headless: shader {} ({:?}, {} bytes)",
            object.id(),
            desc.stage,
            desc.bytecode.len()
        );
        Ok(object)
    }

    fn create_pipeline(&mut self, _desc: &PipelineDesc) -> BackendResult<Self::Pipeline> {
        let live = Arc::clone(&self.live.pipelines);
        let object = self.next_object("pipeline", &live)?;
        log::trace!("headless: pipeline {}", object.id());
        Ok(object)
    }

    fn create_default_framebuffer(&mut self) -> BackendResult<Self::Framebuffer> {
        let live = Arc::clone(&self.live.framebuffers);
        let object = self.next_object("framebuffer", &live)?;
        log::trace!("headless: default framebuffer {}", object.id());
        Ok(object)
    }
}
