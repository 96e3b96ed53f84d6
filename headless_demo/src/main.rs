//! Headless demo application
//!
//! Walks the full resource lifecycle against the headless backend: create,
//! use, release, stale-handle rejection, and the default-framebuffer
//! fallback. Run with `RUST_LOG=debug` to watch the device narrate every
//! step.

use gfx_engine::prelude::*;

const CONFIG_PATH: &str = "headless_demo/device.toml";

fn load_config() -> DeviceConfig {
    match DeviceConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => {
            log::info!("loaded device config from {CONFIG_PATH}");
            config
        }
        Err(err) => {
            log::info!("using default device config ({err})");
            DeviceConfig::default()
        }
    }
}

fn run() -> Result<(), DeviceError> {
    let config = load_config();
    let mut device = GraphicsDevice::new(HeadlessBackend::new(), &config)?;

    // A minimal "mesh": vertex + index buffer, texture + sampler.
    log::info!("creating mesh resources...");
    let vertices = device.create_buffer(&BufferDesc {
        size: 36 * 32,
        usage: BufferUsage::VERTEX | BufferUsage::TRANSFER_DST,
        label: Some("cube vertices".to_string()),
    })?;
    let indices = device.create_buffer(&BufferDesc {
        size: 36 * 4,
        usage: BufferUsage::INDEX | BufferUsage::TRANSFER_DST,
        label: Some("cube indices".to_string()),
    })?;
    let albedo = device.create_texture(&TextureDesc {
        width: 512,
        height: 512,
        mip_levels: 10,
        format: TextureFormat::Rgba8,
        usage: TextureUsage::SAMPLED | TextureUsage::TRANSFER_DST,
        label: Some("cube albedo".to_string()),
    })?;
    let sampler = device.create_sampler(&SamplerDesc::default())?;

    // Forward pipeline from two placeholder shader modules.
    log::info!("creating pipeline...");
    let vertex_shader = device.create_shader(&ShaderDesc {
        stage: ShaderStage::Vertex,
        entry_point: "main".to_string(),
        bytecode: vec![0u8; 64],
    })?;
    let fragment_shader = device.create_shader(&ShaderDesc {
        stage: ShaderStage::Fragment,
        entry_point: "main".to_string(),
        bytecode: vec![0u8; 64],
    })?;
    let pipeline = device.create_pipeline(&PipelineDesc {
        vertex_shader,
        fragment_shader,
        depth_test: true,
        blend: BlendMode::Opaque,
        label: Some("forward opaque".to_string()),
    })?;

    // Offscreen render target.
    let offscreen_color = device.create_texture(&TextureDesc {
        width: 800,
        height: 600,
        mip_levels: 1,
        format: TextureFormat::Bgra8,
        usage: TextureUsage::RENDER_TARGET | TextureUsage::SAMPLED,
        label: Some("offscreen color".to_string()),
    })?;
    let offscreen = device.create_framebuffer(&FramebufferDesc {
        width: 800,
        height: 600,
        color_attachments: vec![offscreen_color],
        depth_attachment: None,
        label: Some("offscreen pass".to_string()),
    })?;

    log::info!("device stats after setup: {:?}", device.stats());

    // "Render" a few frames: resolve every handle before use.
    for frame in 0..3u32 {
        let target_id = device.framebuffer_or_default(offscreen).id();
        let pipeline_ok = device.pipeline_is_valid(pipeline);
        let mesh_ok = device.buffer_is_valid(vertices)
            && device.buffer_is_valid(indices)
            && device.texture_is_valid(albedo)
            && device.sampler_is_valid(sampler);
        log::info!(
            "frame {frame}: target {target_id}, pipeline valid: {pipeline_ok}, mesh valid: {mesh_ok}"
        );
    }

    // Tear down the offscreen pass mid-run; the retained handle now falls
    // back to the default framebuffer instead of failing the frame.
    log::info!("destroying offscreen pass...");
    assert!(device.destroy_framebuffer(offscreen));
    assert!(device.destroy_texture(offscreen_color));
    let fallback_id = device.framebuffer_or_default(offscreen).id();
    log::info!(
        "frame 3: stale offscreen handle resolved to default framebuffer {fallback_id}"
    );

    // Double-destroy is a quiet no-op, reported through the return value.
    assert!(!device.destroy_framebuffer(offscreen));

    log::info!("device stats before teardown: {:?}", device.stats());
    device.destroy_all();
    log::info!(
        "native objects still alive on backend: {}",
        device.backend().live_total()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("starting headless demo...");
    if let Err(err) = run() {
        log::error!("demo failed: {err}");
        std::process::exit(1);
    }
    log::info!("headless demo finished");
}
