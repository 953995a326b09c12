//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.
//! The renderer only reads game state; it never mutates it.

pub mod sdf_pipeline;
pub mod viewport;

pub use sdf_pipeline::SdfRenderState;
pub use viewport::Viewport;

use std::fmt;

/// Why the GPU could not be brought up. The driver logs it and keeps the
/// simulation, HUD and audio running without a picture.
#[derive(Debug)]
pub enum RenderInitError {
    Surface(wgpu::CreateSurfaceError),
    Adapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
    /// The surface reported no usable texture format
    NoSurfaceFormat,
}

impl fmt::Display for RenderInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "failed to create surface: {e}"),
            Self::Adapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            Self::Device(e) => write!(f, "failed to create device: {e}"),
            Self::NoSurfaceFormat => write!(f, "surface has no supported formats"),
        }
    }
}

impl std::error::Error for RenderInitError {}

impl From<wgpu::CreateSurfaceError> for RenderInitError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<wgpu::RequestAdapterError> for RenderInitError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        Self::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderInitError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::Device(e)
    }
}

/// Bring up WebGPU (or the WebGL2 fallback) on a canvas
#[cfg(target_arch = "wasm32")]
pub async fn init_for_canvas(
    canvas: web_sys::HtmlCanvasElement,
    width: u32,
    height: u32,
) -> Result<SdfRenderState, RenderInitError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });

    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await?;

    log::info!("Using adapter: {:?}", adapter.get_info().name);

    SdfRenderState::new(surface, &adapter, width, height).await
}
