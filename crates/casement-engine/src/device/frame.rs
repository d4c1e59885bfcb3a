/// A surface texture acquired for the current frame.
///
/// Must be presented or dropped before the next acquire.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
