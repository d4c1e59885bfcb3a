use crate::shell::{GraphicsHints, Profile, ShellError};

/// Shader model an adapter needs to stand in for the requested GL version.
pub(crate) fn required_shader_model(hints: &GraphicsHints) -> wgpu::ShaderModel {
    match hints.version.major {
        0..=2 => wgpu::ShaderModel::Sm2,
        3 => wgpu::ShaderModel::Sm4,
        _ => wgpu::ShaderModel::Sm5,
    }
}

fn rank(model: wgpu::ShaderModel) -> u8 {
    match model {
        wgpu::ShaderModel::Sm2 => 2,
        wgpu::ShaderModel::Sm4 => 4,
        wgpu::ShaderModel::Sm5 => 5,
        #[allow(unreachable_patterns)]
        _ => 5,
    }
}

/// Checks that `caps` can host a context with `hints`.
///
/// wgpu has no fixed-function legacy path, so a compatibility profile
/// can never be provided.
pub(crate) fn check_adapter(
    hints: &GraphicsHints,
    caps: &wgpu::DownlevelCapabilities,
    adapter_name: &str,
) -> Result<(), ShellError> {
    if hints.profile == Profile::Compatibility {
        return Err(ShellError::WindowCreation(
            "compatibility profile is not available on a wgpu context".into(),
        ));
    }

    let needed = required_shader_model(hints);
    if rank(caps.shader_model) < rank(needed) {
        return Err(ShellError::WindowCreation(format!(
            "adapter `{adapter_name}` offers {:?}, version {} needs {:?}",
            caps.shader_model, hints.version, needed
        )));
    }
    Ok(())
}
