use std::borrow::Cow;

use anyhow::{anyhow, Result};
use wgpu::naga::ShaderStage;

/// Uniform and texture names provided by [`HEADER`]; user shaders may still
/// declare them and the declarations are dropped while wrapping.
const PROVIDED_NAMES: [&str; 7] = [
    "uResolution",
    "uScale",
    "uAcceleration",
    "uProgress",
    "uTime",
    "uTexture1",
    "uTexture2",
];

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Wraps a gallery fragment body with the uniform prelude and compiles it.
///
/// Validation errors are captured in an error scope so a broken user shader
/// surfaces as an `Err` instead of aborting the device.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    let wrapped = wrap_gallery_fragment(source);

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gallery fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(wrapped),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("fragment shader failed to compile: {error}"));
    }
    Ok(module)
}

/// Body of the default cross-fade, wrapped like any user shader.
pub(crate) const BUILTIN_FRAGMENT: &str = r"
void mainImage(out vec4 fragColor, in vec2 uv) {
    float blend = fract(uProgress);
    float eased = smoothstep(0.0, 1.0, blend);

    // Sideways ripple that peaks halfway through the transition.
    float wave = sin(uv.y * 3.14159265 * uAcceleration.y + uTime * 0.5);
    vec2 push = vec2(wave * uAcceleration.x * 0.08, 0.0) * vec2(1.0, uScale.y);
    float envelope = sin(blend * 3.14159265);

    vec2 uv1 = clamp(uv + push * envelope * eased, 0.0, 1.0);
    vec2 uv2 = clamp(uv - push * envelope * (1.0 - eased), 0.0, 1.0);

    vec4 first = texture(uTexture1, uv1);
    vec4 second = texture(uTexture2, uv2);
    fragColor = mix(first, second, eased);
}
";

/// Produces a self-contained GLSL fragment shader from a gallery shader body.
///
/// `#version` directives, `precision` statements and declarations of the
/// provided uniforms or the `vUv` varying are stripped, then [`HEADER`] and
/// [`FOOTER`] are put around the remaining code.
pub(crate) fn wrap_gallery_fragment(source: &str) -> String {
    let mut sanitized = String::new();
    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("#version") || trimmed.starts_with("precision ") {
            continue;
        }
        let redeclares_uniform = trimmed.starts_with("uniform ")
            && PROVIDED_NAMES.iter().any(|name| declares(trimmed, name));
        let redeclares_varying = (trimmed.starts_with("varying ") || trimmed.starts_with("in "))
            && declares(trimmed, "vUv");
        if redeclares_uniform || redeclares_varying {
            continue;
        }
        sanitized.push_str(line);
        sanitized.push('\n');
    }

    format!("{HEADER}\n#line 1\n{sanitized}{FOOTER}")
}

fn declares(line: &str, name: &str) -> bool {
    line.split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .any(|token| token == name)
}

/// GLSL prologue injected ahead of every gallery fragment shader.
///
/// The block layout must match `GalleryUniforms` in `gpu/uniforms.rs`.
const HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform GalleryParams {
    vec4 _uResolution;
    vec4 _uScale;
    vec4 _uAcceleration;
    float _uProgress;
    float _uTime;
} ubo;

#define uResolution ubo._uResolution.xy
#define uScale ubo._uScale.xy
#define uAcceleration ubo._uAcceleration.xy
#define uProgress ubo._uProgress
#define uTime ubo._uTime
#define vUv v_uv

layout(set = 1, binding = 0) uniform texture2D gallery_texture1;
layout(set = 1, binding = 1) uniform sampler gallery_sampler1;
layout(set = 1, binding = 2) uniform texture2D gallery_texture2;
layout(set = 1, binding = 3) uniform sampler gallery_sampler2;

#define uTexture1 sampler2D(gallery_texture1, gallery_sampler1)
#define uTexture2 sampler2D(gallery_texture2, gallery_sampler2)
";

const FOOTER: &str = r"void main() {
    vec4 color = vec4(0.0);
    mainImage(color, v_uv);
    outColor = vec4(color.rgb, 1.0);
}
";

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";
