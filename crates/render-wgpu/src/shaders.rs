use blockfield_render::symbols;

/// Built-in terrain program: two textures blended by a time-driven factor.
///
/// Clip depth from the projection is in [-1, 1] and is remapped to wgpu's
/// [0, 1] in the vertex stage. Custom programs must keep this binding layout.
pub const TERRAIN_SHADER: &str = r#"
struct Frame {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    timer: f32,
};

@group(0) @binding(0)
var<uniform> frame: Frame;
@group(0) @binding(1)
var texture0: texture_2d<f32>;
@group(0) @binding(2)
var texture1: texture_2d<f32>;
@group(0) @binding(3)
var texture_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) texcoord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) texcoord: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var clip = frame.projection * frame.view * vec4<f32>(in.position, 1.0);
    clip.z = (clip.z + clip.w) * 0.5;

    var out: VertexOutput;
    out.clip_position = clip;
    out.texcoord = in.texcoord;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let fade = sin(frame.timer) * 0.5 + 0.5;
    let a = textureSample(texture0, texture_sampler, in.texcoord);
    let b = textureSample(texture1, texture_sampler, in.texcoord);
    return mix(a, b, fade);
}
"#;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Where a named uniform lands in the fixed bind group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformSlot {
    View,
    Projection,
    Timer,
    /// Texture binding `texture{n}`; its value selects a texture unit.
    Sampler(usize),
}

impl UniformSlot {
    /// WGSL identifier a program must mention to expose this slot.
    pub fn identifier(self) -> &'static str {
        match self {
            UniformSlot::View => "view",
            UniformSlot::Projection => "projection",
            UniformSlot::Timer => "timer",
            UniformSlot::Sampler(0) => "texture0",
            UniformSlot::Sampler(_) => "texture1",
        }
    }
}

pub const SAMPLER_SLOTS: usize = 2;

/// Uniform names in location order.
pub const UNIFORMS: [(&str, UniformSlot); 5] = [
    (symbols::VIEW, UniformSlot::View),
    (symbols::PROJECTION, UniformSlot::Projection),
    (symbols::TIMER, UniformSlot::Timer),
    (symbols::TEXTURES[0], UniformSlot::Sampler(0)),
    (symbols::TEXTURES[1], UniformSlot::Sampler(1)),
];

/// Attribute names and their `@location` in the vertex stage.
pub const ATTRIBUTES: [(&str, u32); 2] = [(symbols::POSITION, 0), (symbols::TEXCOORD, 1)];

pub fn uniform_index(name: &str) -> Option<usize> {
    UNIFORMS.iter().position(|(n, _)| *n == name)
}

pub fn attribute_location(name: &str) -> Option<u32> {
    ATTRIBUTES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, location)| *location)
}

/// Whether `ident` appears in `code` as a whole identifier.
pub fn mentions(code: &str, ident: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    code.match_indices(ident).any(|(start, _)| {
        let before = code[..start].chars().next_back();
        let after = code[start + ident.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_exposes_every_symbol() {
        for (_, slot) in UNIFORMS {
            assert!(mentions(TERRAIN_SHADER, slot.identifier()), "{slot:?}");
        }
        for (name, _) in ATTRIBUTES {
            assert!(mentions(TERRAIN_SHADER, name), "{name}");
        }
        assert!(mentions(TERRAIN_SHADER, VERTEX_ENTRY));
        assert!(mentions(TERRAIN_SHADER, FRAGMENT_ENTRY));
    }

    #[test]
    fn names_resolve() {
        assert_eq!(uniform_index("view"), Some(0));
        assert_eq!(uniform_index("textures[1]"), Some(4));
        assert_eq!(uniform_index("fade_factor"), None);
        assert_eq!(attribute_location("position"), Some(0));
        assert_eq!(attribute_location("texcoord"), Some(1));
        assert_eq!(attribute_location("normal"), None);
    }

    #[test]
    fn mentions_respects_word_boundaries() {
        assert!(mentions("let t = frame.timer;", "timer"));
        assert!(!mentions("let t = frame.timers;", "timer"));
        assert!(!mentions("var subview: f32;", "view"));
        assert!(mentions("view", "view"));
        assert!(!mentions("", "view"));
    }
}
