/// WGSL shader for position-only cuboids with a per-instance model matrix.
///
/// The instance index doubles as the block id, which picks a tint. Faces are
/// flat-shaded from screen-space derivatives, so the vertex buffer needs no
/// normals.
pub const BLOCK_SHADER: &str = r#"
struct Uniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(1) model_0: vec4<f32>,
    @location(2) model_1: vec4<f32>,
    @location(3) model_2: vec4<f32>,
    @location(4) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) @interpolate(flat) tint: vec3<f32>,
};

@vertex
fn vs_main(
    vertex: VertexInput,
    instance: InstanceInput,
    @builtin(instance_index) block: u32,
) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var palette = array<vec3<f32>, 4>(
        vec3<f32>(0.2, 0.6, 1.0),
        vec3<f32>(0.9, 0.4, 0.3),
        vec3<f32>(0.3, 0.8, 0.4),
        vec3<f32>(0.9, 0.8, 0.2),
    );

    var out: VertexOutput;
    out.clip_position = uniforms.proj * uniforms.view * world_pos;
    out.world_pos = world_pos.xyz;
    out.tint = palette[block % 4u];
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(cross(dpdx(in.world_pos), dpdy(in.world_pos)));
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.3;
    let diffuse = abs(dot(normal, light_dir));
    let lighting = ambient + diffuse * 0.7;
    return vec4<f32>(in.tint * lighting, 1.0);
}
"#;
