//! WGSL compute shaders for the probe

/// Workgroup width: one invocation per bit column
pub const WORKGROUP_WIDTH: u32 = 32;

/// `sin()` bitplane shader (WGSL)
///
/// Invocation (x, y) evaluates `sin(inputs[y])` and stores bit x of the
/// result as the intensity of texel (x, y): 1.0 when set, 0.0 when clear.
/// Dispatch as (1, rows, 1) workgroups of 32×1.
pub const SIN_BITPLANE_SHADER: &str = r#"
@group(0) @binding(0) var<storage, read> inputs: array<f32>;
@group(0) @binding(1) var plane: texture_storage_2d<rgba8unorm, write>;

@compute @workgroup_size(32, 1, 1)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let column = global_id.x;
    let row = global_id.y;

    // Bounds check
    if (column >= 32u || row >= arrayLength(&inputs)) {
        return;
    }

    let bits = bitcast<u32>(sin(inputs[row]));
    let on = f32((bits >> column) & 1u);

    textureStore(plane, vec2<i32>(i32(column), i32(row)), vec4<f32>(on, on, on, 1.0));
}
"#;
