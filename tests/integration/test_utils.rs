//! Shared fixtures for integration tests

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use vk_shader_manager::registry::ContextRegistry;
use vk_shader_manager::ShaderManager;

pub const BASIC_FRAG: &str = r#"#version 450
layout(location = 0) in vec3 v_color;
layout(location = 0) out vec4 f_color;

void main() {
    f_color = vec4(v_color, 1.0);
}
"#;

pub const BASIC_VERT: &str = r#"#version 450
layout(location = 0) in vec2 position;
layout(location = 0) out vec3 v_color;

void main() {
    v_color = vec3(position, 0.5);
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

pub const FILL_COMP: &str = r#"#version 450
layout(local_size_x = 64) in;
layout(set = 0, binding = 0) buffer Data {
    uint values[];
};

void main() {
    values[gl_GlobalInvocationID.x] = gl_GlobalInvocationID.x;
}
"#;

/// Manager over a private registry, so tests never share contexts.
pub fn isolated_manager() -> ShaderManager {
    ShaderManager::with_registry(Arc::new(ContextRegistry::new()))
}

/// Repository file path inside `dir`; the file itself is not created.
pub fn repository_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cache").join("shaders.db")
}
