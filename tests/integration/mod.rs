//! Integration tests for the shader manager

mod config_loading;
mod context_lifecycle;
mod repository;
mod shader_module;
mod test_utils;
