//! Unit tests for render_command.rs, global_render_state.rs and technique.rs

use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::render::{
    ClearBuffers, DefaultRenderTarget, DrawCallContext, DrawCommand, DrawMode, ForwardPass,
    ForwardTechnique, GlobalRenderState, ProgramDesc, RenderCommand, RenderPass, RenderTarget,
    RenderTechnique, ResourceRegistry, UniformStruct, UniformVariable, VertexDataDesc,
};

struct Light {
    position: Vec3,
    power: f32,
}

impl UniformStruct for Light {
    fn uniform_members(&self) -> Vec<(&'static str, UniformVariable)> {
        vec![
            ("Position", self.position.into()),
            ("Power", self.power.into()),
        ]
    }
}

fn registry_with_data() -> (ResourceRegistry, crate::render::ProgramHandle, crate::render::VertexDataHandle) {
    let mut registry = ResourceRegistry::new();
    let program = registry
        .create_program(ProgramDesc { name: "p".to_string() })
        .unwrap();
    let data = registry
        .create_vertex_data(VertexDataDesc {
            name: "quad".to_string(),
            draw_mode: DrawMode::TriangleStrip,
            vertex_count: 4,
            index_count: 0,
        })
        .unwrap();
    (registry, program, data)
}

// ============================================================================
// GlobalRenderState
// ============================================================================

#[test]
fn test_global_state_shared_and_per_program() {
    let (_registry, program, _) = registry_with_data();
    let mut state = GlobalRenderState::new();

    state.set_shared_uniform("u_Time", 1.5f32);
    state.set_per_program_uniform(program, "u_Scale", 2i32);

    assert_eq!(state.shared_uniforms()["u_Time"], UniformVariable::Float(1.5));
    assert!(state.has_per_program_uniforms(program));
    assert_eq!(
        state.per_program_uniforms(program).unwrap()["u_Scale"],
        UniformVariable::Int(2)
    );
}

#[test]
fn test_global_state_struct_flattening() {
    let mut state = GlobalRenderState::new();
    let light = Light { position: Vec3::Y, power: 10.0 };

    state.set_shared_uniform_struct("u_Lights", &light, Some(1));

    assert_eq!(state.shared_uniforms()["u_Lights[1].Position"], UniformVariable::Vec3(Vec3::Y));
    assert_eq!(state.shared_uniforms()["u_Lights[1].Power"], UniformVariable::Float(10.0));
}

#[test]
fn test_global_state_reset() {
    let (_registry, program, _) = registry_with_data();
    let mut state = GlobalRenderState::new();
    state.set_shared_uniform("a", 1i32);
    state.set_per_program_uniform(program, "b", 1i32);

    state.reset();

    assert!(state.shared_uniforms().is_empty());
    assert!(state.per_program_uniforms(program).is_none());
}

#[test]
fn test_global_state_display_sorts_shared() {
    let mut state = GlobalRenderState::new();
    state.set_shared_uniform("b", 2i32);
    state.set_shared_uniform("a", 1i32);

    let text = state.to_string();
    let a = text.find("shared a = Int = 1").unwrap();
    let b = text.find("shared b = Int = 2").unwrap();
    assert!(a < b);
}

// ============================================================================
// RenderCommand
// ============================================================================

#[test]
fn test_render_command_reset_keeps_target_and_techniques() {
    let (_registry, program, data) = registry_with_data();
    let mut command = RenderCommand::new(Arc::new(DefaultRenderTarget::new("screen", 4, 4)));
    command.add_technique(Arc::new(ForwardTechnique::new(program)));
    command.push_draw_command(Arc::new(DrawCommand::new(data, Mat4::IDENTITY)));
    command.global_state_mut().set_shared_uniform("u", 1i32);

    command.reset();

    assert!(command.draw_commands().is_empty());
    assert!(command.global_state().shared_uniforms().is_empty());
    assert_eq!(command.target().unwrap().name(), "screen");
    assert_eq!(command.techniques().len(), 1);
}

#[test]
fn test_render_command_default_has_no_target() {
    let mut command = RenderCommand::default();
    assert!(command.target().is_none());

    command.set_target(Arc::new(DefaultRenderTarget::new("offscreen", 2, 2)));
    assert_eq!(command.target().unwrap().width(), 2);
}

#[test]
fn test_render_command_keeps_draw_order() {
    let (_registry, _, data) = registry_with_data();
    let mut command = RenderCommand::default();
    for i in 0..3 {
        let model = Mat4::from_translation(Vec3::splat(i as f32));
        command.push_draw_command(Arc::new(DrawCommand::new(data, model)));
    }

    let xs: Vec<f32> = command
        .draw_commands()
        .iter()
        .map(|c| c.model_matrix().w_axis.x)
        .collect();
    assert_eq!(xs, vec![0.0, 1.0, 2.0]);
}

// ============================================================================
// Techniques
// ============================================================================

#[test]
fn test_forward_technique_renders_single_pass() {
    let (_registry, program, _) = registry_with_data();
    let technique = ForwardTechnique::with_pass(
        ForwardPass::new(program).with_clear(ClearBuffers::COLOR | ClearBuffers::DEPTH),
    );
    let target = DefaultRenderTarget::new("screen", 4, 4);
    let state = GlobalRenderState::new();

    let mut names = Vec::new();
    let mut contexts = Vec::new();
    technique.render(&mut |pass: &dyn RenderPass| {
        names.push(pass.name().to_string());
        let mut ctx = DrawCallContext::new(target.viewport().unwrap(), &target, &state, &[]);
        pass.set_up(&mut ctx);
        contexts.push((ctx.pipeline.program, ctx.clear));
    });

    assert_eq!(technique.name(), "ForwardTechnique");
    assert_eq!(names, vec!["ForwardPass"]);
    assert_eq!(contexts, vec![(Some(program), ClearBuffers::COLOR | ClearBuffers::DEPTH)]);
}

#[test]
fn test_draw_call_context_defaults() {
    let target = DefaultRenderTarget::new("screen", 4, 4);
    let state = GlobalRenderState::new();
    let mut ctx = DrawCallContext::new(target.viewport().unwrap(), &target, &state, &[]);

    assert_eq!(ctx.clear, ClearBuffers::all());
    assert!(ctx.pipeline.program.is_none());
    assert!(ctx.uniforms.is_empty());

    ctx.set_uniform("u", 1i32);
    ctx.set_uniform("u", 2i32);
    assert_eq!(ctx.uniforms["u"], UniformVariable::Int(2));
}
