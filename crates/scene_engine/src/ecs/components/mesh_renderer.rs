//! Mesh renderer component
//!
//! Submits one [`DrawCall`] per tick for its owner. The material decides which
//! matrices are filled in: parameters it does not declare are left `None`.

use std::sync::Arc;

use super::camera::Camera;
use super::light::PointLight;
use crate::ecs::scheduler::TickGroup;
use crate::ecs::{Component, ComponentContext};
use crate::render::{DrawCall, DrawSubmitter, Material, MaterialParameter, MeshId};

/// Which material parameters this renderer fills
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ResolvedParameters {
    model_matrix: bool,
    view_matrix: bool,
    light_position: bool,
}

/// Draws a mesh at its owner's world transform
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    mesh: MeshId,
    material: Arc<Material>,
    submitter: DrawSubmitter,
    resolved: ResolvedParameters,
}

impl MeshRenderer {
    /// Renderer for `mesh` drawn with `material`, submitting to `submitter`
    pub fn new(mesh: MeshId, material: Arc<Material>, submitter: DrawSubmitter) -> Self {
        Self {
            mesh,
            material,
            submitter,
            resolved: ResolvedParameters::default(),
        }
    }

    /// Mesh handle
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// Material
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Component for MeshRenderer {
    fn tick_group(&self) -> TickGroup {
        TickGroup::Render
    }

    fn post_create(&mut self, ctx: &mut ComponentContext<'_>) {
        let material = &self.material;
        self.resolved = ResolvedParameters {
            model_matrix: material.has_parameter(MaterialParameter::ModelMatrix),
            view_matrix: material.has_parameter(MaterialParameter::ViewMatrix),
            light_position: material.has_parameter(MaterialParameter::LightPosition),
        };

        for (declared, parameter) in [
            (self.resolved.model_matrix, MaterialParameter::ModelMatrix),
            (self.resolved.view_matrix, MaterialParameter::ViewMatrix),
        ] {
            if !declared {
                log::warn!(
                    "Material '{}' on {:?} has no '{}' parameter; it will not be set",
                    material.name(),
                    ctx.owner(),
                    parameter
                );
            }
        }
    }

    fn tick(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        let resolved = self.resolved;
        let call = DrawCall {
            entity: ctx.owner(),
            mesh: self.mesh,
            material: Arc::clone(&self.material),
            model_matrix: resolved.model_matrix.then(|| ctx.transform_matrix()),
            view_matrix: resolved.view_matrix.then(|| Camera::current_view(ctx.entities())),
            light_position: resolved
                .light_position
                .then(|| PointLight::current_position(ctx.entities())),
        };
        self.submitter.submit(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityManager;
    use crate::foundation::math::{Mat4, Transform, Vec3};
    use crate::render::RenderQueue;
    use approx::assert_relative_eq;

    #[test]
    fn test_submits_model_view_and_light() {
        let mut manager = EntityManager::new();
        let mut queue = RenderQueue::new();

        let eye = manager.create_entity_with_transform(
            "Eye",
            TickGroup::None,
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
        );
        manager.add_component(eye, Camera::perspective(1.0, 0.1, 100.0));
        let lamp = manager.create_entity_with_transform(
            "Lamp",
            TickGroup::None,
            Transform::from_position(Vec3::new(0.0, 10.0, 0.0)),
        );
        manager.add_component(lamp, PointLight::white());

        let rock = manager.create_entity_with_transform(
            "Rock",
            TickGroup::None,
            Transform::from_position(Vec3::new(2.0, 0.0, 0.0)),
        );
        manager.add_component(
            rock,
            MeshRenderer::new(MeshId(7), Arc::new(Material::lit("rock")), queue.submitter()),
        );

        manager.tick(0.016);
        let calls = queue.execute();
        assert_eq!(calls.len(), 1);

        let call = &calls[0];
        assert_eq!(call.entity, rock);
        assert_eq!(call.mesh, MeshId(7));
        let model = call.model_matrix.unwrap_or_else(Mat4::zeros);
        assert_relative_eq!(model[(0, 3)], 2.0, epsilon = 1e-5);
        let view = call.view_matrix.unwrap_or_else(Mat4::zeros);
        assert_relative_eq!(view[(2, 3)], -5.0, epsilon = 1e-5);
        assert_relative_eq!(call.light_position.unwrap_or_else(Vec3::zeros), Vec3::new(0.0, 10.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_undeclared_parameters_are_skipped() {
        let mut manager = EntityManager::new();
        let mut queue = RenderQueue::new();
        let flat = Arc::new(Material::new("flat").with_parameters([MaterialParameter::ModelMatrix]));

        let quad = manager.create_entity("Quad", TickGroup::None);
        manager.add_component(quad, MeshRenderer::new(MeshId(1), flat, queue.submitter()));
        manager.tick(0.016);

        let calls = queue.execute();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].model_matrix.is_some());
        assert!(calls[0].view_matrix.is_none());
        assert!(calls[0].light_position.is_none());
    }

    #[test]
    fn test_defaults_without_camera_or_light() {
        let mut manager = EntityManager::new();
        let mut queue = RenderQueue::new();

        let quad = manager.create_entity("Quad", TickGroup::None);
        manager.add_component(quad, MeshRenderer::new(MeshId(1), Arc::new(Material::lit("lit")), queue.submitter()));
        manager.tick(0.016);

        let calls = queue.execute();
        assert_eq!(calls[0].view_matrix, Some(Mat4::identity()));
        assert_eq!(calls[0].light_position, Some(Vec3::zeros()));
    }

    #[test]
    fn test_inactive_renderer_submits_nothing() {
        let mut manager = EntityManager::new();
        let mut queue = RenderQueue::new();

        let quad = manager.create_entity("Quad", TickGroup::None);
        manager.add_component(quad, MeshRenderer::new(MeshId(1), Arc::new(Material::lit("lit")), queue.submitter()));
        manager.set_active(quad, false);
        manager.tick(0.016);

        assert!(queue.execute().is_empty());
    }
}
