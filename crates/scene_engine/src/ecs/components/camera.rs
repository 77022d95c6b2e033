//! # Camera Component
//!
//! A camera is just a projection attached to an entity; its view matrix is the
//! inverse of the owner's world transform. While its owner is active the
//! camera holds the scene's camera slot, so renderers anywhere in the tree can
//! find it through [`EntityManager::current_camera`].

use crate::ecs::scheduler::TickGroup;
use crate::ecs::slots::SlotKind;
use crate::ecs::{Component, ComponentContext, EntityManager};
use crate::foundation::math::{constants, Mat4, Mat4Ext};

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians, in (0, π)
        fov_y: f32,
        /// Near plane distance, > 0
        near: f32,
        /// Far plane distance, > near
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Half of the visible height in world units, > 0
        half_height: f32,
        /// Near plane distance
        near: f32,
        /// Far plane distance, > near
        far: f32,
    },
}

impl Projection {
    /// Check the parameters; returns a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Perspective { fov_y, near, far } => {
                if !(fov_y > 0.0 && fov_y < constants::PI) {
                    return Err(format!("field of view {fov_y} outside (0, π)"));
                }
                if near <= 0.0 {
                    return Err(format!("near plane {near} must be positive"));
                }
                if far <= near {
                    return Err(format!("far plane {far} must exceed near plane {near}"));
                }
            }
            Self::Orthographic { half_height, near, far } => {
                if half_height <= 0.0 {
                    return Err(format!("orthographic size {half_height} must be positive"));
                }
                if far <= near {
                    return Err(format!("far plane {far} must exceed near plane {near}"));
                }
            }
        }
        Ok(())
    }
}

/// Camera component
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Projection,
    view_matrix: Mat4,
}

impl Camera {
    /// Camera with the given projection
    ///
    /// Invalid parameters are a programming error: they assert in debug
    /// builds and are logged in release builds.
    pub fn new(projection: Projection) -> Self {
        let validation = projection.validate();
        if let Err(problem) = &validation {
            log::warn!("Invalid camera projection: {}", problem);
        }
        debug_assert!(validation.is_ok(), "invalid camera projection: {validation:?}");
        Self {
            projection,
            view_matrix: Mat4::identity(),
        }
    }

    /// Perspective camera; `fov_y` in radians
    pub fn perspective(fov_y: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Perspective { fov_y, near, far })
    }

    /// Orthographic camera
    pub fn orthographic(half_height: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Orthographic { half_height, near, far })
    }

    /// Projection parameters
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Projection matrix for a viewport aspect ratio (width / height)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y, near, far } => Mat4::perspective(fov_y, aspect, near, far),
            Projection::Orthographic { half_height, near, far } => {
                Mat4::orthographic(half_height, aspect, near, far)
            }
        }
    }

    /// View matrix cached at the last creation or tick
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// View matrix of the scene's current camera, or identity if there is none
    pub fn current_view(entities: &EntityManager) -> Mat4 {
        entities
            .current_camera()
            .and_then(|id| entities.find_component::<Self>(id))
            .map_or_else(Mat4::identity, Self::view_matrix)
    }
}

impl Component for Camera {
    fn tick_group(&self) -> TickGroup {
        // After controllers have moved things, before renderers read the view.
        TickGroup::PostUpdate
    }

    fn post_create(&mut self, ctx: &mut ComponentContext<'_>) {
        self.view_matrix = ctx.transform_matrix_inv();
        if ctx.entities().entity(ctx.owner()).is_some_and(|e| e.active_in_hierarchy()) {
            ctx.claim_slot(SlotKind::Camera);
        }
    }

    fn pre_destroy(&mut self, ctx: &mut ComponentContext<'_>) {
        ctx.release_slot(SlotKind::Camera);
    }

    fn tick(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        self.view_matrix = ctx.transform_matrix_inv();
    }

    fn post_enable(&mut self, ctx: &mut ComponentContext<'_>) {
        ctx.claim_slot(SlotKind::Camera);
    }

    fn post_disable(&mut self, ctx: &mut ComponentContext<'_>) {
        ctx.release_slot(SlotKind::Camera);
    }
}
