//! Solar system demo
//!
//! Builds a small hierarchy (sun, orbiting planet, orbiting moon) with a
//! camera, a light and mesh renderers, then exercises the scene lifecycle:
//! the planet is switched off and on again and the moon is destroyed mid-run.
//! Draw calls are counted instead of rendered.

use std::sync::Arc;

use scene_engine::prelude::*;

/// Rotates its entity around the Y axis
struct Orbit {
    radians_per_second: f32,
}

impl Component for Orbit {
    fn tick_group(&self) -> TickGroup {
        TickGroup::PreUpdate
    }

    fn tick(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        if let Some(transform) = ctx.local_transform_mut() {
            let step = Quat::from_axis_angle(&Vec3::y_axis(), self.radians_per_second * delta_time);
            transform.rotation = step * transform.rotation;
        }
    }
}

#[derive(Default)]
struct SolarSystemApp {
    planet: Option<EntityId>,
    moon: Option<EntityId>,
    draw_calls: usize,
}

impl SolarSystemApp {
    fn spawn_body(
        engine: &mut Engine,
        name: &str,
        parent: Option<EntityId>,
        offset: Vec3,
        material: &Arc<Material>,
        mesh: MeshId,
    ) -> EntityId {
        let body = engine
            .entities
            .create_entity_with_transform(name, TickGroup::None, Transform::from_position(offset));
        engine.entities.set_parent(body, parent, EntityRelationship::FULL);
        let submitter = engine.render_queue.submitter();
        engine
            .entities
            .add_component(body, MeshRenderer::new(mesh, Arc::clone(material), submitter));
        body
    }

    fn spawn_pivot(engine: &mut Engine, name: &str, parent: EntityId, radians_per_second: f32) -> EntityId {
        let pivot = engine.entities.create_entity(name, TickGroup::None);
        engine.entities.set_parent(pivot, Some(parent), EntityRelationship::FULL);
        engine.entities.add_component(pivot, Orbit { radians_per_second });
        pivot
    }
}

impl Application for SolarSystemApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building solar system...");
        let lit = Arc::new(Material::lit("lit"));
        let sphere = MeshId(0);

        let emissive = Arc::new(
            Material::new("emissive").with_parameters([MaterialParameter::ModelMatrix, MaterialParameter::ViewMatrix]),
        );

        let sun = Self::spawn_body(engine, "Sun", None, Vec3::zeros(), &emissive, sphere);
        engine.entities.add_component(sun, PointLight::new(Vec3::new(1.0, 0.95, 0.8), 2.0));

        let planet_pivot = Self::spawn_pivot(engine, "PlanetPivot", sun, 0.5);
        let planet = Self::spawn_body(engine, "Planet", Some(planet_pivot), Vec3::new(6.0, 0.0, 0.0), &lit, sphere);
        let moon_pivot = Self::spawn_pivot(engine, "MoonPivot", planet, 2.0);
        let moon = Self::spawn_body(engine, "Moon", Some(moon_pivot), Vec3::new(1.5, 0.0, 0.0), &lit, sphere);

        let eye = engine.entities.create_entity_with_transform(
            "Camera",
            TickGroup::None,
            Transform::from_position(Vec3::new(0.0, 4.0, 20.0)),
        );
        engine.entities.add_component(eye, Camera::perspective(60.0_f32.to_radians(), 0.1, 100.0));

        self.planet = Some(planet);
        self.moon = Some(moon);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        let frame = engine.frame_count();
        let planet = self.planet.ok_or_else(|| AppError::Custom("planet missing".to_string()))?;

        match frame {
            60 => {
                log::info!("Frame {}: switching the planet off", frame);
                engine.entities.set_active(planet, false);
            }
            120 => {
                log::info!("Frame {}: switching the planet back on", frame);
                engine.entities.set_active(planet, true);
            }
            180 => {
                if let Some(moon) = self.moon {
                    log::info!("Frame {}: destroying the moon", frame);
                    engine.entities.destroy(moon);
                }
            }
            _ => {}
        }

        if frame % 60 == 0 {
            let entities = engine.entities();
            let moon_position = self
                .moon
                .and_then(|moon| entities.world_position(moon))
                .map_or_else(|| "gone".to_string(), |p| format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
            let stats = entities.last_stats();
            log::info!(
                "Frame {}: {} live entities, {} component ticks, {} draw calls so far, moon at {}",
                frame,
                stats.live_entities,
                stats.component_ticks,
                self.draw_calls,
                moon_position
            );
        }
        Ok(())
    }

    fn render(&mut self, _engine: &mut Engine, draw_calls: &[DrawCall]) -> Result<(), AppError> {
        self.draw_calls += draw_calls.len();
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Demo finished: {} draw calls over {} frames, {} entities left",
            self.draw_calls,
            engine.frame_count(),
            engine.entities().len()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load_or_default("scene_demo.toml")?;
    config.max_frames.get_or_insert(240);
    config.fixed_delta_time.get_or_insert(1.0 / 60.0);

    let mut app = SolarSystemApp::default();
    Engine::run(config, &mut app)?;
    Ok(())
}
