//! The scene behind the hero section.
//!
//! Three wireframe gears float in front of a slowly turning particle field
//! above a ground grid. The [`HeroVariant::Garage`] variant adds the
//! low-poly car on the grid, swaying with time and following the pointer.

use std::rc::Rc;

use cgmath::Deg;

use crate::{
    camera::{Camera, Projection},
    colour::{tint, ACCENT, WHITE},
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        model::GpuMesh,
        scene_graph::{node_at_mut, ContainerNode, SceneNode},
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    geometry::{
        car::{self, WheelPartKind},
        field::{ground_grid, ParticleField},
        gear::GearSpec,
    },
    input::FrameInput,
    render::Render,
    scenes::{commit, mesh_node},
};

// Child indices below the scene root.
const GEARS: usize = 0;
const PARTICLES: usize = 1;
const GRID: usize = 2;
const CAR: usize = 3;
// Child index of the first wheel below the car group; fill, wireframe and
// feature edges come before it.
const FIRST_WHEEL: usize = 3;

const PARTICLE_SPIN: f32 = 0.02;
const PARTICLE_SCROLL_YAW: f32 = 0.0002;
const PARTICLE_SCROLL_PITCH: f32 = 0.0001;
const GRID_SCROLL: f32 = 0.002;
const CAR_SWAY_FREQUENCY: f32 = 0.5;
const CAR_SWAY: f32 = 0.3;
const CAR_POINTER_GAIN: f32 = 0.5;
const WHEEL_SPIN: f32 = 2.0;

/// Which rendition of the hero the page uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeroVariant {
    /// The page shows photographs of cars; the 3D scene only carries the
    /// gears, particles and grid.
    #[default]
    Showcase,
    /// The page has no photographs and the 3D car takes centre stage.
    Garage,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GearPlacement {
    pub gear: GearSpec,
    pub position: [f32; 3],
    pub colour: u32,
    pub opacity: f32,
    /// Angular velocity about z in radians per second.
    pub spin: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroConfig {
    pub variant: HeroVariant,
    pub gears: [GearPlacement; 3],
    /// Per-frame gain of the vertical gear drift.
    pub bob: f32,
    pub particles: ParticleField,
    pub particle_size: f32,
    pub particle_opacity: f32,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub grid_y: f32,
    pub grid_opacity: f32,
    pub car_position: [f32; 3],
    pub car_yaw: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            variant: HeroVariant::default(),
            gears: [
                GearPlacement {
                    gear: GearSpec::new(0.5, 0.2, 12),
                    position: [-3.0, 1.5, -2.0],
                    colour: ACCENT,
                    opacity: 0.2,
                    spin: 0.3,
                },
                GearPlacement {
                    gear: GearSpec::new(0.35, 0.12, 8),
                    position: [3.5, -1.0, -1.0],
                    colour: WHITE,
                    opacity: 0.12,
                    spin: -0.4,
                },
                GearPlacement {
                    gear: GearSpec::new(0.4, 0.15, 10),
                    position: [-2.5, -1.5, -3.0],
                    colour: ACCENT,
                    opacity: 0.15,
                    spin: 0.25,
                },
            ],
            bob: 0.001,
            particles: ParticleField::default(),
            particle_size: 0.02,
            particle_opacity: 0.5,
            grid_size: 30.0,
            grid_divisions: 40,
            grid_y: -2.0,
            grid_opacity: 0.3,
            car_position: [0.0, -2.0, 0.0],
            car_yaw: -0.6,
        }
    }
}

impl HeroConfig {
    pub fn garage() -> Self {
        Self {
            variant: HeroVariant::Garage,
            ..Self::default()
        }
    }
}

/// Local transforms of every animated node for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroPose {
    pub gears: [Instance; 3],
    pub particles: Instance,
    pub grid: Instance,
    pub car: Instance,
    /// Rotation of every wheel about its axle, in radians.
    pub wheel_spin: f32,
}

/// Integrated state of the hero animation.
///
/// Everything but the gear drift is a closed-form function of the frame
/// input. The drift accumulates `sin(t + 2i) * bob` once per frame, so it
/// depends on how many frames were drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeroMotion {
    drift: [f32; 3],
}

impl HeroMotion {
    pub fn drift(&self) -> [f32; 3] {
        self.drift
    }

    pub fn advance(&mut self, config: &HeroConfig, frame: &FrameInput) -> HeroPose {
        let t = frame.t();
        let scroll = frame.scroll_y;

        let mut gears = [Instance::new(); 3];
        for (i, (gear, placement)) in gears.iter_mut().zip(&config.gears).enumerate() {
            self.drift[i] += (t + i as f32 * 2.0).sin() * config.bob;
            let [x, y, z] = placement.position;
            *gear = Instance::at(x, y + self.drift[i], z).with_euler(0.0, 0.0, t * placement.spin);
        }

        let particles = Instance::new().with_euler(
            scroll * PARTICLE_SCROLL_PITCH,
            t * PARTICLE_SPIN + scroll * PARTICLE_SCROLL_YAW,
            0.0,
        );
        let grid = Instance::at(0.0, config.grid_y, -scroll * GRID_SCROLL);

        let [x, y, z] = config.car_position;
        let yaw = config.car_yaw
            + (t * CAR_SWAY_FREQUENCY).sin() * CAR_SWAY
            + frame.pointer.nx * CAR_POINTER_GAIN;
        let car = Instance::at(x, y, z).with_euler(0.0, yaw, 0.0);

        HeroPose {
            gears,
            particles,
            grid,
            car,
            wheel_spin: t * WHEEL_SPIN,
        }
    }
}

fn wheel_tint(kind: WheelPartKind) -> [f32; 4] {
    match kind {
        WheelPartKind::Tire => tint(0x1A1A1A, 0.9),
        WheelPartKind::Rim => tint(0xC0C0C0, 0.8),
        WheelPartKind::Spokes => tint(0xA0A0A0, 0.8),
        WheelPartKind::Hub => tint(0x808080, 0.9),
        WheelPartKind::Caliper => tint(ACCENT, 0.95),
        WheelPartKind::Disc => tint(0x555555, 0.6),
    }
}

fn build_car(device: &wgpu::Device, config: &HeroConfig) -> ContainerNode {
    let [x, y, z] = config.car_position;
    let mut group = ContainerNode::new(Instance::at(x, y, z).with_euler(0.0, config.car_yaw, 0.0));

    let body = car::body_renditions();
    let fill = Rc::new(GpuMesh::from_geometry(device, "car fill", &body.fill));
    let wireframe = Rc::new(GpuMesh::from_lines(device, "car wireframe", &body.wireframe));
    let edges = Rc::new(GpuMesh::from_lines(device, "car edges", &body.edges));
    group.add_child(mesh_node(device, &fill, tint(ACCENT, 0.08), Instance::new()));
    group.add_child(mesh_node(device, &wireframe, tint(ACCENT, 0.25), Instance::new()));
    group.add_child(mesh_node(device, &edges, tint(WHITE, 0.6), Instance::new()));

    // uploaded once, shared by all four wheels
    let parts: Vec<(Rc<GpuMesh>, [f32; 4])> = car::wheel_assembly()
        .into_iter()
        .map(|part| {
            let name = format!("wheel {:?}", part.kind);
            (
                Rc::new(GpuMesh::from_geometry(device, &name, &part.geometry)),
                wheel_tint(part.kind),
            )
        })
        .collect();
    for [wx, wy, wz] in car::wheel_positions() {
        let mut wheel = ContainerNode::new(Instance::at(wx, wy, wz));
        for (mesh, tint) in &parts {
            wheel.add_child(mesh_node(device, mesh, *tint, Instance::new()));
        }
        group.add_child(Box::new(wheel));
    }
    group
}

pub struct HeroScene {
    config: HeroConfig,
    motion: HeroMotion,
    root: ContainerNode,
}

impl HeroScene {
    pub fn new(device: &wgpu::Device, config: HeroConfig) -> anyhow::Result<Self> {
        let mut root = ContainerNode::default();

        let mut gears = ContainerNode::default();
        for (i, placement) in config.gears.iter().enumerate() {
            let lines = placement.gear.build()?.wireframe();
            let mesh = Rc::new(GpuMesh::from_lines(device, &format!("gear {}", i), &lines));
            let [x, y, z] = placement.position;
            gears.add_child(mesh_node(
                device,
                &mesh,
                tint(placement.colour, placement.opacity),
                Instance::at(x, y, z),
            ));
        }
        root.add_child(Box::new(gears));

        let cloud = config.particles.build();
        let particles = Rc::new(GpuMesh::from_points(device, "particles", &cloud, config.particle_size));
        root.add_child(mesh_node(
            device,
            &particles,
            tint(ACCENT, config.particle_opacity),
            Instance::new(),
        ));

        let grid = ground_grid(config.grid_size, config.grid_divisions);
        let mut grid_node = ContainerNode::new(Instance::at(0.0, config.grid_y, 0.0));
        let center = Rc::new(GpuMesh::from_lines(device, "grid centre", &grid.center));
        let lines = Rc::new(GpuMesh::from_lines(device, "grid", &grid.lines));
        grid_node.add_child(mesh_node(device, &center, tint(0x222222, config.grid_opacity), Instance::new()));
        grid_node.add_child(mesh_node(device, &lines, tint(0x1A1A1A, config.grid_opacity), Instance::new()));
        root.add_child(Box::new(grid_node));

        if config.variant == HeroVariant::Garage {
            root.add_child(Box::new(build_car(device, &config)));
        }

        log::info!("hero scene assembled ({:?})", config.variant);
        Ok(Self {
            config,
            motion: HeroMotion::default(),
            root,
        })
    }

    pub fn constructor(config: HeroConfig) -> FlowConstructor {
        Box::new(move |ctx: InitContext| {
            Box::pin(async move {
                let scene = HeroScene::new(&ctx.device, config)?;
                anyhow::Ok(Box::new(scene) as Box<dyn GraphicsFlow>)
            })
        })
    }

    fn place(&mut self, path: &[usize], local: Instance) {
        if let Some(node) = node_at_mut(&mut self.root, path) {
            *node.local_mut() = local;
        }
    }

    fn apply(&mut self, pose: &HeroPose) {
        for (i, gear) in pose.gears.iter().enumerate() {
            self.place(&[GEARS, i], *gear);
        }
        self.place(&[PARTICLES], pose.particles);
        self.place(&[GRID], pose.grid);

        if self.config.variant == HeroVariant::Garage {
            self.place(&[CAR], pose.car);
            for (i, [x, y, z]) in car::wheel_positions().into_iter().enumerate() {
                self.place(
                    &[CAR, FIRST_WHEEL + i],
                    Instance::at(x, y, z).with_euler(0.0, 0.0, pose.wheel_spin),
                );
            }
        }
    }
}

impl GraphicsFlow for HeroScene {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        let (width, height) = (ctx.config.width, ctx.config.height);
        ctx.set_camera(
            Camera::on_z_axis(6.0),
            Projection::new(width, height, Deg(60.0), 0.1, 1000.0),
        );
        commit(&mut self.root, &ctx.queue);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, frame: &FrameInput) -> Out {
        let pose = self.motion.advance(&self.config, frame);
        self.apply(&pose);
        commit(&mut self.root, &ctx.queue);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::from(&self.root as &dyn SceneNode)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::{InnerSpace, Quaternion, Rotation3, Rad};

    use super::*;
    use crate::input::PointerState;

    fn frame(secs: f32, frame: u64) -> FrameInput {
        FrameInput {
            elapsed: Duration::from_secs_f32(secs),
            frame,
            ..Default::default()
        }
    }

    fn same_rotation(a: Quaternion<f32>, b: Quaternion<f32>) -> bool {
        // q and -q are the same rotation
        (a.dot(b).abs() - 1.0).abs() < 1e-5
    }

    #[test]
    fn gears_turn_with_their_own_speed() {
        let config = HeroConfig::default();
        let pose = HeroMotion::default().advance(&config, &frame(2.0, 0));
        for (gear, speed) in pose.gears.iter().zip([0.3, -0.4, 0.25]) {
            assert!(same_rotation(gear.rotation, Quaternion::from_angle_z(Rad(2.0 * speed))));
        }
    }

    #[test]
    fn gear_drift_accumulates_per_frame() {
        let config = HeroConfig::default();
        let mut motion = HeroMotion::default();
        let t = 1.0_f32;
        for n in 0..3 {
            motion.advance(&config, &frame(t, n));
        }
        let expected = 3.0 * t.sin() * 0.001;
        assert!((motion.drift()[0] - expected).abs() < 1e-6);
        let expected = 3.0 * (t + 4.0).sin() * 0.001;
        assert!((motion.drift()[2] - expected).abs() < 1e-6);

        let pose = motion.advance(&config, &frame(t, 3));
        assert!((pose.gears[0].position.y - (1.5 + 4.0 * t.sin() * 0.001)).abs() < 1e-5);
    }

    #[test]
    fn scroll_tilts_particles_and_pulls_the_grid() {
        let config = HeroConfig::default();
        let mut input = frame(0.0, 0);
        input.scroll_y = 1000.0;
        let pose = HeroMotion::default().advance(&config, &input);

        let expected = Quaternion::from(cgmath::Euler::new(Rad(0.1), Rad(0.2), Rad(0.0)));
        assert!(same_rotation(pose.particles.rotation, expected));
        assert!((pose.grid.position.z + 2.0).abs() < 1e-6);
        assert_eq!(pose.grid.position.y, -2.0);
    }

    #[test]
    fn car_follows_the_pointer() {
        let config = HeroConfig::garage();
        let mut input = frame(0.0, 0);
        let centred = HeroMotion::default().advance(&config, &input);
        assert!(same_rotation(centred.car.rotation, Quaternion::from_angle_y(Rad(config.car_yaw))));

        input.pointer = PointerState::from_pixels(1000.0, 0.0, 1000.0, 1000.0);
        let right = HeroMotion::default().advance(&config, &input);
        assert!(same_rotation(
            right.car.rotation,
            Quaternion::from_angle_y(Rad(config.car_yaw + 0.5))
        ));
    }

    #[test]
    fn car_sways_and_wheels_spin_with_time() {
        let config = HeroConfig::garage();
        let t = std::f32::consts::PI;
        let pose = HeroMotion::default().advance(&config, &frame(t, 0));
        let yaw = config.car_yaw + (t * 0.5).sin() * 0.3;
        assert!(same_rotation(pose.car.rotation, Quaternion::from_angle_y(Rad(yaw))));
        assert!((pose.wheel_spin - 2.0 * t).abs() < 1e-6);
    }

    #[test]
    fn showcase_is_the_default_variant() {
        assert_eq!(HeroConfig::default().variant, HeroVariant::Showcase);
        assert_eq!(HeroConfig::garage().variant, HeroVariant::Garage);
    }
}
