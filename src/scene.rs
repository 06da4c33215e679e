//! Scene content: randomly placed primitive meshes.
//!
//! A [`Scene`] is pure data — a list of [`Placement`]s referencing shared
//! primitive meshes by [`Primitive`] tag. The GPU geometry itself lives in a
//! [`MeshLibrary`] built once at startup; scenes never own GPU resources,
//! so populating one needs nothing but a random number generator.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::color::Color;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Transform};

/// Number of placements in a randomly populated scene.
pub const PLACEMENTS_PER_SCENE: usize = 50;

/// Half-extent of the cube of space placements are scattered over.
pub const SCATTER_EXTENT: f32 = 10.0;

/// The primitive shapes a placement can reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Sphere,
    Cone,
    Cylinder,
    Torus,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Cube,
        Primitive::Sphere,
        Primitive::Cone,
        Primitive::Cylinder,
        Primitive::Torus,
    ];
}

/// The shared GPU meshes, one per [`Primitive`].
pub struct MeshLibrary {
    cube: Mesh,
    sphere: Mesh,
    cone: Mesh,
    cylinder: Mesh,
    torus: Mesh,
}

impl MeshLibrary {
    /// Builds all five primitives at moderate tessellation.
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            cube: Mesh::cube(gpu),
            sphere: Mesh::sphere(gpu, 32, 16),
            cone: Mesh::cone(gpu, 32),
            cylinder: Mesh::cylinder(gpu, 32),
            torus: Mesh::torus(gpu, 16, 48),
        }
    }

    pub fn get(&self, primitive: Primitive) -> &Mesh {
        match primitive {
            Primitive::Cube => &self.cube,
            Primitive::Sphere => &self.sphere,
            Primitive::Cone => &self.cone,
            Primitive::Cylinder => &self.cylinder,
            Primitive::Torus => &self.torus,
        }
    }
}

/// One mesh instance: which primitive, where, and what color.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub primitive: Primitive,
    pub transform: Transform,
    pub color: Color,
}

/// A collection of placements rendered together.
pub struct Scene {
    pub placements: Vec<Placement>,
}

impl Scene {
    /// Populates a scene with [`PLACEMENTS_PER_SCENE`] random primitives:
    /// positions uniform in the scatter cube, rotations uniform in
    /// [0, pi] per Euler axis, colors uniform in RGB.
    pub fn random(rng: &mut impl Rng) -> Self {
        let placements = (0..PLACEMENTS_PER_SCENE)
            .map(|_| {
                let primitive = Primitive::ALL[rng.gen_range(0..Primitive::ALL.len())];
                let position = Vec3::new(
                    rng.gen_range(-SCATTER_EXTENT..SCATTER_EXTENT),
                    rng.gen_range(-SCATTER_EXTENT..SCATTER_EXTENT),
                    rng.gen_range(-SCATTER_EXTENT..SCATTER_EXTENT),
                );
                let rotation = Quat::from_euler(
                    EulerRot::XYZ,
                    rng.gen_range(0.0..std::f32::consts::PI),
                    rng.gen_range(0.0..std::f32::consts::PI),
                    rng.gen_range(0.0..std::f32::consts::PI),
                );

                Placement {
                    primitive,
                    transform: Transform::new().position(position).rotation(rotation),
                    color: Color::random(rng),
                }
            })
            .collect();

        Self { placements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_scene_has_fifty_placements() {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = Scene::random(&mut rng);
        assert_eq!(scene.placements.len(), PLACEMENTS_PER_SCENE);
    }

    #[test]
    fn placements_stay_inside_scatter_cube() {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = Scene::random(&mut rng);
        for placement in &scene.placements {
            let p = placement.transform.position;
            assert!(p.abs().max_element() < SCATTER_EXTENT);
            assert_eq!(placement.transform.scale, Vec3::ONE);
        }
    }

    #[test]
    fn seeded_population_is_deterministic() {
        let a = Scene::random(&mut StdRng::seed_from_u64(42));
        let b = Scene::random(&mut StdRng::seed_from_u64(42));
        for (x, y) in a.placements.iter().zip(&b.placements) {
            assert_eq!(x.primitive, y.primitive);
            assert_eq!(x.transform.position, y.transform.position);
            assert_eq!(x.color, y.color);
        }
    }
}
