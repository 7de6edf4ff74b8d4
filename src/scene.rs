//! Scene storage: meshes, lights and objects in flat arenas.
//!
//! Everything an object needs is addressed through small id newtypes handed
//! out by [`Scene`]. Objects are plain values owned by the scene; they live
//! exactly as long as it does and reference their mesh and light group by id
//! rather than by pointer.

use crate::color::Rgb;
use crate::light::DirectionalLight;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::mesh::Mesh;
use crate::render::rasterizer::ScreenVertex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectId(pub(crate) usize);

/// Placement parameters for spawning an object.
pub struct ObjectDef {
    pub mesh: MeshId,
    pub light: LightId,
    pub scale: f32,
    pub position: Vec3,
    /// Rotation about X in radians. Stored on the object but not part of the
    /// composed model transform (see [`Object::model_transform`]).
    pub rotation_x: f32,
    /// Rotation about Y in radians.
    pub rotation_y: f32,
    /// Whether the lighting stage scales vertex colors for this object.
    pub lit: bool,
    pub active: bool,
}

/// An instance of a mesh placed in the scene.
///
/// The `transformed_*` and `screen_vertices` buffers are derived data: the
/// transform stage overwrites them in full every frame, so they only ever
/// hold the latest frame's values.
pub struct Object {
    mesh: MeshId,
    light: LightId,
    scaling: Mat4,
    #[allow(dead_code)]
    rotation_x: Mat4,
    rotation_y: Mat4,
    translation: Mat4,
    pub active: bool,
    pub lit: bool,
    pub(crate) transformed_positions: Vec<Vec4>,
    pub(crate) transformed_normals: Vec<Vec4>,
    pub(crate) transformed_colors: Vec<u32>,
    pub(crate) screen_vertices: Vec<ScreenVertex>,
}

impl Object {
    fn new(def: &ObjectDef, vertex_count: usize) -> Self {
        Self {
            mesh: def.mesh,
            light: def.light,
            scaling: Mat4::scaling_uniform(def.scale),
            rotation_x: Mat4::rotation_x(def.rotation_x),
            rotation_y: Mat4::rotation_y(def.rotation_y),
            translation: Mat4::translation(def.position),
            active: def.active,
            lit: def.lit,
            transformed_positions: vec![Vec4::ZERO; vertex_count],
            transformed_normals: vec![Vec4::ZERO; vertex_count],
            transformed_colors: vec![0; vertex_count],
            screen_vertices: vec![ScreenVertex::new(0, 0, 0); vertex_count],
        }
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn light(&self) -> LightId {
        self.light
    }

    /// Model transform: `translation * rotation_y * scaling`.
    ///
    /// The stored X rotation is deliberately left out of the composition; the
    /// renderer this reproduces never applied it during update.
    pub fn model_transform(&self) -> Mat4 {
        self.translation * self.rotation_y * self.scaling
    }

    /// Moves the object by composing a further translation, as used to orbit
    /// objects between frames.
    pub fn translate(&mut self, delta: Vec3) {
        self.translation = self.translation * Mat4::translation(delta);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.translation = Mat4::translation(position);
    }

    pub fn set_rotation_y(&mut self, angle: f32) {
        self.rotation_y = Mat4::rotation_y(angle);
    }
}

/// All render input for one pipeline instance.
#[derive(Default)]
pub struct Scene {
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) lights: Vec<DirectionalLight>,
    pub(crate) objects: Vec<Object>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_light(&mut self, light: DirectionalLight) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    /// Spawns an object; derived buffers are sized to its mesh up front so
    /// the per-frame stages never allocate.
    pub fn add_object(&mut self, def: ObjectDef) -> ObjectId {
        let vertex_count = self.meshes[def.mesh.0].len();
        self.objects.push(Object::new(&def, vertex_count));
        ObjectId(self.objects.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn light(&self, id: LightId) -> &DirectionalLight {
        &self.lights[id.0]
    }

    pub fn light_mut(&mut self, id: LightId) -> &mut DirectionalLight {
        &mut self.lights[id.0]
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.0]
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_scene() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(Mesh::cube(Rgb::new(200, 60, 60)));
        let light = scene.add_light(DirectionalLight::new(Vec4::direction(0.0, 1.0, 0.0)));
        let object = scene.add_object(ObjectDef {
            mesh,
            light,
            scale: 2.0,
            position: Vec3::new(0.0, 0.0, -10.0),
            rotation_x: 0.5,
            rotation_y: 0.0,
            lit: true,
            active: true,
        });
        (scene, object)
    }

    #[test]
    fn derived_buffers_match_mesh_size() {
        let (scene, id) = test_scene();
        let object = scene.object(id);
        assert_eq!(object.transformed_positions.len(), 8);
        assert_eq!(object.screen_vertices.len(), 8);
    }

    #[test]
    fn model_transform_ignores_x_rotation() {
        let (scene, id) = test_scene();
        // With rotation_x excluded, the composition is translate * rot_y(0) *
        // scale, so a unit Y point maps straight to scale + translation.
        let v = scene.object(id).model_transform() * Vec4::point(0.0, 1.0, 0.0);
        assert_relative_eq!(v.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, -10.0, epsilon = 1e-6);
    }

    #[test]
    fn translate_accumulates() {
        let (mut scene, id) = test_scene();
        scene.object_mut(id).translate(Vec3::new(1.0, 0.0, 0.0));
        scene.object_mut(id).translate(Vec3::new(1.0, 0.0, 0.0));
        let v = scene.object(id).model_transform() * Vec4::point(0.0, 0.0, 0.0);
        assert_relative_eq!(v.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(v.z, -10.0, epsilon = 1e-5);
    }
}
