//! Built-in model library
//!
//! Maps the scene's resource names to procedurally generated meshes. The
//! rasterizer resolves [`ModelHandle`]s against the shared [`MeshTable`].

use std::sync::Arc;

use hashbrown::HashMap;
use skyfly_core::{AssetError, AssetLoader, ModelHandle};

use crate::procedural::{Mesh, generate_city, generate_skydome, generate_terrain};

/// Resource name of the terrain model
pub const TERRAIN_MODEL: &str = "rom:/city_terrain.t3dm";
/// Resource name of the city model
pub const CITY_MODEL: &str = "rom:/city.t3dm";
/// Resource name of the sky dome model
pub const SKYDOME_MODEL: &str = "rom:/skydome.t3dm";

/// Meshes indexed by [`ModelHandle`]
#[derive(Debug, Clone, Default)]
pub struct MeshTable {
    meshes: Arc<[Mesh]>,
}

impl MeshTable {
    pub fn get(&self, handle: ModelHandle) -> Option<&Mesh> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

/// Name-addressed store of built-in meshes
#[derive(Debug)]
pub struct ModelLibrary {
    names: HashMap<String, ModelHandle>,
    table: MeshTable,
    loaded: Vec<ModelHandle>,
}

impl ModelLibrary {
    /// Library with the terrain, city and sky dome registered
    pub fn builtin() -> Self {
        Self::from_meshes([
            (TERRAIN_MODEL, generate_terrain()),
            (CITY_MODEL, generate_city()),
            (SKYDOME_MODEL, generate_skydome()),
        ])
    }

    /// Library from explicit (name, mesh) pairs, handles in iteration order
    pub fn from_meshes<'a>(entries: impl IntoIterator<Item = (&'a str, Mesh)>) -> Self {
        let mut names = HashMap::new();
        let mut meshes = Vec::new();
        for (name, mesh) in entries {
            let handle = ModelHandle(meshes.len() as u32);
            if names.insert(name.to_string(), handle).is_some() {
                tracing::warn!("model '{name}' registered twice, keeping the later mesh");
            }
            meshes.push(mesh);
        }

        Self {
            names,
            table: MeshTable {
                meshes: meshes.into(),
            },
            loaded: Vec::new(),
        }
    }

    /// Shared mesh table for the rasterizer
    pub fn table(&self) -> MeshTable {
        self.table.clone()
    }

    /// Handles returned by `load_model` so far
    pub fn loaded(&self) -> &[ModelHandle] {
        &self.loaded
    }
}

impl AssetLoader for ModelLibrary {
    fn load_model(&mut self, name: &str) -> Result<ModelHandle, AssetError> {
        let handle = *self
            .names
            .get(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;

        let triangles = self.table.get(handle).map(Mesh::triangle_count).unwrap_or(0);
        if triangles == 0 {
            return Err(AssetError::Invalid {
                name: name.to_string(),
                reason: "mesh has no triangles".to_string(),
            });
        }

        tracing::debug!("loaded model '{name}' ({triangles} triangles)");
        self.loaded.push(handle);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_resolve() {
        let mut library = ModelLibrary::builtin();
        let terrain = library.load_model(TERRAIN_MODEL).unwrap();
        let city = library.load_model(CITY_MODEL).unwrap();
        let sky = library.load_model(SKYDOME_MODEL).unwrap();
        assert_ne!(terrain, city);
        assert_ne!(city, sky);
        assert_eq!(library.loaded(), &[terrain, city, sky]);
        assert!(library.table().get(sky).is_some());
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let mut library = ModelLibrary::builtin();
        assert_eq!(
            library.load_model("rom:/castle.t3dm"),
            Err(AssetError::NotFound("rom:/castle.t3dm".to_string()))
        );
        assert!(library.loaded().is_empty());
    }

    #[test]
    fn test_empty_mesh_is_invalid() {
        let mut library = ModelLibrary::from_meshes([("rom:/empty.t3dm", Mesh::new())]);
        assert!(matches!(
            library.load_model("rom:/empty.t3dm"),
            Err(AssetError::Invalid { .. })
        ));
    }
}
