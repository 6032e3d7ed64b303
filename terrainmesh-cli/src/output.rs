//! Writing assembled terrain to disk.
//!
//! An assembly written to `area.obj` produces:
//!
//! ```text
//! area.obj            one object per tile, Z up, render-box units
//! area.mtl            one material per tile, textured with its imagery
//! area.json           scene manifest (bbox, scale, per-tile grid sizes)
//! area_textures/      imagery as downloaded, named zoom_x_y.<ext>
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use terrainmesh::scene::{GridMesh, SceneManifest, TerrainGroup};

use crate::error::CliError;

/// Paths of the files produced by [`write_scene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFiles {
    pub obj: PathBuf,
    pub mtl: PathBuf,
    pub manifest: PathBuf,
    pub texture_dir: PathBuf,
    pub textures_written: usize,
}

/// Writes the OBJ, MTL, manifest and textures for `group` next to `obj_path`.
pub fn write_scene(
    obj_path: &Path,
    group: &TerrainGroup<GridMesh>,
    manifest: &SceneManifest,
) -> Result<SceneFiles, CliError> {
    let stem = obj_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "terrain".to_string());
    let dir = obj_path.parent().unwrap_or_else(|| Path::new(""));

    let texture_dir_name = format!("{}_textures", stem);
    let files = SceneFiles {
        obj: obj_path.to_path_buf(),
        mtl: dir.join(format!("{}.mtl", stem)),
        manifest: dir.join(format!("{}.json", stem)),
        texture_dir: dir.join(&texture_dir_name),
        textures_written: 0,
    };

    fs::create_dir_all(&files.texture_dir).map_err(|e| write_error(&files.texture_dir, e))?;

    let mut textures_written = 0;
    for mesh in group {
        if mesh.texture.is_empty() {
            continue;
        }
        let path = files.texture_dir.join(texture_file_name(mesh));
        fs::write(&path, &mesh.texture).map_err(|e| write_error(&path, e))?;
        textures_written += 1;
    }

    create_with(&files.mtl, |out| write_mtl(group, &texture_dir_name, out))?;

    let mtl_name = format!("{}.mtl", stem);
    create_with(&files.obj, |out| write_obj(group, Some(&mtl_name), out))?;

    create_with(&files.manifest, |out| {
        serde_json::to_writer_pretty(&mut *out, manifest)?;
        writeln!(out)
    })?;

    Ok(SceneFiles {
        textures_written,
        ..files
    })
}

/// Writes every mesh as a Wavefront object with positions, UVs and faces.
pub fn write_obj<W: Write>(
    group: &TerrainGroup<GridMesh>,
    mtllib: Option<&str>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "# {} ({} tiles)", group.name(), group.len())?;
    if let Some(mtllib) = mtllib {
        writeln!(out, "mtllib {}", mtllib)?;
    }

    // OBJ indices are 1-based and global across objects
    let mut base = 1u64;
    for mesh in group {
        let name = material_name(mesh);
        writeln!(out, "o {}", name)?;
        if mtllib.is_some() {
            writeln!(out, "usemtl {}", name)?;
        }

        for v in mesh.vertices.chunks_exact(3) {
            writeln!(out, "v {} {} {}", v[0], v[1], v[2])?;
        }
        for uv in mesh.uvs.chunks_exact(2) {
            writeln!(out, "vt {} {}", uv[0], uv[1])?;
        }
        for face in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (
                base + face[0] as u64,
                base + face[1] as u64,
                base + face[2] as u64,
            );
            writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?;
        }

        base += mesh.vertex_count() as u64;
    }
    Ok(())
}

/// Writes one material per mesh pointing at its texture file.
pub fn write_mtl<W: Write>(
    group: &TerrainGroup<GridMesh>,
    texture_dir: &str,
    out: &mut W,
) -> io::Result<()> {
    for mesh in group {
        writeln!(out, "newmtl {}", material_name(mesh))?;
        writeln!(out, "Kd 1.000 1.000 1.000")?;
        if !mesh.texture.is_empty() {
            writeln!(out, "map_Kd {}/{}", texture_dir, texture_file_name(mesh))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn material_name(mesh: &GridMesh) -> String {
    let p = mesh.position;
    format!("tile_{}_{}_{}", p.zoom, p.x, p.y)
}

fn texture_file_name(mesh: &GridMesh) -> String {
    let p = mesh.position;
    format!("{}_{}_{}.{}", p.zoom, p.x, p.y, texture_extension(&mesh.texture))
}

/// File extension for encoded image bytes, by magic number.
fn texture_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, ..] => "jpg",
        [0x89, b'P', b'N', b'G', ..] => "png",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        _ => "bin",
    }
}

fn create_with<F>(path: &Path, write: F) -> Result<(), CliError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(|e| write_error(path, e))?;
    let mut out = BufWriter::new(file);
    write(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| write_error(path, e))
}

fn write_error(path: &Path, error: io::Error) -> CliError {
    CliError::FileWrite {
        path: path.display().to_string(),
        error,
    }
}
