//! NUUM v1 model import/export
//!
//! Layout, all integers and floats in host byte order:
//!
//! ```text
//! "NUUM" | u16 version | u16 depth | u16 height | u16 width
//! u64 name length | name bytes
//! u16 selected colour | u16 colour count | count * (f32 r, g, b, a)
//! width * height * depth u8 voxels
//! ```
//!
//! Palette slot 0 (the empty colour) is implicit and never written.

use super::model_data::NuumModel;
use super::{PersistenceError, PersistenceResult};
use crate::constants::grid::MAX_GRID_DIM;
use crate::constants::nuum::{MAGIC, MAX_PALETTE_NAME_LEN, VERSION};
use crate::grid::{dump_raw, load_raw, DirtyRegion, VoxelGridData};
use crate::palette::{create_palette, replace_palettes, set_selected_index, PaletteData, PaletteLibrary};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

const UNTITLED_PALETTE: &str = "Untitled";

// ============================================================================
// PRIMITIVES
// ============================================================================

fn read_array<R: Read, const N: usize>(reader: &mut R, what: &str) -> PersistenceResult<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| truncated(e, what))?;
    Ok(buf)
}

fn read_u16<R: Read>(reader: &mut R, what: &str) -> PersistenceResult<u16> {
    Ok(u16::from_ne_bytes(read_array(reader, what)?))
}

fn read_u64<R: Read>(reader: &mut R, what: &str) -> PersistenceResult<u64> {
    Ok(u64::from_ne_bytes(read_array(reader, what)?))
}

fn read_f32<R: Read>(reader: &mut R, what: &str) -> PersistenceResult<f32> {
    Ok(f32::from_ne_bytes(read_array(reader, what)?))
}

fn truncated(error: std::io::Error, what: &str) -> PersistenceError {
    if error.kind() == ErrorKind::UnexpectedEof {
        PersistenceError::CorruptedData(format!("file ends inside {}", what))
    } else {
        PersistenceError::IoError(error)
    }
}

fn validate_dimension(value: u16, axis: &str) -> PersistenceResult<u32> {
    if value == 0 || value as u32 > MAX_GRID_DIM {
        return Err(PersistenceError::CorruptedData(format!(
            "{} {} outside 1..={}",
            axis, value, MAX_GRID_DIM
        )));
    }
    Ok(value as u32)
}

// ============================================================================
// EXPORT
// ============================================================================

/// Encode a grid and its palette as NUUM v1
///
/// # Returns
/// An error if a dimension does not fit the header, the palette has no
/// colours, or the writer fails. A failed write may leave partial output.
pub fn write_model<W: Write>(
    writer: &mut W,
    grid: &VoxelGridData,
    palette: &PaletteData,
) -> PersistenceResult<()> {
    for (axis, value) in [("width", grid.width), ("height", grid.height), ("depth", grid.depth)] {
        if value == 0 || value > MAX_GRID_DIM {
            return Err(PersistenceError::SerializationError(format!(
                "{} {} does not fit a NUUM header",
                axis, value
            )));
        }
    }

    let colors = palette.colors.get(1..).unwrap_or(&[]);
    if colors.is_empty() || colors.len() > u16::MAX as usize {
        return Err(PersistenceError::SerializationError(format!(
            "palette '{}' has {} colours",
            palette.name,
            colors.len()
        )));
    }

    let name = if palette.name.is_empty() {
        UNTITLED_PALETTE
    } else {
        palette.name.as_str()
    };

    writer.write_all(&MAGIC)?;
    writer.write_all(&VERSION.to_ne_bytes())?;
    writer.write_all(&(grid.depth as u16).to_ne_bytes())?;
    writer.write_all(&(grid.height as u16).to_ne_bytes())?;
    writer.write_all(&(grid.width as u16).to_ne_bytes())?;

    writer.write_all(&(name.len() as u64).to_ne_bytes())?;
    writer.write_all(name.as_bytes())?;
    writer.write_all(&palette.selected_index.to_ne_bytes())?;
    writer.write_all(&(colors.len() as u16).to_ne_bytes())?;
    for color in colors {
        for channel in color {
            writer.write_all(&channel.to_ne_bytes())?;
        }
    }

    writer.write_all(&dump_raw(grid))?;
    Ok(())
}

/// Export to a file
pub fn save_model(path: &Path, grid: &VoxelGridData, palette: &PaletteData) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_model(&mut writer, grid, palette)?;
    writer.flush()?;

    log::info!(
        "[Persistence] Exported {}x{}x{} model with palette '{}' to {}",
        grid.width,
        grid.height,
        grid.depth,
        palette.name,
        path.display()
    );
    Ok(())
}

// ============================================================================
// IMPORT
// ============================================================================

/// Decode and validate a NUUM v1 stream
///
/// Nothing outside the returned model is touched, so a failure here can
/// never leave a half-loaded grid.
pub fn read_model<R: Read>(reader: &mut R) -> PersistenceResult<NuumModel> {
    let magic: [u8; 4] = read_array(reader, "magic")?;
    if magic != MAGIC {
        return Err(PersistenceError::InvalidMagic(magic));
    }

    let version = read_u16(reader, "version")?;
    if version != VERSION {
        return Err(PersistenceError::VersionMismatch {
            expected: VERSION,
            found: version,
        });
    }

    let depth = validate_dimension(read_u16(reader, "header")?, "depth")?;
    let height = validate_dimension(read_u16(reader, "header")?, "height")?;
    let width = validate_dimension(read_u16(reader, "header")?, "width")?;

    let name_len = read_u64(reader, "palette name length")?;
    if name_len == 0 || name_len > MAX_PALETTE_NAME_LEN {
        return Err(PersistenceError::CorruptedData(format!(
            "palette name length {}",
            name_len
        )));
    }
    let mut name_bytes = vec![0u8; name_len as usize];
    reader
        .read_exact(&mut name_bytes)
        .map_err(|e| truncated(e, "palette name"))?;
    let name = String::from_utf8_lossy(&name_bytes).into_owned();

    let selected_index = read_u16(reader, "palette header")?;
    let color_count = read_u16(reader, "palette header")?;
    if color_count == 0 {
        return Err(PersistenceError::CorruptedData(
            "palette has no colours".to_string(),
        ));
    }

    let mut colors = Vec::with_capacity(color_count as usize);
    for _ in 0..color_count {
        colors.push([
            read_f32(reader, "palette colours")?,
            read_f32(reader, "palette colours")?,
            read_f32(reader, "palette colours")?,
            read_f32(reader, "palette colours")?,
        ]);
    }

    let mut voxels = vec![0u8; width as usize * height as usize * depth as usize];
    reader
        .read_exact(&mut voxels)
        .map_err(|e| truncated(e, "voxel data"))?;

    let mut palette = create_palette(name, colors);
    if !set_selected_index(&mut palette, selected_index) {
        log::warn!(
            "[Persistence] Selected colour {} out of range for '{}', keeping {}",
            selected_index,
            palette.name,
            palette.selected_index
        );
    }

    Ok(NuumModel {
        width,
        height,
        depth,
        palette,
        voxels,
    })
}

/// Import from a file
pub fn load_model(path: &Path) -> PersistenceResult<NuumModel> {
    let file = File::open(path)?;
    let model = read_model(&mut BufReader::new(file))?;

    log::info!(
        "[Persistence] Imported {}x{}x{} model with palette '{}' from {}",
        model.width,
        model.height,
        model.depth,
        model.palette.name,
        path.display()
    );
    Ok(model)
}

/// Replace grid contents and palettes with a decoded model
///
/// The grid is replaced first; if it rejects the data neither the grid nor
/// the palettes change.
pub fn apply_model(
    model: NuumModel,
    grid: &mut VoxelGridData,
    palettes: &mut PaletteLibrary,
) -> PersistenceResult<DirtyRegion> {
    let region = load_raw(grid, &model.voxels, model.width, model.height, model.depth)?;
    replace_palettes(palettes, model.palette);
    Ok(region)
}
