//! Upload operations - turn dirty regions into texture uploads

use super::upload_data::{GridUniform, UploadError, UploadResult};
use crate::grid::{DirtyRegion, VoxelGridData, VoxelPos};

/// Receiver for voxel and occupancy texture data
///
/// Voxel payloads are tightly packed R32F texels (native-endian `f32` bytes),
/// occupancy payloads are R8 texels. Extents are `[x, y, z]`, x fastest.
pub trait VolumeUploader {
    /// Replace the whole voxel texture, reallocating if the size changed
    fn upload_volume(&mut self, size: [u32; 3], texels: &[u8]) -> UploadResult<()>;

    /// Overwrite a box of the voxel texture
    fn upload_sub_region(&mut self, offset: [u32; 3], size: [u32; 3], texels: &[u8]) -> UploadResult<()>;

    /// Replace the whole occupancy texture
    fn upload_occupancy(&mut self, size: [u32; 3], texels: &[u8]) -> UploadResult<()>;

    /// Overwrite a box of the occupancy texture
    fn upload_occupancy_sub_region(
        &mut self,
        offset: [u32; 3],
        size: [u32; 3],
        texels: &[u8],
    ) -> UploadResult<()>;
}

/// Uniform describing the grid to shaders
pub fn build_grid_uniform(grid: &VoxelGridData) -> GridUniform {
    let brick_grid = grid
        .bricks
        .as_ref()
        .map(|b| {
            [
                b.bricks_x as f32,
                b.bricks_y as f32,
                b.bricks_z as f32,
                b.brick_size as f32,
            ]
        })
        .unwrap_or([0.0; 4]);

    GridUniform {
        grid_size: [grid.width as f32, grid.height as f32, grid.depth as f32, 1.0],
        brick_grid,
    }
}

/// Clip a region to the grid, returning (offset, size) or None if empty
fn clip_region(grid: &VoxelGridData, region: &DirtyRegion) -> Option<([u32; 3], [u32; 3])> {
    let lo = [region.min.x.max(0), region.min.y.max(0), region.min.z.max(0)];
    let hi = [
        region.max.x.min(grid.width as i32),
        region.max.y.min(grid.height as i32),
        region.max.z.min(grid.depth as i32),
    ];
    if (0..3).any(|a| lo[a] >= hi[a]) {
        return None;
    }
    Some((
        [lo[0] as u32, lo[1] as u32, lo[2] as u32],
        [(hi[0] - lo[0]) as u32, (hi[1] - lo[1]) as u32, (hi[2] - lo[2]) as u32],
    ))
}

/// Copy the voxels of a region (clipped to the grid) in x-fastest order
pub fn extract_region(grid: &VoxelGridData, region: &DirtyRegion) -> Vec<f32> {
    let Some((offset, size)) = clip_region(grid, region) else {
        return Vec::new();
    };

    let row = size[0] as usize;
    let mut cutout = Vec::with_capacity(row * size[1] as usize * size[2] as usize);
    for z in offset[2]..offset[2] + size[2] {
        for y in offset[1]..offset[1] + size[1] {
            let start = z as usize * grid.width as usize * grid.height as usize
                + y as usize * grid.width as usize
                + offset[0] as usize;
            cutout.extend_from_slice(&grid.voxels[start..start + row]);
        }
    }
    cutout
}

/// Occupancy bytes for every brick overlapping the region
///
/// # Returns
/// (brick offset, brick extent, bytes), or None without a summary or for an empty region
pub fn extract_occupancy_region(
    grid: &VoxelGridData,
    region: &DirtyRegion,
) -> Option<([u32; 3], [u32; 3], Vec<u8>)> {
    let bricks = grid.bricks.as_ref()?;
    let (offset, size) = clip_region(grid, region)?;
    let bs = bricks.brick_size;

    let lo = [offset[0] / bs, offset[1] / bs, offset[2] / bs];
    let hi = [
        (offset[0] + size[0]).div_ceil(bs),
        (offset[1] + size[1]).div_ceil(bs),
        (offset[2] + size[2]).div_ceil(bs),
    ];

    let mut bytes = Vec::new();
    for bz in lo[2]..hi[2] {
        for by in lo[1]..hi[1] {
            let start = bz as usize * bricks.bricks_x as usize * bricks.bricks_y as usize
                + by as usize * bricks.bricks_x as usize;
            bytes.extend_from_slice(&bricks.occupancy[start + lo[0] as usize..start + hi[0] as usize]);
        }
    }

    Some((lo, [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]], bytes))
}

/// Push whatever a mutation reported as dirty
///
/// Full-volume regions re-upload both textures. Otherwise the voxel cutout
/// is uploaded, plus the covering occupancy bricks when any brick flipped.
pub fn sync_dirty_region<U: VolumeUploader + ?Sized>(
    uploader: &mut U,
    grid: &VoxelGridData,
    region: &DirtyRegion,
) -> UploadResult<()> {
    let volume = [grid.width, grid.height, grid.depth];

    if region.full_volume {
        log::debug!("[Upload] Full volume {:?}", volume);
        uploader.upload_volume(volume, bytemuck::cast_slice::<f32, u8>(&grid.voxels))?;
        if let Some(bricks) = grid.bricks.as_ref() {
            uploader.upload_occupancy(
                [bricks.bricks_x, bricks.bricks_y, bricks.bricks_z],
                &bricks.occupancy,
            )?;
        }
        return Ok(());
    }

    if region.min.x < 0
        || region.min.y < 0
        || region.min.z < 0
        || region.max.x > grid.width as i32
        || region.max.y > grid.height as i32
        || region.max.z > grid.depth as i32
    {
        let (x, y, z) = region.size();
        return Err(UploadError::RegionOutOfBounds {
            offset: [region.min.x as u32, region.min.y as u32, region.min.z as u32],
            size: [x, y, z],
            volume,
        });
    }

    let Some((offset, size)) = clip_region(grid, region) else {
        return Ok(());
    };
    let cutout = extract_region(grid, region);
    uploader.upload_sub_region(offset, size, bytemuck::cast_slice::<f32, u8>(&cutout))?;

    if region.occupancy_changed {
        if let Some((brick_offset, brick_size, bytes)) = extract_occupancy_region(grid, region) {
            uploader.upload_occupancy_sub_region(brick_offset, brick_size, &bytes)?;
        }
    }

    log::debug!(
        "[Upload] Sub-region {} + {:?} (occupancy: {})",
        VoxelPos::new(offset[0] as i32, offset[1] as i32, offset[2] as i32),
        size,
        region.occupancy_changed
    );
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grid::{create_grid, set_region, set_voxel, GridDescriptor};

    /// Uploader that records every call
    #[derive(Debug, Default)]
    pub(crate) struct RecordingUploader {
        pub volumes: Vec<([u32; 3], usize)>,
        pub sub_regions: Vec<([u32; 3], [u32; 3], Vec<f32>)>,
        pub occupancy: Vec<([u32; 3], Vec<u8>)>,
        pub occupancy_regions: Vec<([u32; 3], [u32; 3], Vec<u8>)>,
    }

    impl VolumeUploader for RecordingUploader {
        fn upload_volume(&mut self, size: [u32; 3], texels: &[u8]) -> UploadResult<()> {
            self.volumes.push((size, texels.len()));
            Ok(())
        }

        fn upload_sub_region(&mut self, offset: [u32; 3], size: [u32; 3], texels: &[u8]) -> UploadResult<()> {
            let values = texels
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            self.sub_regions.push((offset, size, values));
            Ok(())
        }

        fn upload_occupancy(&mut self, size: [u32; 3], texels: &[u8]) -> UploadResult<()> {
            self.occupancy.push((size, texels.to_vec()));
            Ok(())
        }

        fn upload_occupancy_sub_region(
            &mut self,
            offset: [u32; 3],
            size: [u32; 3],
            texels: &[u8],
        ) -> UploadResult<()> {
            self.occupancy_regions.push((offset, size, texels.to_vec()));
            Ok(())
        }
    }

    fn grid() -> VoxelGridData {
        create_grid(&GridDescriptor {
            width: 16,
            height: 8,
            depth: 8,
            brick_size: Some(8),
        })
        .expect("valid grid")
    }

    #[test]
    fn test_grid_uniform() {
        let g = grid();
        let uniform = build_grid_uniform(&g);
        assert_eq!(uniform.grid_size, [16.0, 8.0, 8.0, 1.0]);
        assert_eq!(uniform.brick_grid, [2.0, 1.0, 1.0, 8.0]);
    }

    #[test]
    fn test_extract_region_order() {
        let mut g = grid();
        set_voxel(&mut g, VoxelPos::new(2, 1, 1), 0.25);
        set_voxel(&mut g, VoxelPos::new(1, 2, 1), 0.5);
        let region = DirtyRegion {
            min: VoxelPos::new(1, 1, 1),
            max: VoxelPos::new(3, 3, 2),
            full_volume: false,
            occupancy_changed: false,
        };
        assert_eq!(extract_region(&g, &region), vec![0.0, 0.25, 0.5, 0.0]);
    }

    #[test]
    fn test_single_voxel_sync() {
        let mut g = grid();
        let region = set_voxel(&mut g, VoxelPos::new(9, 0, 0), 0.5).expect("in bounds");
        let mut uploader = RecordingUploader::default();
        sync_dirty_region(&mut uploader, &g, &region).expect("upload");

        assert!(uploader.volumes.is_empty());
        assert_eq!(uploader.sub_regions, vec![([9, 0, 0], [1, 1, 1], vec![0.5])]);
        assert_eq!(uploader.occupancy_regions, vec![([1, 0, 0], [1, 1, 1], vec![255])]);
    }

    #[test]
    fn test_region_sync_spanning_bricks() {
        let mut g = grid();
        let region = set_region(&mut g, &[0.5; 8], VoxelPos::new(7, 0, 0), VoxelPos::new(9, 2, 2))
            .expect("sizes match")
            .expect("inside grid");
        let mut uploader = RecordingUploader::default();
        sync_dirty_region(&mut uploader, &g, &region).expect("upload");

        assert_eq!(uploader.sub_regions[0].1, [2, 2, 2]);
        assert_eq!(uploader.occupancy_regions, vec![([0, 0, 0], [2, 1, 1], vec![255, 255])]);
    }

    #[test]
    fn test_full_volume_sync() {
        let g = grid();
        let region = DirtyRegion::whole_grid(16, 8, 8);
        let mut uploader = RecordingUploader::default();
        sync_dirty_region(&mut uploader, &g, &region).expect("upload");

        assert_eq!(uploader.volumes, vec![([16, 8, 8], 16 * 8 * 8 * 4)]);
        assert_eq!(uploader.occupancy, vec![([2, 1, 1], vec![0, 0])]);
        assert!(uploader.sub_regions.is_empty());
    }

    #[test]
    fn test_out_of_bounds_region_rejected() {
        let g = grid();
        let region = DirtyRegion {
            min: VoxelPos::new(15, 0, 0),
            max: VoxelPos::new(17, 1, 1),
            full_volume: false,
            occupancy_changed: false,
        };
        let mut uploader = RecordingUploader::default();
        assert!(matches!(
            sync_dirty_region(&mut uploader, &g, &region),
            Err(UploadError::RegionOutOfBounds { .. })
        ));
    }
}
