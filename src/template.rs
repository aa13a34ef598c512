use bevy::prelude::*;

use crate::attributes::SizeChanged;

/// Edge length the template is built with before any size change arrives.
pub const DEFAULT_SIZE: f32 = 100.0;

/// Prototype cube from which spiral copies are stamped.
///
/// Built the way a modeler would: a square base face with one corner on the
/// origin, extruded upward by the edge length. Instances reference this
/// shared geometry, so a rebuild resizes every copy at once.
#[derive(Resource, Clone, Debug)]
pub struct CubeTemplate {
    size: f32,
    corners: [Vec3; 8],
}

impl Default for CubeTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl CubeTemplate {
    pub fn new(size: f32) -> Self {
        let mut template = Self {
            size,
            corners: [Vec3::ZERO; 8],
        };
        template.rebuild(size);
        template
    }

    /// Discards the current geometry and regenerates it at the new edge
    /// length. Destructive, but never invoked while a toggle change is being
    /// handled in the same notification.
    pub fn rebuild(&mut self, size: f32) {
        self.size = size;
        let base = [
            Vec3::ZERO,
            Vec3::new(size, 0.0, 0.0),
            Vec3::new(size, 0.0, size),
            Vec3::new(0.0, 0.0, size),
        ];
        for (i, corner) in base.into_iter().enumerate() {
            self.corners[i] = corner;
            // Extrude the base face upward to close the solid.
            self.corners[i + 4] = corner + Vec3::Y * size;
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn corners(&self) -> &[Vec3; 8] {
        &self.corners
    }

    /// Axis-aligned bounds of the template geometry.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.corners.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), corner| (min.min(*corner), max.max(*corner)),
        )
    }

    /// Bounding box center, used as the pivot when scaling a copy so the
    /// shrink does not also translate it.
    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }
}

/// Rebuilds the template whenever a size change survives the observer's
/// toggle-priority check. Multiple changes in one frame collapse into a
/// single rebuild at the latest size.
pub fn rebuild_template(mut sizes: EventReader<SizeChanged>, mut template: ResMut<CubeTemplate>) {
    if let Some(event) = sizes.read().last() {
        template.rebuild(event.size);
    }
}
