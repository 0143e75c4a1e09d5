use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Default scale from Angstroms to scene units.
pub const DEFAULT_DISPLAY_SCALE: f64 = 0.04;
/// Default placement of the molecule origin in the scene.
pub const DEFAULT_DISPLAY_TRANSLATION: [f64; 3] = [-0.6, 0.5, -2.3];

#[derive(Debug, Error, PartialEq)]
#[error("Display scale must be finite and non-zero (got {0})")]
pub struct DisplayTransformError(pub f64);

/// Uniform scale followed by a translation, mapping parsed coordinates into the
/// display space of a scene.
///
/// All geometric heuristics operate on parsed coordinates; this transform only
/// exists for consumers that place visual primitives or rigid bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    scale: f64,
    translation: Vector3<f64>,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self {
            scale: DEFAULT_DISPLAY_SCALE,
            translation: Vector3::from(DEFAULT_DISPLAY_TRANSLATION),
        }
    }
}

impl DisplayTransform {
    pub fn new(scale: f64, translation: Vector3<f64>) -> Result<Self, DisplayTransformError> {
        if !scale.is_finite() || scale == 0.0 || !translation.iter().all(|v| v.is_finite()) {
            return Err(DisplayTransformError(scale));
        }
        Ok(Self { scale, translation })
    }

    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translation: Vector3::zeros(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    pub fn to_display(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(point.coords * self.scale + self.translation)
    }

    pub fn to_model(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from((point.coords - self.translation) / self.scale)
    }

    /// Converts a model-space length into display units.
    pub fn scale_length(&self, length: f64) -> f64 {
        length * self.scale.abs()
    }
}

pub fn to_array(point: &Point3<f64>) -> [f64; 3] {
    [point.x, point.y, point.z]
}
