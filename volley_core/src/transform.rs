// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation / rotation / scale decomposition of 2-D affine transforms.
//!
//! Spawn transforms are plain [`kurbo::Affine`] values. Virtual muzzles and
//! the mirror inversion need to edit one component (the rotation, or the sign
//! of a translation axis) and put the transform back together, which is what
//! [`TransformParts`] is for. Angles are in degrees throughout the crate.

use kurbo::{Affine, Point, Vec2};

/// An affine transform split into translation, rotation and scale.
///
/// [`compose`](Self::compose) rebuilds `T * R * S`. Skew is not represented;
/// decomposing a skewed transform folds the skew into the Y scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParts {
    /// Translation component.
    pub translation: Vec2,
    /// Rotation in degrees, counter-clockwise from +X.
    pub rotation: f64,
    /// Per-axis scale.
    pub scale: Vec2,
}

impl TransformParts {
    /// The identity transform's parts.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Splits `transform` into its parts.
    #[must_use]
    pub fn decompose(transform: Affine) -> Self {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        let x_axis = Vec2::new(a, b);
        let sx = x_axis.hypot();
        let det = a * d - b * c;
        let (rotation, scale) = if sx > 0.0 {
            (x_axis.atan2(), Vec2::new(sx, det / sx))
        } else {
            // Degenerate X axis: take the rotation from the Y axis instead,
            // turned back a quarter so it lines up with +X.
            let y_axis = Vec2::new(d, -c);
            (y_axis.atan2(), Vec2::new(0.0, y_axis.hypot()))
        };
        Self {
            translation: Vec2::new(e, f),
            rotation: rotation.to_degrees(),
            scale,
        }
    }

    /// Rebuilds the transform as translation * rotation * scale.
    #[must_use]
    pub fn compose(&self) -> Affine {
        Affine::translate(self.translation)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

impl From<Affine> for TransformParts {
    fn from(transform: Affine) -> Self {
        Self::decompose(transform)
    }
}

/// Returns the angle in degrees of the vector from `src` to `dest`, in
/// `(-180, 180]`.
#[must_use]
pub fn direction(src: Point, dest: Point) -> f64 {
    let degrees = (dest - src).atan2().to_degrees();
    // atan2(-0.0, x < 0) is -pi.
    if degrees <= -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// Rotates `vector` by `degrees` counter-clockwise.
#[must_use]
pub fn rotate_vector(vector: Vec2, degrees: f64) -> Vec2 {
    (Affine::rotate(degrees.to_radians()) * vector.to_point()).to_vec2()
}
