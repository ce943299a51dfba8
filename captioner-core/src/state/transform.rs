use crate::{
    state::layer::{LayerPatch, TextLayer},
    util::FiniteF32,
};

/// Result of a resize/rotate gesture as reported by a renderer, which scales the node rather
/// than resizing it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformEnd {
    pub x: f32,
    pub y: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl TransformEnd {
    /// Fold the gesture's scale into the layer's width and height, so no scale is ever stored.
    /// Flips are discarded, and the result respects the minimum size.
    #[must_use]
    pub fn normalize(&self, layer: &TextLayer) -> LayerPatch {
        let scale_x = FiniteF32::or(self.scale_x.abs(), 1.0);
        let scale_y = FiniteF32::or(self.scale_y.abs(), 1.0);
        LayerPatch::new(layer.id)
            .position(self.x, self.y)
            .rotation(self.rotation)
            .size(
                (layer.width * scale_x).min(f32::MAX),
                (layer.height * scale_y).min(f32::MAX),
            )
    }
}

/// An affine transform from layer-local space to canvas space. Units are pixels,
/// 0,0 is top left, +X right, +Y down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix {
    /// Column-major matrix elements
    pub elements: [[f32; 2]; 3],
}

impl Default for Matrix {
    fn default() -> Self {
        Self {
            elements: [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
        }
    }
}

impl Matrix {
    /// Rotation *CW* by the layer's angle about its origin, then translation to its position.
    #[must_use]
    pub fn for_layer(layer: &TextLayer) -> Self {
        let (sin, cos) = layer.rotation.to_radians().sin_cos();
        Self {
            elements: [[cos, sin], [-sin, cos], [layer.x, layer.y]],
        }
    }
    #[must_use]
    pub fn apply(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        let [a, b, t] = self.elements;
        [a[0] * x + b[0] * y + t[0], a[1] * x + b[1] * y + t[1]]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{id::LayerID, state::layer::create_default_layer, state::layer::MIN_SIZE};

    #[test]
    fn scale_folds_into_size() {
        let mut layer = create_default_layer(LayerID::from_u128(1), 0.0);
        let end = TransformEnd {
            x: 10.0,
            y: 20.0,
            rotation: 15.0,
            scale_x: 2.0,
            scale_y: 0.5,
        };
        end.normalize(&layer).apply_to(&mut layer);
        assert_eq!((layer.x, layer.y, layer.rotation), (10.0, 20.0, 15.0));
        assert_eq!((layer.width, layer.height), (600.0, 30.0));
    }
    #[test]
    fn never_below_floor() {
        for (sx, sy) in [(0.0, 0.0), (0.01, 0.01), (-0.05, 0.2), (f32::NAN, 1e-9)] {
            let mut layer = create_default_layer(LayerID::from_u128(1), 0.0);
            let end = TransformEnd {
                x: 0.0,
                y: 0.0,
                rotation: 0.0,
                scale_x: sx,
                scale_y: sy,
            };
            end.normalize(&layer).apply_to(&mut layer);
            assert!(layer.width >= MIN_SIZE, "{sx}");
            assert!(layer.height >= MIN_SIZE, "{sy}");
        }
    }
    #[test]
    fn huge_scale_saturates() {
        let mut layer = create_default_layer(LayerID::from_u128(1), 0.0);
        let end = TransformEnd {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: f32::MAX,
            scale_y: 2.0,
        };
        end.normalize(&layer).apply_to(&mut layer);
        assert_eq!(layer.width, f32::MAX);
        assert_eq!(layer.height, 120.0);
    }
    #[test]
    fn flip_discarded() {
        let mut layer = create_default_layer(LayerID::from_u128(1), 0.0);
        let end = TransformEnd {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: -1.0,
            scale_y: 1.0,
        };
        end.normalize(&layer).apply_to(&mut layer);
        assert_eq!(layer.width, 300.0);
    }
    #[test]
    fn layer_matrix() {
        let mut layer = create_default_layer(LayerID::from_u128(1), 0.0);
        layer.rotation = 90.0;
        let [x, y] = Matrix::for_layer(&layer).apply([10.0, 0.0]);
        // Rotating +X clockwise by 90 points it down.
        assert!((x - 60.0).abs() < 1e-4);
        assert!((y - 70.0).abs() < 1e-4);
    }
}
