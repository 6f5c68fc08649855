//! Effective stacking thickness of a layer.

use super::defaults::ResolvedLayer;

/// Minimum slot depth; keeps every layer visible
pub const THICKNESS_FLOOR: f64 = 5.0;

/// Declared depth before flooring. Composites take the max of their members'
/// direct thickness; a nested composite applies the same rule one level down.
pub fn declared_thickness(layer: &ResolvedLayer) -> f64 {
    match layer {
        ResolvedLayer::Element(e) if e.thickness.is_finite() => e.thickness,
        ResolvedLayer::Element(_) => 0.0,
        ResolvedLayer::Composite(members) => members
            .iter()
            .map(declared_thickness)
            .fold(0.0, f64::max),
    }
}

/// Clamp to the floor; non-finite values fall back to it
pub fn apply_floor(thickness: f64) -> f64 {
    if thickness.is_finite() {
        thickness.max(THICKNESS_FLOOR)
    } else {
        THICKNESS_FLOOR
    }
}

pub fn effective_thickness(layer: &ResolvedLayer) -> f64 {
    apply_floor(declared_thickness(layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::defaults::{default_element, Element};
    use shared::{Defaults, ParameterValues};

    fn element(thickness: f64) -> ResolvedLayer {
        let mut e: Element =
            default_element(&Defaults::default(), &ParameterValues::default()).unwrap();
        e.thickness = thickness;
        ResolvedLayer::Element(e)
    }

    #[test]
    fn test_element_thickness() {
        assert_eq!(effective_thickness(&element(18.0)), 18.0);
    }

    #[test]
    fn test_floor_applies() {
        assert_eq!(effective_thickness(&element(2.0)), 5.0);
        assert_eq!(effective_thickness(&element(0.0)), 5.0);
        assert_eq!(effective_thickness(&element(-12.0)), 5.0);
        assert_eq!(effective_thickness(&element(f64::NAN)), 5.0);
        assert_eq!(effective_thickness(&element(f64::INFINITY)), 5.0);
    }

    #[test]
    fn test_composite_takes_member_max() {
        let layer = ResolvedLayer::Composite(vec![element(3.0), element(8.0)]);
        assert_eq!(effective_thickness(&layer), 8.0);
    }

    #[test]
    fn test_composite_floor() {
        let layer = ResolvedLayer::Composite(vec![element(1.0), element(3.0)]);
        assert_eq!(effective_thickness(&layer), 5.0);
        assert_eq!(effective_thickness(&ResolvedLayer::Composite(vec![])), 5.0);
    }

    #[test]
    fn test_nested_composite_one_level_down() {
        let layer = ResolvedLayer::Composite(vec![
            element(6.0),
            ResolvedLayer::Composite(vec![element(4.0), element(12.0)]),
        ]);
        assert_eq!(declared_thickness(&layer), 12.0);
        assert_eq!(effective_thickness(&layer), 12.0);
    }
}
