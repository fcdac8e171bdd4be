use super::Coordinate;

/// Default distance the camera keeps from a focused node.
pub const FOCUS_DISTANCE: f64 = 100.0;

/// Camera position that frames `target`: slide outward along the ray from
/// the origin through the node, keeping `distance` units past it. A node at
/// the origin has no usable ray, so the camera backs off along z instead.
pub fn focus_position(target: Coordinate, distance: f64) -> Coordinate {
    let len = (target.x * target.x + target.y * target.y + target.z * target.z).sqrt();
    if len == 0.0 {
        return Coordinate::new(0.0, 0.0, distance);
    }
    let ratio = 1.0 + distance / len;
    Coordinate::new(target.x * ratio, target.y * ratio, target.z * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_backs_off_along_the_origin_ray() {
        let pos = focus_position(Coordinate::new(30.0, 0.0, 40.0), 100.0);
        // len = 50, ratio = 3
        assert!((pos.x - 90.0).abs() < 1e-9);
        assert!((pos.y - 0.0).abs() < 1e-9);
        assert!((pos.z - 120.0).abs() < 1e-9);
    }

    #[test]
    fn origin_node_gets_a_z_offset() {
        let pos = focus_position(Coordinate::ORIGIN, 100.0);
        assert_eq!(pos, Coordinate::new(0.0, 0.0, 100.0));
    }
}
