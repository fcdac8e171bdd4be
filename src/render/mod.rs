pub mod camera;

use serde::{Deserialize, Serialize};

use crate::graph::store::Node;

/// World-space position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Coordinate { x, y, z }
    }
}

/// The rendering collaborator. The editor core only ever asks it to frame a
/// node and to convert the viewport center into world coordinates; everything
/// else (layout physics, drawing, hit testing) lives on the other side of
/// this seam, which is what keeps the state machine testable headless.
pub trait Renderer {
    /// Move the camera to frame the given node.
    fn focus_on(&mut self, node: &Node);

    /// World coordinate under the center of the viewport. Spawn point for
    /// nodes added by a background click.
    fn screen_center_to_world(&self) -> Coordinate;
}

/// Renderer that ignores everything: focus requests are dropped and new
/// nodes spawn at the origin. Handy for tests that only care about state.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn focus_on(&mut self, _node: &Node) {}

    fn screen_center_to_world(&self) -> Coordinate {
        Coordinate::ORIGIN
    }
}

/// Renderer for shell sessions. No scene exists, but focus requests still
/// move a virtual camera so framing behavior stays observable headless.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    camera: Coordinate,
}

impl HeadlessRenderer {
    pub fn camera(&self) -> Coordinate {
        self.camera
    }
}

impl Renderer for HeadlessRenderer {
    fn focus_on(&mut self, node: &Node) {
        let target = node.position.unwrap_or(Coordinate::ORIGIN);
        self.camera = camera::focus_position(target, camera::FOCUS_DISTANCE);
        log::debug!("camera moved to {:?} for node {}", self.camera, node.id);
    }

    fn screen_center_to_world(&self) -> Coordinate {
        Coordinate::ORIGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::store::Node;

    #[test]
    fn headless_focus_moves_the_camera() {
        let mut renderer = HeadlessRenderer::default();
        let node = Node {
            id: "a".into(),
            name: "A".to_string(),
            val: 10.0,
            color: "#FF6B6B".to_string(),
            position: Some(Coordinate::new(30.0, 0.0, 40.0)),
        };
        renderer.focus_on(&node);
        assert_eq!(renderer.camera(), Coordinate::new(90.0, 0.0, 120.0));

        // A node the simulation has not placed yet frames from the z axis
        let unplaced = Node {
            position: None,
            ..node
        };
        renderer.focus_on(&unplaced);
        assert_eq!(
            renderer.camera(),
            Coordinate::new(0.0, 0.0, camera::FOCUS_DISTANCE)
        );
    }
}
