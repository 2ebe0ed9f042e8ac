use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector3};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::perspective::PerspectiveCamera;
use crate::config::ControlsConfig;

/// Keeps the camera away from the poles so `up` never lines up with the view
const POLAR_EPSILON: f32 = 1e-3;

/// Scroll pixels that count as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Window input the controls react to, decoupled from winit's event types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    Shift(bool),
    Button { button: MouseButton, pressed: bool },
    /// Wheel lines, positive zooms in
    Scroll(f32),
    Reset,
}

impl ControlInput {
    /// Picks out the window events that drive the controls
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                Some(Self::Shift(modifiers.state().shift_key()))
            }
            WindowEvent::MouseInput { state, button, .. } => Some(Self::Button {
                button: *button,
                pressed: *state == ElementState::Pressed,
            }),
            WindowEvent::MouseWheel { delta, .. } => Some(Self::Scroll(scroll_lines(delta))),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyR),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Wheel movement in lines; pixel deltas from touchpads are scaled down
pub fn scroll_lines(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => *lines,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / PIXELS_PER_LINE,
    }
}

/// Orbits a camera around a target point
///
/// The camera sits on a sphere around `target`, described by an azimuth
/// around +Y (zero looks down -Z) and a polar angle from +Y.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    distance: f32,
    azimuth: f32,
    polar: f32,
    home: (Point3<f32>, Point3<f32>),
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enabled: bool,
    rotating: bool,
    panning: bool,
    shift_held: bool,
    changed: bool,
}

impl OrbitControls {
    /// Starts from the camera's current pose, which also becomes the home pose
    ///
    /// A camera outside `[min_distance, max_distance]` is pulled into range on
    /// the next [`apply`](Self::apply).
    pub fn new(camera: &PerspectiveCamera, config: &ControlsConfig) -> Self {
        let mut controls = Self {
            target: camera.target,
            distance: 1.0,
            azimuth: 0.0,
            polar: PI / 2.0,
            home: (camera.position, camera.target),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            enabled: config.enabled,
            rotating: false,
            panning: false,
            shift_held: false,
            changed: false,
        };
        controls.set_pose(camera.position, camera.target);
        let moved = (controls.position() - camera.position).magnitude();
        controls.changed = moved > 1e-4 * controls.distance.max(1.0);
        controls
    }

    fn set_pose(&mut self, position: Point3<f32>, target: Point3<f32>) {
        let offset = position - target;
        let distance = offset.magnitude();

        self.target = target;
        if distance > 0.0 {
            self.azimuth = offset.x.atan2(offset.z);
            self.polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        }
        self.polar = self.polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.changed = true;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Camera position implied by the current orbit
    pub fn position(&self) -> Point3<f32> {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + Vector3::new(
                sin_polar * sin_azimuth,
                cos_polar,
                sin_polar * cos_azimuth,
            ) * self.distance
    }

    /// Rotates by angles in radians
    pub fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.azimuth = (self.azimuth + delta_azimuth).rem_euclid(2.0 * PI);
        self.polar = (self.polar + delta_polar).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.changed = true;
    }

    /// Moves towards the target for positive `steps`, away for negative
    pub fn zoom(&mut self, steps: f32) {
        let scaled = self.distance * (-steps * self.zoom_speed).exp();
        self.distance = scaled.clamp(self.min_distance, self.max_distance);
        self.changed = true;
    }

    /// Slides target and camera together in the view plane.
    ///
    /// `dx`/`dy` are in pixels; dragging right moves the scene right.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);

        let scale = self.pan_speed * self.distance;
        self.target += (-right * dx + up * dy) * scale;
        self.changed = true;
    }

    /// Returns to the pose the controls were created with
    pub fn reset(&mut self) {
        let (position, target) = self.home;
        self.set_pose(position, target);
        log::debug!("Orbit controls reset");
    }

    /// Writes the orbit into the camera; returns whether anything moved
    pub fn apply(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if !self.changed {
            return false;
        }
        camera.position = self.position();
        camera.target = self.target;
        self.changed = false;
        true
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Tracks which drag mode a mouse button starts or ends
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left if pressed && self.shift_held => self.panning = true,
            MouseButton::Left if pressed => self.rotating = true,
            MouseButton::Left => {
                self.rotating = false;
                self.panning = false;
            }
            MouseButton::Right => self.panning = pressed,
            _ => (),
        }
    }

    /// Applies a mouse movement in pixels according to the active drag mode
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if self.panning {
            self.pan(dx, dy);
        } else if self.rotating {
            self.rotate(-dx * self.rotate_speed, -dy * self.rotate_speed);
        }
    }

    /// Handles button, wheel, modifier and key events; returns whether the
    /// event was used
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        ControlInput::from_window_event(event).is_some_and(|input| self.handle_input(input))
    }

    /// Applies one input; returns whether it was used
    pub fn handle_input(&mut self, input: ControlInput) -> bool {
        if !self.enabled {
            return false;
        }
        match input {
            ControlInput::Shift(held) => {
                self.shift_held = held;
                false
            }
            ControlInput::Button { button, pressed } => {
                self.set_button(button, pressed);
                true
            }
            ControlInput::Scroll(lines) => {
                self.zoom(lines);
                true
            }
            ControlInput::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Handles raw mouse motion while a drag is active
    pub fn process_device_event(&mut self, event: &DeviceEvent) -> bool {
        match event {
            DeviceEvent::MouseMotion { delta } if self.enabled => {
                if !(self.rotating || self.panning) {
                    return false;
                }
                self.drag(delta.0 as f32, delta.1 as f32);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (PerspectiveCamera, OrbitControls) {
        let camera = PerspectiveCamera::new(60.0, 1.5, 0.1, 100.0)
            .looking_at([0.0, 0.0, 5.0], [0.0, 0.0, 0.0]);
        let controls = OrbitControls::new(&camera, &ControlsConfig::default());
        (camera, controls)
    }

    #[test]
    fn test_initial_pose_matches_camera() {
        let (_, controls) = setup();
        let p = controls.position();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-5);
        assert_relative_eq!(controls.distance(), 5.0);
    }

    #[test]
    fn test_apply_only_when_changed() {
        let (mut camera, mut controls) = setup();
        assert!(!controls.apply(&mut camera));
        controls.rotate(0.5, 0.0);
        assert!(controls.apply(&mut camera));
        assert!(!controls.apply(&mut camera));
    }

    #[test]
    fn test_rotation_keeps_distance() {
        let (mut camera, mut controls) = setup();
        controls.rotate(1.0, -0.4);
        controls.apply(&mut camera);
        let offset = camera.position - camera.target;
        assert_relative_eq!(offset.magnitude(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_polar_is_clamped() {
        let (_, mut controls) = setup();
        controls.rotate(0.0, -10.0);
        assert!(controls.polar() > 0.0);
        controls.rotate(0.0, 20.0);
        assert!(controls.polar() < PI);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let (_, mut controls) = setup();
        controls.zoom(1000.0);
        assert_eq!(controls.distance(), controls.min_distance);
        controls.zoom(-1000.0);
        assert_eq!(controls.distance(), controls.max_distance);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let (mut camera, mut controls) = setup();
        controls.pan(100.0, 0.0);
        controls.apply(&mut camera);

        // looking down -Z, right is +X, dragging right moves the view left
        assert!(camera.target.x < 0.0);
        assert_relative_eq!(camera.position.x, camera.target.x, epsilon = 1e-5);
        assert_relative_eq!((camera.position - camera.target).magnitude(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_restores_home() {
        let (mut camera, mut controls) = setup();
        controls.rotate(2.0, 0.5);
        controls.pan(10.0, 10.0);
        controls.zoom(3.0);
        controls.reset();
        controls.apply(&mut camera);
        assert_relative_eq!(camera.position.z, 5.0, epsilon = 1e-4);
        assert_relative_eq!(camera.target.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_drag_modes() {
        let (_, mut controls) = setup();
        let before = controls.azimuth();

        controls.drag(50.0, 0.0);
        assert_eq!(controls.azimuth(), before, "no button held");

        controls.set_button(MouseButton::Left, true);
        assert!(controls.is_rotating());
        assert!(controls.process_device_event(&DeviceEvent::MouseMotion { delta: (50.0, 0.0) }));
        assert_ne!(controls.azimuth(), before);
        controls.set_button(MouseButton::Left, false);

        controls.set_button(MouseButton::Right, true);
        assert!(controls.is_panning());
        let target = controls.target;
        controls.drag(0.0, 20.0);
        assert!(controls.target.y > target.y);
    }

    #[test]
    fn test_wheel_zooms() {
        let (mut camera, mut controls) = setup();
        assert!(controls.handle_input(ControlInput::Scroll(1.0)));
        assert!(controls.distance() < 5.0);
        assert!(controls.apply(&mut camera));

        let closer = controls.distance();
        let lines = scroll_lines(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0)));
        assert_relative_eq!(lines, -2.0);
        controls.handle_input(ControlInput::Scroll(lines));
        assert!(controls.distance() > closer);
        assert_relative_eq!(scroll_lines(&MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
    }

    #[test]
    fn test_shift_left_drag_pans() {
        let (_, mut controls) = setup();
        let azimuth = controls.azimuth();

        assert!(!controls.handle_input(ControlInput::Shift(true)));
        assert!(controls.handle_input(ControlInput::Button {
            button: MouseButton::Left,
            pressed: true,
        }));
        assert!(controls.is_panning());
        assert!(!controls.is_rotating());

        controls.drag(40.0, 0.0);
        assert!(controls.target.x < 0.0);
        assert_eq!(controls.azimuth(), azimuth);

        controls.handle_input(ControlInput::Button {
            button: MouseButton::Left,
            pressed: false,
        });
        assert!(!controls.is_panning());

        controls.handle_input(ControlInput::Shift(false));
        controls.handle_input(ControlInput::Button {
            button: MouseButton::Left,
            pressed: true,
        });
        assert!(controls.is_rotating());
    }

    #[test]
    fn test_reset_key_restores_home() {
        let (mut camera, mut controls) = setup();
        controls.rotate(1.0, 0.3);
        controls.zoom(2.0);
        controls.apply(&mut camera);

        assert!(controls.handle_input(ControlInput::Reset));
        assert!(controls.apply(&mut camera));
        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(camera.position.z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_disabled_controls_ignore_input() {
        let (mut camera, mut controls) = setup();
        controls.enabled = false;
        assert!(!controls.handle_input(ControlInput::Scroll(3.0)));
        assert!(!controls.handle_input(ControlInput::Reset));
        assert!(!controls.handle_input(ControlInput::Button {
            button: MouseButton::Left,
            pressed: true,
        }));
        assert!(!controls.is_rotating());
        assert_relative_eq!(controls.distance(), 5.0);
        assert!(!controls.apply(&mut camera));
    }

    #[test]
    fn test_out_of_range_start_is_clamped_on_first_apply() {
        let mut camera = PerspectiveCamera::new(60.0, 1.5, 0.1, 100.0)
            .looking_at([0.0, 0.0, 80.0], [0.0, 0.0, 0.0]);
        let mut controls = OrbitControls::new(&camera, &ControlsConfig::default());
        assert_eq!(controls.distance(), 50.0);
        assert!(controls.apply(&mut camera));
        assert_relative_eq!(camera.position.z, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_non_input_events_are_ignored() {
        let (_, mut controls) = setup();
        assert!(!controls.process_window_event(&WindowEvent::Focused(true)));
        assert!(ControlInput::from_window_event(&WindowEvent::RedrawRequested).is_none());
    }

    #[test]
    fn test_disabled_controls_ignore_motion() {
        let (_, mut controls) = setup();
        controls.enabled = false;
        controls.set_button(MouseButton::Left, true);
        assert!(!controls.process_device_event(&DeviceEvent::MouseMotion { delta: (50.0, 0.0) }));
    }
}
