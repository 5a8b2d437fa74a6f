use blockfield_common::{CameraConfig, Matrix4, Viewport};
use blockfield_input::{InputSource, MoveAction};
use glam::{Vec2, Vec3, Vec4};
use std::f32::consts::{FRAC_PI_2, TAU};

/// First-person fly camera driven by key state and cursor position.
///
/// Movement is a fixed step per tick, so speed follows the frame rate.
/// Both cached matrices are stored transposed, in the layout shaders expect.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    yaw: f32,
    pitch: f32,
    last_mouse: Vec2,
    view: Matrix4,
    projection: Matrix4,
    config: CameraConfig,
}

impl Camera {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(viewport, &CameraConfig::default())
    }

    pub fn with_config(viewport: Viewport, config: &CameraConfig) -> Self {
        let mut camera = Self {
            eye: Vec3::from(config.eye),
            yaw: 0.0,
            pitch: 0.0,
            last_mouse: Vec2::ZERO,
            view: Matrix4::IDENTITY,
            projection: Matrix4::IDENTITY,
            config: config.clone(),
        };
        camera.update_projection(viewport);
        camera.update_view();
        camera
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Rotation about world Y, in `[0, 2π)`.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Rotation about local X, in `[-π/2, π/2]`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn view_matrix(&self) -> &Matrix4 {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Matrix4 {
        &self.projection
    }

    /// Forget the previous cursor sample so the next tick sees no mouse delta.
    pub fn sync_mouse(&mut self, position: Vec2) {
        self.last_mouse = position;
    }

    /// Advance one frame: apply held movement keys and the cursor delta since
    /// the previous tick, then rebuild the view matrix.
    pub fn tick(&mut self, input: &impl InputSource) {
        let step = self.config.move_step;
        let mut movement = Vec4::ZERO;

        if input.is_action_active(MoveAction::Forward) {
            movement.z += step;
        }
        if input.is_action_active(MoveAction::Back) {
            movement.z -= step;
        }
        if input.is_action_active(MoveAction::Left) {
            movement.x -= step;
        }
        if input.is_action_active(MoveAction::Right) {
            movement.x += step;
        }

        self.update_rotation(input.mouse_position());

        let rotation = Matrix4::rotation(self.pitch, Vec3::X) * Matrix4::rotation(self.yaw, Vec3::Y);
        self.eye += rotation.multiply_point(movement).truncate();

        self.update_view();
    }

    /// Recompute the projection for a new viewport. The view matrix is untouched.
    pub fn update_projection(&mut self, viewport: Viewport) {
        let viewport = viewport.non_zero();
        self.projection = Matrix4::perspective(
            viewport.width,
            viewport.height,
            self.config.fov_degrees,
            self.config.near,
            self.config.far,
        )
        .transposed();
    }

    fn update_rotation(&mut self, mouse: Vec2) {
        let delta = mouse - self.last_mouse;
        self.yaw = wrap_yaw(self.yaw - delta.x / self.config.mouse_divisor);
        self.pitch = (self.pitch - delta.y / self.config.mouse_divisor).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.last_mouse = mouse;
    }

    fn update_view(&mut self) {
        self.view = (Matrix4::rotation(self.pitch, Vec3::X)
            * Matrix4::rotation(self.yaw, Vec3::Y)
            * Matrix4::translation(-self.eye.x, -self.eye.y, -self.eye.z))
        .transposed();
    }
}

fn wrap_yaw(yaw: f32) -> f32 {
    let wrapped = yaw.rem_euclid(TAU);
    // Tiny negative inputs round up to exactly TAU.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfield_input::{InputState, Key};

    const EPS: f32 = 1e-4;

    fn camera() -> Camera {
        Camera::new(Viewport::new(800, 600))
    }

    /// Untransposed view rotation applied to a world-space direction.
    fn to_view_space(camera: &Camera, dir: Vec3) -> Vec3 {
        (camera.view_matrix().transposed().to_glam() * dir.extend(0.0)).truncate()
    }

    #[test]
    fn starts_at_default_eye() {
        let cam = camera();
        assert_eq!(cam.eye(), Vec3::new(5.0, 10.0, -5.0));
        assert_eq!(cam.yaw(), 0.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn idle_tick_keeps_eye() {
        let mut cam = camera();
        let view_before = *cam.view_matrix();
        cam.tick(&InputState::new());
        assert_eq!(cam.eye(), Vec3::new(5.0, 10.0, -5.0));
        assert_eq!(cam.yaw(), 0.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_eq!(*cam.view_matrix(), view_before);
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let cam = camera();
        let eye = cam.eye().extend(1.0);
        let p = cam.view_matrix().transposed().to_glam() * eye;
        assert!(p.abs_diff_eq(Vec4::new(0.0, 0.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn forward_moves_along_z() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.set_key(Key::W, true);
        cam.tick(&input);
        assert!(cam.eye().abs_diff_eq(Vec3::new(5.0, 10.0, -4.9), EPS));
    }

    #[test]
    fn both_bindings_move_once() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.set_key(Key::W, true);
        input.set_key(Key::ArrowUp, true);
        cam.tick(&input);
        assert!(cam.eye().abs_diff_eq(Vec3::new(5.0, 10.0, -4.9), EPS));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.set_key(Key::A, true);
        input.set_key(Key::ArrowRight, true);
        cam.tick(&input);
        assert_eq!(cam.eye(), Vec3::new(5.0, 10.0, -5.0));
    }

    #[test]
    fn strafe_right_moves_along_x() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.set_key(Key::D, true);
        cam.tick(&input);
        assert!(cam.eye().abs_diff_eq(Vec3::new(5.1, 10.0, -5.0), EPS));
    }

    #[test]
    fn mouse_delta_turns_camera() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.set_mouse_position(-50.0, 30.0);
        cam.tick(&input);
        assert!((cam.yaw() - 0.5).abs() < EPS);
        assert!((cam.pitch() + 0.3).abs() < EPS);

        // Same position again: no further rotation.
        cam.tick(&input);
        assert!((cam.yaw() - 0.5).abs() < EPS);
        assert!((cam.pitch() + 0.3).abs() < EPS);
    }

    #[test]
    fn forward_follows_view_direction() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.set_mouse_position(-120.0, -40.0);
        cam.tick(&input);

        input.set_key(Key::W, true);
        let before = cam.eye();
        cam.tick(&input);
        let moved = cam.eye() - before;

        let local = to_view_space(&cam, moved);
        assert!(local.abs_diff_eq(Vec3::new(0.0, 0.0, 0.1), EPS), "{local:?}");
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = camera();
        let mut input = InputState::new();
        for i in 1..=100 {
            input.set_mouse_position(0.0, -50.0 * i as f32);
            cam.tick(&input);
            assert!(cam.pitch() <= FRAC_PI_2);
        }
        assert_eq!(cam.pitch(), FRAC_PI_2);

        for i in 1..=200 {
            input.set_mouse_position(0.0, 50.0 * i as f32);
            cam.tick(&input);
            assert!(cam.pitch() >= -FRAC_PI_2);
        }
        assert_eq!(cam.pitch(), -FRAC_PI_2);
    }

    #[test]
    fn yaw_stays_wrapped() {
        let mut cam = camera();
        let mut input = InputState::new();
        let mut x = 0.0;
        for i in 0..500 {
            x += if i % 7 < 3 { 173.0 } else { -91.5 };
            input.set_mouse_position(x, 0.0);
            cam.tick(&input);
            assert!((0.0..TAU).contains(&cam.yaw()), "yaw {}", cam.yaw());
        }
    }

    #[test]
    fn wrap_handles_tiny_negative() {
        assert_eq!(wrap_yaw(-1e-9), 0.0);
        assert!((wrap_yaw(-0.5) - (TAU - 0.5)).abs() < EPS);
        assert!((wrap_yaw(TAU + 0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn sync_mouse_suppresses_jump() {
        let mut cam = camera();
        let mut input = InputState::new();
        input.set_mouse_position(400.0, 300.0);
        cam.sync_mouse(Vec2::new(400.0, 300.0));
        cam.tick(&input);
        assert_eq!(cam.yaw(), 0.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn projection_tracks_viewport_width() {
        let mut cam = camera();
        cam.update_projection(Viewport::new(100, 100));
        let square = cam.projection_matrix().get(0, 0);
        cam.update_projection(Viewport::new(200, 100));
        let wide = cam.projection_matrix().get(0, 0);
        assert!((wide - square / 2.0).abs() < 1e-6);
    }

    #[test]
    fn projection_update_keeps_view() {
        let mut cam = camera();
        let view = *cam.view_matrix();
        cam.update_projection(Viewport::new(320, 240));
        assert_eq!(*cam.view_matrix(), view);
    }

    #[test]
    fn projection_is_transposed_for_upload() {
        let cam = camera();
        let p = cam.projection_matrix();
        // Perspective divide marker sits at (col 2, row 3) before transposing.
        assert_eq!(p.get(3, 2), 1.0);
        assert!(p.get(2, 3) < 0.0);
        assert_eq!(p.get(3, 3), 0.0);
    }

    #[test]
    fn zero_viewport_stays_finite() {
        let mut cam = camera();
        cam.update_projection(Viewport::new(0, 0));
        assert!(cam.projection_matrix().0.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn custom_config() {
        let config = CameraConfig {
            eye: [0.0, 0.0, 0.0],
            move_step: 1.0,
            ..CameraConfig::default()
        };
        let mut cam = Camera::with_config(Viewport::new(64, 64), &config);
        let mut input = InputState::new();
        input.set_key(Key::S, true);
        cam.tick(&input);
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
    }
}
