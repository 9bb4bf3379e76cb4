use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Perspective camera looking down the negative Z axis.
pub struct Camera3D {
    pub position: Vec3,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera3D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            fov_y_deg: 75.0,
            aspect: viewport_width as f32 / viewport_height.max(1) as f32,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn set_aspect(&mut self, viewport_width: u32, viewport_height: u32) {
        if viewport_width > 0 && viewport_height > 0 {
            self.aspect = viewport_width as f32 / viewport_height as f32;
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        let view = Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y);
        proj * view
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }
}
