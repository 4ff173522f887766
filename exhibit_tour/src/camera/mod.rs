//! Desktop/kiosk cameras: fixed viewpoints plus an orbiting exhibit camera.

mod camera_switcher;
mod orbit_camera;

pub use camera_switcher::*;
pub use orbit_camera::*;
