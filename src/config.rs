use std::time::Duration;

use crate::ticker::FrameTicker;

/// Settings for the windowed host. Everything here can be overridden from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Multisample count to ask for. Window creation retries without it if the platform refuses.
    pub samples: u16,
    pub vsync: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            samples: 4,
            vsync: true,
        }
    }
}

impl HostConfig {
    pub fn frame_interval(&self) -> Duration {
        FrameTicker::interval_for(self.fps)
    }
}
