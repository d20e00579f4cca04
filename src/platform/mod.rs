//! Platform helpers
//!
//! Display mode lookup and process DPI awareness. Both are real on Windows
//! and inert elsewhere.

#![allow(dead_code)]

#[cfg(windows)]
mod win32;

use crate::payload::DISPLAY_MODE_NOT_FOUND;

/// A display resolution as enumerated by the OS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
}

/// Source of enumerable display modes
pub trait DisplayModeSource: Send + Sync {
    /// Mode at `index`, or `None` once enumeration is exhausted
    fn mode(&self, index: u32) -> Option<DisplayMode>;

    /// Index of the first mode matching the resolution, or
    /// [`DISPLAY_MODE_NOT_FOUND`].
    ///
    /// Enumeration stops at the first index the source rejects.
    fn find(&self, width: i32, height: i32) -> i32 {
        let mut index = 0u32;
        while let Some(mode) = self.mode(index) {
            if i64::from(mode.width) == i64::from(width)
                && i64::from(mode.height) == i64::from(height)
            {
                return i32::try_from(index).unwrap_or(DISPLAY_MODE_NOT_FOUND);
            }
            index += 1;
        }
        DISPLAY_MODE_NOT_FOUND
    }
}

/// Display modes of the primary display
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemDisplayModes;

impl DisplayModeSource for SystemDisplayModes {
    #[cfg(windows)]
    fn mode(&self, index: u32) -> Option<DisplayMode> {
        win32::display_mode(index)
    }

    #[cfg(not(windows))]
    fn mode(&self, _index: u32) -> Option<DisplayMode> {
        None
    }
}

/// Fixed list of modes, for tests and dry runs
#[derive(Clone, Debug, Default)]
pub struct FixedDisplayModes {
    modes: Vec<DisplayMode>,
}

impl FixedDisplayModes {
    pub fn new(modes: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self {
            modes: modes
                .into_iter()
                .map(|(width, height)| DisplayMode { width, height })
                .collect(),
        }
    }
}

impl DisplayModeSource for FixedDisplayModes {
    fn mode(&self, index: u32) -> Option<DisplayMode> {
        self.modes.get(index as usize).copied()
    }
}

/// Index of the primary display's first mode at `width`x`height`
pub fn find_display_mode(width: i32, height: i32) -> i32 {
    SystemDisplayModes.find(width, height)
}

/// Opt the process into per-monitor DPI awareness
pub fn setup_dpi_awareness() {
    #[cfg(windows)]
    win32::setup_dpi_awareness();

    #[cfg(not(windows))]
    tracing::debug!("DPI awareness setup skipped on this platform");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_match() {
        let modes = FixedDisplayModes::new([(640, 480), (1920, 1080), (2560, 1440), (1920, 1080)]);
        assert_eq!(modes.find(1920, 1080), 1);
        assert_eq!(modes.find(640, 480), 0);
        assert_eq!(modes.find(2560, 1440), 2);
    }

    #[test]
    fn test_find_missing_mode_terminates() {
        let modes = FixedDisplayModes::new([(1280, 720)]);
        assert_eq!(modes.find(3840, 2160), DISPLAY_MODE_NOT_FOUND);
        assert_eq!(modes.find(-1, -1), DISPLAY_MODE_NOT_FOUND);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(FixedDisplayModes::default().find(1920, 1080), DISPLAY_MODE_NOT_FOUND);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_system_modes_unavailable_off_windows() {
        assert_eq!(find_display_mode(1920, 1080), DISPLAY_MODE_NOT_FOUND);
        setup_dpi_awareness();
    }
}
