//! Win32 display enumeration and DPI awareness

use tracing::{debug, warn};
use windows::core::PCWSTR;
use windows::Win32::Graphics::Gdi::{EnumDisplaySettingsW, DEVMODEW, ENUM_DISPLAY_SETTINGS_MODE};
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwareness, SetProcessDpiAwarenessContext,
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, PROCESS_PER_MONITOR_DPI_AWARE,
};

use super::DisplayMode;

pub(super) fn display_mode(index: u32) -> Option<DisplayMode> {
    let mut devmode = DEVMODEW {
        dmSize: std::mem::size_of::<DEVMODEW>() as u16,
        ..Default::default()
    };

    // SAFETY: `devmode` is a writable DEVMODEW with dmSize set; a null device
    // name selects the current display.
    let found = unsafe {
        EnumDisplaySettingsW(PCWSTR::null(), ENUM_DISPLAY_SETTINGS_MODE(index), &mut devmode)
    };

    found.as_bool().then(|| DisplayMode {
        width: devmode.dmPelsWidth,
        height: devmode.dmPelsHeight,
    })
}

pub(super) fn setup_dpi_awareness() {
    // SAFETY: plain process-wide setting, no pointers involved.
    unsafe {
        if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_ok() {
            debug!("Per-monitor v2 DPI awareness enabled");
            return;
        }
        if let Err(e) = SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE) {
            warn!("Failed to enable DPI awareness: {}", e);
        }
    }
}
