use gdk::keys::Key;
use gdk::keys::constants as keys;

/// Wire contract with the camera: everything but the host is fixed.
pub const RTSP_PORT: u16 = 554;
pub const STREAM_PATH: &str = "axis-media/media.amp";
pub const STREAM_QUERY: &str = "videocodec=jpeg&audio=0";

/// Source-side jitter buffer in milliseconds. Zero keeps the feed as close
/// to live as the network allows.
pub const SOURCE_LATENCY_MS: u32 = 0;

#[derive(Clone, PartialEq)]
pub struct HotkeyMap {
    pub pause: Key,
    pub quit: Key,
}

impl Default for HotkeyMap {
    fn default() -> Self {
        HotkeyMap {
            pause: keys::p,
            quit: keys::q,
        }
    }
}

pub struct Config {
    pub address: String,
    pub fullscreen: bool,
    pub hotkey_map: HotkeyMap,
    pub window_size: (i32, i32),
}

impl Config {
    pub fn new(address: String, fullscreen: bool) -> Self {
        Config {
            address,
            fullscreen,
            hotkey_map: Default::default(),
            window_size: (1024, 768),
        }
    }
}

/// Returns a version as specified in Cargo.toml
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn app_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}
