//! The command stream delivered to a device (spec §4.7, §6 "Persisted
//! state on disk").

use serde::{Deserialize, Serialize};

/// A single command addressed to a device. Serialized with an internal
/// `type` tag so it round-trips through the same JSON/MsgPack codec as
/// agent state (spec §9 "Sum types").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceCommand {
    SetVolume { level: u8 },
    SetBrightness { level: u8 },
    SetWifi { ssid: String, password: String },
    Reset,
    Halt,
    Ota { url: String },
    Streaming { enabled: bool },
}

/// `<gear_id>.json` on disk (spec §6). Missing fields fall back to
/// compiled-in defaults; a missing file is not an error — that recovery
/// lives with whatever host persists this, not in this interface type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(default = "DeviceState::default_volume")]
    pub volume: u8,
    #[serde(default = "DeviceState::default_brightness")]
    pub brightness: u8,
    #[serde(default)]
    pub light_mode: String,
    #[serde(default)]
    pub pair_with: Option<String>,
    #[serde(default)]
    pub wifi_store: Vec<String>,
    #[serde(default)]
    pub wifi_ssid: String,
    #[serde(default)]
    pub wifi_rssi: i32,
    #[serde(default)]
    pub sys_version: String,
}

impl DeviceState {
    fn default_volume() -> u8 {
        50
    }

    fn default_brightness() -> u8 {
        50
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        DeviceState {
            volume: Self::default_volume(),
            brightness: Self::default_brightness(),
            light_mode: String::new(),
            pair_with: None,
            wifi_store: Vec::new(),
            wifi_ssid: String::new(),
            wifi_rssi: 0,
            sys_version: String::new(),
        }
    }
}

/// Runtime stats published alongside state on the periodic ticker (spec
/// §4.7 "periodic state and stats publication").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub uptime_seconds: u64,
    pub frames_sent: u64,
    pub frames_received: u64,
    pub frames_dropped: u64,
}
