//! The device port and audio bridge: the core's interface-only contract
//! to external I/O hardware (spec §4.7). No transport, codec, or MQTT
//! client implementation lives here — only the traits and message types
//! the core relies on.

mod audio_bridge;
mod command;
mod port;

pub use audio_bridge::{AudioBridge, AudioBridgeError, DuplexTransport, OpusDecoder, OpusEncoder, OpusPacket, PcmFrame};
pub use command::{DeviceCommand, DeviceState, DeviceStats};
pub use port::{DevicePort, PortError, PortRunner, WorkerLoop};
