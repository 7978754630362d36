//! The audio bridge contract: an Opus encode/decode sandwich around a
//! duplex transport (spec §4.7 "PCM in at a fixed sample rate, Opus over
//! an RTP transport, back to PCM on the far side"). No transport or
//! codec implementation lives here — only the interface the core relies
//! on (spec §1 "described only at its interface").

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioBridgeError {
    #[error("opus encode failed: {0}")]
    Encode(String),
    #[error("opus decode failed: {0}")]
    Decode(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("cancelled")]
    Cancelled,
}

/// One mono PCM frame at a fixed sample rate, e.g. 16kHz/20ms = 320 samples.
pub type PcmFrame = Vec<i16>;

/// One Opus-encoded packet, carried over RTP by the transport.
pub type OpusPacket = Vec<u8>;

#[async_trait]
pub trait OpusEncoder: Send + Sync {
    fn sample_rate(&self) -> u32;
    async fn encode(&self, pcm: &PcmFrame) -> Result<OpusPacket, AudioBridgeError>;
}

#[async_trait]
pub trait OpusDecoder: Send + Sync {
    fn sample_rate(&self) -> u32;
    /// RTP sequence numbers and timestamps are monotone per direction;
    /// out-of-order packets are tolerated here but not reordered (spec
    /// §5 "Audio frames").
    async fn decode(&self, packet: &OpusPacket) -> Result<PcmFrame, AudioBridgeError>;
}

/// A duplex byte-message stream; the core does not specify its internals
/// (spec §4.7 "only that it is a duplex message stream").
#[async_trait]
pub trait DuplexTransport: Send + Sync {
    async fn send(&self, packet: OpusPacket) -> Result<(), AudioBridgeError>;
    async fn recv(&self) -> Result<Option<OpusPacket>, AudioBridgeError>;
}

/// Wires a PCM source/sink to a transport through an Opus codec. Holds no
/// concrete encoder/decoder/transport; callers supply their own.
pub struct AudioBridge<E, D, T>
where
    E: OpusEncoder,
    D: OpusDecoder,
    T: DuplexTransport,
{
    pub encoder: E,
    pub decoder: D,
    pub transport: T,
}

impl<E, D, T> AudioBridge<E, D, T>
where
    E: OpusEncoder,
    D: OpusDecoder,
    T: DuplexTransport,
{
    pub fn new(encoder: E, decoder: D, transport: T) -> Self {
        AudioBridge { encoder, decoder, transport }
    }

    /// Encodes one outbound PCM frame and hands it to the transport.
    pub async fn send_frame(&self, pcm: &PcmFrame) -> Result<(), AudioBridgeError> {
        let packet = self.encoder.encode(pcm).await?;
        self.transport.send(packet).await
    }

    /// Pulls the next inbound packet from the transport and decodes it,
    /// if one is available.
    pub async fn recv_frame(&self) -> Result<Option<PcmFrame>, AudioBridgeError> {
        match self.transport.recv().await? {
            Some(packet) => Ok(Some(self.decoder.decode(&packet).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct EchoCodec;

    #[async_trait]
    impl OpusEncoder for EchoCodec {
        fn sample_rate(&self) -> u32 {
            16_000
        }
        async fn encode(&self, pcm: &PcmFrame) -> Result<OpusPacket, AudioBridgeError> {
            Ok(pcm.iter().flat_map(|s| s.to_le_bytes()).collect())
        }
    }

    #[async_trait]
    impl OpusDecoder for EchoCodec {
        fn sample_rate(&self) -> u32 {
            16_000
        }
        async fn decode(&self, packet: &OpusPacket) -> Result<PcmFrame, AudioBridgeError> {
            Ok(packet.chunks_exact(2).map(|c| i16::from_le_bytes([c[0], c[1]])).collect())
        }
    }

    struct LoopbackTransport {
        queue: Mutex<Vec<OpusPacket>>,
    }

    #[async_trait]
    impl DuplexTransport for LoopbackTransport {
        async fn send(&self, packet: OpusPacket) -> Result<(), AudioBridgeError> {
            self.queue.lock().unwrap().push(packet);
            Ok(())
        }
        async fn recv(&self) -> Result<Option<OpusPacket>, AudioBridgeError> {
            Ok(self.queue.lock().unwrap().pop())
        }
    }

    #[tokio::test]
    async fn send_then_recv_round_trips_a_frame() {
        let bridge = AudioBridge::new(EchoCodec, EchoCodec, LoopbackTransport { queue: Mutex::new(vec![]) });
        let frame: PcmFrame = vec![1, 2, 3, -4];
        bridge.send_frame(&frame).await.unwrap();
        let received = bridge.recv_frame().await.unwrap();
        assert_eq!(received, Some(frame));
    }

    #[tokio::test]
    async fn recv_with_nothing_queued_is_none() {
        let bridge = AudioBridge::new(EchoCodec, EchoCodec, LoopbackTransport { queue: Mutex::new(vec![]) });
        assert_eq!(bridge.recv_frame().await.unwrap(), None);
    }
}
