//! `tokio_util` codec over a framing [`Session`].
//!
//! Decoding moves every byte the transport read into the session and
//! returns one event per call, so `FramedRead` keeps calling until the
//! framer suspends. Encoding writes the remote command strings.

use bytes::BytesMut;
use tracing::debug;

use crate::error::StreamError;
use crate::frame::StreamEvent;
use crate::framer::FramerConfig;
use crate::message::RemoteCommand;
use crate::params::ReceiverParameters;
use crate::session::Session;

#[derive(Debug)]
pub struct StreamCodec {
    session: Session,
}

impl StreamCodec {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn with_params(params: ReceiverParameters, config: FramerConfig) -> Self {
        Self::new(Session::new(params, config))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl tokio_util::codec::Decoder for StreamCodec {
    type Item = StreamEvent;
    type Error = StreamError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !src.is_empty() {
            self.session.append_bytes(src.split());
        }
        Ok(self.session.next_event())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let event = self.decode(src)?;
        if event.is_none() && self.session.buffered() > 0 {
            debug!(
                buffered = self.session.buffered(),
                "stream ended inside a frame; discarding partial data"
            );
        }
        Ok(event)
    }
}

impl tokio_util::codec::Encoder<RemoteCommand> for StreamCodec {
    type Error = StreamError;

    fn encode(&mut self, item: RemoteCommand, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::FrameHeader;
    use futures::StreamExt;
    use tokio_util::codec::{Decoder, Encoder, FramedRead};

    #[test]
    fn decode_yields_one_event_per_call() {
        let mut codec = StreamCodec::with_params(ReceiverParameters::default(), FramerConfig::default());
        let mut src = BytesMut::new();
        src.extend_from_slice(&FrameHeader::new(4, 2, 2, 8).to_bytes());
        src.extend_from_slice(&[1, 2, 3, 4]);

        let first = codec.decode(&mut src).unwrap();
        assert!(matches!(first, Some(StreamEvent::ParametersChanged(_))));
        assert!(src.is_empty());

        let second = codec.decode(&mut src).unwrap().and_then(StreamEvent::into_frame);
        assert_eq!(second.unwrap().data(), &[1, 2, 3, 4]);
        assert!(codec.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn decode_eof_drops_partial_frame() {
        let mut codec = StreamCodec::with_params(ReceiverParameters::default(), FramerConfig::default());
        let mut src = BytesMut::from(&[0x11, 0xDE][..]);
        assert!(codec.decode_eof(&mut src).unwrap().is_none());
    }

    #[test]
    fn encode_remote_commands() {
        let mut codec = StreamCodec::with_params(ReceiverParameters::default(), FramerConfig::default());
        let mut dst = BytesMut::new();
        codec.encode(RemoteCommand::Start, &mut dst).unwrap();
        codec.encode(RemoteCommand::Stop, &mut dst).unwrap();
        assert_eq!(&dst[..], b"remote_startremote_stop");
    }

    #[tokio::test]
    async fn framed_read_over_fragmented_reader() {
        let mut wire = Vec::new();
        for fill in 0..3u8 {
            wire.extend_from_slice(&FrameHeader::new(6, 3, 2, 8).to_bytes());
            wire.extend_from_slice(&[fill; 6]);
        }

        let mut builder = tokio_test::io::Builder::new();
        for chunk in wire.chunks(5) {
            builder.read(chunk);
        }
        let reader = builder.build();

        let codec = StreamCodec::with_params(ReceiverParameters::default(), FramerConfig::default());
        let events: Vec<_> = FramedRead::new(reader, codec)
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert!(matches!(events[0], StreamEvent::ParametersChanged(_)));
        let frames: Vec<_> = events.into_iter().filter_map(StreamEvent::into_frame).collect();
        assert_eq!(frames.len(), 3);
        for (i, frame) in frames.iter().enumerate() {
            assert!(frame.data().iter().all(|&b| b == i as u8));
        }
    }
}
