use serde::{Deserialize, Serialize};

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn to_wire(self) -> u8 {
        match self {
            Role::User => 0,
            Role::Assistant => 1,
        }
    }

    fn from_wire(byte: u8) -> Result<Self, EventError> {
        match byte {
            0 => Ok(Role::User),
            1 => Ok(Role::Assistant),
            other => Err(EventError::InvalidRole(other)),
        }
    }
}

/// A video frame delivered by the media bridge, with its arrival timestamp.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub jpeg: Vec<u8>,
    pub captured_at_ms: i64,
    pub seq: u64,
}

/// One event on the bridge's session stream.
///
/// Binary wire formats (all integers big-endian):
///
/// video frame:
///   [0]      marker = 0x01
///   [1..9]   captured_at_ms  (i64, Unix millis)
///   [9..17]  seq             (u64, sequence number)
///   [17..21] jpeg_len        (u32)
///   [21..21+jpeg_len] jpeg bytes
///
/// speaking started / stopped:
///   [0]      marker = 0x02 / 0x03
///   [1..9]   at_ms           (i64, Unix millis)
///
/// transcript item:
///   [0]      marker = 0x04
///   [1..9]   at_ms           (i64, Unix millis)
///   [9]      role            (0 = user, 1 = assistant)
///   [10..14] text_len        (u32)
///   [14..14+text_len] UTF-8 text
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Frame(VideoFrame),
    SpeakingStarted { at_ms: i64 },
    SpeakingStopped { at_ms: i64 },
    Transcript { role: Role, text: String, at_ms: i64 },
}

const FRAME_MARKER: u8 = 0x01;
const SPEAKING_STARTED_MARKER: u8 = 0x02;
const SPEAKING_STOPPED_MARKER: u8 = 0x03;
const TRANSCRIPT_MARKER: u8 = 0x04;

const FRAME_HEADER_SIZE: usize = 21; // 1 marker + 8 ts + 8 seq + 4 len
const SPEAKING_SIZE: usize = 9; // 1 marker + 8 ts
const TRANSCRIPT_HEADER_SIZE: usize = 14; // 1 marker + 8 ts + 1 role + 4 len

/// Upper bound on a single frame or transcript payload. A length prefix above
/// this means the stream has desynchronized.
pub const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

impl SessionEvent {
    /// Serialize to the binary wire format.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            SessionEvent::Frame(frame) => {
                let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + frame.jpeg.len());
                buf.push(FRAME_MARKER);
                buf.extend_from_slice(&frame.captured_at_ms.to_be_bytes());
                buf.extend_from_slice(&frame.seq.to_be_bytes());
                buf.extend_from_slice(&(frame.jpeg.len() as u32).to_be_bytes());
                buf.extend_from_slice(&frame.jpeg);
                buf
            }
            SessionEvent::SpeakingStarted { at_ms } => {
                let mut buf = Vec::with_capacity(SPEAKING_SIZE);
                buf.push(SPEAKING_STARTED_MARKER);
                buf.extend_from_slice(&at_ms.to_be_bytes());
                buf
            }
            SessionEvent::SpeakingStopped { at_ms } => {
                let mut buf = Vec::with_capacity(SPEAKING_SIZE);
                buf.push(SPEAKING_STOPPED_MARKER);
                buf.extend_from_slice(&at_ms.to_be_bytes());
                buf
            }
            SessionEvent::Transcript { role, text, at_ms } => {
                let mut buf = Vec::with_capacity(TRANSCRIPT_HEADER_SIZE + text.len());
                buf.push(TRANSCRIPT_MARKER);
                buf.extend_from_slice(&at_ms.to_be_bytes());
                buf.push(role.to_wire());
                buf.extend_from_slice(&(text.len() as u32).to_be_bytes());
                buf.extend_from_slice(text.as_bytes());
                buf
            }
        }
    }

    /// Decode one event from the front of `buf`.
    ///
    /// Returns `Ok(None)` when the buffer does not yet hold a complete event;
    /// on success returns the event and the number of bytes consumed.
    pub fn decode(buf: &[u8]) -> Result<Option<(SessionEvent, usize)>, EventError> {
        if buf.is_empty() {
            return Ok(None);
        }

        match buf[0] {
            FRAME_MARKER => {
                if buf.len() < FRAME_HEADER_SIZE {
                    return Ok(None);
                }
                let captured_at_ms = i64::from_be_bytes(buf[1..9].try_into().unwrap());
                let seq = u64::from_be_bytes(buf[9..17].try_into().unwrap());
                let jpeg_len = u32::from_be_bytes(buf[17..21].try_into().unwrap()) as usize;
                if jpeg_len > MAX_PAYLOAD_BYTES {
                    return Err(EventError::PayloadTooLarge {
                        got: jpeg_len,
                        max: MAX_PAYLOAD_BYTES,
                    });
                }
                let total = FRAME_HEADER_SIZE + jpeg_len;
                if buf.len() < total {
                    return Ok(None);
                }
                let jpeg = buf[FRAME_HEADER_SIZE..total].to_vec();
                Ok(Some((
                    SessionEvent::Frame(VideoFrame {
                        jpeg,
                        captured_at_ms,
                        seq,
                    }),
                    total,
                )))
            }
            SPEAKING_STARTED_MARKER | SPEAKING_STOPPED_MARKER => {
                if buf.len() < SPEAKING_SIZE {
                    return Ok(None);
                }
                let at_ms = i64::from_be_bytes(buf[1..9].try_into().unwrap());
                let event = if buf[0] == SPEAKING_STARTED_MARKER {
                    SessionEvent::SpeakingStarted { at_ms }
                } else {
                    SessionEvent::SpeakingStopped { at_ms }
                };
                Ok(Some((event, SPEAKING_SIZE)))
            }
            TRANSCRIPT_MARKER => {
                if buf.len() < TRANSCRIPT_HEADER_SIZE {
                    return Ok(None);
                }
                let at_ms = i64::from_be_bytes(buf[1..9].try_into().unwrap());
                let role = Role::from_wire(buf[9])?;
                let text_len = u32::from_be_bytes(buf[10..14].try_into().unwrap()) as usize;
                if text_len > MAX_PAYLOAD_BYTES {
                    return Err(EventError::PayloadTooLarge {
                        got: text_len,
                        max: MAX_PAYLOAD_BYTES,
                    });
                }
                let total = TRANSCRIPT_HEADER_SIZE + text_len;
                if buf.len() < total {
                    return Ok(None);
                }
                let text = String::from_utf8(buf[TRANSCRIPT_HEADER_SIZE..total].to_vec())
                    .map_err(|_| EventError::InvalidText)?;
                Ok(Some((SessionEvent::Transcript { role, text, at_ms }, total)))
            }
            other => Err(EventError::UnknownMarker(other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("unknown event marker 0x{0:02x}")]
    UnknownMarker(u8),
    #[error("invalid transcript role {0}")]
    InvalidRole(u8),
    #[error("transcript text is not valid UTF-8")]
    InvalidText,
    #[error("event payload too large: {got} bytes (limit: {max})")]
    PayloadTooLarge { got: usize, max: usize },
}
