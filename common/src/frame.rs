//! Raw CAN frames and decode errors.

use core::fmt;

/// Largest payload a classic CAN frame carries.
pub const MAX_PAYLOAD: usize = 8;

/// One CAN message as handed over by the transceiver driver.
///
/// `dlc` is the data length code the driver reported. It is kept separately
/// from the payload so a garbled DLC (shorter than the layout needs, or above
/// 8) can be rejected by the decoder instead of being silently padded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub id: u32,
    pub dlc: u8,
    pub payload: [u8; MAX_PAYLOAD],
}

impl Frame {
    /// Build a frame from a byte slice.
    ///
    /// At most 8 bytes are copied; `dlc` records the full slice length
    /// (saturating at 255) so oversized input still reads as malformed.
    pub fn new(
        id: u32,
        data: &[u8],
    ) -> Self {
        let mut payload = [0u8; MAX_PAYLOAD];
        let n = data.len().min(MAX_PAYLOAD);
        payload[..n].copy_from_slice(&data[..n]);
        Self {
            id,
            dlc: u8::try_from(data.len()).unwrap_or(u8::MAX),
            payload,
        }
    }

    /// Full 8-byte frame.
    pub const fn from_payload(
        id: u32,
        payload: [u8; MAX_PAYLOAD],
    ) -> Self {
        Self {
            id,
            dlc: MAX_PAYLOAD as u8,
            payload,
        }
    }

    /// Payload bytes covered by the DLC.
    pub fn data(&self) -> &[u8] { &self.payload[..usize::from(self.dlc).min(MAX_PAYLOAD)] }
}

/// Why a frame with a recognised id was dropped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// DLC above 8 or too short for the active layout.
    MalformedFrame { id: u32, dlc: u8, required: u8 },
}

impl DecodeError {
    /// Frame id the error refers to.
    pub const fn id(&self) -> u32 {
        match self {
            Self::MalformedFrame { id, .. } => *id,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::MalformedFrame { id, dlc, required } => {
                write!(f, "malformed frame 0x{id:03X}: dlc {dlc}, need {required}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_short_frame() {
        let frame = Frame::new(0x03B, &[1, 2, 3]);
        assert_eq!(frame.dlc, 3);
        assert_eq!(frame.data(), &[1, 2, 3]);
        assert_eq!(frame.payload, [1, 2, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_new_oversized_frame_keeps_dlc() {
        let frame = Frame::new(0x03B, &[0xAA; 12]);
        assert_eq!(frame.dlc, 12);
        assert_eq!(frame.data().len(), MAX_PAYLOAD);
    }

    #[test]
    fn test_from_payload_is_full_length() {
        let frame = Frame::from_payload(0x6B2, [9; 8]);
        assert_eq!(frame.dlc, 8);
        assert_eq!(frame.data(), &[9; 8]);
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::MalformedFrame {
            id: 0x3CB,
            dlc: 2,
            required: 7,
        };
        assert_eq!(err.id(), 0x3CB);
        assert_eq!(std::format!("{err}"), "malformed frame 0x3CB: dlc 2, need 7");
    }
}
