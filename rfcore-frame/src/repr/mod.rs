use crate::io::{BufferReader, ByteSink};
use crate::{Error, FrameHeader, Result, FCS_LEN, MAX_PHY_PACKET_SIZE};

mod frame_control;
pub use frame_control::FrameControlRepr;

pub mod builder;
pub use builder::FrameBuilder;

/// A high-level representation of an IEEE 802.15.4 frame: a header and the
/// payload that follows it. The FCS is not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct FrameRepr<'p> {
    /// The MAC header.
    pub header: FrameHeader,
    /// The payload.
    pub payload: &'p [u8],
}

impl<'p> FrameRepr<'p> {
    /// Parse an MPDU held in memory, without length prefix and without FCS.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer ends before the header does.
    pub fn parse(mpdu: &'p [u8]) -> Result<Self> {
        let mut reader = BufferReader::new(mpdu);
        let mut remaining = mpdu.len();
        let header = FrameHeader::decode(&mut reader, &mut remaining);

        if reader.overrun() {
            return Err(Error);
        }

        Ok(Self {
            header,
            payload: reader.remaining(),
        })
    }

    /// Validate the frame.
    pub fn validate(&self) -> Result<()> {
        let fc = &self.header.frame_control;

        if self.header.dst_address.mode() != fc.dst_addressing_mode
            || self.header.src_address.mode() != fc.src_addressing_mode
        {
            return Err(Error);
        }

        if self.header.src_pan_id.is_none() != fc.pan_id_compression {
            return Err(Error);
        }

        // Security headers are not supported.
        if fc.security_enabled {
            return Err(Error);
        }

        if self.psdu_len() > MAX_PHY_PACKET_SIZE {
            return Err(Error);
        }

        Ok(())
    }

    /// Return the length of the frame when emitted, without FCS.
    pub fn buffer_len(&self) -> usize {
        self.header.len() + self.payload.len()
    }

    /// Return the length of the frame on air including FCS. This is the value
    /// of the PHY length prefix.
    pub fn psdu_len(&self) -> usize {
        self.buffer_len() + FCS_LEN
    }

    /// Emit the frame into a sink.
    pub fn emit<S: ByteSink>(&self, sink: &mut S) {
        self.header.emit(sink);
        sink.write_all(self.payload);
    }
}

impl core::fmt::Display for FrameRepr<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.header)?;
        writeln!(f, "Payload")?;
        writeln!(f, "  {:02x?}", self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, AddressingMode, FrameType, PanId, ShortAddress};

    #[test]
    fn parse_truncated_header() {
        assert!(FrameRepr::parse(&[0x41, 0xd8, 0x01, 0xcd]).is_err());
    }

    #[test]
    fn parse_data_frame() {
        let mpdu = [
            0x41, 0x88, 0x07, 0x22, 0x11, 0x34, 0x12, 0x78, 0x56, 0xde, 0xad,
        ];
        let frame = FrameRepr::parse(&mpdu).unwrap();
        let fc = &frame.header.frame_control;
        assert_eq!(fc.frame_type, FrameType::Data);
        assert_eq!(fc.dst_addressing_mode, AddressingMode::Short);
        assert_eq!(fc.src_addressing_mode, AddressingMode::Short);
        assert_eq!(frame.header.sequence_number, 7);
        assert_eq!(frame.header.dst_pan_id, PanId(0x1122));
        assert_eq!(frame.header.dst_address, Address::Short(ShortAddress(0x1234)));
        assert_eq!(frame.header.src_address, Address::Short(ShortAddress(0x5678)));
        assert_eq!(frame.payload, &[0xde, 0xad]);
        assert!(frame.validate().is_ok());

        let mut out = std::vec::Vec::new();
        frame.emit(&mut out);
        assert_eq!(out, mpdu);
        assert_eq!(frame.psdu_len(), mpdu.len() + 2);
    }

    #[test]
    fn validate_rejects_mode_mismatch() {
        let mut frame = FrameRepr::parse(&[0x41, 0x88, 0x07, 0x22, 0x11, 0x34, 0x12, 0x78, 0x56])
            .unwrap();
        frame.header.dst_address = Address::Absent;
        assert!(frame.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized() {
        let payload = [0u8; 120];
        let frame = FrameRepr {
            header: FrameHeader {
                frame_control: crate::FrameControlRepr::data(),
                sequence_number: 0,
                dst_pan_id: PanId(1),
                dst_address: Address::Absent,
                src_pan_id: Some(PanId(1)),
                src_address: Address::Absent,
            },
            payload: &payload,
        };
        assert_eq!(frame.psdu_len(), 7 + 120 + 2);
        assert!(frame.validate().is_err());
    }
}
