use crate::{AddressingMode, FrameControl, FrameType, FrameVersion};

/// A high-level representation of the IEEE 802.15.4 Frame Control field.
///
/// The reserved bits are not represented: they are dropped on parse and
/// emitted as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct FrameControlRepr {
    /// Frame type field
    pub frame_type: FrameType,
    /// Security enabled field
    pub security_enabled: bool,
    /// Frame pending field
    pub frame_pending: bool,
    /// Acknowledgement request field
    pub ack_request: bool,
    /// PAN ID compression field
    pub pan_id_compression: bool,
    /// Destination addressing mode field
    pub dst_addressing_mode: AddressingMode,
    /// Frame version field
    pub frame_version: FrameVersion,
    /// Source addressing mode field
    pub src_addressing_mode: AddressingMode,
}

impl FrameControlRepr {
    /// Parse the Frame Control field from a reader.
    pub fn parse<T: AsRef<[u8]>>(fc: FrameControl<T>) -> Self {
        Self {
            frame_type: fc.frame_type(),
            security_enabled: fc.security_enabled(),
            frame_pending: fc.frame_pending(),
            ack_request: fc.ack_request(),
            pan_id_compression: fc.pan_id_compression(),
            dst_addressing_mode: fc.dst_addressing_mode(),
            frame_version: fc.frame_version(),
            src_addressing_mode: fc.src_addressing_mode(),
        }
    }

    /// Decode the two wire octets of the field. Every bit pattern is valid.
    pub fn from_bytes(raw: [u8; 2]) -> Self {
        Self::parse(FrameControl::new_unchecked(raw))
    }

    /// Encode into the two wire octets of the field, reserved bits zeroed.
    pub fn to_bytes(&self) -> [u8; 2] {
        let mut raw = [0u8; 2];
        self.emit(&mut FrameControl::new_unchecked(&mut raw[..]));
        raw
    }

    /// Emit the Frame Control field into a writer.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, fc: &mut FrameControl<T>) {
        fc.set_frame_type(self.frame_type);
        fc.set_security_enabled(self.security_enabled);
        fc.set_frame_pending(self.frame_pending);
        fc.set_ack_request(self.ack_request);
        fc.set_pan_id_compression(self.pan_id_compression);
        fc.clear_reserved();
        fc.set_dst_addressing_mode(self.dst_addressing_mode);
        fc.set_frame_version(self.frame_version);
        fc.set_src_addressing_mode(self.src_addressing_mode);
    }

    /// Frame control of a data frame with no addressing, as a starting point.
    pub const fn data() -> Self {
        Self {
            frame_type: FrameType::Data,
            security_enabled: false,
            frame_pending: false,
            ack_request: false,
            pan_id_compression: false,
            dst_addressing_mode: AddressingMode::Absent,
            frame_version: FrameVersion::Ieee802154_2006,
            src_addressing_mode: AddressingMode::Absent,
        }
    }
}
