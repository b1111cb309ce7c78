//! IEEE 802.15.4 Frame Control field readers and writers.

use super::AddressingMode;
use super::{Error, Result};

/// IEEE 802.15.4 frame type.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum FrameType {
    /// Beacon frame.
    Beacon = 0b000,
    /// Data frame.
    Data = 0b001,
    /// Acknowledgment frame.
    Ack = 0b010,
    /// MAC command frame.
    MacCommand = 0b011,
    /// Reserved. Dispatched like a MAC command.
    Reserved = 0b100,
    /// Multipurpose frame (IEEE 802.15.4-2015).
    Multipurpose = 0b101,
    /// Fragment or FRAK frame (IEEE 802.15.4-2015).
    FragmentOrFrak = 0b110,
    /// Extended frame type (IEEE 802.15.4-2015).
    Extended = 0b111,
}

impl From<u8> for FrameType {
    fn from(value: u8) -> Self {
        match value & 0b111 {
            0b000 => Self::Beacon,
            0b001 => Self::Data,
            0b010 => Self::Ack,
            0b011 => Self::MacCommand,
            0b100 => Self::Reserved,
            0b101 => Self::Multipurpose,
            0b110 => Self::FragmentOrFrak,
            _ => Self::Extended,
        }
    }
}

/// IEEE 802.15.4 frame version.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum FrameVersion {
    /// IEEE 802.15.4-2003.
    Ieee802154_2003 = 0b00,
    /// IEEE 802.15.4-2006.
    Ieee802154_2006 = 0b01,
    /// IEEE 802.15.4-2015 and later.
    Ieee802154_2020 = 0b10,
    /// Reserved value.
    Unknown = 0b11,
}

impl From<u8> for FrameVersion {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Ieee802154_2003,
            0b01 => Self::Ieee802154_2006,
            0b10 => Self::Ieee802154_2020,
            _ => Self::Unknown,
        }
    }
}

/// Subfield positions as `(shift, mask)` over the little-endian word.
mod field {
    pub const FRAME_TYPE: (u16, u16) = (0, 0b111);
    pub const SECURITY_ENABLED: (u16, u16) = (3, 0b1);
    pub const FRAME_PENDING: (u16, u16) = (4, 0b1);
    pub const ACK_REQUEST: (u16, u16) = (5, 0b1);
    pub const PAN_ID_COMPRESSION: (u16, u16) = (6, 0b1);
    pub const RESERVED: (u16, u16) = (7, 0b111);
    pub const DST_ADDRESSING_MODE: (u16, u16) = (10, 0b11);
    pub const FRAME_VERSION: (u16, u16) = (12, 0b11);
    pub const SRC_ADDRESSING_MODE: (u16, u16) = (14, 0b11);
}

/// A view over the two octets of a Frame Control field.
///
/// Reading needs `T: AsRef<[u8]>`, writing additionally `AsMut<[u8]>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameControl<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> FrameControl<T> {
    /// Wrap `buffer`, which must hold at least two octets.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than two octets.
    pub fn new(buffer: T) -> Result<Self> {
        if buffer.as_ref().len() < 2 {
            return Err(Error);
        }
        Ok(Self::new_unchecked(buffer))
    }

    /// Wrap `buffer` without checking its length. Accessors panic if it is
    /// shorter than two octets.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// The whole field as a host-order integer.
    pub fn raw(&self) -> u16 {
        let b = self.buffer.as_ref();
        u16::from_le_bytes([b[0], b[1]])
    }

    fn get(&self, (shift, mask): (u16, u16)) -> u16 {
        (self.raw() >> shift) & mask
    }

    /// Frame type, bits 0 to 2.
    pub fn frame_type(&self) -> FrameType {
        FrameType::from(self.get(field::FRAME_TYPE) as u8)
    }

    /// Bits 7 to 9. Zero in every frame this crate emits.
    pub fn reserved(&self) -> u8 {
        self.get(field::RESERVED) as u8
    }

    /// Destination addressing mode, bits 10 and 11.
    pub fn dst_addressing_mode(&self) -> AddressingMode {
        AddressingMode::from(self.get(field::DST_ADDRESSING_MODE) as u8)
    }

    /// Frame version, bits 12 and 13.
    pub fn frame_version(&self) -> FrameVersion {
        FrameVersion::from(self.get(field::FRAME_VERSION) as u8)
    }

    /// Source addressing mode, bits 14 and 15.
    pub fn src_addressing_mode(&self) -> AddressingMode {
        AddressingMode::from(self.get(field::SRC_ADDRESSING_MODE) as u8)
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> FrameControl<T> {
    fn set(&mut self, (shift, mask): (u16, u16), value: u16) {
        let raw = (self.raw() & !(mask << shift)) | ((value & mask) << shift);
        self.buffer.as_mut()[..2].copy_from_slice(&raw.to_le_bytes());
    }

    /// Write the frame type.
    pub fn set_frame_type(&mut self, frame_type: FrameType) {
        self.set(field::FRAME_TYPE, frame_type as u16);
    }

    /// Zero bits 7 to 9.
    pub fn clear_reserved(&mut self) {
        self.set(field::RESERVED, 0);
    }

    /// Write the destination addressing mode.
    pub fn set_dst_addressing_mode(&mut self, mode: AddressingMode) {
        self.set(field::DST_ADDRESSING_MODE, mode as u16);
    }

    /// Write the frame version.
    pub fn set_frame_version(&mut self, version: FrameVersion) {
        self.set(field::FRAME_VERSION, version as u16);
    }

    /// Write the source addressing mode.
    pub fn set_src_addressing_mode(&mut self, mode: AddressingMode) {
        self.set(field::SRC_ADDRESSING_MODE, mode as u16);
    }
}

macro_rules! flags {
    ($($(#[$doc:meta])* $get:ident, $set:ident => $field:ident;)*) => {
        impl<T: AsRef<[u8]>> FrameControl<T> {
            $(
                $(#[$doc])*
                pub fn $get(&self) -> bool {
                    self.get(field::$field) != 0
                }
            )*
        }

        impl<T: AsRef<[u8]> + AsMut<[u8]>> FrameControl<T> {
            $(
                #[doc = concat!("Write the flag read by [`Self::", stringify!($get), "`].")]
                pub fn $set(&mut self, value: bool) {
                    self.set(field::$field, value as u16);
                }
            )*
        }
    };
}

flags! {
    /// Bit 3: an auxiliary security header follows the addressing fields.
    security_enabled, set_security_enabled => SECURITY_ENABLED;
    /// Bit 4: the sender has more data for the recipient.
    frame_pending, set_frame_pending => FRAME_PENDING;
    /// Bit 5: the recipient must acknowledge the frame.
    ack_request, set_ack_request => ACK_REQUEST;
    /// Bit 6: the source PAN ID is elided because it equals the destination
    /// PAN ID.
    pan_id_compression, set_pan_id_compression => PAN_ID_COMPRESSION;
}

impl<T: AsRef<[u8]>> core::fmt::Display for FrameControl<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?} v{} sec={} pend={} ack={} panc={} dst={:?} src={:?}",
            self.frame_type(),
            self.frame_version() as u8,
            self.security_enabled() as u8,
            self.frame_pending() as u8,
            self.ack_request() as u8,
            self.pan_id_compression() as u8,
            self.dst_addressing_mode(),
            self.src_addressing_mode(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_data_frame_control() {
        // Data, PAN ID compression, short dst, 2006, extended src.
        let fc = FrameControl::new([0x41, 0xd8]).unwrap();
        assert_eq!(fc.frame_type(), FrameType::Data);
        assert!(!fc.security_enabled());
        assert!(!fc.frame_pending());
        assert!(!fc.ack_request());
        assert!(fc.pan_id_compression());
        assert_eq!(fc.reserved(), 0);
        assert_eq!(fc.dst_addressing_mode(), AddressingMode::Short);
        assert_eq!(fc.frame_version(), FrameVersion::Ieee802154_2006);
        assert_eq!(fc.src_addressing_mode(), AddressingMode::Extended);
    }

    #[test]
    fn too_short() {
        assert!(FrameControl::new([0x41]).is_err());
    }

    #[test]
    fn bit_positions() {
        let at = |bit: u16| FrameControl::new_unchecked((1u16 << bit).to_le_bytes());
        assert!(at(3).security_enabled());
        assert!(at(4).frame_pending());
        assert!(at(5).ack_request());
        assert!(at(6).pan_id_compression());
        assert_eq!(at(7).reserved(), 0b001);
        assert_eq!(at(9).reserved(), 0b100);
        assert_eq!(at(11).dst_addressing_mode(), AddressingMode::Short);
        assert_eq!(at(12).frame_version(), FrameVersion::Ieee802154_2006);
        assert_eq!(at(15).src_addressing_mode(), AddressingMode::Short);
    }

    #[test]
    fn setters_overwrite() {
        let mut fc = FrameControl::new_unchecked([0xff, 0xff]);
        fc.set_frame_type(FrameType::Ack);
        fc.set_security_enabled(false);
        fc.set_pan_id_compression(false);
        fc.clear_reserved();
        fc.set_dst_addressing_mode(AddressingMode::Absent);
        assert_eq!(fc.frame_type(), FrameType::Ack);
        assert!(!fc.security_enabled());
        assert!(fc.frame_pending());
        assert!(!fc.pan_id_compression());
        assert_eq!(fc.reserved(), 0);
        assert_eq!(fc.dst_addressing_mode(), AddressingMode::Absent);
        assert_eq!(fc.src_addressing_mode(), AddressingMode::Extended);
    }

    #[test]
    fn every_frame_type_code_maps() {
        for code in 0u8..8 {
            assert_eq!(FrameType::from(code) as u8, code);
        }
    }
}
