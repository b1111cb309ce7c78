//! The MAC header: length accounting, encoding and incremental decoding.
//!
//! On the wire the header is laid out as follows:
//!
//! | Field                  | Octets  | Present                         |
//! |------------------------|---------|---------------------------------|
//! | Frame Control          | 2       | always                          |
//! | Sequence number        | 1       | always                          |
//! | Destination PAN ID     | 2       | always                          |
//! | Destination address    | 0/2/8   | per destination addressing mode |
//! | Source PAN ID          | 2       | unless PAN ID compression is set|
//! | Source address         | 0/2/8   | per source addressing mode      |
//!
//! The addressing modes are only known once the Frame Control field has been
//! read, so decoding is split into the fixed leading part
//! ([`StaticHeader`]) followed by one conditional step per variable field.
//! Every step takes the running count of bytes left in the frame and
//! decrements it by what it consumed.

use crate::io::{ByteSink, ByteSource};
use crate::{Address, FrameControlRepr, PanId};

/// Length of the Frame Control field, sequence number and destination PAN ID.
pub const STATIC_HEADER_LEN: usize = 5;

/// Length of the trailing frame check sequence. On receive with auto-CRC
/// enabled the radio puts the RSSI and correlation bytes in its place.
pub const FCS_LEN: usize = 2;

/// Maximum PSDU size, the largest value the length prefix may carry.
pub const MAX_PHY_PACKET_SIZE: usize = 127;

/// Return the length of the header described by `fc`, in octets.
pub fn header_len(fc: &FrameControlRepr) -> usize {
    STATIC_HEADER_LEN
        + fc.dst_addressing_mode.size()
        + src_pan_id_len(fc)
        + fc.src_addressing_mode.size()
}

fn src_pan_id_len(fc: &FrameControlRepr) -> usize {
    if fc.pan_id_compression {
        0
    } else {
        2
    }
}

fn consume(remaining: &mut usize, n: usize) {
    *remaining = remaining.saturating_sub(n);
}

/// The fixed leading part of every header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticHeader {
    /// Frame Control field.
    pub frame_control: FrameControlRepr,
    /// Sequence number.
    pub sequence_number: u8,
    /// Destination PAN identifier.
    pub dst_pan_id: PanId,
}

impl StaticHeader {
    /// Read the Frame Control field, the sequence number and the destination
    /// PAN ID.
    pub fn read<S: ByteSource>(src: &mut S, remaining: &mut usize) -> Self {
        let frame_control = FrameControlRepr::from_bytes(src.read_array());
        let sequence_number = src.read_byte();
        let dst_pan_id = PanId::read(src);
        consume(remaining, STATIC_HEADER_LEN);

        Self {
            frame_control,
            sequence_number,
            dst_pan_id,
        }
    }

    /// Read the destination address, if the addressing mode has one.
    pub fn read_dst_address<S: ByteSource>(&self, src: &mut S, remaining: &mut usize) -> Address {
        let mode = self.frame_control.dst_addressing_mode;
        consume(remaining, mode.size());
        Address::read(src, mode)
    }

    /// Read the source PAN ID, unless it is elided by PAN ID compression.
    pub fn read_src_pan_id<S: ByteSource>(
        &self,
        src: &mut S,
        remaining: &mut usize,
    ) -> Option<PanId> {
        if self.frame_control.pan_id_compression {
            None
        } else {
            consume(remaining, 2);
            Some(PanId::read(src))
        }
    }

    /// Read the source address, if the addressing mode has one.
    pub fn read_src_address<S: ByteSource>(&self, src: &mut S, remaining: &mut usize) -> Address {
        let mode = self.frame_control.src_addressing_mode;
        consume(remaining, mode.size());
        Address::read(src, mode)
    }
}

/// A decoded or to-be-encoded MAC header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct FrameHeader {
    /// Frame Control field.
    pub frame_control: FrameControlRepr,
    /// Sequence number.
    pub sequence_number: u8,
    /// Destination PAN identifier, always present.
    pub dst_pan_id: PanId,
    /// Destination address. Must agree with the destination addressing mode.
    pub dst_address: Address,
    /// Source PAN identifier. `None` exactly when PAN ID compression is set.
    pub src_pan_id: Option<PanId>,
    /// Source address. Must agree with the source addressing mode.
    pub src_address: Address,
}

impl FrameHeader {
    /// Return the length of the header in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        header_len(&self.frame_control)
    }

    /// The fixed leading part of this header.
    pub fn static_header(&self) -> StaticHeader {
        StaticHeader {
            frame_control: self.frame_control,
            sequence_number: self.sequence_number,
            dst_pan_id: self.dst_pan_id,
        }
    }

    /// Decode a complete header from `src`, decrementing `remaining` by the
    /// number of octets consumed.
    ///
    /// This never fails. A corrupt Frame Control field yields a structurally
    /// valid header that may carry a reserved addressing mode or frame type.
    pub fn decode<S: ByteSource>(src: &mut S, remaining: &mut usize) -> Self {
        let head = StaticHeader::read(src, remaining);
        let dst_address = head.read_dst_address(src, remaining);
        let src_pan_id = head.read_src_pan_id(src, remaining);
        let src_address = head.read_src_address(src, remaining);

        Self {
            frame_control: head.frame_control,
            sequence_number: head.sequence_number,
            dst_pan_id: head.dst_pan_id,
            dst_address,
            src_pan_id,
            src_address,
        }
    }

    /// Encode the header into `sink`, in wire order.
    ///
    /// # Panics
    ///
    /// In debug builds, panics when an address does not match its addressing
    /// mode, or when the presence of the source PAN ID disagrees with the
    /// PAN ID compression flag.
    pub fn emit<S: ByteSink>(&self, sink: &mut S) {
        let fc = &self.frame_control;
        debug_assert!(Self::address_matches(&self.dst_address, fc.dst_addressing_mode));
        debug_assert!(Self::address_matches(&self.src_address, fc.src_addressing_mode));
        debug_assert_eq!(self.src_pan_id.is_none(), fc.pan_id_compression);

        sink.write_all(&fc.to_bytes());
        sink.write_byte(self.sequence_number);
        self.dst_pan_id.write(sink);
        self.dst_address.write(sink);
        if !fc.pan_id_compression {
            self.src_pan_id.unwrap_or_default().write(sink);
        }
        self.src_address.write(sink);
    }

    fn address_matches(address: &Address, mode: crate::AddressingMode) -> bool {
        address.mode().size() == mode.size()
    }
}

impl From<StaticHeader> for FrameHeader {
    /// A header with only the fixed leading part filled in. The variable
    /// fields are empty until they are read.
    fn from(head: StaticHeader) -> Self {
        Self {
            frame_control: head.frame_control,
            sequence_number: head.sequence_number,
            dst_pan_id: head.dst_pan_id,
            dst_address: Address::Absent,
            src_pan_id: None,
            src_address: Address::Absent,
        }
    }
}

impl core::fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Frame Header")?;
        writeln!(f, "  type: {:?}", self.frame_control.frame_type)?;
        writeln!(f, "  sequence number: {}", self.sequence_number)?;
        writeln!(f, "  dst pan id: {}", self.dst_pan_id)?;
        writeln!(f, "  dst address: {}", self.dst_address)?;
        if let Some(id) = self.src_pan_id {
            writeln!(f, "  src pan id: {}", id)?;
        }
        writeln!(f, "  src address: {}", self.src_address)?;
        Ok(())
    }
}
