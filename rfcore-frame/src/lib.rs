//! Encoding and decoding of IEEE 802.15.4 MAC frames for radios that expose
//! their FIFOs one byte at a time.
//!
//! The header of a MAC frame has a variable shape: which fields follow the
//! fixed leading part depends on the addressing modes and the PAN ID
//! compression flag in the Frame Control field. This crate provides:
//! - [`AddressingMode`], [`Address`], [`ShortAddress`], [`ExtendedAddress`]
//!   and [`PanId`] value types.
//! - A zero-copy [`FrameControl`] reader/writer and its owned counterpart
//!   [`FrameControlRepr`].
//! - [`header_len`] to size a header from its Frame Control field.
//! - [`FrameHeader::emit`] to encode a header into any [`ByteSink`].
//! - [`StaticHeader`] and [`FrameHeader::decode`] to decode a header from
//!   any [`ByteSource`] in a single forward pass.
//!
//! ## Reading a frame
//! ```
//! # use rfcore_frame::*;
//! let mpdu = [
//!     0x41, 0xd8, 0x01, 0xcd, 0xab, 0xff, 0xff, 0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12,
//!     0x00, 0x2b, 0x00, 0x00, 0x00,
//! ];
//! let frame = FrameRepr::parse(&mpdu).unwrap();
//!
//! assert_eq!(frame.header.frame_control.frame_type, FrameType::Data);
//! assert_eq!(frame.header.dst_pan_id, PanId(0xabcd));
//! assert_eq!(frame.header.dst_address, Address::BROADCAST);
//! assert_eq!(frame.payload, &[0x2b, 0x00, 0x00, 0x00]);
//! ```
//!
//! ## Writing a frame
//! ```
//! # use rfcore_frame::*;
//! let frame = FrameBuilder::new_data(&[0x2b, 0x00, 0x00, 0x00])
//!     .set_sequence_number(1)
//!     .set_dst_pan_id(PanId(0xabcd))
//!     .set_dst_address(Address::BROADCAST)
//!     .set_src_address(Address::Short(ShortAddress(0x0001)))
//!     .finalize()
//!     .unwrap();
//!
//! let mut buffer = [0u8; 127];
//! let mut writer = BufferWriter::new(&mut buffer);
//! frame.emit(&mut writer);
//! assert_eq!(writer.position(), frame.buffer_len());
//! ```
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
mod tests;

mod addressing;
pub use addressing::*;

mod frame_control;
pub use frame_control::*;

mod header;
pub use header::*;

mod io;
pub use io::*;

mod repr;
pub use repr::*;

pub mod fcs;

/// An error that can occur when reading or writing an IEEE 802.15.4 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "malformed IEEE 802.15.4 frame")
    }
}

/// A type alias for `Result<T, frame::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
