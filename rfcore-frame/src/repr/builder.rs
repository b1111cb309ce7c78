//! Typestate builder for outgoing frames.

use super::*;
use crate::{Address, FrameType, FrameVersion, PanId};

/// Marks a [`FrameBuilder`] for a beacon frame.
pub struct Beacon;
/// Marks a [`FrameBuilder`] for an acknowledgment frame.
pub struct Ack;
/// Marks a [`FrameBuilder`] for a data frame.
pub struct Data;
/// Marks a [`FrameBuilder`] for a MAC command frame.
pub struct MacCommand;

/// A helper for building IEEE 802.15.4 frames.
///
/// The addressing modes and the PAN ID compression flag are derived from the
/// supplied fields when the frame is finalized: the source PAN ID is elided
/// when it was not set or equals the destination PAN ID.
pub struct FrameBuilder<'p, T> {
    frame: FrameRepr<'p>,
    r#type: core::marker::PhantomData<T>,
}

impl<'p, T> FrameBuilder<'p, T> {
    fn with_type(frame_type: FrameType, payload: &'p [u8]) -> Self {
        let mut frame_control = FrameControlRepr::data();
        frame_control.frame_type = frame_type;

        Self {
            frame: FrameRepr {
                header: FrameHeader {
                    frame_control,
                    sequence_number: 0,
                    dst_pan_id: PanId::BROADCAST,
                    dst_address: Address::Absent,
                    src_pan_id: None,
                    src_address: Address::Absent,
                },
                payload,
            },
            r#type: core::marker::PhantomData,
        }
    }
}

impl<'p> FrameBuilder<'p, Ack> {
    /// Create a new builder for an acknowledgment frame.
    pub fn new_ack(sequence_number: u8) -> Self {
        Self::with_type(FrameType::Ack, &[]).set_sequence_number(sequence_number)
    }
}

impl<'p> FrameBuilder<'p, Beacon> {
    /// Create a new builder for a beacon frame carrying `payload`.
    pub fn new_beacon(payload: &'p [u8]) -> Self {
        Self::with_type(FrameType::Beacon, payload)
    }
}

impl<'p> FrameBuilder<'p, Data> {
    /// Create a new builder for a data frame.
    pub fn new_data(payload: &'p [u8]) -> Self {
        Self::with_type(FrameType::Data, payload)
    }
}

impl<'p> FrameBuilder<'p, MacCommand> {
    /// Create a new builder for a MAC command frame. The payload starts with
    /// the command identifier.
    pub fn new_mac_command(payload: &'p [u8]) -> Self {
        Self::with_type(FrameType::MacCommand, payload)
    }
}

impl<'p, T> FrameBuilder<'p, T> {
    /// Set the frame sequence number.
    pub fn set_sequence_number(mut self, sequence_number: u8) -> Self {
        self.frame.header.sequence_number = sequence_number;
        self
    }

    /// Set the destination PAN ID.
    pub fn set_dst_pan_id(mut self, pan_id: PanId) -> Self {
        self.frame.header.dst_pan_id = pan_id;
        self
    }

    /// Set the destination address.
    pub fn set_dst_address(mut self, address: Address) -> Self {
        self.frame.header.dst_address = address;
        self
    }

    /// Set the source PAN ID.
    pub fn set_src_pan_id(mut self, pan_id: PanId) -> Self {
        self.frame.header.src_pan_id = Some(pan_id);
        self
    }

    /// Set the source address.
    pub fn set_src_address(mut self, address: Address) -> Self {
        self.frame.header.src_address = address;
        self
    }

    /// Set the acknowledgement request flag.
    pub fn set_ack_request(mut self, ack_request: bool) -> Self {
        self.frame.header.frame_control.ack_request = ack_request;
        self
    }

    /// Set the frame pending flag.
    pub fn set_frame_pending(mut self, frame_pending: bool) -> Self {
        self.frame.header.frame_control.frame_pending = frame_pending;
        self
    }

    /// Set the frame version.
    pub fn set_frame_version(mut self, frame_version: FrameVersion) -> Self {
        self.frame.header.frame_control.frame_version = frame_version;
        self
    }

    /// Finalize the frame builder, returning the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not fit in a PHY packet.
    pub fn finalize(mut self) -> Result<FrameRepr<'p>> {
        let header = &mut self.frame.header;

        header.frame_control.dst_addressing_mode = header.dst_address.mode();
        header.frame_control.src_addressing_mode = header.src_address.mode();

        if header.src_pan_id.is_none() || header.src_pan_id == Some(header.dst_pan_id) {
            header.src_pan_id = None;
            header.frame_control.pan_id_compression = true;
        } else {
            header.frame_control.pan_id_compression = false;
        }

        self.frame.validate()?;

        Ok(self.frame)
    }
}
