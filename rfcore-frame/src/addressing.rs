//! Addresses, PAN identifiers and addressing modes.

use crate::io::{ByteSink, ByteSource};

/// A 16-bit PAN identifier.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct PanId(pub u16);

impl PanId {
    /// The broadcast PAN identifier.
    pub const BROADCAST: PanId = PanId(0xffff);

    /// Read a PAN identifier (little-endian) from `src`.
    pub fn read<S: ByteSource>(src: &mut S) -> Self {
        Self(src.read_u16_le())
    }

    /// Write the PAN identifier (little-endian) into `sink`.
    pub fn write<S: ByteSink>(&self, sink: &mut S) {
        sink.write_u16_le(self.0);
    }
}

impl From<u16> for PanId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for PanId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

/// A 16-bit short address.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct ShortAddress(pub u16);

impl ShortAddress {
    /// The broadcast short address.
    pub const BROADCAST: ShortAddress = ShortAddress(0xffff);
    /// The address of a device that is associated but has no short address.
    pub const NONE: ShortAddress = ShortAddress(0xfffe);
}

impl From<u16> for ShortAddress {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// A 64-bit extended address, stored in wire order.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct ExtendedAddress(pub [u8; 8]);

impl From<[u8; 8]> for ExtendedAddress {
    fn from(value: [u8; 8]) -> Self {
        Self(value)
    }
}

/// An IEEE 802.15.4 address.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum Address {
    /// No address field.
    #[default]
    Absent,
    /// A 16-bit short address.
    Short(ShortAddress),
    /// A 64-bit extended address.
    Extended(ExtendedAddress),
}

impl Address {
    /// The broadcast address.
    pub const BROADCAST: Address = Address::Short(ShortAddress::BROADCAST);

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !self.is_broadcast() && !self.is_absent()
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the address field is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, Address::Absent)
    }

    /// Return the [`AddressingMode`] that describes this address.
    pub fn mode(&self) -> AddressingMode {
        AddressingMode::from(*self)
    }

    /// Return the length of the address in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.mode().size()
    }

    /// Read an address of the given mode from `src`.
    ///
    /// [`AddressingMode::Absent`] and [`AddressingMode::Reserved`] consume
    /// nothing and yield [`Address::Absent`].
    pub fn read<S: ByteSource>(src: &mut S, mode: AddressingMode) -> Self {
        match mode {
            AddressingMode::Absent | AddressingMode::Reserved => Address::Absent,
            AddressingMode::Short => Address::Short(ShortAddress(src.read_u16_le())),
            AddressingMode::Extended => Address::Extended(ExtendedAddress(src.read_array())),
        }
    }

    /// Write the address into `sink`.
    ///
    /// Short addresses go out low byte first, extended addresses in array
    /// order.
    pub fn write<S: ByteSink>(&self, sink: &mut S) {
        match self {
            Address::Absent => {}
            Address::Short(addr) => sink.write_u16_le(addr.0),
            Address::Extended(addr) => sink.write_all(&addr.0),
        }
    }
}

impl From<ShortAddress> for Address {
    fn from(value: ShortAddress) -> Self {
        Address::Short(value)
    }
}

impl From<ExtendedAddress> for Address {
    fn from(value: ExtendedAddress) -> Self {
        Address::Extended(value)
    }
}

impl From<Address> for AddressingMode {
    fn from(value: Address) -> Self {
        match value {
            Address::Absent => AddressingMode::Absent,
            Address::Short(_) => AddressingMode::Short,
            Address::Extended(_) => AddressingMode::Extended,
        }
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Address::Absent => write!(f, "absent"),
            Address::Short(ShortAddress(value)) => {
                let [hi, lo] = value.to_be_bytes();
                write!(f, "{:02x}:{:02x}", hi, lo)
            }
            Address::Extended(ExtendedAddress(value)) => write!(
                f,
                "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                value[0], value[1], value[2], value[3], value[4], value[5], value[6], value[7]
            ),
        }
    }
}

/// IEEE 802.15.4 addressing mode.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum AddressingMode {
    /// No PAN ID or address field.
    Absent = 0b00,
    /// Never emitted by this system. Treated as [`AddressingMode::Absent`]
    /// when sizing a header.
    Reserved = 0b01,
    /// A 2-octet address.
    Short = 0b10,
    /// An 8-octet address.
    Extended = 0b11,
}

impl AddressingMode {
    /// Return the size of the address in octets.
    pub fn size(&self) -> usize {
        match self {
            Self::Absent | Self::Reserved => 0,
            Self::Short => 2,
            Self::Extended => 8,
        }
    }

    /// Returns `true` when no address octets follow for this mode.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Absent,
            0b01 => Self::Reserved,
            0b10 => Self::Short,
            _ => Self::Extended,
        }
    }
}
