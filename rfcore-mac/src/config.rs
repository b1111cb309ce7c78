//! Radio and transmit configuration.
//!
//! Defaults come from build-time constants, overridable through `RFCORE_*`
//! environment variables (see `build.rs`).

use rfcore_frame::{ExtendedAddress, PanId, ShortAddress};

mod defaults {
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}

/// IEEE 802.15.4 channels in the 2.4 GHz band.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    /// 2_405 MHz
    _11 = 11,
    /// 2_410 MHz
    _12 = 12,
    /// 2_415 MHz
    _13 = 13,
    /// 2_420 MHz
    _14 = 14,
    /// 2_425 MHz
    _15 = 15,
    /// 2_430 MHz
    _16 = 16,
    /// 2_435 MHz
    _17 = 17,
    /// 2_440 MHz
    _18 = 18,
    /// 2_445 MHz
    _19 = 19,
    /// 2_450 MHz
    _20 = 20,
    /// 2_455 MHz
    _21 = 21,
    /// 2_460 MHz
    _22 = 22,
    /// 2_465 MHz
    _23 = 23,
    /// 2_470 MHz
    _24 = 24,
    /// 2_475 MHz
    _25 = 25,
    /// 2_480 MHz
    _26 = 26,
}

impl Channel {
    /// Every channel, in ascending order.
    pub const ALL: [Channel; 16] = [
        Channel::_11,
        Channel::_12,
        Channel::_13,
        Channel::_14,
        Channel::_15,
        Channel::_16,
        Channel::_17,
        Channel::_18,
        Channel::_19,
        Channel::_20,
        Channel::_21,
        Channel::_22,
        Channel::_23,
        Channel::_24,
        Channel::_25,
        Channel::_26,
    ];

    /// Center frequency in MHz.
    pub fn frequency_mhz(&self) -> u16 {
        2405 + 5 * (*self as u16 - 11)
    }

    /// Value of the frequency control register: the offset from 2394 MHz in
    /// 1 MHz steps.
    pub fn freqctrl(&self) -> u8 {
        11 + 5 * (*self as u8 - 11)
    }
}

impl TryFrom<u8> for Channel {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let index = value.checked_sub(11).ok_or(())?;
        Self::ALL.get(index as usize).copied().ok_or(())
    }
}

impl From<Channel> for u8 {
    fn from(ch: Channel) -> u8 {
        ch as u8
    }
}

impl Default for Channel {
    fn default() -> Self {
        // The build script rejects channels outside 11..=26.
        Self::try_from(defaults::CHANNEL).unwrap_or(Self::_11)
    }
}

/// What a device is configured with when the session is brought up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    pub channel: Channel,
    pub short_address: ShortAddress,
    pub pan_id: PanId,
    /// Overrides the factory extended address when set.
    pub extended_address: Option<ExtendedAddress>,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            channel: Channel::default(),
            short_address: ShortAddress(defaults::SHORT_ADDRESS),
            pan_id: PanId(defaults::PAN_ID),
            extended_address: None,
        }
    }
}

/// Register values derived from a [`RadioConfig`], as programmed by
/// [`TxPort::configure`](crate::port::TxPort::configure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterConfig {
    pub freqctrl: u8,
    pub short_addr: [u8; 2],
    pub pan_id: [u8; 2],
    pub ext_addr: Option<[u8; 8]>,
}

impl From<&RadioConfig> for RegisterConfig {
    fn from(config: &RadioConfig) -> Self {
        Self {
            freqctrl: config.channel.freqctrl(),
            short_addr: config.short_address.0.to_le_bytes(),
            pan_id: config.pan_id.0.to_le_bytes(),
            ext_addr: config.extended_address.map(|a| a.0),
        }
    }
}

/// How long a transmission may take before giving up.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxWait {
    /// Poll the transmit-done flag until it is set, however long that takes.
    Forever,
    /// Give up after this many polls of the transmit-done flag.
    Polls(u32),
}

impl Default for TxWait {
    fn default() -> Self {
        match defaults::TX_DONE_POLL_LIMIT {
            Some(polls) => Self::Polls(polls),
            None => Self::Forever,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TxConfig {
    /// Only transmit when clear channel assessment passes. When the channel
    /// is busy the radio never raises TXDONE, so pair this with a bounded
    /// [`TxWait`].
    pub cca: bool,
    pub wait: TxWait,
}

impl TxConfig {
    pub fn default_with_cca() -> Self {
        Self {
            cca: true,
            ..Default::default()
        }
    }

    pub fn with_wait(mut self, wait: TxWait) -> Self {
        self.wait = wait;
        self
    }
}
