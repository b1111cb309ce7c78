//! Frame check sequence.
//!
//! On the device the radio appends and verifies the FCS itself, and on
//! receive replaces it by the RSSI and correlation bytes. This module is for
//! host tools that handle captures which still carry the real FCS.

use crc::{Crc, CRC_16_KERMIT};

const FCS: Crc<u16> = Crc::<u16>::new(&CRC_16_KERMIT);

/// Compute the FCS over an MPDU without its trailing FCS.
pub fn checksum(mpdu: &[u8]) -> u16 {
    FCS.checksum(mpdu)
}

/// Check the trailing two octets of `psdu` against the FCS of the rest.
pub fn verify(psdu: &[u8]) -> bool {
    let Some(split) = psdu.len().checked_sub(super::FCS_LEN) else {
        return false;
    };
    let (mpdu, fcs) = psdu.split_at(split);
    checksum(mpdu) == u16::from_le_bytes([fcs[0], fcs[1]])
}
