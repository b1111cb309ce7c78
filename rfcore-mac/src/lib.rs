//! A blocking IEEE 802.15.4 MAC driver for radio cores that expose their
//! FIFOs through a byte-wide data register.
//!
//! - [`transmit`] writes a frame into the TX FIFO and busy-waits until the
//!   radio has clocked it onto the air.
//! - [`receive`] decodes a frame out of the RX FIFO inside the radio
//!   interrupt handler, in a single forward pass, and hands it to one of four
//!   per-frame-type callbacks.
//! - [`session`] brings a radio up and hands back a transmit owner for the
//!   main context and a receive owner for the interrupt handler.
//!
//! The hardware itself is reached through the [`port::RxPort`] and
//! [`port::TxPort`] traits.
#![no_std]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[macro_use]
pub(crate) mod utils;

pub use rfcore_frame as frame;

pub mod config;
pub mod port;
pub mod receive;
pub mod session;
pub mod transmit;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The transmit-done flag was not raised within the configured number of
    /// polls.
    TxTimeout,
    /// Header, payload and FCS do not fit in one PHY packet.
    FrameTooLong,
}

pub type Result<T> = core::result::Result<T, Error>;
