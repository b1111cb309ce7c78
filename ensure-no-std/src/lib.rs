#![no_std]

use rfcore_mac::port::{RxPort, TxPort};
use rfcore_mac::receive::{FrameHandler, Receiver};
use rfcore_mac::session::{RadioSession, SharedRx};

pub fn service<R: RxPort, H: FrameHandler>(radio: &SharedRx<R>, handler: &mut H) -> Option<()> {
    radio.with(|rx| rx.on_interrupt(handler))
}

pub fn resend<T: TxPort>(radio: &mut RadioSession<T>) -> rfcore_mac::Result<()> {
    radio.retransmit()
}

pub static RECEIVER: Receiver = Receiver::new();
