#![no_main]

use rfcore_frame::{BufferReader, FrameHeader, FrameRepr, MAX_PHY_PACKET_SIZE};

use libfuzzer_sys::{fuzz_target, Corpus};

// Feed arbitrary bytes through the streaming decoder, the way the receive
// path does with whatever the RX FIFO yields.
fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() > MAX_PHY_PACKET_SIZE {
        return Corpus::Reject;
    }

    let mut remaining = data.len();
    let mut reader = BufferReader::new(data);
    let header = FrameHeader::decode(&mut reader, &mut remaining);
    assert!(remaining <= data.len());

    if reader.overrun() {
        assert!(FrameRepr::parse(data).is_err());
        return Corpus::Keep;
    }

    assert_eq!(remaining, data.len() - header.len());

    let mut out = Vec::new();
    header.emit(&mut out);
    assert_eq!(out.len(), header.len());

    let mut again = out.len();
    let decoded = FrameHeader::decode(&mut BufferReader::new(&out), &mut again);
    assert_eq!(decoded, header);
    assert_eq!(again, 0);

    Corpus::Keep
});
