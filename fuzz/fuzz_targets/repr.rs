#![no_main]

use rfcore_frame::{BufferWriter, FrameRepr};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|repr: FrameRepr| {
    if repr.validate().is_err() {
        return;
    }

    let mut buffer = vec![0; repr.buffer_len()];
    repr.emit(&mut BufferWriter::new(&mut buffer));

    assert_eq!(FrameRepr::parse(&buffer), Ok(repr));
});
