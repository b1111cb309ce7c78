use clap::Parser;
use rfcore_cat::{FrameParser, Framing};

/// `cat` for IEEE 802.15.4 frames.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The frame to parse, as hex.
    #[clap(value_parser(clap::builder::NonEmptyStringValueParser::new()))]
    input: String,

    /// The input was read out of the RX FIFO: length prefix first, RSSI and
    /// correlation last.
    #[arg(long, conflicts_with = "fcs")]
    fifo: bool,

    /// The input ends with an FCS, which is checked.
    #[arg(long)]
    fcs: bool,
}

fn main() {
    let args = Args::parse();

    let framing = if args.fifo {
        Framing::Fifo
    } else if args.fcs {
        Framing::WithFcs
    } else {
        Framing::Mpdu
    };

    match FrameParser::parse_hex(&args.input, framing) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
