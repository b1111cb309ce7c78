use std::collections::HashMap;
use std::env;
use std::fmt::Write;
use std::path::PathBuf;

const PREFIX: &str = "RFCORE_";

fn main() {
    // name -> (type, default)
    let mut settings: HashMap<&str, (&str, &str)> = HashMap::from([
        ("CHANNEL", ("u8", "11")),
        ("PAN_ID", ("u16", "0xffff")),
        // ShortAddress::NONE
        ("SHORT_ADDRESS", ("u16", "0xfffe")),
        ("TX_DONE_POLL_LIMIT", ("Option<u32>", "None")),
    ]);

    println!("cargo:rerun-if-changed=build.rs");
    for name in settings.keys() {
        println!("cargo:rerun-if-env-changed={PREFIX}{name}");
    }

    let mut out = String::new();

    for (key, value) in env::vars() {
        let Some(name) = key.strip_prefix(PREFIX) else {
            continue;
        };
        let Some((ty, _)) = settings.remove(name) else {
            panic!("unknown setting {key}");
        };
        check(name, &value);
        writeln!(out, "pub const {name}: {ty} = {value};").unwrap();
    }

    // Whatever was not overridden keeps its default.
    for (name, (ty, default)) in &settings {
        writeln!(out, "pub const {name}: {ty} = {default};").unwrap();
    }

    let path = PathBuf::from(env::var_os("OUT_DIR").unwrap()).join("config.rs");
    std::fs::write(path, out).unwrap();
}

fn check(name: &str, value: &str) {
    match name {
        "CHANNEL" => match value.parse::<u8>() {
            Ok(11..=26) => {}
            _ => panic!("{PREFIX}CHANNEL must be a channel in 11..=26, got {value}"),
        },
        "TX_DONE_POLL_LIMIT" => {
            if value != "None" && !(value.starts_with("Some(") && value.ends_with(')')) {
                panic!("{PREFIX}TX_DONE_POLL_LIMIT must be `None` or `Some(polls)`, got {value}");
            }
        }
        _ => {}
    }
}
