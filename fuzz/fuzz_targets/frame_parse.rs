//! Fuzz target for frame decoding
//!
//! Feeds arbitrary text to `parse` and checks that decoding is total:
//! - Never panics, whatever the input
//! - Malformed events carry the input unchanged
//! - Legacy frames always carry a digit-only sender

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomline_proto::{parse, parse_legacy, ChatEvent};

fuzz_target!(|raw: &str| {
    match parse(raw) {
        ChatEvent::Malformed { raw: kept } => assert_eq!(kept, raw),
        event => assert!(event.sender().is_some()),
    }

    if let Some(sender) = parse_legacy(raw).sender() {
        assert!(!sender.as_str().is_empty());
        assert!(sender.as_str().bytes().all(|b| b.is_ascii_digit()));
    }
});
