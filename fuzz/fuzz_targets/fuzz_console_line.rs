//! Fuzz target: `console::parse_line`
//!
//! Arbitrary UTF-8 lines must decode or be rejected without panicking.
//!
//! cargo fuzz run fuzz_console_line

#![no_main]

use homealarm::adapters::console::{ConsoleLine, parse_line};
use homealarm::events::{AlarmEvent, MAX_COMMAND_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(ConsoleLine::Event(AlarmEvent::CommandReceived(payload))) = parse_line(line) {
        assert!(payload.len() <= MAX_COMMAND_LEN);
        assert_eq!(payload.first(), Some(&b'{'));
    }
});
