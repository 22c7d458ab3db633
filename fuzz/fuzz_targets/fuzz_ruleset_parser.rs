//! Fuzz target for ruleset document parsing.
//!
//! Goal: The parser should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_ruleset_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(rule_set) = specguard_domain::create_rule_set_from_data(data) {
        // Reading extends must be repeatable for whatever shape was parsed
        assert_eq!(rule_set.get_extends_value(), rule_set.get_extends_value());
    }
    let _ = specguard_domain::create_rule_set_using_json(data);
});
