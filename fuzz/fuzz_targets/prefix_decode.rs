//! Fuzz target for the output-prefix codec
//!
//! # Strategy
//!
//! - Arbitrary bytes through `Identifier::parse`
//! - Every prefix type and key id through `compute_identifier`
//! - Prefixed outputs parsed back
//!
//! # Invariants
//!
//! - Parsing never panics; inputs shorter than 5 bytes yield nothing
//! - A parsed identifier is the first 5 input bytes, the rest is untouched
//! - `compute_identifier` then `parse` recovers start byte and key id
//! - RAW identifiers are empty, all others are exactly 5 bytes

#![no_main]

use arbitrary::Arbitrary;
use cipherset_core::{
    Identifier, OutputPrefixType, compute_identifier,
    format::{LEGACY_START_BYTE, NON_RAW_PREFIX_SIZE, TINK_START_BYTE},
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct PrefixScenario {
    prefix_type: u8,
    key_id: u32,
    output: Vec<u8>,
    raw_input: Vec<u8>,
}

fn prefix_type(selector: u8) -> OutputPrefixType {
    match selector % 5 {
        0 => OutputPrefixType::Raw,
        1 => OutputPrefixType::Tink,
        2 => OutputPrefixType::Legacy,
        3 => OutputPrefixType::Crunchy,
        _ => OutputPrefixType::Unknown,
    }
}

fuzz_target!(|scenario: PrefixScenario| {
    // INVARIANT 1: parse never panics and splits at exactly 5 bytes
    match Identifier::parse(&scenario.raw_input) {
        Some((identifier, rest)) => {
            assert_eq!(identifier.as_bytes(), &scenario.raw_input[..NON_RAW_PREFIX_SIZE]);
            assert_eq!(rest, &scenario.raw_input[NON_RAW_PREFIX_SIZE..]);
        },
        None => assert!(scenario.raw_input.len() < NON_RAW_PREFIX_SIZE),
    }

    let prefix_type = prefix_type(scenario.prefix_type);
    let Ok(identifier) = compute_identifier(prefix_type, scenario.key_id) else {
        // INVARIANT 2: only the unknown prefix type is rejected
        assert_eq!(prefix_type, OutputPrefixType::Unknown);
        return;
    };

    let prefixed = identifier.prepend_to(&scenario.output);
    assert_eq!(prefixed.len(), identifier.len() + scenario.output.len());

    if prefix_type == OutputPrefixType::Raw {
        // INVARIANT 3: RAW adds nothing
        assert!(identifier.is_empty());
        assert_eq!(prefixed, scenario.output);
        return;
    }

    // INVARIANT 4: round trip through parse
    let Some((parsed, rest)) = Identifier::parse(&prefixed) else {
        panic!("prefixed output must parse");
    };
    assert_eq!(parsed, identifier);
    assert_eq!(rest, scenario.output.as_slice());
    assert_eq!(parsed.key_id(), Some(scenario.key_id));

    let expected_start =
        if prefix_type == OutputPrefixType::Tink { TINK_START_BYTE } else { LEGACY_START_BYTE };
    assert_eq!(parsed.start_byte(), Some(expected_start));
});
