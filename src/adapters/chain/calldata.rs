//! Minimal ABI calldata construction.
//!
//! The handful of contract calls this crate issues (allowance checks,
//! approvals, fills, cancels) all take statically-sized arguments, so
//! calldata is built by hand: a 4-byte keccak selector followed by
//! left-padded 32-byte words. No ABI codegen needed.

use alloy::primitives::{Address, U256, keccak256};

/// 32-byte ABI word.
pub type Word = [u8; 32];

/// First four bytes of the keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Left-pad an address into an ABI word.
pub fn address_word(addr: Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr.as_slice());
    word
}

/// Big-endian U256 as an ABI word.
pub fn u256_word(value: U256) -> Word {
    value.to_be_bytes()
}

/// Bool as an ABI word (0 or 1 in the last byte).
pub fn bool_word(value: bool) -> Word {
    let mut word = [0u8; 32];
    word[31] = u8::from(value);
    word
}

/// Selector plus packed argument words.
pub fn encode_call(signature: &str, words: &[Word]) -> Vec<u8> {
    let mut calldata = Vec::with_capacity(4 + 32 * words.len());
    calldata.extend_from_slice(&selector(signature));
    for word in words {
        calldata.extend_from_slice(word);
    }
    calldata
}
