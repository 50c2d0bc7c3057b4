//! Block explorer links and short display forms of addresses and hashes.

use alloy_primitives::{Address, TxHash};

/// Returns the explorer page of a transaction.
pub fn explorer_tx_url(base: &str, hash: &TxHash) -> String {
    format!("{}/tx/{hash}", base.trim_end_matches('/'))
}

/// Returns the explorer page of an account or contract.
pub fn explorer_address_url(base: &str, address: &Address) -> String {
    format!("{}/address/{address}", base.trim_end_matches('/'))
}

/// Formats an address as `0x1234...abcd`.
pub fn short_address(address: &Address) -> String {
    shorten(&address.to_string(), 6, 4)
}

/// Formats a transaction hash as `0x12345678...90abcdef`.
pub fn short_hash(hash: &TxHash) -> String {
    shorten(&hash.to_string(), 10, 8)
}

fn shorten(s: &str, head: usize, tail: usize) -> String {
    if s.len() <= head + tail {
        return s.to_string();
    }
    format!("{}...{}", &s[..head], &s[s.len() - tail..])
}
