use wasm_bindgen::prelude::*;

/// `0x1234...abcd` style display for long hex strings.
#[wasm_bindgen]
pub fn format_address(address: &str) -> String {
    match (address.get(..6), address.get(address.len().saturating_sub(4)..)) {
        (Some(head), Some(tail)) if address.len() > 10 => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}
