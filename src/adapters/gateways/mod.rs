//! Payment gateway adapters.

mod mock;
mod paystack;
mod razorpay;

pub use mock::MockGateway;
pub use paystack::{PaystackConfig, PaystackGateway};
pub use razorpay::{RazorpayConfig, RazorpayGateway};

/// Lowercase hex encoding for HMAC digests.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decodes a lowercase/uppercase hex string, or `None` on bad input.
///
/// Total over arbitrary strings; non-ASCII input is rejected, never
/// sliced mid-character.
pub(crate) fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some(((hi << 4) | lo) as u8)
        })
        .collect()
}
