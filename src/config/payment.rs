//! Payment gateway configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Razorpay for INR, Paystack for NGN)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Razorpay API key id (rzp_test_... or rzp_live_...)
    pub razorpay_key_id: String,

    /// Razorpay API key secret
    pub razorpay_key_secret: String,

    /// Razorpay webhook signing secret
    pub razorpay_webhook_secret: String,

    /// Paystack secret key (sk_test_... or sk_live_...)
    pub paystack_secret_key: String,
}

impl PaymentConfig {
    /// Check if both gateways are in test mode
    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id.starts_with("rzp_test_")
            && self.paystack_secret_key.starts_with("sk_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.razorpay_key_id.is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY_KEY_ID"));
        }
        if self.razorpay_key_secret.is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY_KEY_SECRET"));
        }
        if self.razorpay_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY_WEBHOOK_SECRET"));
        }
        if self.paystack_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYSTACK_SECRET_KEY"));
        }

        // Verify key prefixes for safety
        if !self.razorpay_key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidRazorpayKeyId);
        }
        if !self.paystack_secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidPaystackKey);
        }

        Ok(())
    }
}
