//! Webhook body signature verification.
//!
//! Senders sign the raw request body with HMAC-SHA256 keyed by the shared
//! webhook secret and send the standard (padded) base64 digest in the
//! `X-vtypeio-Hmac-SHA256` header.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the client-supplied signature.
pub const SIGNATURE_HEADER: &str = "X-vtypeio-Hmac-SHA256";

/// Outcome of comparing a received signature against the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified {
        expected: String,
        received: String,
    },
    Rejected {
        expected: String,
        received: String,
    },
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }

    pub fn expected(&self) -> &str {
        match self {
            Verification::Verified { expected, .. } | Verification::Rejected { expected, .. } => {
                expected
            }
        }
    }
}

/// Compute `base64(HMAC-SHA256(secret, body))`.
pub fn compute_signature(secret: &[u8], body: &[u8]) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(body);

    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify `received` against the signature of `body` under `secret`.
///
/// A missing header is treated as the empty string, which never matches.
/// Comparison is exact: a differently padded or cased value is rejected
/// even if it decodes to the same digest.
pub fn verify_signature(secret: &[u8], body: &[u8], received: Option<&str>) -> Verification {
    let expected = compute_signature(secret, body);
    let received = received.unwrap_or_default();

    if constant_time_compare(&expected, received) {
        Verification::Verified {
            expected,
            received: received.to_string(),
        }
    } else {
        Verification::Rejected {
            expected,
            received: received.to_string(),
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
