//! Request signing for the free-trial endpoint.
//!
//! Free-trial requests carry no stored credential; instead the service
//! verifies an HMAC over the caller's origin URL and a timestamp, both sent
//! as request headers, against a shared secret baked into the client.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Shared secret for free-trial request signing. Must match the value the
/// service verifies against; there is no negotiation or rotation.
const FREE_TRIAL_SECRET: &str = "AbFUY5D9EvkMWu8y3zxwXRhPBpNaejcsKrT4Q6tnm27SfZqVGL";

type HmacSha256 = Hmac<Sha256>;

/// Computes the free-trial request hash.
///
/// The signed message is the origin URL immediately followed by the decimal
/// Unix timestamp, with no separator. Returns the lowercase hex digest.
pub fn free_trial_hash(origin_url: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(FREE_TRIAL_SECRET.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(origin_url.as_bytes());
    mac.update(timestamp.to_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
