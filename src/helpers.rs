use base64::{engine::general_purpose::STANDARD as Base64, DecodeError, Engine};
use std::time::{Duration, Instant};

pub fn base64_encode<T: AsRef<[u8]>>(bytes: T) -> String {
    Base64.encode(bytes)
}

/// Strict base64 decode (standard alphabet, padding required).
///
/// # Errors
///
/// Returns an error if the input is not valid base64.
pub fn base64_decode<T: AsRef<[u8]>>(bytes: T) -> Result<Vec<u8>, DecodeError> {
    Base64.decode(bytes)
}

pub fn with_timing<T>(cb: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = cb();

    (result, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_round_trip() {
        let encoded = base64_encode(b"caption me");

        assert_eq!(base64_decode(encoded).unwrap(), b"caption me");
        assert!(base64_decode("not base64!").is_err());
    }
}
