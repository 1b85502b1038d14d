use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Credentials carried in a basic-auth Authorization header.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// One-way password hash. The verify side re-hashes and compares, so the
/// stored value is opaque to everything else in the service.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    hash_password(password) == stored_hash
}

/// Parse an `Authorization: Basic <base64(user:pass)>` header value.
pub fn parse_basic_auth(header_value: &str) -> Result<Credentials, String> {
    let encoded = header_value
        .strip_prefix("Basic ")
        .ok_or_else(|| "Authorization header must use Basic scheme".to_string())?;

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| "Invalid base64 in Authorization header".to_string())?;

    let decoded =
        String::from_utf8(decoded).map_err(|_| "Invalid UTF-8 in basic credentials".to_string())?;

    // Passwords may contain ':', usernames may not.
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| "Basic credentials must be username:password".to_string())?;

    if username.is_empty() {
        return Err("Empty username in basic credentials".to_string());
    }

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_through_verify() {
        let hash = hash_password("123");
        assert!(verify_password(&hash, "123"));
        assert!(!verify_password(&hash, "1234"));
    }

    #[test]
    fn hashing_is_deterministic_and_hex() {
        let hash = hash_password("secret");
        assert_eq!(hash, hash_password("secret"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn parses_well_formed_header() {
        let encoded = BASE64.encode("illy:hunter:2");
        let creds = parse_basic_auth(&format!("Basic {}", encoded)).unwrap();
        assert_eq!(creds.username, "illy");
        assert_eq!(creds.password, "hunter:2");
    }

    #[test]
    fn rejects_bearer_scheme() {
        assert!(parse_basic_auth("Bearer abcdef").is_err());
    }

    #[test]
    fn rejects_garbage_base64() {
        assert!(parse_basic_auth("Basic %%%").is_err());
    }

    #[test]
    fn rejects_missing_separator() {
        let encoded = BASE64.encode("no-colon-here");
        assert!(parse_basic_auth(&format!("Basic {}", encoded)).is_err());
    }
}
