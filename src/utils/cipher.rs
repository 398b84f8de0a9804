use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{AppError, AppResult};

/// Index of the junk character the backend splices into the daily cipher.
const JUNK_INDEX: usize = 3;

/// Undoes the daily-cipher obfuscation: drop the character at index 3, then
/// base64-decode the remainder. This is the whole scheme; there is no
/// actual encryption behind it.
pub fn decode_daily_cipher(obfuscated: &str) -> AppResult<String> {
    let stripped = strip_junk_char(obfuscated)?;
    let bytes = STANDARD
        .decode(stripped.as_bytes())
        .map_err(|e| AppError::UnexpectedResponse(format!("cipher is not valid base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::UnexpectedResponse(format!("cipher is not valid utf-8: {}", e)))
}

/// Inverse of [`decode_daily_cipher`] for tests: base64-encode and splice a
/// junk character at index 3.
pub fn encode_daily_cipher(text: &str, junk: char) -> String {
    let mut encoded = STANDARD.encode(text.as_bytes());
    let at = encoded
        .char_indices()
        .nth(JUNK_INDEX)
        .map(|(i, _)| i)
        .unwrap_or(encoded.len());
    encoded.insert(at, junk);
    encoded
}

fn strip_junk_char(obfuscated: &str) -> AppResult<String> {
    if obfuscated.chars().count() <= JUNK_INDEX {
        return Err(AppError::UnexpectedResponse(format!(
            "cipher too short: {:?}",
            obfuscated
        )));
    }
    Ok(obfuscated
        .chars()
        .enumerate()
        .filter(|(i, _)| *i != JUNK_INDEX)
        .map(|(_, c)| c)
        .collect())
}

/// Self-generated claim payload for the daily mini-game: ten digits built
/// from the wait duration and a random nonce, joined to the user id with a
/// `|`, base64-encoded. The digits are not derived from any server data;
/// the backend accepts any well-shaped value.
pub fn mini_game_cipher(user_id: &str, sleep_secs: u64, nonce: u64) -> String {
    let digits: String = format!("0{}{}", sleep_secs, nonce).chars().take(10).collect();
    STANDARD.encode(format!("{}|{}", digits, user_id).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_exactly_index_three() {
        assert_eq!(strip_junk_char("abXcdef==").unwrap(), "abXdef==");
    }

    #[test]
    fn short_cipher_is_rejected() {
        assert!(decode_daily_cipher("ab").is_err());
    }

    #[test]
    fn decode_round_trips_the_obfuscation() {
        for text in ["BTC", "hello world", "Pepe", ""] {
            if text.is_empty() {
                continue;
            }
            let obfuscated = encode_daily_cipher(text, 'Q');
            assert_eq!(decode_daily_cipher(&obfuscated).unwrap(), text);
        }
    }

    #[test]
    fn garbage_after_strip_is_an_error() {
        assert!(decode_daily_cipher("!!!!not base64").is_err());
    }

    #[test]
    fn mini_game_cipher_has_expected_shape() {
        let encoded = mini_game_cipher("123456", 17, 98765432109);
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        let (digits, user_id) = decoded.split_once('|').unwrap();
        assert_eq!(user_id, "123456");
        assert_eq!(digits.len(), 10);
        assert!(digits.starts_with("017"));
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }
}
