use percent_encoding::percent_decode_str;

use crate::error::{AppError, AppResult};

/// Extracts the `tgWebAppData` payload from a web-app launch URL and decodes
/// it twice (the platform percent-encodes the already-encoded init data).
/// The result is the `initDataRaw` string the login call expects.
pub fn extract_init_data(web_app_url: &str) -> AppResult<String> {
    let after = web_app_url
        .split_once("tgWebAppData=")
        .map(|(_, rest)| rest)
        .ok_or_else(|| {
            AppError::AuthenticationFailed("launch URL carries no tgWebAppData".into())
        })?;
    let encoded = after
        .split_once("&tgWebAppVersion")
        .map(|(data, _)| data)
        .unwrap_or(after);

    let once = percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|e| AppError::AuthenticationFailed(format!("bad launch URL encoding: {}", e)))?;
    let twice = percent_decode_str(&once)
        .decode_utf8()
        .map_err(|e| AppError::AuthenticationFailed(format!("bad launch URL encoding: {}", e)))?;
    Ok(twice.into_owned())
}
