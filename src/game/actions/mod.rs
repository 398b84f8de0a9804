pub mod auto_tap;
pub mod best_upgrades;
pub mod daily_cipher;
pub mod daily_combo;
pub mod daily_reward;
pub mod mini_game;
pub mod promo_codes;
pub mod purchase;

use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// Sleeps for `duration` unless the run is cancelled first. Every deliberate
/// wait in the handlers goes through here so an operator can abort a
/// multi-account run cleanly.
pub(crate) async fn wait_or_cancel(
    duration: Duration,
    cancel: &CancellationToken,
) -> AppResult<()> {
    if duration.is_zero() {
        return if cancel.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        };
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Uniform pick from an inclusive seconds range; reversed bounds are
/// tolerated.
pub(crate) fn jitter_secs(range: (u64, u64)) -> u64 {
    let (low, high) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    rand::thread_rng().gen_range(low..=high)
}
