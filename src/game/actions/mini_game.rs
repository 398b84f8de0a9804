use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppResult;
use crate::game::actions::{jitter_secs, wait_or_cancel};
use crate::game::client::GameClient;
use crate::utils::cipher::mini_game_cipher;

#[derive(Debug, Clone)]
pub struct MiniGameOptions {
    /// How long to "play" between starting the round and claiming it.
    pub play_secs: (u64, u64),
}

impl Default for MiniGameOptions {
    fn default() -> Self {
        Self { play_secs: (12, 26) }
    }
}

fn random_nonce() -> u64 {
    rand::thread_rng().gen_range(10_000_000_000..100_000_000_000)
}

/// Plays one round of the daily keys mini game: start the round, idle for a
/// plausible play time, then submit the solved cipher.
pub async fn run_mini_game(
    game: &GameClient,
    user_id: &str,
    total_keys: i64,
    options: &MiniGameOptions,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let config = game.config().await?;
    let Some(state) = config.daily_keys_mini_game else {
        info!("{} - Mini game is not available", game.handle());
        return Ok(());
    };
    if state.is_claimed {
        info!("{} - Mini game already claimed today", game.handle());
        return Ok(());
    }
    if state.remain_seconds_to_next_attempt > 0 {
        info!(
            "{} - Mini game on cooldown for {}s",
            game.handle(),
            state.remain_seconds_to_next_attempt
        );
        return Ok(());
    }

    let sleep_secs = jitter_secs(options.play_secs);
    let cipher = mini_game_cipher(user_id, sleep_secs, random_nonce());

    game.start_mini_game().await?;
    wait_or_cancel(Duration::from_secs(sleep_secs), cancel).await?;
    let claimed = game.claim_mini_game(&cipher).await?;

    info!(
        "{} - Mini game claimed (+{} keys, {} total)",
        game.handle(),
        claimed.clicker_user.total_keys - total_keys,
        claimed.clicker_user.total_keys
    );
    Ok(())
}
