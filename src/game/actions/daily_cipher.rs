use tracing::info;

use crate::error::AppResult;
use crate::game::client::GameClient;
use crate::utils::cipher::decode_daily_cipher;

/// Decodes and submits the daily cipher word if it has not been claimed yet.
pub async fn run_daily_cipher(game: &GameClient) -> AppResult<()> {
    let config = game.config().await?;
    let Some(state) = config.daily_cipher else {
        info!("{} - No daily cipher on offer", game.handle());
        return Ok(());
    };
    if state.is_claimed {
        info!("{} - Daily cipher already claimed", game.handle());
        return Ok(());
    }

    let word = decode_daily_cipher(&state.cipher)?;
    game.claim_daily_cipher(&word).await?;
    info!(
        "{} - Daily cipher claimed: {} (+{} coins)",
        game.handle(),
        word,
        state.bonus_coins
    );
    Ok(())
}
