use tokio_util::sync::CancellationToken;
use tracing::info;

use super::purchase::{purchase_card, PurchaseOptions};
use crate::error::{AppError, AppResult};
use crate::game::client::GameClient;
use crate::game::combo_hints::ComboHintProvider;

/// Buys the externally hinted daily combo set and claims the bonus.
///
/// Fails closed: no hint, or an unbought remainder costing more than the
/// safety ceiling, aborts before any purchase. The hint is a guess; the
/// ceiling keeps a bad guess from draining the balance.
pub async fn run_daily_combo(
    game: &GameClient,
    hints: &dyn ComboHintProvider,
    options: &PurchaseOptions,
    cost_ceiling: f64,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let upgrades = game.upgrades_for_buy().await?;
    let Some(combo) = upgrades.daily_combo else {
        info!("{} - No daily combo on offer", game.handle());
        return Ok(());
    };
    if combo.is_claimed {
        info!("{} - Daily combo already claimed", game.handle());
        return Ok(());
    }

    let hinted = hints.fetch().await?;
    if hinted.is_empty() {
        return Err(AppError::ComboHintUnavailable);
    }

    let to_buy: Vec<String> = hinted
        .into_iter()
        .filter(|id| !combo.upgrade_ids.contains(id))
        .collect();

    let total_cost: f64 = upgrades
        .upgrades_for_buy
        .iter()
        .filter(|card| to_buy.contains(&card.id))
        .map(|card| card.price)
        .sum();
    if total_cost >= cost_ceiling {
        return Err(AppError::ComboCostTooHigh {
            cost: total_cost,
            ceiling: cost_ceiling,
        });
    }

    for card_id in &to_buy {
        purchase_card(game, card_id, options, cancel).await?;
    }

    game.claim_daily_combo().await?;
    info!("{} - Daily combo claimed", game.handle());
    Ok(())
}
