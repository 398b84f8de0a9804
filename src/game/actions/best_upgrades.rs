use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{jitter_secs, wait_or_cancel};
use crate::error::{AppError, AppResult};
use crate::game::client::GameClient;

/// Knobs for the repeated best-upgrade sweep.
#[derive(Debug, Clone)]
pub struct BestUpgradeOptions {
    /// Minimum profit-per-hour gained per coin spent, as a percentage.
    pub profit_threshold: f64,
    /// Upper bound on full passes; `None` runs until no card qualifies or
    /// the run is cancelled.
    pub max_passes: Option<u32>,
    /// Inclusive jittered pause (seconds) between cards in one pass.
    pub card_jitter_secs: (u64, u64),
    /// Inclusive jittered pause (seconds) between passes.
    pub pass_jitter_secs: (u64, u64),
}

impl Default for BestUpgradeOptions {
    fn default() -> Self {
        Self {
            profit_threshold: 10.0,
            max_passes: None,
            card_jitter_secs: (5, 15),
            pass_jitter_secs: (8, 20),
        }
    }
}

/// Repeatedly buys every available, non-expired, cooldown-free card whose
/// profit ratio clears the threshold, re-fetching between passes. Cards are
/// taken in server order; no ratio re-sort is imposed. An explicit loop with
/// a pass cap and a cancellation token keeps the sweep terminable.
pub async fn buy_best_upgrades(
    game: &GameClient,
    options: &BestUpgradeOptions,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let mut passes = 0u32;
    loop {
        let upgrades = game.upgrades_for_buy().await?;
        let eligible: Vec<_> = upgrades
            .upgrades_for_buy
            .iter()
            .filter(|card| {
                card.is_available
                    && !card.is_expired
                    && card.active_cooldown().is_none()
                    && card.profit_ratio() >= options.profit_threshold
            })
            .collect();

        if eligible.is_empty() {
            info!(
                "{} - No upgrades clear the {}% profit threshold",
                game.handle(),
                options.profit_threshold
            );
            return Ok(());
        }

        let total = eligible.len();
        for (index, card) in eligible.iter().enumerate() {
            let bought = game.buy_upgrade(&card.id).await?;
            let level = bought
                .clicker_user
                .upgrades
                .get(&card.id)
                .map(|u| u.level)
                .ok_or_else(|| {
                    AppError::UnexpectedResponse(format!(
                        "buy-upgrade response missing {}",
                        card.id
                    ))
                })?;
            info!(
                "{} - Card bought: {} - Price: {} - Level: {} - Profit: {}/h",
                game.handle(),
                card.name,
                card.price,
                level,
                card.profit_per_hour_delta
            );

            if index + 1 < total {
                let pause = jitter_secs(options.card_jitter_secs);
                wait_or_cancel(Duration::from_secs(pause), cancel).await?;
            }
        }
        info!("{} - Bought {} card(s) this pass", game.handle(), total);

        passes += 1;
        if let Some(max) = options.max_passes {
            if passes >= max {
                info!("{} - Pass limit {} reached, stopping sweep", game.handle(), max);
                return Ok(());
            }
        }

        let pause = jitter_secs(options.pass_jitter_secs);
        info!("{} - Waiting {}s before the next pass", game.handle(), pause);
        wait_or_cancel(Duration::from_secs(pause), cancel).await?;
    }
}
