use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{jitter_secs, wait_or_cancel};
use crate::error::{AppError, AppResult};
use crate::game::client::GameClient;
use crate::models::game::PurchaseCondition;

/// Timing knobs for a purchase chain; tests zero the jitter.
#[derive(Debug, Clone)]
pub struct PurchaseOptions {
    /// Cooldowns longer than this abort the chain instead of blocking it.
    pub cooldown_ceiling_secs: u64,
    /// Inclusive jittered pause (seconds) after every buy.
    pub buy_jitter_secs: (u64, u64),
}

impl Default for PurchaseOptions {
    fn default() -> Self {
        Self {
            cooldown_ceiling_secs: crate::constants::COOLDOWN_CEILING_SECS,
            buy_jitter_secs: (5, 15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub card_id: String,
    pub name: String,
    pub level: i64,
    pub price: f64,
}

/// Buys one card, resolving a `ByUpgrade` prerequisite chain first when
/// needed. Balance is re-read from the server before every attempt, but a
/// burst of buys can still race server-side state; that staleness window is
/// inherent to the backend contract.
pub async fn purchase_card(
    game: &GameClient,
    card_id: &str,
    options: &PurchaseOptions,
    cancel: &CancellationToken,
) -> AppResult<PurchaseOutcome> {
    let mut resolving = HashSet::new();
    purchase_inner(game, card_id.to_string(), options, cancel, &mut resolving).await
}

/// Boxed so the prerequisite recursion has a nameable future type.
fn purchase_inner<'a>(
    game: &'a GameClient,
    card_id: String,
    options: &'a PurchaseOptions,
    cancel: &'a CancellationToken,
    resolving: &'a mut HashSet<String>,
) -> Pin<Box<dyn Future<Output = AppResult<PurchaseOutcome>> + Send + 'a>> {
    Box::pin(async move {
        loop {
            let upgrades = game.upgrades_for_buy().await?;
            let profile = game.sync_profile().await?;

            let card = upgrades
                .upgrades_for_buy
                .iter()
                .find(|c| c.id == card_id)
                .ok_or_else(|| AppError::CardNotFound(card_id.clone()))?
                .clone();

            if profile.balance_coins < card.price {
                return Err(AppError::InsufficientBalance {
                    card: card.name,
                    price: card.price,
                    balance: profile.balance_coins,
                });
            }

            if !card.is_available {
                match card.condition {
                    Some(PurchaseCondition::ByUpgrade {
                        ref upgrade_id,
                        level: required_level,
                    }) => {
                        let prerequisite = upgrades
                            .upgrades_for_buy
                            .iter()
                            .find(|c| &c.id == upgrade_id)
                            .ok_or_else(|| AppError::CardNotFound(upgrade_id.clone()))?;
                        let gap = required_level - prerequisite.level;
                        if gap <= 0 {
                            // Gate already satisfied yet the card stays
                            // locked; nothing left to automate.
                            return Err(AppError::CardUnavailable(card.name));
                        }
                        if !resolving.insert(upgrade_id.clone()) {
                            return Err(AppError::PrerequisiteCycle(upgrade_id.clone()));
                        }
                        info!(
                            "{} - {} requires {} at level {}; buying it {} time(s)",
                            game.handle(),
                            card.name,
                            upgrade_id,
                            required_level,
                            gap
                        );
                        for _ in 0..gap {
                            purchase_inner(
                                game,
                                upgrade_id.clone(),
                                options,
                                cancel,
                                resolving,
                            )
                            .await?;
                        }
                        // Retry the original card with fresh server state.
                        continue;
                    }
                    Some(PurchaseCondition::ReferralCount { referral_count }) => {
                        return Err(AppError::ReferralRequirementUnmet {
                            card: card.name,
                            needed: referral_count,
                        });
                    }
                    Some(PurchaseCondition::MoreReferralsCount {
                        more_referrals_count,
                    }) => {
                        return Err(AppError::ReferralRequirementUnmet {
                            card: card.name,
                            needed: more_referrals_count,
                        });
                    }
                    Some(PurchaseCondition::Other) | None => {
                        return Err(AppError::CardUnavailable(card.name));
                    }
                }
            }

            if let Some(cooldown) = card.active_cooldown() {
                if cooldown > options.cooldown_ceiling_secs {
                    return Err(AppError::CooldownTooLong {
                        card: card.name,
                        cooldown_secs: cooldown,
                        ceiling_secs: options.cooldown_ceiling_secs,
                    });
                }
                info!(
                    "{} - {} on cooldown, waiting {}s",
                    game.handle(),
                    card.name,
                    cooldown
                );
                wait_or_cancel(Duration::from_secs(cooldown), cancel).await?;
            }

            let bought = game.buy_upgrade(&card_id).await?;
            let level = bought
                .clicker_user
                .upgrades
                .get(&card_id)
                .map(|u| u.level)
                .ok_or_else(|| {
                    AppError::UnexpectedResponse(format!(
                        "buy-upgrade response missing {}",
                        card_id
                    ))
                })?;

            info!(
                "{} - Card bought: {} - Price: {} - Level: {} - Balance: {:.2}",
                game.handle(),
                card.name,
                card.price,
                level,
                profile.balance_coins - card.price
            );

            let pause = jitter_secs(options.buy_jitter_secs);
            if pause > 0 {
                info!(
                    "{} - Waiting {}s before the next purchase",
                    game.handle(),
                    pause
                );
            }
            wait_or_cancel(Duration::from_secs(pause), cancel).await?;

            return Ok(PurchaseOutcome {
                card_id,
                name: card.name,
                level,
                price: card.price,
            });
        }
    })
}
