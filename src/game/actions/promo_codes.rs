use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::constants::{promo_app_token, SLOW_PROMO_TITLE};
use crate::error::{AppError, AppResult};
use crate::game::actions::{jitter_secs, wait_or_cancel};
use crate::game::client::GameClient;
use crate::game::promo_exchange::PromoExchange;
use crate::models::promo::PromoCampaign;

#[derive(Debug, Clone)]
pub struct PromoOptions {
    /// Settle time after login-client before the first poll; the exchange
    /// rejects sessions that ask for a code immediately.
    pub warmup_secs: u64,
    /// Pause between register-event polls.
    pub attempt_delay_secs: u64,
    /// Poll budget per code before the campaign is given up on.
    pub max_attempts: u32,
    /// Larger budget for the campaign known to generate codes slowly.
    pub slow_max_attempts: u32,
    /// Jittered pause between applying consecutive codes.
    pub between_codes_secs: (u64, u64),
}

impl Default for PromoOptions {
    fn default() -> Self {
        Self {
            warmup_secs: 25,
            attempt_delay_secs: 20,
            max_attempts: 20,
            slow_max_attempts: 120,
            between_codes_secs: (10, 15),
        }
    }
}

impl PromoOptions {
    fn attempt_budget(&self, campaign: &PromoCampaign) -> u32 {
        if campaign.title.en == SLOW_PROMO_TITLE {
            self.slow_max_attempts
        } else {
            self.max_attempts
        }
    }
}

/// Runs one fake play session against the exchange until it hands out a code,
/// or the attempt budget runs dry.
async fn obtain_code(
    exchange: &PromoExchange,
    app_token: &str,
    campaign: &PromoCampaign,
    options: &PromoOptions,
    cancel: &CancellationToken,
) -> AppResult<String> {
    let client_token = exchange.login_client(app_token).await?;
    wait_or_cancel(Duration::from_secs(options.warmup_secs), cancel).await?;

    let budget = options.attempt_budget(campaign);
    for attempt in 1..=budget {
        let has_code = match exchange.register_event(&client_token, &campaign.promo_id).await {
            Ok(has_code) => has_code,
            Err(error) => {
                debug!(
                    "register-event attempt {}/{} for {} failed: {}",
                    attempt, budget, campaign.title.en, error
                );
                false
            }
        };
        if has_code {
            if let Some(code) = exchange.create_code(&client_token, &campaign.promo_id).await? {
                return Ok(code);
            }
        }
        if attempt < budget {
            wait_or_cancel(Duration::from_secs(options.attempt_delay_secs), cancel).await?;
        }
    }
    Err(AppError::PromoCodeUnobtainable(campaign.title.en.clone()))
}

/// Generates and applies reward codes for every campaign that still owes keys
/// today. Campaigns the exchange has no application token for are skipped; a
/// campaign whose exchange session never yields a code is abandoned without
/// failing the rest of the run.
pub async fn run_promo_codes(
    game: &GameClient,
    exchange: &PromoExchange,
    options: &PromoOptions,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let promos = game.get_promos().await?;

    for campaign in &promos.promos {
        let Some(app_token) = promo_app_token(&campaign.promo_id) else {
            debug!(
                "{} - No exchange token for campaign {}, skipping",
                game.handle(),
                campaign.title.en
            );
            continue;
        };
        let received_today = promos
            .states
            .iter()
            .find(|state| state.promo_id == campaign.promo_id)
            .map(|state| state.receive_keys_today)
            .unwrap_or(0);
        if received_today >= campaign.keys_per_day {
            info!(
                "{} - {}: all {} keys already claimed today",
                game.handle(),
                campaign.title.en,
                campaign.keys_per_day
            );
            continue;
        }

        let mut claimed = received_today;
        while claimed < campaign.keys_per_day {
            let code = match obtain_code(exchange, app_token, campaign, options, cancel).await {
                Ok(code) => code,
                Err(AppError::Cancelled) => return Err(AppError::Cancelled),
                Err(error) => {
                    warn!(
                        "{} - Giving up on {}: {}",
                        game.handle(),
                        campaign.title.en,
                        error
                    );
                    break;
                }
            };

            let applied = game.apply_promo(&code).await?;
            claimed = applied.promo_state.receive_keys_today;
            info!(
                "{} - Applied code for {} ({}/{} keys today, {} total)",
                game.handle(),
                campaign.title.en,
                claimed,
                campaign.keys_per_day,
                applied.clicker_user.total_keys
            );

            if claimed < campaign.keys_per_day {
                wait_or_cancel(
                    Duration::from_secs(jitter_secs(options.between_codes_secs)),
                    cancel,
                )
                .await?;
            }
        }
    }
    Ok(())
}
