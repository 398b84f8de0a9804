use rand::Rng;
use tracing::info;

use crate::error::AppResult;
use crate::game::client::GameClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapPlan {
    pub taps: i64,
    pub claimed_energy: i64,
    pub remaining_energy: i64,
}

/// Picks a randomized tap count between half and all of what the energy
/// budget allows.
pub fn plan_taps(earn_per_tap: i64, available_taps: i64, rng: &mut impl Rng) -> Option<TapPlan> {
    if earn_per_tap <= 0 || available_taps <= 0 {
        return None;
    }
    // Ceiling divisions, matching what the game's own client sends.
    let max_taps = (available_taps + earn_per_tap - 1) / earn_per_tap;
    let min_taps = (max_taps + 1) / 2;
    let taps = rng.gen_range(min_taps..=max_taps);
    let claimed_energy = taps * earn_per_tap;
    Some(TapPlan {
        taps,
        claimed_energy,
        remaining_energy: (available_taps - claimed_energy).max(0),
    })
}

/// Free daily boost that restores the energy pool.
const FULL_ENERGY_BOOST_ID: &str = "BoostFullAvailableTaps";

/// Applies the free full-energy boost when it is off cooldown; returns the
/// refreshed `(earn_per_tap, available_taps)`, or `None` when no refill is
/// possible.
async fn refill_energy(game: &GameClient) -> AppResult<Option<(i64, i64)>> {
    let boosts = game.boosts_for_buy().await?;
    let ready = boosts
        .boosts_for_buy
        .iter()
        .any(|b| b.id == FULL_ENERGY_BOOST_ID && b.cooldown_seconds.unwrap_or(0) == 0);
    if !ready {
        return Ok(None);
    }
    game.apply_boost(FULL_ENERGY_BOOST_ID).await?;
    let profile = game.sync_profile().await?;
    info!(
        "{} - Energy boost applied, {} taps restored",
        game.handle(),
        profile.available_taps
    );
    Ok(Some((profile.earn_per_tap, profile.available_taps)))
}

/// Submits exactly one tap batch for the planned count. An empty energy pool
/// is refilled with the free boost first when that boost is off cooldown.
pub async fn run_auto_tap(
    game: &GameClient,
    earn_per_tap: i64,
    available_taps: i64,
) -> AppResult<()> {
    let (earn_per_tap, available_taps) = if available_taps <= 0 {
        match refill_energy(game).await? {
            Some(refreshed) => refreshed,
            None => {
                info!("{} - No tap energy and no boost available", game.handle());
                return Ok(());
            }
        }
    } else {
        (earn_per_tap, available_taps)
    };

    let Some(plan) = plan_taps(earn_per_tap, available_taps, &mut rand::thread_rng()) else {
        info!("{} - No tap energy available", game.handle());
        return Ok(());
    };

    game.tap(plan.remaining_energy, plan.taps).await?;
    info!(
        "{} - Taps sent: {} - Energy claimed: {} - Remaining taps: {}",
        game.handle(),
        plan.taps,
        plan.claimed_energy,
        plan.remaining_energy
    );
    Ok(())
}
