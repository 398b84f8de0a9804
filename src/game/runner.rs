use futures::{stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::constants::{
    COMBO_COST_CEILING, COMBO_HINT_URL, DEFAULT_CONCURRENCY, GAME_API_BASE, PROMO_API_BASE,
};
use crate::error::{AppError, AppResult};
use crate::game::actions::auto_tap::run_auto_tap;
use crate::game::actions::best_upgrades::{buy_best_upgrades, BestUpgradeOptions};
use crate::game::actions::daily_cipher::run_daily_cipher;
use crate::game::actions::daily_combo::run_daily_combo;
use crate::game::actions::daily_reward::{run_daily_reward, DailyRewardOptions};
use crate::game::actions::mini_game::{run_mini_game, MiniGameOptions};
use crate::game::actions::promo_codes::{run_promo_codes, PromoOptions};
use crate::game::actions::purchase::PurchaseOptions;
use crate::game::auth::{login, WebAppUrlProvider};
use crate::game::client::GameClient;
use crate::game::combo_hints::DatavibeComboProvider;
use crate::game::promo_exchange::PromoExchange;
use crate::models::game::ProfileSnapshot;
use crate::models::Account;
use crate::utils::http::{build_client, get_client};

/// Everything the tool can do for one logged-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BotAction {
    DailyReward,
    DailyCipher,
    AutoTap,
    DailyCombo,
    MiniGame,
    PromoCodes,
    BuyBestUpgrades,
    AllInOne,
}

impl BotAction {
    pub const ALL: [BotAction; 8] = [
        BotAction::DailyReward,
        BotAction::DailyCipher,
        BotAction::AutoTap,
        BotAction::DailyCombo,
        BotAction::MiniGame,
        BotAction::PromoCodes,
        BotAction::BuyBestUpgrades,
        BotAction::AllInOne,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BotAction::DailyReward => "Claim daily reward",
            BotAction::DailyCipher => "Solve daily cipher",
            BotAction::AutoTap => "Auto tap",
            BotAction::DailyCombo => "Buy daily combo",
            BotAction::MiniGame => "Play keys mini game",
            BotAction::PromoCodes => "Generate promo codes",
            BotAction::BuyBestUpgrades => "Buy best upgrades",
            BotAction::AllInOne => "All in one",
        }
    }
}

/// Endpoints and handler knobs for a run. Base URLs are overridable so the
/// whole pipeline can be pointed at a local server in tests.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub game_api_base: String,
    pub combo_hint_url: String,
    pub promo_api_base: String,
    pub concurrency: usize,
    pub combo_cost_ceiling: f64,
    pub purchase: PurchaseOptions,
    pub best_upgrades: BestUpgradeOptions,
    pub daily_reward: DailyRewardOptions,
    pub mini_game: MiniGameOptions,
    pub promo: PromoOptions,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            game_api_base: GAME_API_BASE.into(),
            combo_hint_url: COMBO_HINT_URL.into(),
            promo_api_base: PROMO_API_BASE.into(),
            concurrency: DEFAULT_CONCURRENCY,
            combo_cost_ceiling: COMBO_COST_CEILING,
            purchase: PurchaseOptions::default(),
            best_upgrades: BestUpgradeOptions::default(),
            daily_reward: DailyRewardOptions::default(),
            mini_game: MiniGameOptions::default(),
            promo: PromoOptions::default(),
        }
    }
}

pub struct Runner {
    config: RunnerConfig,
    urls: Box<dyn WebAppUrlProvider>,
    cancel: CancellationToken,
}

impl Runner {
    pub fn new(
        config: RunnerConfig,
        urls: Box<dyn WebAppUrlProvider>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            urls,
            cancel,
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Logs one account in and performs the requested action.
    pub async fn run_account(&self, account: &Account, action: BotAction) -> AppResult<()> {
        let handle = account.handle();
        let web_app_url = self.urls.web_app_url(account)?;
        let token = login(&get_client(), &self.config.game_api_base, &web_app_url).await?;
        let http = build_client(account.proxy.as_deref(), Some(&token), 30)?;
        let game = GameClient::new(http, self.config.game_api_base.clone(), handle.clone());

        match game.ip_info().await {
            Ok(ip) => info!(
                "{} - Logged in via {} ({})",
                handle,
                ip.ip.as_deref().unwrap_or("unknown ip"),
                ip.country_code.as_deref().unwrap_or("??")
            ),
            Err(error) => warn!("{} - Could not resolve egress ip: {}", handle, error),
        }

        let profile = game.sync_profile().await?;
        info!(
            "{} - Balance: {:.0} - Keys: {} - Passive: +{:.0}/h (last earn {:.0})",
            handle,
            profile.balance_coins,
            profile.total_keys,
            profile.earn_passive_per_hour,
            profile.last_passive_earn
        );

        self.dispatch(&game, &profile, account, action).await
    }

    async fn dispatch(
        &self,
        game: &GameClient,
        profile: &ProfileSnapshot,
        account: &Account,
        action: BotAction,
    ) -> AppResult<()> {
        match action {
            BotAction::DailyReward => {
                run_daily_reward(game, &self.config.daily_reward, &self.cancel).await
            }
            BotAction::DailyCipher => run_daily_cipher(game).await,
            BotAction::AutoTap => {
                run_auto_tap(game, profile.earn_per_tap, profile.available_taps).await
            }
            BotAction::DailyCombo => {
                let hints = DatavibeComboProvider::new(get_client(), &self.config.combo_hint_url);
                run_daily_combo(
                    game,
                    &hints,
                    &self.config.purchase,
                    self.config.combo_cost_ceiling,
                    &self.cancel,
                )
                .await
            }
            BotAction::MiniGame => {
                run_mini_game(
                    game,
                    &profile.id,
                    profile.total_keys,
                    &self.config.mini_game,
                    &self.cancel,
                )
                .await
            }
            BotAction::PromoCodes => {
                let exchange =
                    PromoExchange::new(&self.config.promo_api_base, account.proxy.as_deref())?;
                run_promo_codes(game, &exchange, &self.config.promo, &self.cancel).await
            }
            BotAction::BuyBestUpgrades => {
                buy_best_upgrades(game, &self.config.best_upgrades, &self.cancel).await
            }
            BotAction::AllInOne => self.run_all_in_one(game, profile).await,
        }
    }

    /// Joins the daily claim handlers concurrently against one account, the
    /// way the game's own client fires its startup requests. The open-ended
    /// flows (best-upgrade sweep, promo polling) stay out of this join; they
    /// run only when asked for by name. Individual failures are reported
    /// without sinking the rest; cancellation still wins.
    async fn run_all_in_one(&self, game: &GameClient, profile: &ProfileSnapshot) -> AppResult<()> {
        let hints = DatavibeComboProvider::new(get_client(), &self.config.combo_hint_url);

        let (reward, cipher, tap, combo, mini) = tokio::join!(
            run_daily_reward(game, &self.config.daily_reward, &self.cancel),
            run_daily_cipher(game),
            run_auto_tap(game, profile.earn_per_tap, profile.available_taps),
            run_daily_combo(
                game,
                &hints,
                &self.config.purchase,
                self.config.combo_cost_ceiling,
                &self.cancel,
            ),
            run_mini_game(
                game,
                &profile.id,
                profile.total_keys,
                &self.config.mini_game,
                &self.cancel,
            ),
        );

        let results = [
            ("daily reward", reward),
            ("daily cipher", cipher),
            ("auto tap", tap),
            ("daily combo", combo),
            ("mini game", mini),
        ];
        let mut cancelled = false;
        for (name, result) in results {
            match result {
                Ok(()) => {}
                Err(AppError::Cancelled) => cancelled = true,
                Err(error) => warn!("{} - {} failed: {}", game.handle(), name, error),
            }
        }
        if cancelled {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }

    /// Fans the action out over every account with bounded concurrency.
    /// One account failing never stops the others; the summary is logged.
    pub async fn run_accounts(&self, accounts: &[Account], action: BotAction) -> AppResult<()> {
        if accounts.is_empty() {
            warn!("No accounts in the sessions file, nothing to do");
            return Ok(());
        }

        let results: Vec<(String, AppResult<()>)> = stream::iter(accounts)
            .map(|account| async move {
                let outcome = self.run_account(account, action).await;
                (account.handle(), outcome)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut failed = 0usize;
        for (handle, outcome) in &results {
            if let Err(err) = outcome {
                failed += 1;
                error!("{} - Run failed: {}", handle, err);
            }
        }
        info!(
            "Finished: {} account(s) ok, {} failed",
            results.len() - failed,
            failed
        );
        Ok(())
    }
}
