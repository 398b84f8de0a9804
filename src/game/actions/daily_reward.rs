use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppResult;
use crate::game::actions::wait_or_cancel;
use crate::game::client::GameClient;

const CLAIMABLE_TASK_PREFIXES: &[&str] = &["streak_days", "hamster_youtube"];

#[derive(Debug, Clone)]
pub struct DailyRewardOptions {
    /// Pause before each check-task submission.
    pub pre_check_wait_secs: u64,
}

impl Default for DailyRewardOptions {
    fn default() -> Self {
        Self {
            pre_check_wait_secs: 5,
        }
    }
}

fn is_claimable(task_id: &str) -> bool {
    CLAIMABLE_TASK_PREFIXES
        .iter()
        .any(|prefix| task_id.starts_with(prefix))
}

/// Claims the daily streak reward and any unfinished video tasks.
pub async fn run_daily_reward(
    game: &GameClient,
    options: &DailyRewardOptions,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let tasks = game.list_tasks().await?;
    let pending: Vec<_> = tasks
        .tasks
        .into_iter()
        .filter(|task| is_claimable(&task.id) && !task.is_completed && task.reward_coins > 0.0)
        .collect();
    if pending.is_empty() {
        info!("{} - No daily rewards left to claim", game.handle());
        return Ok(());
    }

    for task in pending {
        wait_or_cancel(Duration::from_secs(options.pre_check_wait_secs), cancel).await?;
        let checked = game.check_task(&task.id).await?;
        match checked.task.days {
            Some(days) => info!(
                "{} - Claimed {}: day {} (+{} coins) - Balance: {}",
                game.handle(),
                task.id,
                days,
                checked.task.reward_coins,
                checked.clicker_user.balance_coins
            ),
            None => info!(
                "{} - Claimed {} (+{} coins) - Balance: {}",
                game.handle(),
                task.id,
                checked.task.reward_coins,
                checked.clicker_user.balance_coins
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{spawn_mock_game, MockBackend};
    use reqwest::Client;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn instant_options() -> DailyRewardOptions {
        DailyRewardOptions {
            pre_check_wait_secs: 0,
        }
    }

    #[tokio::test]
    async fn only_incomplete_reward_tasks_are_checked() {
        let mut backend = MockBackend::with_cards(0.0, vec![]);
        backend.tasks = vec![
            json!({ "id": "streak_days", "rewardCoins": 500.0, "isCompleted": false, "days": 3 }),
            json!({ "id": "hamster_youtube_roadmap", "rewardCoins": 100_000.0, "isCompleted": false }),
            json!({ "id": "hamster_youtube_old", "rewardCoins": 100_000.0, "isCompleted": true }),
            json!({ "id": "invite_friends", "rewardCoins": 25_000.0, "isCompleted": false }),
            json!({ "id": "streak_days_special", "rewardCoins": 0.0, "isCompleted": false }),
        ];
        let state = Arc::new(Mutex::new(backend));
        let (base, server) = spawn_mock_game(state.clone()).await;
        let game = GameClient::new(Client::new(), base, "@test");

        run_daily_reward(&game, &instant_options(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            state.lock().unwrap().checked_tasks,
            vec!["streak_days", "hamster_youtube_roadmap"]
        );
        server.abort();
    }

    #[tokio::test]
    async fn empty_task_list_is_a_no_op() {
        let state = Arc::new(Mutex::new(MockBackend::with_cards(0.0, vec![])));
        let (base, server) = spawn_mock_game(state.clone()).await;
        let game = GameClient::new(Client::new(), base, "@test");

        run_daily_reward(&game, &instant_options(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(state.lock().unwrap().checked_tasks.is_empty());
        server.abort();
    }
}
