use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::constants::DEFAULT_CONCURRENCY;
use crate::error::{AppError, AppResult};
use crate::game::auth::StaticUrlProvider;
use crate::game::runner::{BotAction, Runner, RunnerConfig};
use crate::models::Account;
use crate::modules::logger;
use crate::modules::session_store::SessionStore;

#[derive(Debug, Parser)]
#[command(name = "tgtapper", version, about = "Automation for a Telegram-launched clicker game")]
pub struct Cli {
    /// Action to perform; prompts with a menu when omitted.
    #[arg(long, value_enum)]
    pub action: Option<BotAction>,

    /// Run only the stored account with this username.
    #[arg(long)]
    pub account: Option<String>,

    /// Run every stored account.
    #[arg(long)]
    pub all: bool,

    /// How many accounts to work in parallel.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Minimum profit-per-hour percent a card must earn back to be bought.
    #[arg(long)]
    pub profit_percent: Option<f64>,

    /// Path to the sessions file (default: sessions/session.json).
    #[arg(long)]
    pub sessions_file: Option<PathBuf>,

    /// Register a new account interactively, then exit.
    #[arg(long)]
    pub add_account: bool,
}

fn prompt(label: &str) -> AppResult<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Parses a 1-based menu choice; `0` is reserved for "all".
fn parse_choice(input: &str, max: usize) -> Option<usize> {
    let picked = input.trim().parse::<usize>().ok()?;
    (picked <= max).then_some(picked)
}

fn choose_action() -> AppResult<BotAction> {
    println!("Pick an action:");
    for (index, action) in BotAction::ALL.iter().enumerate() {
        println!("  {}) {}", index + 1, action.label());
    }
    loop {
        let input = prompt("Action")?;
        match parse_choice(&input, BotAction::ALL.len()) {
            Some(picked) if picked >= 1 => return Ok(BotAction::ALL[picked - 1]),
            _ => println!("Enter a number between 1 and {}", BotAction::ALL.len()),
        }
    }
}

fn choose_accounts(accounts: &[Account]) -> AppResult<Vec<Account>> {
    if accounts.len() == 1 {
        return Ok(accounts.to_vec());
    }
    println!("Pick an account:");
    println!("  0) all accounts");
    for (index, account) in accounts.iter().enumerate() {
        println!("  {}) {} ({})", index + 1, account.handle(), account.name);
    }
    loop {
        let input = prompt("Account")?;
        match parse_choice(&input, accounts.len()) {
            Some(0) => return Ok(accounts.to_vec()),
            Some(picked) => return Ok(vec![accounts[picked - 1].clone()]),
            None => println!("Enter a number between 0 and {}", accounts.len()),
        }
    }
}

fn add_account_flow(store: &SessionStore) -> AppResult<()> {
    println!("Registering a new account in {}", store.path().display());
    let name = prompt("Display name")?;
    let username = prompt("Username (without @)")?;
    let session = prompt("Session string")?;
    let proxy = prompt("Proxy url (empty for none)")?;
    let web_app_url = prompt("Web-app launch url (empty to use env)")?;

    let mut account = Account::new(name, session, username);
    account.proxy = (!proxy.is_empty()).then_some(proxy);
    account.web_app_url = (!web_app_url.is_empty()).then_some(web_app_url);

    let handle = account.handle();
    store.add(account)?;
    info!("Stored account {}", handle);
    Ok(())
}

fn select_accounts(cli: &Cli, accounts: Vec<Account>) -> AppResult<Vec<Account>> {
    if let Some(username) = &cli.account {
        let wanted = username.trim_start_matches('@');
        let found = accounts.into_iter().find(|a| a.username == wanted);
        return match found {
            Some(account) => Ok(vec![account]),
            None => Err(AppError::Session(format!(
                "no stored account with username @{}",
                wanted
            ))),
        };
    }
    if cli.all {
        return Ok(accounts);
    }
    choose_accounts(&accounts)
}

/// CLI entry point: parse flags, set up logging and the interrupt handler,
/// then hand the selected accounts to the runner.
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    logger::init_logger(&logger::default_log_dir());

    let store = SessionStore::new(
        cli.sessions_file
            .clone()
            .unwrap_or_else(SessionStore::default_path),
    );
    if cli.add_account {
        return add_account_flow(&store);
    }

    let accounts = store.load()?;
    if accounts.is_empty() {
        warn!(
            "No accounts in {}; run with --add-account first",
            store.path().display()
        );
        return Ok(());
    }

    let selected = select_accounts(&cli, accounts)?;
    let action = match cli.action {
        Some(action) => action,
        None => choose_action()?,
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, aborting pending waits");
            interrupt.cancel();
        }
    });

    let mut config = RunnerConfig {
        concurrency: cli.concurrency,
        ..RunnerConfig::default()
    };
    if let Some(percent) = cli.profit_percent {
        config.best_upgrades.profit_threshold = percent;
    }

    let runner = Runner::new(config, Box::new(StaticUrlProvider), cancel);
    runner.run_accounts(&selected, action).await
}
