//! Command-line ticket purchase.
//!
//! ```text
//! cinema-tickets <ACCOUNT_ID> [CATEGORY:COUNT]...
//! cinema-tickets 42 adult:2 child:1 infant:1
//! ```
//!
//! Exit status: 0 when the purchase completes, 1 when it is rejected (or the
//! environment is misconfigured), 2 on a usage error.

use cinema_tickets::{
    AccountId, Config, LoggingPaymentGateway, LoggingSeatReservationGateway, TicketRequestLine,
    TicketService,
};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: cinema-tickets <ACCOUNT_ID> [CATEGORY:COUNT]...

  ACCOUNT_ID       positive account number
  CATEGORY:COUNT   ADULT, CHILD or INFANT and a ticket count, e.g. adult:2";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Purchase {
        account_id: AccountId,
        lines: Vec<TicketRequestLine>,
    },
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        return Ok(Command::Help);
    }

    let (account, lines) = args
        .split_first()
        .ok_or_else(|| "missing ACCOUNT_ID".to_string())?;

    let account_id = account.parse::<AccountId>().map_err(|e| e.to_string())?;
    let lines = lines
        .iter()
        .map(|line| line.parse::<TicketRequestLine>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<TicketRequestLine>, String>>()?;

    Ok(Command::Purchase { account_id, lines })
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log.level)
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(config.log.ansi)
                .with_target(config.log.with_target),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (account_id, lines) = match parse_args(&args) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        },
        Ok(Command::Purchase { account_id, lines }) => (account_id, lines),
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            return Ok(ExitCode::from(2));
        },
    };

    info!(
        %account_id,
        lines = lines.len(),
        declined_accounts = config.gateway.declined_accounts.len(),
        "Submitting purchase"
    );

    let service = TicketService::new(
        LoggingPaymentGateway::declining(config.gateway.declined_accounts.iter().copied()).shared(),
        LoggingSeatReservationGateway::shared(),
    );

    match service.purchase_tickets(account_id, &lines) {
        Ok(()) => {
            println!("Purchase complete for account {account_id}");
            Ok(ExitCode::SUCCESS)
        },
        Err(error) => {
            eprintln!("Purchase rejected ({}): {error}", error.kind().as_str());
            Ok(ExitCode::FAILURE)
        },
    }
}
