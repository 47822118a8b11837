use clap::Parser;
use store_locator::app::{self, Outcome, Session};
use store_locator::utils::error::{ErrorSeverity, LocatorError};
use store_locator::utils::logger;
use store_locator::CliConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting store-locator");

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let mut session = match app::start(&config).await {
        Ok(session) => session,
        Err(e) => exit_with(&e),
    };

    print_lines(&session.list());

    if cli.commands.is_empty() {
        run_interactive(&mut session).await?;
    } else {
        for line in &cli.commands {
            println!("> {}", line);
            if !run_one(&mut session, line).await {
                break;
            }
        }
    }

    tracing::info!("👋 Store locator closed");
    Ok(())
}

async fn run_interactive(session: &mut Session) -> anyhow::Result<()> {
    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if !run_one(session, &line).await {
            break;
        }
    }
    Ok(())
}

/// Returns false once the session should end.
async fn run_one(session: &mut Session, line: &str) -> bool {
    match session.run_line(line).await {
        Ok(Outcome::Continue(output)) => {
            print_lines(&output);
            true
        }
        Ok(Outcome::Quit) => false,
        Err(e) => {
            tracing::debug!("Command '{}' failed: {:?}", line, e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            true
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn exit_with(e: &LocatorError) -> ! {
    tracing::error!(
        "❌ Store locator failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
