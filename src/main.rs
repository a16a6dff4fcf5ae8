mod bands;
mod command;
mod config;
mod errors;
mod render;
mod session;
mod watchlist;

use crate::errors::{CalcError, CalcResult};
use crate::session::{Outcome, Session, SessionEvent};
use std::io::BufRead;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries only the screen
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let session = match Session::from_config(&cfg) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("session init error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        days = cfg.days.days(),
        decimals = cfg.precision.places(),
        underlyings = cfg.underlyings.len(),
        selected = session.watchlist.selected(),
        "gamma bands calculator starting"
    );

    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(64);

    // 1. stdin reader
    let stdin_tx = event_tx.clone();
    std::thread::spawn(move || run_stdin_reader(stdin_tx));

    // 2. ctrl-c watcher
    let signal_tx = event_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(SessionEvent::Shutdown).await;
        }
    });
    drop(event_tx);

    if let Err(e) = run_session(session, event_rx).await {
        tracing::error!(error = %e, "session ended with error");
        std::process::exit(1);
    }
}

/// Forwards stdin lines to the session. Sends Shutdown on EOF.
/// Runs on a detached thread; the blocking read cannot be cancelled.
fn run_stdin_reader(tx: mpsc::Sender<SessionEvent>) {
    for line in std::io::stdin().lock().lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(SessionEvent::Line(line)).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        }
    }
    let _ = tx.blocking_send(SessionEvent::Shutdown);
}

/// Session loop. Owns all state and handles one event at a time.
async fn run_session(mut session: Session, mut rx: mpsc::Receiver<SessionEvent>) -> CalcResult<()> {
    let mut stdout = tokio::io::stdout();
    write_lines(&mut stdout, &session.screen()).await?;

    while let Some(event) = rx.recv().await {
        let line = match event {
            SessionEvent::Line(line) => line,
            SessionEvent::Shutdown => {
                tracing::info!("shutdown received");
                return Ok(());
            }
        };

        match session.handle_line(&line) {
            Ok(Outcome::Print(out)) => write_lines(&mut stdout, &out).await?,
            Ok(Outcome::Quit) => {
                tracing::info!("quit requested");
                return Ok(());
            }
            // Prior results stay on screen; report and keep going
            Err(e @ (CalcError::Parse(_) | CalcError::Command(_))) => {
                tracing::warn!(error = %e, input = %line, "input rejected");
                write_lines(&mut stdout, &[format!("! {e}")]).await?;
            }
            Err(e) => return Err(e),
        }
    }

    Err(CalcError::ChannelClosed("session event channel".into()))
}

async fn write_lines(stdout: &mut tokio::io::Stdout, lines: &[String]) -> CalcResult<()> {
    let mut buf = String::new();
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }
    stdout.write_all(buf.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
