//! Print a frequency and latest-draw summary for one game.
//!
//! ```text
//! LOTTO_STATS_BASE_URL=http://localhost:8000 cargo run --example summary -- powerball
//! ```

use anyhow::{Context, bail};
use chrono::Local;
use lotto_stats::{ClientConfig, Game, LottoStats};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lotto_stats=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let game = match std::env::args().nth(1).as_deref() {
        None | Some("mega-millions") => Game::MegaMillions,
        Some("powerball") => Game::Powerball,
        Some(other) => bail!("unknown game {other:?} (expected mega-millions or powerball)"),
    };

    let config = ClientConfig::default().with_env_overrides().context("reading configuration")?;
    let session = LottoStats::open(game, config).context("creating session")?;

    session.load_all().await;
    let state = session.snapshot();
    if let Some(message) = state.error() {
        bail!("loading {game} statistics failed: {message}");
    }

    let mut hottest = state.frequency_data.overall.clone();
    hottest.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count).then(a.number.cmp(&b.number)));
    println!("{} most drawn numbers:", game.display_name());
    for entry in hottest.iter().take(5) {
        println!("  {:>2}  {:>4} draws  {:>5.2}%", entry.number, entry.occurrence_count, entry.percentage);
    }

    if let Some(top) = state.frequency_data.special_ball.iter().max_by_key(|entry| entry.occurrence_count) {
        println!("Most drawn {}: {} ({} draws)", game.special_ball_name(), top.number, top.occurrence_count);
    }

    println!("Latest draws:");
    for draw in session.filtered_results(Local::now().date_naive()) {
        let numbers: Vec<String> = draw.main_numbers.iter().map(u8::to_string).collect();
        let multiplier = draw.multiplier.map(|m| format!("  x{m}")).unwrap_or_default();
        println!("  {}  {}  + {}{}", draw.draw_date, numbers.join(" "), draw.special_ball, multiplier);
    }

    Ok(())
}
