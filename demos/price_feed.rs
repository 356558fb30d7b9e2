//! Price feed demo
//!
//! Run with: cargo run --example price_feed
//!
//! A hub converts raw ticks into quotes. Some ticks are quoted immediately,
//! some after a simulated lookup, and a malformed tick fails only its own
//! call. A late listener attaches after completion and gets the completion
//! replayed.

use std::time::Duration;

use futures::StreamExt;
use hubcast::{observer, Hub, HubConfig, Outcome};

#[derive(Debug, Clone)]
struct Tick {
    symbol: &'static str,
    cents: i64,
}

#[derive(Debug, Clone)]
struct Quote {
    symbol: &'static str,
    price: f64,
}

fn quote(tick: Tick) -> Result<Outcome<Quote, String>, String> {
    if tick.cents < 0 {
        return Err(format!("{}: negative price", tick.symbol));
    }

    let q = Quote {
        symbol: tick.symbol,
        price: tick.cents as f64 / 100.0,
    };

    if tick.symbol.starts_with('X') {
        // Exotic symbols need a slow lookup
        return Ok(Outcome::deferred(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(q)
        }));
    }

    Ok(Outcome::value(q))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hubcast=debug".parse()?)
                .add_directive("price_feed=info".parse()?),
        )
        .init();

    let hub = Hub::with_config(HubConfig::with_name("prices"), quote);

    let _printer = hub.subscribe(
        observer(|q: Quote| println!("[printer] {} = {:.2}", q.symbol, q.price))
            .with_error(|e: String| println!("[printer] rejected: {e}"))
            .with_complete(|| println!("[printer] feed closed")),
    );

    // Pull-style consumer on a read-only view
    let mut quotes = hub.view().into_stream();
    let collector = tokio::spawn(async move {
        let mut total = 0.0;
        while let Some(item) = quotes.next().await {
            if let Ok(q) = item {
                total += q.price;
            }
        }
        total
    });

    for (symbol, cents) in [("ACME", 1250), ("XAU", 238_900), ("ACME", -5), ("INIT", 999)] {
        hub.next(Tick { symbol, cents });
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    hub.complete();

    let total = collector.await?;
    println!("Sum of quoted prices: {:.2}", total);

    hub.subscribe(
        observer(|_: Quote| unreachable!("hub is closed"))
            .with_complete(|| println!("[late] feed already closed")),
    );

    println!("Stats: {:?}", hub.stats());

    Ok(())
}
