use anyhow::Result;
use shiptrack::{
    config::Config,
    http::{router, AppState},
    model::transform::shipment_from_record,
    notify::MockMailer,
    poll::Poller,
    sheets::{Dataset, SheetReader, SheetsClient},
    shipments::Tracker,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load configuration ───────────────────────────────────────
    let config = Arc::new(Config::from_env());
    if config.shipments_spreadsheet_id.is_none() {
        warn!("SHIPMENT_SPREADSHEET_ID not set; sheet reads will fail until configured");
    }

    // ─── 3) wire up the sheet-backed repository ──────────────────────
    let http = reqwest::Client::new();
    let client = SheetsClient::new(
        http.clone(),
        &config.sheets_api_base,
        config.sheets_api_key.clone(),
    )?;
    let reader = SheetReader::new(Arc::new(client), Arc::clone(&config));
    let tracker = Tracker::new(reader.clone());

    // ─── 4) start the dashboard shipments poll ───────────────────────
    let shipments_poller = if config.shipments_refresh_secs > 0 {
        let poll_reader = reader.clone();
        let poller = Poller::spawn(
            move || {
                let reader = poll_reader.clone();
                async move {
                    let records = reader.fetch_records(Dataset::Shipments).await?;
                    Ok(records.iter().map(shipment_from_record).collect())
                }
            },
            Some(Duration::from_secs(config.shipments_refresh_secs)),
        )
        .await;
        info!(
            every_secs = config.shipments_refresh_secs,
            "shipments poller running"
        );
        Some(poller)
    } else {
        info!("shipments poller disabled");
        None
    };

    // ─── 5) serve the API ────────────────────────────────────────────
    let state = Arc::new(AppState {
        reader,
        tracker,
        mailer: MockMailer,
        http,
        shipments_poller,
    });
    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
