use std::sync::Arc;

use crate::{
    config::{AdvisorMode, Config},
    quotes_file::{QuotesFileFeed, UnconfiguredFeed},
};
use marginwatch_core::{
    advisor::{AdvisorTrait, AdvisoryService, RiskDigestAdvisor},
    exchange::ExchangeService,
    goals::{GoalService, GoalServiceTrait},
    market_data::{MarketDataService, MarketDataServiceTrait, PriceFeedTrait, RateFeedTrait},
    positions::{PositionService, PositionServiceTrait},
    snapshots::{SnapshotService, SnapshotServiceTrait},
    sync::{RemoteSyncTrait, SyncService, SyncServiceTrait},
    utils::{Clock, SystemClock},
};
use marginwatch_storage_sqlite::{
    db::{self, write_actor},
    DirectoryRemote, GoalRepository, SnapshotRepository, StateRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub position_service: Arc<dyn PositionServiceTrait>,
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub market_data_service: Arc<dyn MarketDataServiceTrait>,
    /// `None` when no sync directory is configured
    pub sync_service: Option<Arc<dyn SyncServiceTrait>>,
    pub exchange_service: Arc<ExchangeService>,
    pub advisory_service: Arc<AdvisoryService>,
    pub clock: Arc<dyn Clock>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("MW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.market_tz));
    tracing::info!("Market timezone: {}", config.market_tz);

    let state_repository = Arc::new(StateRepository::new(pool.clone(), writer.clone()));
    let position_service: Arc<dyn PositionServiceTrait> =
        Arc::new(PositionService::new(state_repository));

    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));
    let snapshot_service: Arc<dyn SnapshotServiceTrait> =
        Arc::new(SnapshotService::new(snapshot_repository, clock.clone()));

    let goal_repository = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let goal_service: Arc<dyn GoalServiceTrait> = Arc::new(GoalService::new(goal_repository));

    let (price_feed, rate_feed): (Arc<dyn PriceFeedTrait>, Arc<dyn RateFeedTrait>) =
        match &config.quotes_file {
            Some(path) => {
                tracing::info!("Reading quotes from {}", path.display());
                let feed = Arc::new(QuotesFileFeed::new(path.clone()));
                (feed.clone(), feed)
            }
            None => {
                tracing::info!("No quotes file configured; price refresh is disabled");
                (Arc::new(UnconfiguredFeed), Arc::new(UnconfiguredFeed))
            }
        };
    let market_data_service: Arc<dyn MarketDataServiceTrait> = Arc::new(MarketDataService::new(
        position_service.clone(),
        price_feed,
        rate_feed,
    ));

    let sync_service: Option<Arc<dyn SyncServiceTrait>> = config.sync_dir.as_ref().map(|dir| {
        tracing::info!("Sync target: {}", dir.display());
        let remote: Arc<dyn RemoteSyncTrait> = Arc::new(DirectoryRemote::new(dir.clone()));
        Arc::new(SyncService::new(
            position_service.clone(),
            snapshot_service.clone(),
            goal_service.clone(),
            remote,
        )) as Arc<dyn SyncServiceTrait>
    });

    let exchange_service = Arc::new(ExchangeService::new(
        position_service.clone(),
        snapshot_service.clone(),
        goal_service.clone(),
    ));

    let advisor: Option<Arc<dyn AdvisorTrait>> = match config.advisor {
        AdvisorMode::Digest => Some(Arc::new(RiskDigestAdvisor)),
        AdvisorMode::Disabled => None,
    };
    let advisory_service = Arc::new(AdvisoryService::new(advisor));

    Ok(Arc::new(AppState {
        position_service,
        snapshot_service,
        goal_service,
        market_data_service,
        sync_service,
        exchange_service,
        advisory_service,
        clock,
        db_path,
    }))
}
