//! ODH Tile Proxy - vector tiles straight from PostGIS.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use odh_tile_proxy::{
    build_tile_query,
    config::{CheckConfig, Cli, Command, ServeConfig, SqlConfig},
    query::QueryValue,
    server::{create_router, RouterConfig},
    store::{PgTileStore, TileStore},
    tile::TileService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
        Command::Sql(config) => run_sql(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("odh-tile-proxy v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Database: {}", config.database.redacted_url());
    info!(
        "  Pool: {} connections, {}s acquire timeout, {}ms statement timeout",
        config.database.db_max_connections,
        config.database.db_acquire_timeout,
        config.database.db_statement_timeout
    );
    info!("  Cache max-age: {}s", config.cache_max_age);

    info!("");
    info!("Connecting to database...");
    let store = match PgTileStore::connect(&config.database.store_options()).await {
        Ok(store) => store,
        Err(e) => {
            error!("  Failed to connect: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match store.ping().await {
        Ok(version) => info!("  Connected: {}", version),
        Err(e) => {
            error!("  PostGIS is not available: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing);
    let router = create_router(TileService::new(store), router_config);

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/catalog", addr);
    info!("    curl -o tile.pbf http://{}/tiles/odhactivitypoi/14/8723/5807.pbf", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "odh_tile_proxy=debug,tower_http=debug,sqlx=info"
    } else {
        "odh_tile_proxy=info,tower_http=info,sqlx=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("ODH Tile Proxy Configuration Check");
    println!("══════════════════════════════════");
    println!();

    if let Err(e) = config.database.validate() {
        println!("✗ Database: {}", e);
        return ExitCode::FAILURE;
    }
    println!("✓ Database: {}", config.database.redacted_url());

    let test_request = match config.test_request() {
        Ok(request) => request,
        Err(e) => {
            println!("✗ Test tile: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!();

    print!("Connecting... ");
    let store = match PgTileStore::connect(&config.database.store_options()).await {
        Ok(store) => {
            println!("✓ success");
            store
        }
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            println!();
            println!("Please check:");
            println!("  - The database is running and reachable");
            println!("  - The credentials in the connection string are correct");
            return ExitCode::FAILURE;
        }
    };

    print!("Checking PostGIS... ");
    match store.ping().await {
        Ok(version) => {
            println!("✓ available");
            println!("  {}", version);
        }
        Err(e) => {
            println!("✗ unavailable");
            println!();
            println!("Error: {}", e);
            println!("  The postgis extension must be installed in this database.");
            return ExitCode::FAILURE;
        }
    }

    if let Some(request) = test_request {
        println!();
        print!(
            "Rendering tile {}/{}/{}/{}... ",
            request.entity_type, request.zoom, request.x, request.y
        );

        let service = TileService::new(store);
        match service.get_tile(&request).await {
            Ok(response) => match response.data {
                Some(tile) => println!("✓ {} bytes", tile.len()),
                None => println!("✓ empty"),
            },
            Err(e) => {
                println!("✗ failed");
                println!();
                println!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    println!();
    println!("══════════════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}

// =============================================================================
// Sql Command
// =============================================================================

fn run_sql(config: SqlConfig) -> ExitCode {
    let validated = match config.to_request().validate() {
        Ok(validated) => validated,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let query = build_tile_query(&validated);

    println!("{};", query.sql());
    println!();
    for (i, param) in query.params().iter().enumerate() {
        let value = match &param.value {
            QueryValue::Float(v) => v.to_string(),
            QueryValue::Text(v) => format!("{:?}", v),
            QueryValue::TextArray(v) => format!("{:?}", v),
        };
        println!("-- ${} {} = {}", i + 1, param.name, value);
    }

    ExitCode::SUCCESS
}
