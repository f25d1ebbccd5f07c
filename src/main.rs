use clap::Parser;
use flashdeck::cli::{Args, build_config, init_logging, load_secret, open_database};
use flashdeck::create_app;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(access_secret) =
        load_secret("ACCESS_TOKEN_SECRET", args.access_secret_file.as_deref())
    else {
        std::process::exit(1);
    };

    let Some(refresh_secret) =
        load_secret("REFRESH_TOKEN_SECRET", args.refresh_secret_file.as_deref())
    else {
        std::process::exit(1);
    };

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, "Failed to get local address");
            std::process::exit(1);
        }
    };

    let config = build_config(db, access_secret, refresh_secret);
    let app = create_app(&config);

    info!(address = %local_addr, "Listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
