//! fitform-api - child-garment measurement service
//!
//! Predicts a child's garment measurements from age, gender, height and
//! weight (optionally seeded from a brand size chart) and persists them
//! per parent/child pair with an update/merge lifecycle.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use fitform_api::engine::{BrandResolver, MeasurementEngine};
use fitform_api::model::{BodyModel, LinearModel};
use fitform_api::store::MeasurementStore;
use fitform_api::{build_router, AppState};
use fitform_common::config::{resolve_data_folder, DataPaths};

#[derive(Parser, Debug)]
#[command(name = "fitform-api", about = "FitForm measurement service")]
struct Args {
    /// Data folder holding measurements.json, brandsize.csv and model.json
    #[arg(long)]
    data_dir: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5830)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting FitForm measurement service (fitform-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let data_folder = resolve_data_folder(args.data_dir.as_deref(), "FITFORM_DATA_DIR");
    std::fs::create_dir_all(&data_folder)?;
    let paths = DataPaths::new(data_folder);
    info!("Data folder: {}", paths.root().display());

    // A missing or broken model file is not fatal to startup: the service
    // comes up and prediction requests fail fast until the file is fixed.
    let model_file = paths.model_file();
    let model: Option<Arc<dyn BodyModel>> = match LinearModel::from_file(&model_file) {
        Ok(model) => {
            info!(
                "✓ Loaded predictor model from {} ({} outputs)",
                model_file.display(),
                model.output_names().len()
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            error!("Failed to load model from {}: {e}", model_file.display());
            None
        }
    };

    let engine = MeasurementEngine::new(
        model,
        BrandResolver::new(paths.dataset_file()),
        MeasurementStore::new(paths.measurements_file()),
    );
    let state = AppState::new(engine);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("fitform-api listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
