use crate::cli::ServeArgs;
use crate::demo::{current_period, demo_store};
use crate::infra::AppState;
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use supplier_eval::config::AppConfig;
use supplier_eval::error::AppError;
use supplier_eval::evaluation::{InMemorySupplierStore, SupplierEvaluationService};
use supplier_eval::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = if args.demo {
        let period = current_period();
        info!(%period, "seeding demo suppliers");
        demo_store(period)
    } else {
        InMemorySupplierStore::default()
    };
    let evaluation_service = Arc::new(
        SupplierEvaluationService::new(Arc::new(store.clone()), Arc::new(store))
            .with_default_weights(config.evaluation.default_weights)
            .with_ranking_limit(config.evaluation.ranking_limit),
    );

    let app = with_evaluation_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "supplier evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
