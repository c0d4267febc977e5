// Based on https://github.com/LukeMathWalker/tracing-actix-web/blob/main/examples/opentelemetry/src/main.rs#L15
#[cfg(feature = "server")]
fn init_telemetry(
    settings: &bookservice_library::settings::TelemetrySettings,
) -> anyhow::Result<()> {
    use anyhow::Context;
    use opentelemetry::global;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use opentelemetry_sdk::runtime::TokioCurrentThread;
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::{EnvFilter, Registry};

    let app_name = "bookservice_library";

    // Spans are exported to Jaeger in batch only when enabled
    let telemetry = if settings.jaeger_enabled {
        global::set_text_map_propagator(TraceContextPropagator::new());
        #[allow(deprecated)]
        let tracer = opentelemetry_jaeger::new_agent_pipeline()
            .with_service_name(app_name)
            .install_batch(TokioCurrentThread)
            .context("Failed to install OpenTelemetry tracer.")?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    // Create a `tracing` layer to emit spans as structured logs to stdout
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(telemetry)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber.")
}

#[cfg(feature = "server")]
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use actix_web::{App, HttpServer};
    use anyhow::Context;
    use paperclip::actix::{web, OpenApiExt};
    use tracing_actix_web::TracingLogger;

    use bookservice_library::app_config::config_app;
    use bookservice_library::books_repository::{
        BookRepository, InMemoryBookRepository, MongoBooksRepository, TimeoutBookRepository,
    };
    use bookservice_library::data_store::DataStore;
    use bookservice_library::settings::{Settings, StorageBackend};

    let settings = Settings::load()?;
    init_telemetry(&settings.telemetry)?;

    let books_repository: Arc<dyn BookRepository> = match settings.storage {
        StorageBackend::InMemory => Arc::new(InMemoryBookRepository::default()),
        StorageBackend::Mongo => {
            let store = DataStore::connected(settings.database.clone())
                .await
                .context("Database connection failed. Please confirm your MongoDB setting.")?;
            Arc::new(MongoBooksRepository::new(Arc::new(store)))
        }
    };
    let books_repository: Arc<dyn BookRepository> = Arc::new(TimeoutBookRepository::new(
        books_repository,
        settings.database.store_timeout(),
    ));

    tracing::info!(
        "starting HTTP server at http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(books_repository.clone()))
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.server.host.as_str(), settings.server.port))?
    .run()
    .await?;

    Ok(())
}
