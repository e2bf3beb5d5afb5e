mod config;
mod content;
mod error;
mod hub;
mod models;
mod routes;
mod service;
mod tree;
mod watch;
mod ws;

use std::{fs, sync::Arc};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use config::AppConfig;
use hub::NotificationHub;
use routes::register;
use service::FileService;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub service: FileService,
    pub hub: Arc<NotificationHub>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load().expect("failed to load config");

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("failed to init logging filter");

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer());
    let mut _guard = None;
    match &config.log_dir {
        Some(log_dir) => {
            fs::create_dir_all(log_dir).expect("failed to create log directory");
            let file_appender = rolling::never(log_dir, "mdview.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            _guard = Some(guard);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(file_writer))
                .init();
        }
        None => registry.init(),
    }

    let service = FileService::new(&config.root_dir).expect("failed to resolve workspace root");
    let hub = Arc::new(NotificationHub::new());
    let _watcher =
        watch::spawn(service.root().to_path_buf(), hub.clone()).expect("failed to start file watcher");

    info!(
        root = %service.root().display(),
        host = %config.host,
        port = config.port,
        "starting mdview server"
    );

    let bind_addr = format!("{}:{}", config.host, config.port);
    let client_dist = config
        .client_dist
        .join("index.html")
        .is_file()
        .then(|| config.client_dist.clone());
    if client_dist.is_none() {
        info!("no client bundle found, serving API only");
    }

    let shared_state = web::Data::new(AppState {
        service,
        hub,
    });

    HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(shared_state.clone())
            .configure(register);
        match &client_dist {
            Some(dist) => app.service(Files::new("/", dist).index_file("index.html")),
            None => app,
        }
    })
    .bind(bind_addr)?
    .run()
    .await
}
