pub mod serve;

// re-export
pub use serve::{router, serve};

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, Environment},
    database::DbManager,
    model::{PgWaitlistStore, WaitlistStore},
    notifier::{ConfirmationNotifier, Notifier},
    templ_manager::TemplateManager,
    EmailClient, Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Builds every dependency of the app up front, so a bad configuration fails at startup.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let email_addr = config.email_config.valid_sender()?;

        let dm = DbManager::init(&config.db_config).await?;
        let tm = TemplateManager::init()?;
        let email_timeout = config.email_config.timeout();
        let email_client = EmailClient::new(
            &config.email_config.url,
            email_addr,
            config.email_config.auth_token,
            email_timeout,
        )?;
        let notifier = ConfirmationNotifier::new(email_client, tm, config.email_config.subject);

        let app_state = AppState::new(
            Arc::new(PgWaitlistStore::new(dm)),
            Arc::new(notifier),
            config.environment,
        );

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

pub struct InternalState {
    pub store: Arc<dyn WaitlistStore>,
    pub notifier: Arc<dyn Notifier>,
    pub environment: Environment,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        store: Arc<dyn WaitlistStore>,
        notifier: Arc<dyn Notifier>,
        environment: Environment,
    ) -> Self {
        AppState(Arc::new(InternalState {
            store,
            notifier,
            environment,
        }))
    }
}
