use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::{AccountStore, Argon2PasswordEncoder, PasswordEncoder};
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, DefaultAuthService, SeaOrmUserService, UserService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let encoder: Arc<dyn PasswordEncoder> =
            Arc::new(Argon2PasswordEncoder::new(&config.security)?);

        let accounts: Arc<dyn AccountStore> = Arc::new(store.clone());

        let auth_service: Arc<dyn AuthService> = Arc::new(DefaultAuthService::new(
            accounts,
            encoder.clone(),
            &config.security,
        ));

        let user_service: Arc<dyn UserService> =
            Arc::new(SeaOrmUserService::new(store.clone()));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            user_service,
        })
    }
}
