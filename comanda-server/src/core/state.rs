use std::sync::Arc;

use crate::auth::JwtService;
use crate::auth::password::hash_password;
use crate::core::Config;
use crate::core::error::{Result, ServerError};
use crate::db::Store;
use crate::db::repository::{SettingsRepository, StaffRepository};
use crate::message::MessageBus;
use crate::orders::OrdersManager;
use crate::security_log;

/// Server state holding shared references to every service
///
/// Cloning is shallow (`Arc` everywhere), so the state travels freely
/// through axum extractors and middleware.
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable configuration |
/// | store | embedded redb database |
/// | orders | order lifecycle manager |
/// | message_bus | in-process event bus |
/// | jwt_service | token generation/validation |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: Store,
    pub orders: Arc<OrdersManager>,
    pub message_bus: Arc<MessageBus>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Manual constructor; [`ServerState::initialize`] is the usual path
    pub fn new(
        config: Config,
        store: Store,
        orders: Arc<OrdersManager>,
        message_bus: Arc<MessageBus>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            store,
            orders,
            message_bus,
            jwt_service,
        }
    }

    /// Initialize the server state
    ///
    /// 1. Working directory layout
    /// 2. Database at `work_dir/database/comanda.redb`
    /// 3. Message bus, orders manager, JWT service
    /// 4. First-boot seeding (owner account, settings document)
    pub fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("comanda.redb");
        let store = Store::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        let message_bus = Arc::new(MessageBus::new());
        let orders = Arc::new(OrdersManager::new(store.clone(), message_bus.clone()));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(
            config.clone(),
            store,
            orders,
            message_bus,
            jwt_service,
        );
        state.seed_initial_data()?;

        Ok(state)
    }

    /// Seed the owner account and the settings document on first boot
    fn seed_initial_data(&self) -> Result<()> {
        let staff = StaffRepository::new(self.store.clone());
        if staff.count()? == 0 {
            let password_hash = hash_password(&self.config.owner_password)
                .map_err(|e| ServerError::Internal(format!("Failed to hash owner password: {}", e)))?;
            let owner = staff.seed_owner(&self.config.owner_username, "Owner", password_hash)?;

            security_log!(
                "INFO",
                "owner_seeded",
                user_id = owner.id,
                username = owner.username.clone()
            );
            if self.config.owner_password == "admin" {
                tracing::warn!(
                    "Owner account '{}' seeded with the default password, change it via OWNER_PASSWORD",
                    owner.username
                );
            }
        }

        // Persists the defaults so the first close does not race the seeder
        SettingsRepository::new(self.store.clone()).get()?;

        Ok(())
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn orders_manager(&self) -> Arc<OrdersManager> {
        self.orders.clone()
    }

    pub fn message_bus(&self) -> &Arc<MessageBus> {
        &self.message_bus
    }
}
