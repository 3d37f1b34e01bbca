use std::sync::Arc;

use tracing::{debug, info};
use users_sdk::UsersApi;

use crate::api::rest::routes;
use crate::config::UsersConfig;
use crate::domain::repo::UsersRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersLocalClient;
use crate::infra::crypto::Argon2PasswordHasher;
use crate::infra::storage::{InMemoryUsersRepository, MongoStore, MongoUsersRepository};

/// The users module: domain service wired to a repository, exposed over REST
/// and as an in-process [`UsersApi`] client.
#[derive(Clone)]
pub struct UsersModule {
    service: Arc<Service>,
    config: UsersConfig,
}

impl UsersModule {
    /// Wire the service to an arbitrary repository.
    pub fn new(repo: Arc<dyn UsersRepository>, config: UsersConfig) -> Self {
        info!("Initializing users module");
        debug!(
            "Loaded users config: base_path={}, max_list_size={}",
            config.base_path, config.max_list_size
        );

        let service_config = ServiceConfig {
            max_list_size: config.max_list_size,
        };
        let service = Service::new(repo, Arc::new(Argon2PasswordHasher), service_config);

        Self {
            service: Arc::new(service),
            config,
        }
    }

    /// Backed by the shared MongoDB store handle.
    pub fn with_mongo(store: Arc<MongoStore>, config: UsersConfig) -> Self {
        Self::new(Arc::new(MongoUsersRepository::new(store)), config)
    }

    /// Backed by an empty in-process store.
    pub fn in_memory(config: UsersConfig) -> Self {
        Self::new(Arc::new(InMemoryUsersRepository::new()), config)
    }

    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    pub fn config(&self) -> &UsersConfig {
        &self.config
    }

    /// Local in-process client implementation
    pub fn client(&self) -> Arc<dyn UsersApi> {
        Arc::new(UsersLocalClient::new(self.service()))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering users REST routes under {}", self.config.base_path);
        routes::register_routes(router, self.service(), &self.config.base_path)
    }
}
