use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::auth::SharedSecretAdminAuthorizer;
use adapter::repository::court::CourtRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::queue::QueueRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::repository::auth::AdminAuthorizer;
use kernel::repository::court::CourtRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::queue::QueueRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

/// The application's dependency container. Every repository is constructed
/// exactly once here, from the injected pool and config; handlers reach
/// them through `Arc<dyn Trait>` accessors.
#[derive(Clone)]
pub struct AppRegistry {
    config: Arc<AppConfig>,
    health_check_repository: Arc<dyn HealthCheckRepository>,
    court_repository: Arc<dyn CourtRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    user_repository: Arc<dyn UserRepository>,
    queue_repository: Arc<dyn QueueRepository>,
    admin_authorizer: Arc<dyn AdminAuthorizer>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let court_repository = Arc::new(CourtRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(
            pool.clone(),
            app_config.reservation.duration_minutes,
        ));
        let user_repository = Arc::new(UserRepositoryImpl::new(
            pool.clone(),
            app_config.registration.timezone,
        ));
        let queue_repository = Arc::new(QueueRepositoryImpl::new(pool.clone()));
        let admin_authorizer = Arc::new(SharedSecretAdminAuthorizer::new(
            app_config.admin.password.clone(),
        ));
        Self {
            config: Arc::new(app_config),
            health_check_repository,
            court_repository,
            reservation_repository,
            user_repository,
            queue_repository,
            admin_authorizer,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn court_repository(&self) -> Arc<dyn CourtRepository> {
        self.court_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn queue_repository(&self) -> Arc<dyn QueueRepository> {
        self.queue_repository.clone()
    }

    pub fn admin_authorizer(&self) -> Arc<dyn AdminAuthorizer> {
        self.admin_authorizer.clone()
    }
}
