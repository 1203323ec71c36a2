use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::memory::InMemoryStore;
use adapter::redis::RedisClient;
use adapter::repository::{
    auth::AuthRepositoryImpl, health::HealthCheckRepositoryImpl,
    reservation::ReservationRepositoryImpl, user::UserRepositoryImpl, venue::VenueRepositoryImpl,
};
use kernel::notifier::{Notifier, ReservationEvent};
use kernel::repository::{
    auth::AuthRepository, health::HealthCheckRepository, reservation::ReservationRepository,
    user::UserRepository, venue::VenueRepository,
};
use kernel::service::{
    lifecycle::ReservationLifecycle, notification::NotificationDispatcher, place::PlaceResolver,
};
use shared::config::{NotificationConfig, VenueConfig};
use tokio::sync::mpsc::{self, Receiver};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    venue_repository: Arc<dyn VenueRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    place_resolver: PlaceResolver,
    reservation_lifecycle: ReservationLifecycle,
}

/// 通知イベントの受け口。サーバー起動時に `spawn` で消費を始める
pub struct NotificationWorker {
    dispatcher: NotificationDispatcher,
    events: Receiver<ReservationEvent>,
}

impl NotificationWorker {
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.dispatcher.run(self.events))
    }
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        notifier: Arc<dyn Notifier>,
        venue_config: VenueConfig,
        notification_config: NotificationConfig,
    ) -> (Self, NotificationWorker) {
        Self::build(
            Arc::new(HealthCheckRepositoryImpl::new(pool.clone())),
            Arc::new(VenueRepositoryImpl::new(pool.clone())),
            Arc::new(ReservationRepositoryImpl::new(pool.clone())),
            Arc::new(UserRepositoryImpl::new(pool)),
            Arc::new(AuthRepositoryImpl::new(redis_client)),
            notifier,
            venue_config,
            notification_config,
        )
    }

    pub fn in_memory(
        store: Arc<InMemoryStore>,
        notifier: Arc<dyn Notifier>,
        venue_config: VenueConfig,
        notification_config: NotificationConfig,
    ) -> (Self, NotificationWorker) {
        Self::build(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            notifier,
            venue_config,
            notification_config,
        )
    }

    fn build(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        venue_repository: Arc<dyn VenueRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
        user_repository: Arc<dyn UserRepository>,
        auth_repository: Arc<dyn AuthRepository>,
        notifier: Arc<dyn Notifier>,
        venue_config: VenueConfig,
        notification_config: NotificationConfig,
    ) -> (Self, NotificationWorker) {
        let (tx, rx) = mpsc::channel(notification_config.queue_capacity.max(1));
        let place_resolver =
            PlaceResolver::new(venue_repository.clone(), venue_config.legacy_fallback);
        let reservation_lifecycle =
            ReservationLifecycle::new(place_resolver.clone(), reservation_repository.clone(), tx);
        let worker = NotificationWorker {
            dispatcher: NotificationDispatcher::new(user_repository.clone(), notifier),
            events: rx,
        };
        let registry = Self {
            health_check_repository,
            venue_repository,
            reservation_repository,
            user_repository,
            auth_repository,
            place_resolver,
            reservation_lifecycle,
        };
        (registry, worker)
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn venue_repository(&self) -> Arc<dyn VenueRepository> {
        self.venue_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn place_resolver(&self) -> &PlaceResolver {
        &self.place_resolver
    }

    pub fn reservation_lifecycle(&self) -> &ReservationLifecycle {
        &self.reservation_lifecycle
    }
}
