use adapter::memory::InMemoryStore;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use kernel::model::{
    auth::AuthContext,
    id::{ReservationId, UserId, VenueId},
    reservation::{event::TransitionReservation, Reservation, ReservationStatus},
    role::Role,
    user::User,
    venue::{Category, Staffing, Venue, VenueStatus},
};
use kernel::notifier::Notifier;
use registry::{AppRegistry, NotificationWorker};
use shared::{
    config::{NotificationConfig, VenueConfig},
    error::{AppError, AppResult},
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, ReservationId)>>,
    rejections: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_acceptance(
        &self,
        customer: &User,
        reservation: &Reservation,
        _venue: &Venue,
    ) -> AppResult<()> {
        if self.fail {
            return Err(AppError::NotificationError("mail server down".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((customer.email.clone(), reservation.reservation_id));
        Ok(())
    }

    async fn send_rejection(&self, customer: &User) -> AppResult<()> {
        if self.fail {
            return Err(AppError::NotificationError("mail server down".into()));
        }
        self.rejections.lock().unwrap().push(customer.email.clone());
        Ok(())
    }
}

struct Fixture {
    store: Arc<InMemoryStore>,
    notifier: Arc<RecordingNotifier>,
    registry: AppRegistry,
    worker: NotificationWorker,
    manager: AuthContext,
    customer_id: UserId,
    venue: Venue,
}

async fn fixture_with(
    notifier: RecordingNotifier,
    staffing: Option<Staffing>,
    is_sub_venue: bool,
) -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(notifier);

    let manager_id = UserId::new();
    let customer_id = UserId::new();
    store
        .insert_user(User {
            user_id: manager_id,
            user_name: "M1".into(),
            email: "m1@example.com".into(),
            role: Role::Manager,
            is_banned: false,
        })
        .await;
    store
        .insert_user(User {
            user_id: customer_id,
            user_name: "Guest".into(),
            email: "guest@example.com".into(),
            role: Role::User,
            is_banned: false,
        })
        .await;

    let venue = Venue {
        venue_id: VenueId::new(),
        category: Category::Restaurant,
        venue_name: "V1".into(),
        manager_id,
        staffing,
        is_sub_venue,
        status: VenueStatus::Approved,
        created_at: Utc::now(),
    };
    store.insert_venue(venue.clone()).await;

    let (registry, worker) = AppRegistry::in_memory(
        store.clone(),
        notifier.clone(),
        VenueConfig::default(),
        NotificationConfig::default(),
    );

    Fixture {
        store,
        notifier,
        registry,
        worker,
        manager: AuthContext::new(manager_id, Role::Manager),
        customer_id,
        venue,
    }
}

async fn fixture() -> Fixture {
    fixture_with(RecordingNotifier::default(), None, false).await
}

impl Fixture {
    async fn reservation(&self, status: ReservationStatus) -> ReservationId {
        let reservation_id = ReservationId::new();
        self.store
            .insert_reservation(Reservation {
                reservation_id,
                venue_id: self.venue.venue_id,
                category: self.venue.category,
                customer_id: self.customer_id,
                status,
                date: NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
                time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                party_size: 4,
                created_at: Utc::now(),
            })
            .await;
        reservation_id
    }

    fn request(&self, reservation_id: ReservationId) -> TransitionReservation {
        TransitionReservation::new(reservation_id, self.venue.venue_id, self.venue.category)
    }

    async fn status_of(&self, reservation_id: ReservationId) -> ReservationStatus {
        use kernel::repository::reservation::ReservationRepository;
        self.store
            .find_by_id(reservation_id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    // registry を破棄してチャネルを閉じ、通知が処理し終わるのを待つ
    async fn drain(self) -> Arc<RecordingNotifier> {
        let Fixture {
            registry,
            worker,
            notifier,
            ..
        } = self;
        let handle = worker.spawn();
        drop(registry);
        handle.await.unwrap();
        notifier
    }
}

#[tokio::test]
async fn accept_then_reject_is_a_conflict() {
    let fx = fixture().await;
    let r1 = fx.reservation(ReservationStatus::Pending).await;
    let lifecycle = fx.registry.reservation_lifecycle();

    let accepted = lifecycle.accept(&fx.manager, fx.request(r1)).await.unwrap();
    assert_eq!(accepted.status, ReservationStatus::Accepted);

    let err = lifecycle.reject(&fx.manager, fx.request(r1)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m.contains("accepted")));
    assert_eq!(fx.status_of(r1).await, ReservationStatus::Accepted);

    let notifier = fx.drain().await;
    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(sent, vec![("guest@example.com".to_string(), r1)]);
    assert!(notifier.rejections.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_reservation_accepts_no_transition() {
    let fx = fixture().await;
    let r = fx.reservation(ReservationStatus::Rejected).await;
    let lifecycle = fx.registry.reservation_lifecycle();

    for result in [
        lifecycle.accept(&fx.manager, fx.request(r)).await,
        lifecycle.reject(&fx.manager, fx.request(r)).await,
        lifecycle.mark_attended(&fx.manager, fx.request(r)).await,
    ] {
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
    assert_eq!(fx.status_of(r).await, ReservationStatus::Rejected);
}

#[tokio::test]
async fn second_accept_is_a_conflict() {
    let fx = fixture().await;
    let r = fx.reservation(ReservationStatus::Pending).await;
    let lifecycle = fx.registry.reservation_lifecycle();

    lifecycle.accept(&fx.manager, fx.request(r)).await.unwrap();
    let err = lifecycle.accept(&fx.manager, fx.request(r)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(fx.status_of(r).await, ReservationStatus::Accepted);
}

#[tokio::test]
async fn attended_can_skip_acceptance() {
    let fx = fixture().await;
    let pending = fx.reservation(ReservationStatus::Pending).await;
    let accepted = fx.reservation(ReservationStatus::Accepted).await;
    let lifecycle = fx.registry.reservation_lifecycle();

    let res = lifecycle
        .mark_attended(&fx.manager, fx.request(pending))
        .await
        .unwrap();
    assert_eq!(res.status, ReservationStatus::Attended);
    lifecycle
        .mark_attended(&fx.manager, fx.request(accepted))
        .await
        .unwrap();

    let err = lifecycle
        .mark_attended(&fx.manager, fx.request(pending))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // attended は通知しない
    let notifier = fx.drain().await;
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn strangers_are_forbidden_on_unstaffed_sub_venue() {
    let fx = fixture_with(RecordingNotifier::default(), None, true).await;
    let r = fx.reservation(ReservationStatus::Pending).await;
    let stranger = AuthContext::new(UserId::new(), Role::Employee);

    let err = fx
        .registry
        .reservation_lifecycle()
        .accept(&stranger, fx.request(r))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ForbiddenOperation(_)));
    assert_eq!(fx.status_of(r).await, ReservationStatus::Pending);
}

#[tokio::test]
async fn listed_employee_may_reject() {
    let employee_id = UserId::new();
    let staffing = Staffing {
        supervisors: vec![],
        employees: vec![employee_id],
    };
    let fx = fixture_with(RecordingNotifier::default(), Some(staffing), false).await;
    let r = fx.reservation(ReservationStatus::Pending).await;
    let employee = AuthContext::new(employee_id, Role::Employee);

    let res = fx
        .registry
        .reservation_lifecycle()
        .reject(&employee, fx.request(r))
        .await
        .unwrap();
    assert_eq!(res.status, ReservationStatus::Rejected);

    let notifier = fx.drain().await;
    assert_eq!(
        *notifier.rejections.lock().unwrap(),
        vec!["guest@example.com".to_string()]
    );
}

#[tokio::test]
async fn customers_cannot_transition() {
    let fx = fixture().await;
    let r = fx.reservation(ReservationStatus::Pending).await;
    let customer = AuthContext::new(fx.customer_id, Role::User);

    let err = fx
        .registry
        .reservation_lifecycle()
        .accept(&customer, fx.request(r))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ForbiddenOperation(_)));
}

#[tokio::test]
async fn unknown_venue_or_reservation_is_not_found() {
    let fx = fixture().await;
    let r = fx.reservation(ReservationStatus::Pending).await;
    let lifecycle = fx.registry.reservation_lifecycle();

    let wrong_category = TransitionReservation::new(r, fx.venue.venue_id, Category::Bar);
    assert!(matches!(
        lifecycle.accept(&fx.manager, wrong_category).await,
        Err(AppError::EntityNotFound(_))
    ));

    assert!(matches!(
        lifecycle
            .accept(&fx.manager, fx.request(ReservationId::new()))
            .await,
        Err(AppError::EntityNotFound(_))
    ));
}

#[tokio::test]
async fn reservation_of_another_venue_is_not_found() {
    let fx = fixture().await;
    let other_venue = Venue {
        venue_id: VenueId::new(),
        venue_name: "V2".into(),
        ..fx.venue.clone()
    };
    fx.store.insert_venue(other_venue.clone()).await;
    let r = fx.reservation(ReservationStatus::Pending).await;

    // 同じマネージャーでも、予約が属していない会場経由では操作できない
    let err = fx
        .registry
        .reservation_lifecycle()
        .accept(
            &fx.manager,
            TransitionReservation::new(r, other_venue.venue_id, other_venue.category),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EntityNotFound(_)));
    assert_eq!(fx.status_of(r).await, ReservationStatus::Pending);
}

#[tokio::test]
async fn failed_notification_keeps_new_status() {
    let failing = RecordingNotifier {
        fail: true,
        ..Default::default()
    };
    let fx = fixture_with(failing, None, false).await;
    let r = fx.reservation(ReservationStatus::Pending).await;

    fx.registry
        .reservation_lifecycle()
        .accept(&fx.manager, fx.request(r))
        .await
        .unwrap();

    let store = fx.store.clone();
    fx.drain().await;
    use kernel::repository::reservation::ReservationRepository;
    let status = store.find_by_id(r).await.unwrap().unwrap().status;
    assert_eq!(status, ReservationStatus::Accepted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_accepts_have_a_single_winner() {
    let fx = fixture().await;
    let r = fx.reservation(ReservationStatus::Pending).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let lifecycle = fx.registry.reservation_lifecycle().clone();
        let manager = fx.manager;
        let req = fx.request(r);
        handles.push(tokio::spawn(async move {
            lifecycle.accept(&manager, req).await
        }));
    }

    let mut succeeded = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(AppError::Conflict(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(succeeded, 1);
    assert_eq!(conflicts, 7);

    let notifier = fx.drain().await;
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn main_venue_prefers_explicit_staffing_order() {
    let fx = fixture().await;
    let employee_id = UserId::new();
    let bar = Venue {
        venue_id: VenueId::new(),
        category: Category::Bar,
        venue_name: "Corner Bar".into(),
        manager_id: UserId::new(),
        staffing: Some(Staffing {
            supervisors: vec![],
            employees: vec![employee_id],
        }),
        is_sub_venue: false,
        status: VenueStatus::Approved,
        created_at: Utc::now(),
    };
    fx.store.insert_venue(bar.clone()).await;

    let places = fx.registry.place_resolver();
    let main = places.extract_main(employee_id).await.unwrap().unwrap();
    assert_eq!(main.venue_id, bar.venue_id);

    // どこにも所属しないアカウントは旧レコード（担当者情報なし）に一致する
    let stranger_main = places.extract_main(UserId::new()).await.unwrap().unwrap();
    assert_eq!(stranger_main.venue_id, fx.venue.venue_id);
}

#[tokio::test]
async fn main_venue_without_legacy_fallback() {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_venue(Venue {
            venue_id: VenueId::new(),
            category: Category::Hotel,
            venue_name: "Old Inn".into(),
            manager_id: UserId::new(),
            staffing: None,
            is_sub_venue: false,
            status: VenueStatus::Approved,
            created_at: Utc::now(),
        })
        .await;
    let (registry, _worker) = AppRegistry::in_memory(
        store,
        Arc::new(RecordingNotifier::default()),
        VenueConfig {
            legacy_fallback: false,
        },
        NotificationConfig::default(),
    );

    let main = registry
        .place_resolver()
        .extract_main(UserId::new())
        .await
        .unwrap();
    assert!(main.is_none());
}

#[tokio::test]
async fn booking_requires_an_approved_venue() {
    use kernel::model::reservation::event::CreateReservation;
    use kernel::model::venue::event::UpdateVenueStatus;
    use kernel::repository::venue::VenueRepository;

    let fx = fixture().await;
    let customer = AuthContext::new(fx.customer_id, Role::User);
    let lifecycle = fx.registry.reservation_lifecycle();
    let booking = |party_size| {
        CreateReservation::new(
            fx.venue.venue_id,
            fx.venue.category,
            fx.customer_id,
            NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            NaiveTime::from_hms_opt(20, 30, 0).unwrap(),
            party_size,
            Utc::now(),
        )
    };

    let reservation_id = lifecycle.book(&customer, booking(2)).await.unwrap();
    assert_eq!(fx.status_of(reservation_id).await, ReservationStatus::Pending);

    assert!(matches!(
        lifecycle.book(&customer, booking(0)).await,
        Err(AppError::BadRequest(_))
    ));

    fx.registry
        .venue_repository()
        .update_status(UpdateVenueStatus {
            venue_id: fx.venue.venue_id,
            category: fx.venue.category,
            status: VenueStatus::Rejected,
        })
        .await
        .unwrap();
    assert!(matches!(
        lifecycle.book(&customer, booking(2)).await,
        Err(AppError::UnprocessableEntity(_))
    ));
}

#[tokio::test]
async fn full_notification_queue_does_not_block_transitions() {
    let fx = fixture().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let (registry, worker) = AppRegistry::in_memory(
        fx.store.clone(),
        notifier.clone(),
        VenueConfig::default(),
        NotificationConfig { queue_capacity: 1 },
    );
    let first = fx.reservation(ReservationStatus::Pending).await;
    let second = fx.reservation(ReservationStatus::Pending).await;

    // ワーカーが動いていないのでキューは一件で埋まる
    let lifecycle = registry.reservation_lifecycle();
    lifecycle.accept(&fx.manager, fx.request(first)).await.unwrap();
    lifecycle.accept(&fx.manager, fx.request(second)).await.unwrap();
    assert_eq!(fx.status_of(second).await, ReservationStatus::Accepted);

    let handle = worker.spawn();
    drop(registry);
    handle.await.unwrap();
    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(sent, vec![("guest@example.com".to_string(), first)]);
}
