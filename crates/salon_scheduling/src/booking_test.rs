#[cfg(test)]
mod tests {
    use crate::booking::{normalize_phone, BlockTimeRequest, BookingRequest, BookingStage, SchedulingService};
    use crate::error::SchedulingError;
    use crate::salon::Salon;
    use chrono::{NaiveDate, Utc};
    use salon_common::models::{Appointment, AppointmentStatus, BlockedTime, BusyInterval};
    use salon_common::{BookingStore, BoxFuture, StoreError};
    use salon_config::SalonConfig;
    use salon_db::InMemoryBookingStore;
    use std::sync::Arc;
    use std::time::Duration;

    /// Delays every busy-interval read so concurrent bookings interleave.
    struct SlowReads {
        inner: InMemoryBookingStore,
        delay: Duration,
    }

    impl BookingStore for SlowReads {
        fn list_busy_intervals(
            &self,
            date: NaiveDate,
            stylist_id: Option<&str>,
        ) -> BoxFuture<'_, Vec<BusyInterval>, StoreError> {
            let stylist_id = stylist_id.map(str::to_string);
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                self.inner
                    .list_busy_intervals(date, stylist_id.as_deref())
                    .await
            })
        }

        fn create_appointment(&self, appointment: Appointment) -> BoxFuture<'_, String, StoreError> {
            self.inner.create_appointment(appointment)
        }

        fn list_appointments(
            &self,
            date: NaiveDate,
            stylist_id: Option<&str>,
        ) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
            self.inner.list_appointments(date, stylist_id)
        }

        fn create_blocked_time(&self, block: BlockedTime) -> BoxFuture<'_, String, StoreError> {
            self.inner.create_blocked_time(block)
        }

        fn list_blocked_times(&self, stylist_id: &str) -> BoxFuture<'_, Vec<BlockedTime>, StoreError> {
            self.inner.list_blocked_times(stylist_id)
        }
    }

    /// Reads succeed, writes fail.
    struct BrokenWrites;

    impl BookingStore for BrokenWrites {
        fn list_busy_intervals(
            &self,
            _date: NaiveDate,
            _stylist_id: Option<&str>,
        ) -> BoxFuture<'_, Vec<BusyInterval>, StoreError> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn create_appointment(&self, _appointment: Appointment) -> BoxFuture<'_, String, StoreError> {
            Box::pin(async { Err(StoreError::Backend("disk full".to_string())) })
        }

        fn list_appointments(
            &self,
            _date: NaiveDate,
            _stylist_id: Option<&str>,
        ) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn create_blocked_time(&self, _block: BlockedTime) -> BoxFuture<'_, String, StoreError> {
            Box::pin(async { Err(StoreError::Backend("disk full".to_string())) })
        }

        fn list_blocked_times(&self, _stylist_id: &str) -> BoxFuture<'_, Vec<BlockedTime>, StoreError> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    fn salon() -> Arc<Salon> {
        Arc::new(Salon::from_config(&SalonConfig::default()).unwrap())
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 8).unwrap()
    }

    fn request(service: &str, time: &str, stylist: Option<&str>) -> BookingRequest {
        BookingRequest {
            service_id: service.to_string(),
            date: tuesday(),
            time: time.to_string(),
            stylist_id: stylist.map(str::to_string),
            customer_name: "Ann Example".to_string(),
            customer_phone: "(256) 555-0100".to_string(),
        }
    }

    async fn seed(store: &InMemoryBookingStore, stylist: &str, time: &str, duration: u32) {
        store
            .create_appointment(Appointment {
                id: None,
                stylist_id: stylist.to_string(),
                service_id: "updo".to_string(),
                service_name: "Special Occasion Updo".to_string(),
                date: tuesday(),
                time: time.to_string(),
                duration_minutes: duration,
                customer_name: "Existing".to_string(),
                customer_phone: "2565550199".to_string(),
                status: AppointmentStatus::Scheduled,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    fn service_with(store: InMemoryBookingStore) -> SchedulingService {
        SchedulingService::new(salon(), Arc::new(store))
    }

    #[tokio::test]
    async fn test_booking_is_confirmed_and_persisted() {
        let store = InMemoryBookingStore::new();
        let service = service_with(store.clone());

        let appointment = service
            .book(request("mens-cut", "09:00 AM", Some("heather")))
            .await
            .unwrap();
        assert!(appointment.id.is_some());
        assert_eq!(appointment.stylist_id, "heather");
        assert_eq!(appointment.time, "9:00 AM");
        assert_eq!(appointment.duration_minutes, 30);
        assert_eq!(appointment.service_name, "Men's Haircut");
        assert_eq!(appointment.customer_phone, "2565550100");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);

        let stored = store.list_appointments(tuesday(), None).await.unwrap();
        assert_eq!(stored, vec![appointment]);
    }

    #[tokio::test]
    async fn test_overlapping_explicit_request_is_rejected() {
        let store = InMemoryBookingStore::new();
        seed(&store, "jennifer", "10:00 AM", 60).await;
        let service = service_with(store.clone());

        let err = service
            .book(request("mens-cut", "10:30 AM", Some("jennifer")))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::SlotNoLongerAvailable { .. }));
        assert_eq!(store.list_appointments(tuesday(), None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_touching_explicit_request_is_accepted() {
        let store = InMemoryBookingStore::new();
        seed(&store, "jennifer", "10:00 AM", 60).await;
        let service = service_with(store);

        let appointment = service
            .book(request("mens-cut", "11:00 AM", Some("jennifer")))
            .await
            .unwrap();
        assert_eq!(appointment.stylist_id, "jennifer");
    }

    #[tokio::test]
    async fn test_auto_assign_falls_through_to_the_free_stylist() {
        let store = InMemoryBookingStore::new();
        seed(&store, "jennifer", "10:00 AM", 60).await;
        let service = service_with(store);

        let appointment = service
            .book(request("mens-cut", "10:00 AM", None))
            .await
            .unwrap();
        assert_eq!(appointment.stylist_id, "heather");

        let stylist = service
            .assign_stylist(tuesday(), "2:00 PM", 30)
            .await
            .unwrap();
        assert_eq!(stylist.id, "jennifer");
    }

    #[tokio::test]
    async fn test_assign_stylist_rejects_impossible_durations() {
        let service = service_with(InMemoryBookingStore::new());

        for duration in [0, 24 * 60 + 1, u32::MAX] {
            let err = service
                .assign_stylist(tuesday(), "11:45 PM", duration)
                .await
                .unwrap_err();
            assert!(matches!(err, SchedulingError::InvalidRequest(_)), "{duration}: {err:?}");
        }

        let stylist = service
            .assign_stylist(tuesday(), "11:45 PM", 24 * 60)
            .await
            .unwrap();
        assert_eq!(stylist.id, "jennifer");
    }

    #[tokio::test]
    async fn test_no_stylist_available_when_everyone_is_booked() {
        let store = InMemoryBookingStore::new();
        seed(&store, "jennifer", "10:00 AM", 60).await;
        seed(&store, "heather", "10:00 AM", 60).await;
        let service = service_with(store);

        let err = service
            .book(request("mens-cut", "10:00 AM", None))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::NoStylistAvailable { .. }));

        let available = service
            .available_times(tuesday(), "mens-cut", None)
            .await
            .unwrap();
        assert!(!available.times.iter().any(|t| t == "10:00 AM"));
        assert!(available.times.iter().any(|t| t == "11:00 AM"));
        assert_eq!(available.status.total_slots, Some(31));
        assert_eq!(available.status.available_slots, Some(available.times.len()));
    }

    #[tokio::test]
    async fn test_available_times_on_a_closed_day() {
        let service = service_with(InMemoryBookingStore::new());
        let monday = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap();
        let available = service
            .available_times(monday, "mens-cut", Some("jennifer"))
            .await
            .unwrap();
        assert!(available.times.is_empty());
        assert!(!available.status.is_open);
        assert_eq!(available.status.message, "Salon is closed on this day.");
    }

    #[tokio::test]
    async fn test_available_times_for_one_stylist() {
        let store = InMemoryBookingStore::new();
        seed(&store, "jennifer", "10:00 AM", 60).await;
        let service = service_with(store);

        let jennifer = service
            .available_times(tuesday(), "mens-cut", Some("jennifer"))
            .await
            .unwrap();
        assert_eq!(jennifer.times.first().map(String::as_str), Some("9:00 AM"));
        assert_eq!(jennifer.times.last().map(String::as_str), Some("4:30 PM"));
        assert!(!jennifer.times.iter().any(|t| t == "10:30 AM"));
        assert_eq!(jennifer.status.message, "Open from 9:00 AM to 5:00 PM");

        let heather = service
            .available_times(tuesday(), "mens-cut", Some("heather"))
            .await
            .unwrap();
        assert_eq!(heather.times.len(), 31);
    }

    #[tokio::test]
    async fn test_invalid_requests_are_rejected_before_any_write() {
        let store = InMemoryBookingStore::new();
        let service = service_with(store.clone());

        let mut blank_name = request("mens-cut", "9:00 AM", None);
        blank_name.customer_name = "   ".to_string();
        let mut bad_phone = request("mens-cut", "9:00 AM", None);
        bad_phone.customer_phone = "555-0100".to_string();
        let mut past = request("mens-cut", "9:00 AM", None);
        past.date = NaiveDate::from_ymd_opt(2020, 1, 7).unwrap();
        let mut closed = request("mens-cut", "9:00 AM", None);
        closed.date = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap();

        let cases = [
            (request("perm", "9:00 AM", None), "unknown_service"),
            (request("mens-cut", "9:00 AM", Some("maria")), "unknown_stylist"),
            (blank_name, "invalid_request"),
            (bad_phone, "invalid_request"),
            (past, "invalid_request"),
            (request("mens-cut", "9:00am", None), "invalid_request"),
            (request("mens-cut", "4:45 PM", None), "outside_business_hours"),
            (request("mens-cut", "9:10 AM", None), "outside_business_hours"),
            (closed, "outside_business_hours"),
        ];
        for (req, reason) in cases {
            let err = service.book(req.clone()).await.unwrap_err();
            assert_eq!(err.reason(), reason, "{req:?}");
        }
        assert!(store.list_appointments(tuesday(), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_propagated() {
        let service = SchedulingService::new(salon(), Arc::new(BrokenWrites));
        let err = service
            .book(request("mens-cut", "9:00 AM", None))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Storage(StoreError::Backend(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bookings_for_the_same_slot_confirm_once() {
        let store = SlowReads {
            inner: InMemoryBookingStore::new(),
            delay: Duration::from_millis(50),
        };
        let service = SchedulingService::new(salon(), Arc::new(store));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .book(request("womens-cut", "10:00 AM", Some("jennifer")))
                        .await
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(SchedulingError::SlotNoLongerAvailable { .. })))
                .count(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_store_rejects_race_between_separate_services() {
        // Two services do not share locks, so only the conditional write can catch the race
        let store: Arc<dyn BookingStore> = Arc::new(SlowReads {
            inner: InMemoryBookingStore::new(),
            delay: Duration::from_millis(50),
        });
        let first = SchedulingService::new(salon(), store.clone());
        let second = SchedulingService::new(salon(), store.clone());

        let a = tokio::spawn(async move {
            first
                .book(request("womens-cut", "10:00 AM", Some("jennifer")))
                .await
        });
        let b = tokio::spawn(async move {
            second
                .book(request("womens-cut", "10:15 AM", Some("jennifer")))
                .await
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(SchedulingError::SlotNoLongerAvailable { .. }))));
        assert_eq!(store.list_appointments(tuesday(), None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blocked_time_removes_slots_and_is_listed() {
        let service = service_with(InMemoryBookingStore::new());
        let block = service
            .block_time(
                "heather",
                BlockTimeRequest {
                    date: tuesday(),
                    start_time: "01:00 PM".to_string(),
                    end_time: "3:00 PM".to_string(),
                    reason: Some(" Dentist ".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(block.id.is_some());
        assert_eq!(block.start_time, "1:00 PM");
        assert_eq!(block.reason.as_deref(), Some("Dentist"));

        let heather = service
            .available_times(tuesday(), "mens-cut", Some("heather"))
            .await
            .unwrap();
        assert!(heather.times.iter().any(|t| t == "12:30 PM"));
        assert!(!heather.times.iter().any(|t| t == "1:00 PM"));
        assert!(!heather.times.iter().any(|t| t == "2:30 PM"));
        assert!(heather.times.iter().any(|t| t == "3:00 PM"));

        let err = service
            .book(request("mens-cut", "2:00 PM", Some("heather")))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::SlotNoLongerAvailable { .. }));

        assert_eq!(service.blocked_times("heather").await.unwrap(), vec![block]);
        assert!(matches!(
            service.blocked_times("maria").await,
            Err(SchedulingError::UnknownStylist(_))
        ));
    }

    #[tokio::test]
    async fn test_block_time_rejects_bad_ranges() {
        let service = service_with(InMemoryBookingStore::new());
        for (start, end) in [("3:00 PM", "1:00 PM"), ("1:00 PM", "1:00 PM"), ("13:00", "3:00 PM")] {
            let err = service
                .block_time(
                    "heather",
                    BlockTimeRequest {
                        date: tuesday(),
                        start_time: start.to_string(),
                        end_time: end.to_string(),
                        reason: None,
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, SchedulingError::InvalidRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_appointments_listing_filters_by_stylist() {
        let store = InMemoryBookingStore::new();
        seed(&store, "jennifer", "10:00 AM", 60).await;
        seed(&store, "heather", "9:00 AM", 60).await;
        let service = service_with(store);

        let all = service.appointments(tuesday(), None).await.unwrap();
        assert_eq!(all.len(), 2);
        let jennifer = service.appointments(tuesday(), Some("jennifer")).await.unwrap();
        assert_eq!(jennifer.len(), 1);
        assert_eq!(jennifer[0].time, "10:00 AM");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("(256) 613-2308").unwrap(), "2566132308");
        assert_eq!(normalize_phone("256.613.2308").unwrap(), "2566132308");
        assert!(normalize_phone("613-2308").is_err());
        assert!(normalize_phone("1 (256) 613-2308").is_err());
    }

    #[test]
    fn test_terminal_stages() {
        assert!(BookingStage::Confirmed.is_terminal());
        assert!(BookingStage::Rejected("no_stylist_available").is_terminal());
        assert!(!BookingStage::Validating.is_terminal());
        assert_eq!(
            BookingStage::Rejected("slot_no_longer_available").to_string(),
            "rejected(slot_no_longer_available)"
        );
    }
}
