use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate};

use crate::error::Result;
use crate::model::{Subscription, SubscriptionQueueItem};
use crate::notify::ReminderTier;
use crate::queue::SubscriptionQueue;
use crate::repo::SubscriptionRepository;

/// Counts from one loader run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub submitted_for_processing: u64,
    pub total_processed: u64,
    pub failed: u64,
    pub mot_dvla_vehicles_processed: u64,
    pub mot_non_dvla_vehicles_processed: u64,
    pub dvla_vehicles_processed: u64,
    pub non_dvla_vehicles_processed: u64,
    pub duration: Duration,
}

impl LoadReport {
    fn record(&mut self, subscription: &Subscription) {
        self.total_processed += 1;

        let dvla = !subscription.mot_identification.has_mot_test_number();
        match (subscription.vehicle_type.is_annual_test(), dvla) {
            (false, true) => self.mot_dvla_vehicles_processed += 1,
            (false, false) => self.mot_non_dvla_vehicles_processed += 1,
            (true, true) => self.dvla_vehicles_processed += 1,
            (true, false) => self.non_dvla_vehicles_processed += 1,
        }
    }
}

/// Queues every subscription due a reminder on a given day
pub struct SubscriptionLoader {
    subscriptions: Arc<dyn SubscriptionRepository>,
    queue: Arc<dyn SubscriptionQueue>,
}

impl SubscriptionLoader {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, queue: Arc<dyn SubscriptionQueue>) -> Self {
        Self {
            subscriptions,
            queue,
        }
    }

    #[tracing::instrument(name = "Load subscriptions", skip(self))]
    pub async fn run(&self, request_date: NaiveDate) -> Result<LoadReport> {
        let started = Instant::now();
        let mut report = LoadReport::default();

        let due_dates = ReminderTier::due_dates(request_date);
        let distinct_dates: BTreeSet<NaiveDate> = due_dates.iter().map(|(date, _)| *date).collect();

        for date in distinct_dates {
            let subscriptions = self.subscriptions.find_due_on(date).await?;

            for subscription in subscriptions {
                // A date only applies to the vehicle group whose rule produced it
                let annual_test = subscription.vehicle_type.is_annual_test();
                if !due_dates.contains(&(date, annual_test)) {
                    continue;
                }

                report.record(&subscription);
                let item = SubscriptionQueueItem::from_subscription(&subscription, request_date);
                match self.queue.enqueue(&item).await {
                    Ok(()) => report.submitted_for_processing += 1,
                    Err(e) => {
                        report.failed += 1;
                        tracing::error!(error = %e, id = %subscription.id, "Failed to queue subscription");
                    }
                }
            }
        }

        report.duration = started.elapsed();
        tracing::info!(
            submitted_for_processing = report.submitted_for_processing,
            total_processed = report.total_processed,
            failed = report.failed,
            mot_dvla_vehicles_processed = report.mot_dvla_vehicles_processed,
            mot_non_dvla_vehicles_processed = report.mot_non_dvla_vehicles_processed,
            dvla_vehicles_processed = report.dvla_vehicles_processed,
            non_dvla_vehicles_processed = report.non_dvla_vehicles_processed,
            duration_ms = report.duration.as_millis() as u64,
            "Subscriptions loaded"
        );
        Ok(report)
    }
}

/// Scheduler events carry an RFC 3339 timestamp, manual runs may pass a plain date
pub fn parse_request_date(value: &str) -> anyhow::Result<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.date_naive());
    }
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid request date `{}`: {}", value, e))
}

#[cfg(test)]
mod tests {
    use crate::domain::{ContactDetail, ContactType, MotIdentification, VehicleType};
    use crate::queue::memory::InMemorySubscriptionQueue;
    use crate::repo::memory::InMemorySubscriptionRepo;
    use crate::testing::{date, subscription};

    use super::*;

    struct Fixture {
        loader: SubscriptionLoader,
        subscriptions: Arc<InMemorySubscriptionRepo>,
        queue: Arc<InMemorySubscriptionQueue>,
    }

    fn fixture() -> Fixture {
        let subscriptions = Arc::new(InMemorySubscriptionRepo::default());
        let queue = Arc::new(InMemorySubscriptionQueue::default());

        Fixture {
            loader: SubscriptionLoader::new(subscriptions.clone(), queue.clone()),
            subscriptions,
            queue,
        }
    }

    fn email(n: u32) -> ContactDetail {
        ContactDetail::new(format!("test{}@example.com", n), ContactType::Email)
    }

    #[tokio::test]
    async fn mot_subscriptions_load_for_every_mot_tier() {
        let f = fixture();
        let request = date(2017, 9, 10);
        for (n, due) in [date(2017, 10, 10), date(2017, 9, 24), date(2017, 9, 9)]
            .into_iter()
            .enumerate()
        {
            let sub = subscription(&format!("REG{}", n), email(n as u32), due);
            f.subscriptions.save(&sub).await.unwrap();
        }

        let report = f.loader.run(request).await.unwrap();

        assert_eq!(report.submitted_for_processing, 3);
        assert_eq!(report.total_processed, 3);
        assert_eq!(report.mot_non_dvla_vehicles_processed, 3);
        assert!(f.queue.waiting().iter().all(|item| item.loaded_on_date == request));
    }

    #[tokio::test]
    async fn hgv_loads_at_two_months_but_not_two_weeks() {
        let f = fixture();
        let mut two_months = subscription("HGV1", email(1), date(2017, 11, 10));
        two_months.vehicle_type = VehicleType::Hgv;
        two_months.mot_identification = MotIdentification::DvlaId("dvla-1".into());
        let mut two_weeks = subscription("HGV2", email(2), date(2017, 9, 24));
        two_weeks.vehicle_type = VehicleType::Hgv;
        f.subscriptions.save(&two_months).await.unwrap();
        f.subscriptions.save(&two_weeks).await.unwrap();

        let report = f.loader.run(date(2017, 9, 10)).await.unwrap();

        assert_eq!(report.submitted_for_processing, 1);
        assert_eq!(report.dvla_vehicles_processed, 1);
        assert_eq!(report.non_dvla_vehicles_processed, 0);
        assert_eq!(f.queue.waiting()[0].vrm, "HGV1");
    }

    #[tokio::test]
    async fn one_month_date_is_queued_once_per_subscription() {
        let f = fixture();
        let sub = subscription("REG1", email(1), date(2017, 10, 10));
        f.subscriptions.save(&sub).await.unwrap();

        f.loader.run(date(2017, 9, 10)).await.unwrap();

        assert_eq!(f.queue.waiting().len(), 1);
    }

    #[tokio::test]
    async fn not_due_subscriptions_are_ignored() {
        let f = fixture();
        let sub = subscription("REG1", email(1), date(2017, 12, 25));
        f.subscriptions.save(&sub).await.unwrap();

        let report = f.loader.run(date(2017, 9, 10)).await.unwrap();

        assert_eq!(report, LoadReport { duration: report.duration, ..Default::default() });
        assert!(f.queue.waiting().is_empty());
    }

    #[tokio::test]
    async fn queued_item_carries_the_mot_test_number() {
        let f = fixture();
        let sub = subscription("REG1", email(1), date(2017, 10, 10));
        f.subscriptions.save(&sub).await.unwrap();

        f.loader.run(date(2017, 9, 10)).await.unwrap();

        let item = &f.queue.waiting()[0];
        assert_eq!(item.mot_test_number.as_deref(), Some("123456"));
        assert_eq!(item.dvla_id, None);
    }

    #[test]
    fn request_date_accepts_timestamps_and_dates() {
        assert_eq!(parse_request_date("2017-09-10T12:00:00Z").unwrap(), date(2017, 9, 10));
        assert_eq!(parse_request_date("2017-09-10").unwrap(), date(2017, 9, 10));
        assert!(parse_request_date("yesterday").is_err());
    }
}
