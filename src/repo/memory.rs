//! In-process repositories, used by tests and local runs without DynamoDB

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{CancelledSubscription, PendingSubscription, Subscription};

use super::{
    CancelledSubscriptionRepository, PendingSubscriptionRepository, SubscriptionRepository,
};

type Key = (String, String);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepo {
    records: Mutex<HashMap<Key, Subscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn all(&self) -> Vec<Subscription> {
        lock(&self.records).values().cloned().collect()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepo {
    async fn find_by_vrm_and_contact(&self, vrm: &str, contact: &str) -> Result<Option<Subscription>> {
        Ok(lock(&self.records)
            .get(&(vrm.to_string(), contact.to_string()))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>> {
        Ok(lock(&self.records).values().find(|s| s.id == id).cloned())
    }

    async fn find_due_on(&self, date: NaiveDate) -> Result<Vec<Subscription>> {
        Ok(lock(&self.records)
            .values()
            .filter(|s| s.mot_due_date == date)
            .cloned()
            .collect())
    }

    async fn save(&self, subscription: &Subscription) -> Result<()> {
        let key = (subscription.vrm.clone(), subscription.contact.value.clone());
        lock(&self.records).insert(key, subscription.clone());
        Ok(())
    }

    async fn delete(&self, subscription: &Subscription) -> Result<()> {
        let key = (subscription.vrm.clone(), subscription.contact.value.clone());
        let mut records = lock(&self.records);
        if records.get(&key).map(|s| s.id == subscription.id).unwrap_or(false) {
            records.remove(&key);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPendingSubscriptionRepo {
    records: Mutex<HashMap<Key, PendingSubscription>>,
}

impl InMemoryPendingSubscriptionRepo {
    pub fn all(&self) -> Vec<PendingSubscription> {
        lock(&self.records).values().cloned().collect()
    }
}

#[async_trait]
impl PendingSubscriptionRepository for InMemoryPendingSubscriptionRepo {
    async fn find_by_confirmation_id(&self, id: &str) -> Result<Option<PendingSubscription>> {
        Ok(lock(&self.records)
            .values()
            .find(|p| p.confirmation_id == id)
            .cloned())
    }

    async fn find_by_vrm_and_contact(
        &self,
        vrm: &str,
        contact: &str,
    ) -> Result<Option<PendingSubscription>> {
        Ok(lock(&self.records)
            .get(&(vrm.to_string(), contact.to_string()))
            .cloned())
    }

    async fn save(&self, pending: &PendingSubscription) -> Result<()> {
        let key = (pending.vrm.clone(), pending.contact.value.clone());
        lock(&self.records).insert(key, pending.clone());
        Ok(())
    }

    async fn delete(&self, pending: &PendingSubscription) -> Result<()> {
        let key = (pending.vrm.clone(), pending.contact.value.clone());
        let mut records = lock(&self.records);
        if records
            .get(&key)
            .map(|p| p.confirmation_id == pending.confirmation_id)
            .unwrap_or(false)
        {
            records.remove(&key);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCancelledSubscriptionRepo {
    records: Mutex<Vec<CancelledSubscription>>,
}

impl InMemoryCancelledSubscriptionRepo {
    pub fn all(&self) -> Vec<CancelledSubscription> {
        lock(&self.records).clone()
    }
}

#[async_trait]
impl CancelledSubscriptionRepository for InMemoryCancelledSubscriptionRepo {
    async fn save(&self, cancelled: &CancelledSubscription) -> Result<()> {
        let mut records = lock(&self.records);
        records.retain(|c| c.id != cancelled.id);
        records.push(cancelled.clone());
        Ok(())
    }

    async fn find_by_vrm_and_contact(
        &self,
        vrm: &str,
        contact: &str,
    ) -> Result<Option<CancelledSubscription>> {
        Ok(lock(&self.records)
            .iter()
            .find(|c| c.vrm == vrm && c.contact.value == contact)
            .cloned())
    }
}
