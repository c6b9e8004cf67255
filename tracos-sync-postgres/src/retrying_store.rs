use async_trait::async_trait;

use tracos_sync_api::StoreResult;
use tracos_sync_db::models::tracos::TracosWorkorderModel;
use tracos_sync_db::repository::{
    CheckConnection, FindByNumber, FindUnsynced, Insert, MarkSynced, Update,
};

use crate::retry::RetryPolicy;

/// Workorder store decorator applying a [`RetryPolicy`] to every call.
#[derive(Debug)]
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<S: CheckConnection> CheckConnection for RetryingStore<S> {
    async fn check_connection(&self) -> StoreResult<()> {
        let inner = &self.inner;
        self.policy
            .execute("check_connection", move || inner.check_connection())
            .await
    }
}

#[async_trait]
impl<S: FindByNumber<TracosWorkorderModel>> FindByNumber<TracosWorkorderModel> for RetryingStore<S> {
    async fn find_by_number(&self, number: i64) -> StoreResult<Option<TracosWorkorderModel>> {
        let inner = &self.inner;
        self.policy
            .execute("find_by_number", move || inner.find_by_number(number))
            .await
    }
}

#[async_trait]
impl<S: Insert<TracosWorkorderModel>> Insert<TracosWorkorderModel> for RetryingStore<S> {
    async fn insert(&self, item: TracosWorkorderModel) -> StoreResult<TracosWorkorderModel> {
        let inner = &self.inner;
        let item = &item;
        self.policy
            .execute("insert", move || inner.insert(item.clone()))
            .await
    }
}

#[async_trait]
impl<S: Update<TracosWorkorderModel>> Update<TracosWorkorderModel> for RetryingStore<S> {
    async fn update(&self, item: TracosWorkorderModel) -> StoreResult<TracosWorkorderModel> {
        let inner = &self.inner;
        let item = &item;
        self.policy
            .execute("update", move || inner.update(item.clone()))
            .await
    }
}

#[async_trait]
impl<S: FindUnsynced<TracosWorkorderModel>> FindUnsynced<TracosWorkorderModel> for RetryingStore<S> {
    async fn find_unsynced(&self) -> StoreResult<Vec<TracosWorkorderModel>> {
        let inner = &self.inner;
        self.policy
            .execute("find_unsynced", move || inner.find_unsynced())
            .await
    }
}

#[async_trait]
impl<S: MarkSynced> MarkSynced for RetryingStore<S> {
    async fn mark_synced(&self, number: i64) -> StoreResult<()> {
        let inner = &self.inner;
        self.policy
            .execute("mark_synced", move || inner.mark_synced(number))
            .await
    }
}
