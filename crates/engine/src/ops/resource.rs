//! Create/read/update/delete shared by every ledger entity.
//!
//! Each entity plugs its validation and integrity checks into [`Resource`];
//! the [`Engine`] methods below run them inside one DB transaction so a
//! failed check never leaves a partial write behind.

use std::future::Future;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseTransaction,
    EntityTrait, IntoActiveModel, PrimaryKeyTrait, Select, TransactionTrait, Value,
};

use crate::{EngineError, ResultEngine};

use super::{Engine, with_tx};

/// A ledger entity stored in its own table with an integer primary key.
pub trait Resource: Sized + Send {
    /// Entity name used in not-found errors ("Category with id 7 not found").
    const LABEL: &'static str;

    type Entity: EntityTrait<Model = Self::Model, PrimaryKey = Self::PrimaryKey>;
    type Model: IntoActiveModel<Self::ActiveModel> + Send + Sync;
    type PrimaryKey: PrimaryKeyTrait<ValueType = i64>;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + Sync;
    type New: Send;
    type Patch: Send;

    fn from_model(model: Self::Model) -> ResultEngine<Self>;

    /// Validate and normalize a create request.
    fn prepare_new(new: Self::New, now: DateTime<Utc>) -> ResultEngine<Self::ActiveModel>;

    /// Merge a patch into the stored row. Validation sees the merged values.
    fn prepare_patch(
        current: Self::Model,
        patch: Self::Patch,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self::ActiveModel>;

    /// Listing order.
    fn ordered(query: Select<Self::Entity>) -> Select<Self::Entity>;

    /// Checks against other rows (uniqueness, references) before a write.
    fn check_write(
        db_tx: &DatabaseTransaction,
        row: &Self::ActiveModel,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Refuses deletes that would orphan dependent rows.
    fn check_delete(
        db_tx: &DatabaseTransaction,
        id: i64,
    ) -> impl Future<Output = ResultEngine<()>> + Send;
}

/// Value held by an active model column, whether freshly set or loaded.
pub(super) fn active_value<T>(value: &ActiveValue<T>) -> Option<T>
where
    T: Into<Value> + Clone,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}

pub(super) async fn find_model<R, C>(db: &C, id: i64) -> ResultEngine<R::Model>
where
    R: Resource,
    C: ConnectionTrait,
{
    R::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(EngineError::KeyNotFound {
            entity: R::LABEL,
            id,
        })
}

impl Engine {
    pub async fn create<R: Resource>(&self, new: R::New) -> ResultEngine<R> {
        let row = R::prepare_new(new, Utc::now())?;
        with_tx!(self, |db_tx| {
            R::check_write(&db_tx, &row).await?;
            let model = row.insert(&db_tx).await?;
            R::from_model(model)
        })
    }

    pub async fn get<R: Resource>(&self, id: i64) -> ResultEngine<R> {
        let model = find_model::<R, _>(&self.database, id).await?;
        R::from_model(model)
    }

    pub async fn list<R: Resource>(&self) -> ResultEngine<Vec<R>> {
        R::ordered(R::Entity::find())
            .all(&self.database)
            .await?
            .into_iter()
            .map(R::from_model)
            .collect()
    }

    /// Partial update: fields absent from the patch keep their stored value.
    pub async fn update<R: Resource>(&self, id: i64, patch: R::Patch) -> ResultEngine<R> {
        with_tx!(self, |db_tx| {
            let current = find_model::<R, _>(&db_tx, id).await?;
            let row = R::prepare_patch(current, patch, Utc::now())?;
            R::check_write(&db_tx, &row).await?;
            let model = row.update(&db_tx).await?;
            R::from_model(model)
        })
    }

    pub async fn delete<R: Resource>(&self, id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            find_model::<R, _>(&db_tx, id).await?;
            R::check_delete(&db_tx, id).await?;
            R::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
