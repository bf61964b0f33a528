use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, Select,
    prelude::*,
};

use crate::{
    Category, CategoryNew, CategoryPatch, EngineError, Patch, ResultEngine, budgets, categories,
    error::Issues,
    transactions,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Resource, resource::active_value};

/// Fails with a validation error on `field` unless the category exists.
pub(super) async fn ensure_category_exists(
    db_tx: &DatabaseTransaction,
    field: &str,
    category_id: i64,
) -> ResultEngine<()> {
    let found = categories::Entity::find_by_id(category_id)
        .one(db_tx)
        .await?;
    if found.is_none() {
        return Err(EngineError::invalid(
            field,
            format!("category {category_id} does not exist"),
        ));
    }
    Ok(())
}

impl Resource for Category {
    const LABEL: &'static str = "Category";

    type Entity = categories::Entity;
    type Model = categories::Model;
    type PrimaryKey = categories::PrimaryKey;
    type ActiveModel = categories::ActiveModel;
    type New = CategoryNew;
    type Patch = CategoryPatch;

    fn from_model(model: categories::Model) -> ResultEngine<Self> {
        Ok(model.into())
    }

    fn prepare_new(new: CategoryNew, now: DateTime<Utc>) -> ResultEngine<categories::ActiveModel> {
        let mut issues = Issues::default();
        let name = issues.take(normalize_required_name(&new.name, "name"));
        let description =
            issues.take(normalize_optional_text(new.description.as_deref(), "description"));
        issues.finish()?;

        Ok(categories::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(description),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        })
    }

    fn prepare_patch(
        current: categories::Model,
        patch: CategoryPatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<categories::ActiveModel> {
        let mut issues = Issues::default();
        let mut row: categories::ActiveModel = current.into();

        if let Some(name) = patch.name {
            row.name = ActiveValue::Set(issues.take(normalize_required_name(&name, "name")));
        }
        match patch.description {
            Patch::Absent => {}
            Patch::Null => row.description = ActiveValue::Set(None),
            Patch::Value(text) => {
                row.description = ActiveValue::Set(
                    issues.take(normalize_optional_text(Some(&text), "description")),
                );
            }
        }
        issues.finish()?;

        row.updated_at = ActiveValue::Set(now);
        Ok(row)
    }

    fn ordered(query: Select<categories::Entity>) -> Select<categories::Entity> {
        query
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
    }

    async fn check_write(
        db_tx: &DatabaseTransaction,
        row: &categories::ActiveModel,
    ) -> ResultEngine<()> {
        let ActiveValue::Set(name) = &row.name else {
            return Ok(());
        };
        let mut query =
            categories::Entity::find().filter(categories::Column::Name.eq(name.as_str()));
        if let Some(id) = active_value(&row.id) {
            query = query.filter(categories::Column::Id.ne(id));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::ExistingKey(name.clone()));
        }
        Ok(())
    }

    async fn check_delete(db_tx: &DatabaseTransaction, id: i64) -> ResultEngine<()> {
        let transactions = transactions::Entity::find()
            .filter(transactions::Column::CategoryId.eq(id))
            .count(db_tx)
            .await?;
        if transactions > 0 {
            return Err(EngineError::CategoryInUse {
                category_id: id,
                transactions,
            });
        }

        let budgets = budgets::Entity::find()
            .filter(budgets::Column::CategoryId.eq(id))
            .count(db_tx)
            .await?;
        if budgets > 0 {
            return Err(EngineError::CategoryHasBudgets {
                category_id: id,
                budgets,
            });
        }
        Ok(())
    }
}
