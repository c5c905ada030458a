use super::error::Error;
use entity::google_tokens::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::debug;
use sea_orm::{entity::prelude::*, sea_query::OnConflict, ActiveValue::Set, ConnectionTrait};

/// Inserts the user's Google tokens, or overwrites every token field of the existing
/// row when one is already stored for `model.user_id`. Last write wins.
pub async fn upsert(db: &impl ConnectionTrait, model: Model) -> Result<Model, Error> {
    debug!("Upserting Google tokens for user_id: {}", model.user_id);

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        user_id: Set(model.user_id),
        access_token: Set(model.access_token),
        refresh_token: Set(model.refresh_token),
        scope: Set(model.scope),
        token_type: Set(model.token_type),
        expiry_date: Set(model.expiry_date),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let on_conflict = OnConflict::column(Column::UserId)
        .update_columns([
            Column::AccessToken,
            Column::RefreshToken,
            Column::Scope,
            Column::TokenType,
            Column::ExpiryDate,
            Column::UpdatedAt,
        ])
        .to_owned();

    Ok(Entity::insert(active_model)
        .on_conflict(on_conflict)
        .exec_with_returning(db)
        .await?)
}

/// Finds the Google tokens stored for a user, if the user has linked an account.
pub async fn find_by_user_id(db: &impl ConnectionTrait, user_id: Id) -> Result<Option<Model>, Error> {
    Ok(Entity::find_by_id(user_id).one(db).await?)
}
