use chrono::Utc;
use log::info;
use sea_orm::{sea_query::OnConflict, ActiveValue::Set, DatabaseConnection, EntityTrait};

pub use entity::{google_tokens, profiles, Id};

pub mod error;
pub mod google_token;
pub mod profile;

/// Email of the profile inserted by `seed_database` for local development.
pub const DEV_PROFILE_EMAIL: &str = "mentor@example.com";

/// Seeds a development profile so the OAuth callback has a user to bind to.
/// Profiles are normally owned by the identity service; this is for local setups only.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let profile = profiles::ActiveModel {
        id: Set(Id::new_v4()),
        email: Set(DEV_PROFILE_EMAIL.to_owned()),
    };

    profiles::Entity::insert(profile)
        .on_conflict(
            OnConflict::column(profiles::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!(
        "Seeded development profile {} at {}",
        DEV_PROFILE_EMAIL,
        Utc::now().to_rfc3339()
    );
    Ok(())
}
