use super::error::{EntityApiErrorKind, Error};
use entity::profiles::{Column, Entity, Model};
use sea_orm::{entity::prelude::*, ConnectionTrait};

/// Finds the profile whose email equals `email` exactly (case-sensitive, as stored).
pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    if email.is_empty() {
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::InvalidQueryTerm,
        });
    }

    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::Id;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_by_email_returns_the_matching_profile() -> Result<(), Error> {
        let profile = Model {
            id: Id::new_v4(),
            email: "a@x.com".to_string(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![profile.clone()]])
            .into_connection();

        let result = find_by_email(&db, "a@x.com").await?;
        assert_eq!(result, Some(profile));
        Ok(())
    }

    #[tokio::test]
    async fn find_by_email_returns_none_without_a_match() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        assert!(find_by_email(&db, "nobody@x.com").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn find_by_email_rejects_an_empty_email_without_querying() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = find_by_email(&db, "").await;
        assert_eq!(
            result.map_err(|e| e.error_kind),
            Err(EntityApiErrorKind::InvalidQueryTerm)
        );
        assert!(db.into_transaction_log().is_empty());
    }
}
