//! Repository implementation for user profiles.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        profile::{Profile, UpsertProfile},
        types::UserId,
    },
    models::profile::{Profile as DbProfile, UpsertProfile as DbUpsertProfile},
    repository::{
        DieselRepository, ProfileReader, ProfileWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl ProfileReader for DieselRepository {
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let db_profile = profiles::table
            .find(user_id.as_str())
            .first::<DbProfile>(&mut conn)
            .optional()?;

        db_profile
            .map(|p| Profile::try_from(p).map_err(RepositoryError::from))
            .transpose()
    }
}

impl ProfileWriter for DieselRepository {
    fn upsert_profile(&self, profile: &UpsertProfile) -> RepositoryResult<Profile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let row = DbUpsertProfile::new(profile, Utc::now().naive_utc());

        let db_profile = diesel::insert_into(profiles::table)
            .values(&row)
            .on_conflict(profiles::user_id)
            .do_update()
            .set(&row)
            .get_result::<DbProfile>(&mut conn)?;

        Profile::try_from(db_profile).map_err(RepositoryError::from)
    }
}
