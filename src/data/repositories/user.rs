use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;

use crate::schema::users;

pub struct UserRepository;

impl UserRepository {
    pub fn user_exists(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<bool, diesel::result::Error> {
        select(exists(users::table.filter(users::user_id.eq(user_id)))).get_result(conn)
    }
}
