//! Durable client storage for the session, one row per key.

use rusqlite::{params, OptionalExtension};

use crate::db::models::{Session, SessionUser};
use crate::error::{AppError, AppResult};
use crate::state::DbPool;

pub const ACCESS_TOKEN: &str = "accessToken";
pub const REFRESH_TOKEN: &str = "refreshToken";
pub const USER_ID: &str = "user_id";
pub const USERNAME: &str = "username";
pub const EMAIL: &str = "email";

pub const SESSION_KEYS: [&str; 5] = [ACCESS_TOKEN, REFRESH_TOKEN, USER_ID, USERNAME, EMAIL];

#[derive(Clone)]
pub struct SessionStore {
    pool: DbPool,
}

impl SessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Reads the persisted session. Incomplete or malformed data reads as
    /// logged out; only storage faults are errors.
    pub fn load(&self) -> AppResult<Session> {
        let conn = self.pool.get()?;
        let get = |key: &str| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        };

        let access_token = get(ACCESS_TOKEN)?.filter(|v| !v.is_empty());
        let user_id = get(USER_ID)?.and_then(|v| v.trim().parse::<i64>().ok());
        let username = get(USERNAME)?.filter(|v| !v.is_empty());

        let (Some(access_token), Some(id), Some(username)) = (access_token, user_id, username)
        else {
            return Ok(Session::default());
        };

        Ok(Session::new(
            SessionUser {
                id,
                username,
                email: get(EMAIL)?.unwrap_or_default(),
            },
            access_token,
            get(REFRESH_TOKEN)?.unwrap_or_default(),
        ))
    }

    /// Writes all five keys in one transaction.
    pub fn save(&self, session: &Session) -> AppResult<()> {
        let user = match (&session.user, session.authenticated && session.is_consistent()) {
            (Some(user), true) => user,
            _ => return Err(AppError::IncompleteSession),
        };

        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            )?;
            let user_id = user.id.to_string();
            for (key, value) in [
                (ACCESS_TOKEN, session.access_token.as_str()),
                (REFRESH_TOKEN, session.refresh_token.as_str()),
                (USER_ID, user_id.as_str()),
                (USERNAME, user.username.as_str()),
                (EMAIL, user.email.as_str()),
            ] {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Removes every session key.
    pub fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM local_storage WHERE key IN (?1, ?2, ?3, ?4, ?5)",
            params![ACCESS_TOKEN, REFRESH_TOKEN, USER_ID, USERNAME, EMAIL],
        )?;
        Ok(())
    }

    /// Keys currently present, sorted.
    pub fn keys(&self) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn alice_session() -> Session {
        Session::new(
            SessionUser {
                id: 42,
                username: "alice".into(),
                email: "alice@example.com".into(),
            },
            "access-1".into(),
            "refresh-1".into(),
        )
    }

    fn put(store: &SessionStore, key: &str, value: &str) {
        let conn = store.pool.get().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO local_storage (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .unwrap();
    }

    #[test]
    fn empty_store_loads_logged_out() {
        let store = SessionStore::new(test_pool());
        assert_eq!(store.load().unwrap(), Session::default());
    }

    #[test]
    fn save_then_load_returns_same_session() {
        let store = SessionStore::new(test_pool());
        store.save(&alice_session()).unwrap();
        assert_eq!(store.load().unwrap(), alice_session());
    }

    #[test]
    fn save_writes_exactly_five_keys() {
        let store = SessionStore::new(test_pool());
        store.save(&alice_session()).unwrap();
        store.save(&alice_session()).unwrap();

        let mut expected: Vec<String> = SESSION_KEYS.iter().map(|k| k.to_string()).collect();
        expected.sort();
        assert_eq!(store.keys().unwrap(), expected);
    }

    #[test]
    fn clear_removes_every_key() {
        let store = SessionStore::new(test_pool());
        store.save(&alice_session()).unwrap();
        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.load().unwrap().authenticated);
    }

    #[test]
    fn partial_data_loads_logged_out() {
        let store = SessionStore::new(test_pool());
        put(&store, ACCESS_TOKEN, "tok");
        put(&store, USERNAME, "alice");
        assert!(!store.load().unwrap().authenticated);
    }

    #[test]
    fn non_numeric_user_id_loads_logged_out() {
        let store = SessionStore::new(test_pool());
        put(&store, ACCESS_TOKEN, "tok");
        put(&store, USER_ID, "abc");
        put(&store, USERNAME, "alice");
        assert!(!store.load().unwrap().authenticated);
    }

    #[test]
    fn missing_email_and_refresh_token_default_to_empty() {
        let store = SessionStore::new(test_pool());
        put(&store, ACCESS_TOKEN, "tok");
        put(&store, USER_ID, "3");
        put(&store, USERNAME, "carol");

        let session = store.load().unwrap();
        assert!(session.authenticated);
        assert_eq!(session.refresh_token, "");
        assert_eq!(session.user.unwrap().email, "");
    }

    #[test]
    fn save_refuses_incomplete_session() {
        let store = SessionStore::new(test_pool());
        let mut session = alice_session();
        session.access_token.clear();
        assert!(store.save(&session).is_err());
        assert!(store.save(&Session::default()).is_err());
        assert!(store.keys().unwrap().is_empty());
    }
}
