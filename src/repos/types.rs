//! Column conversions: ids and enums are stored as text, string lists and free json as
//! json text.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Error as SqliteError;
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_json;

use models::*;

macro_rules! text_column {
    ($($name:ident),+ $(,)*) => {
        $(
            impl ToSql for $name {
                fn to_sql(&self) -> Result<ToSqlOutput, SqliteError> {
                    Ok(ToSqlOutput::from(self.to_string()))
                }
            }

            impl FromSql for $name {
                fn column_result(value: ValueRef) -> FromSqlResult<Self> {
                    value.as_str().and_then(|s| s.parse().map_err(|_| FromSqlError::InvalidType))
                }
            }
        )+
    };
}

text_column!(
    ProductId,
    SampleId,
    EventId,
    CampaignId,
    SampleStatus,
    EventType,
    EventStatus,
    CampaignType,
    CampaignStatus,
);

/// Value stored as json text
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: Serialize> ToSql for Json<T> {
    fn to_sql(&self) -> Result<ToSqlOutput, SqliteError> {
        serde_json::to_string(&self.0)
            .map(ToSqlOutput::from)
            .map_err(|e| SqliteError::ToSqlConversionFailure(Box::new(e)))
    }
}

impl<T: DeserializeOwned> FromSql for Json<T> {
    fn column_result(value: ValueRef) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|s| serde_json::from_str(s).map(Json).map_err(|e| FromSqlError::Other(Box::new(e))))
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    #[test]
    fn lists_and_ids_survive_a_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT, status TEXT, tags TEXT)").unwrap();

        let id = ProductId::new();
        let tags = vec!["wool".to_string(), "cashmere".to_string()];
        conn.execute(
            "INSERT INTO t (id, status, tags) VALUES (?1, ?2, ?3)",
            params![id, SampleStatus::NotValidated, Json(&tags)],
        ).unwrap();

        let (read_id, status, Json(read_tags)): (ProductId, SampleStatus, Json<Vec<String>>) = conn
            .query_row("SELECT id, status, tags FROM t", [], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap();
        assert_eq!(read_id, id);
        assert_eq!(status, SampleStatus::NotValidated);
        assert_eq!(read_tags, tags);

        let raw: String = conn.query_row("SELECT status FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(raw, "NOT_VALIDATED");
    }

    #[test]
    fn unknown_enum_text_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let res: Result<EventType, _> = conn.query_row("SELECT 'PARADE'", [], |row| row.get(0));
        assert!(res.is_err());
    }
}
