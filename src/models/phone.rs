use std::fmt;

use tracing::debug;

use crate::db::{Database, SqlParam};
use crate::error::Result;

/// A phone number stored for one client
///
/// Holds the owning client's identity, not the client itself.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    pub client_id: i32,
    #[sqlx(rename = "phone")]
    pub number: String,
}

impl Phone {
    pub fn new(client_id: i32, number: impl Into<String>) -> Self {
        Self {
            client_id,
            number: number.into(),
        }
    }

    /// Insert this number for its client
    pub async fn save(&self, db: &mut Database) -> Result<()> {
        db.execute(
            "INSERT INTO phones (client_id, phone) VALUES ($1, $2)",
            &[SqlParam::Int(self.client_id), SqlParam::Text(&self.number)],
        )
        .await?;
        debug!(client_id = self.client_id, "phone saved");

        Ok(())
    }

    /// Remove every row with this client and exact number. Missing rows are not an error.
    pub async fn delete(&self, db: &mut Database) -> Result<u64> {
        db.execute(
            "DELETE FROM phones WHERE client_id = $1 AND phone = $2",
            &[SqlParam::Int(self.client_id), SqlParam::Text(&self.number)],
        )
        .await
    }

    /// All phones stored for a client, oldest first
    pub async fn find_by_client(db: &mut Database, client_id: i32) -> Result<Vec<Phone>> {
        db.fetch_all(
            "SELECT client_id, phone FROM phones WHERE client_id = $1 ORDER BY id ASC",
            &[SqlParam::Int(client_id)],
        )
        .await
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phone({})", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_display() {
        let phone = Phone::new(3, "+79161234567");
        assert_eq!(phone.to_string(), "Phone(+79161234567)");
        assert_eq!(phone.client_id, 3);
    }
}
