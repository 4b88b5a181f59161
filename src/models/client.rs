use std::fmt;

use tracing::{debug, info};

use crate::db::{Database, SqlParam};
use crate::error::{ContactError, Result};
use crate::models::Phone;

/// A stored row of the clients table. The text columns are nullable.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Fields to overwrite on update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A single field to look clients up by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLookup {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
}

impl ClientLookup {
    fn sql(&self) -> &'static str {
        match self {
            ClientLookup::FirstName(_) => {
                "SELECT id, first_name, last_name, email FROM clients WHERE first_name = $1 ORDER BY id"
            }
            ClientLookup::LastName(_) => {
                "SELECT id, first_name, last_name, email FROM clients WHERE last_name = $1 ORDER BY id"
            }
            ClientLookup::Email(_) => {
                "SELECT id, first_name, last_name, email FROM clients WHERE email = $1 ORDER BY id"
            }
            ClientLookup::Phone(_) => {
                r#"
                SELECT DISTINCT c.id, c.first_name, c.last_name, c.email
                FROM clients c
                JOIN phones p ON p.client_id = c.id
                WHERE p.phone = $1
                ORDER BY c.id
                "#
            }
        }
    }

    fn value(&self) -> &str {
        match self {
            ClientLookup::FirstName(v)
            | ClientLookup::LastName(v)
            | ClientLookup::Email(v)
            | ClientLookup::Phone(v) => v,
        }
    }
}

/// A contact and the phone numbers saved for it
#[derive(Debug, Clone)]
pub struct Client {
    id: Option<i32>,
    first_name: String,
    last_name: String,
    email: String,
    phones: Vec<Phone>,
}

impl Client {
    /// A new, unsaved client
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phones: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    fn require_id(&self, operation: &'static str) -> Result<i32> {
        self.id.ok_or(ContactError::State(operation))
    }

    /// Insert the client and take the identity the store assigns
    pub async fn save(&mut self, db: &mut Database) -> Result<i32> {
        let (id,): (i32,) = db
            .fetch_one(
                r#"
                INSERT INTO clients (first_name, last_name, email)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
                &[
                    SqlParam::Text(&self.first_name),
                    SqlParam::Text(&self.last_name),
                    SqlParam::Text(&self.email),
                ],
            )
            .await?
            .ok_or(ContactError::Query(sqlx::Error::RowNotFound))?;

        self.id = Some(id);
        info!(client_id = id, "client saved");

        Ok(id)
    }

    /// Persist a phone number for this client and track it locally
    pub async fn add_phone(&mut self, db: &mut Database, number: impl Into<String>) -> Result<()> {
        let id = self.require_id("add a phone")?;

        let phone = Phone::new(id, number);
        phone.save(db).await?;
        self.phones.push(phone);

        Ok(())
    }

    /// Delete a phone number of this client
    ///
    /// Returns true if the number was tracked locally. Deleting a number that is not
    /// stored is not an error.
    pub async fn remove_phone(&mut self, db: &mut Database, number: &str) -> Result<bool> {
        let id = self.require_id("remove a phone")?;

        Phone::new(id, number).delete(db).await?;

        let before = self.phones.len();
        self.phones.retain(|p| p.number != number);

        Ok(self.phones.len() != before)
    }

    /// Overwrite the given fields and write all three back to the store
    ///
    /// Local fields change only once the store accepted the write, so a rejected email
    /// leaves the client as it was.
    pub async fn update(&mut self, db: &mut Database, changes: ClientUpdate) -> Result<()> {
        let id = self.require_id("update")?;

        let first_name = changes.first_name.unwrap_or_else(|| self.first_name.clone());
        let last_name = changes.last_name.unwrap_or_else(|| self.last_name.clone());
        let email = changes.email.unwrap_or_else(|| self.email.clone());

        db.execute(
            r#"
            UPDATE clients
            SET first_name = $1, last_name = $2, email = $3
            WHERE id = $4
            "#,
            &[
                SqlParam::Text(&first_name),
                SqlParam::Text(&last_name),
                SqlParam::Text(&email),
                SqlParam::Int(id),
            ],
        )
        .await?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.email = email;
        debug!(client_id = id, "client updated");

        Ok(())
    }

    /// Delete the client row, then each tracked phone row
    ///
    /// The phone rows are normally gone already through the cascade; their deletes
    /// then match nothing. The identity is kept so `find_by_id` can confirm removal.
    pub async fn delete(&mut self, db: &mut Database) -> Result<()> {
        let id = self.require_id("delete")?;

        db.execute("DELETE FROM clients WHERE id = $1", &[SqlParam::Int(id)])
            .await?;
        for phone in &self.phones {
            phone.delete(db).await?;
        }
        self.phones.clear();
        info!(client_id = id, "client deleted");

        Ok(())
    }

    /// The stored row for this client, if it exists. An unsaved client has none.
    pub async fn find_by_id(&self, db: &mut Database) -> Result<Option<ClientRecord>> {
        let Some(id) = self.id else {
            return Ok(None);
        };

        Self::fetch(db, id).await
    }

    /// The stored row for an identity
    pub async fn fetch(db: &mut Database, id: i32) -> Result<Option<ClientRecord>> {
        db.fetch_one(
            "SELECT id, first_name, last_name, email FROM clients WHERE id = $1",
            &[SqlParam::Int(id)],
        )
        .await
    }

    /// Rebuild a saved client, phones included
    ///
    /// NULL columns load as empty strings.
    pub async fn load(db: &mut Database, id: i32) -> Result<Option<Client>> {
        let Some(record) = Self::fetch(db, id).await? else {
            return Ok(None);
        };
        let phones = Phone::find_by_client(db, id).await?;

        Ok(Some(Client {
            id: Some(record.id),
            first_name: record.first_name.unwrap_or_default(),
            last_name: record.last_name.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            phones,
        }))
    }

    /// Clients matching one field exactly, ordered by identity
    pub async fn find_by(db: &mut Database, lookup: &ClientLookup) -> Result<Vec<ClientRecord>> {
        db.fetch_all(lookup.sql(), &[SqlParam::Text(lookup.value())])
            .await
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client({}, {}, {})", self.first_name, self.last_name, self.email)
    }
}

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} <{}>",
            self.id,
            self.first_name.as_deref().unwrap_or("-"),
            self.last_name.as_deref().unwrap_or("-"),
            self.email.as_deref().unwrap_or("-")
        )
    }
}
