// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod collection;
pub mod validation;

use anyhow::{Context, Result, anyhow, bail};
use rolodex_app::{Person, PersonId, PersonRow};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use tracing::{debug, info};

pub use collection::DbCollection;
pub use validation::{ValidationError, validate_person};

pub const APP_NAME: &str = "rolodex";

/// Seed rows for a fresh or reset directory: user name, first name, last name, age.
pub const DEMO_PEOPLE: [(&str, &str, &str, i64); 12] = [
    ("russellwhyte", "Russell", "Whyte", 34),
    ("scottketchum", "Scott", "Ketchum", 29),
    ("ronaldmundy", "Ronald", "Mundy", 51),
    ("javieralfred", "Javier", "Alfred", 38),
    ("willieashmore", "Willie", "Ashmore", 45),
    ("vincentcalabrese", "Vincent", "Calabrese", 62),
    ("clydeguess", "Clyde", "Guess", 27),
    ("keithpinckney", "Keith", "Pinckney", 33),
    ("marshallgaray", "Marshall", "Garay", 41),
    ("elainestewart", "Elaine", "Stewart", 36),
    ("salliesampson", "Sallie", "Sampson", 24),
    ("ursulabright", "Ursula", "Bright", 57),
];

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[(
    "people",
    &[
        "id",
        "user_name",
        "first_name",
        "last_name",
        "age",
        "created_at",
        "updated_at",
    ],
)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[
    RequiredIndex {
        name: "idx_people_user_name",
        create_sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_people_user_name ON people (user_name);",
    },
    RequiredIndex {
        name: "idx_people_last_name",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_people_last_name ON people (last_name);",
    },
];

/// One staged change inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonChange {
    Create(Person),
    Update(PersonId, Person),
    Delete(PersonId),
}

/// Result of [`Store::apply_batch`]. A rejected batch leaves the table untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Ids assigned to the `Create` changes, in batch order.
    Committed { created: Vec<PersonId> },
    Rejected(Vec<ValidationError>),
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }

        ensure_required_indexes(&self.conn)?;
        Ok(())
    }

    /// Inserts the demo directory when the table is empty.
    pub fn seed_demo(&self) -> Result<usize> {
        if self.person_count()? > 0 {
            return Ok(0);
        }
        for (user_name, first_name, last_name, age) in DEMO_PEOPLE {
            self.insert_person(&Person {
                user_name: user_name.to_owned(),
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                age,
            })?;
        }
        Ok(DEMO_PEOPLE.len())
    }

    /// Drops every row and reseeds the demo directory in one transaction.
    pub fn reset_demo(&mut self) -> Result<()> {
        let tx = self.conn.transaction().context("begin reset")?;
        tx.execute("DELETE FROM people", [])
            .context("clear people")?;
        let now = now_rfc3339()?;
        for (user_name, first_name, last_name, age) in DEMO_PEOPLE {
            tx.execute(
                "
                INSERT INTO people (user_name, first_name, last_name, age, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
                params![user_name, first_name, last_name, age, now, now],
            )
            .with_context(|| format!("reseed {user_name}"))?;
        }
        tx.commit().context("commit reset")?;
        info!(rows = DEMO_PEOPLE.len(), "demo directory restored");
        Ok(())
    }

    pub fn person_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))
            .context("count people")
    }

    pub fn list_people(&self) -> Result<Vec<PersonRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT id, user_name, first_name, last_name, age, updated_at
                FROM people
                ORDER BY id ASC
                ",
            )
            .context("prepare people query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Person {
                        user_name: row.get(1)?,
                        first_name: row.get(2)?,
                        last_name: row.get(3)?,
                        age: row.get(4)?,
                    },
                    row.get::<_, String>(5)?,
                ))
            })
            .context("query people")?;

        let mut people = Vec::new();
        for row in rows {
            let (id, person, updated_at) = row.context("decode person row")?;
            people.push(PersonRow {
                id: PersonId::new(id),
                person,
                updated_at: parse_datetime(&updated_at)?,
            });
        }
        Ok(people)
    }

    pub fn get_person(&self, person_id: PersonId) -> Result<Option<PersonRow>> {
        let row = self
            .conn
            .query_row(
                "
                SELECT user_name, first_name, last_name, age, updated_at
                FROM people
                WHERE id = ?
                ",
                params![person_id.get()],
                |row| {
                    Ok((
                        Person {
                            user_name: row.get(0)?,
                            first_name: row.get(1)?,
                            last_name: row.get(2)?,
                            age: row.get(3)?,
                        },
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .with_context(|| format!("load person {}", person_id.get()))?;

        row.map(|(person, updated_at)| {
            Ok(PersonRow {
                id: person_id,
                person,
                updated_at: parse_datetime(&updated_at)?,
            })
        })
        .transpose()
    }

    /// Direct insert outside of any batch; validation still applies.
    pub fn insert_person(&self, person: &Person) -> Result<PersonId> {
        if let Some(error) = validate_person(person).into_iter().next() {
            bail!("invalid person: {error}");
        }
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO people (user_name, first_name, last_name, age, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
                params![
                    person.user_name,
                    person.first_name,
                    person.last_name,
                    person.age,
                    now,
                    now
                ],
            )
            .with_context(|| format!("insert person {}", person.user_name))?;
        Ok(PersonId::new(self.conn.last_insert_rowid()))
    }

    /// Removes a row as another client would; staged collections see it on refresh.
    pub fn delete_person(&self, person_id: PersonId) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM people WHERE id = ?", params![person_id.get()])
            .context("delete person")?;
        if rows_affected == 0 {
            bail!("person {} not found", person_id.get());
        }
        Ok(())
    }

    /// Applies every change in one transaction. Deletes run first so a batch may reuse
    /// a user name it frees.
    pub fn apply_batch(&mut self, changes: &[PersonChange]) -> Result<BatchOutcome> {
        let tx = self.conn.transaction().context("begin batch")?;
        let now = now_rfc3339()?;
        let mut rejected = Vec::new();
        let mut created = Vec::new();

        for change in changes {
            if let PersonChange::Delete(person_id) = change {
                let rows_affected = tx
                    .execute("DELETE FROM people WHERE id = ?", params![person_id.get()])
                    .context("delete person")?;
                if rows_affected == 0 {
                    bail!(
                        "person {} no longer exists -- refresh and retry",
                        person_id.get()
                    );
                }
            }
        }

        for change in changes {
            match change {
                PersonChange::Delete(_) => {}
                PersonChange::Update(person_id, person) => {
                    let errors = check_person(&tx, person, Some(*person_id))?;
                    if !errors.is_empty() {
                        rejected.extend(errors);
                        continue;
                    }
                    let rows_affected = tx
                        .execute(
                            "
                            UPDATE people
                            SET user_name = ?, first_name = ?, last_name = ?, age = ?, updated_at = ?
                            WHERE id = ?
                            ",
                            params![
                                person.user_name,
                                person.first_name,
                                person.last_name,
                                person.age,
                                now,
                                person_id.get()
                            ],
                        )
                        .context("update person")?;
                    if rows_affected == 0 {
                        bail!(
                            "person {} no longer exists -- refresh and retry",
                            person_id.get()
                        );
                    }
                }
                PersonChange::Create(person) => {
                    let errors = check_person(&tx, person, None)?;
                    if !errors.is_empty() {
                        rejected.extend(errors);
                        continue;
                    }
                    tx.execute(
                        "
                        INSERT INTO people (user_name, first_name, last_name, age, created_at, updated_at)
                        VALUES (?, ?, ?, ?, ?, ?)
                        ",
                        params![
                            person.user_name,
                            person.first_name,
                            person.last_name,
                            person.age,
                            now,
                            now
                        ],
                    )
                    .context("insert person")?;
                    created.push(PersonId::new(tx.last_insert_rowid()));
                }
            }
        }

        if !rejected.is_empty() {
            debug!(errors = rejected.len(), "batch rejected, rolling back");
            return Ok(BatchOutcome::Rejected(rejected));
        }
        tx.commit().context("commit batch")?;
        Ok(BatchOutcome::Committed { created })
    }
}

fn check_person(
    tx: &Transaction<'_>,
    person: &Person,
    existing: Option<PersonId>,
) -> Result<Vec<ValidationError>> {
    let mut errors = validate_person(person);
    if person.user_name.trim().is_empty() {
        return Ok(errors);
    }
    let taken = tx
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1 FROM people WHERE user_name = ? AND id IS NOT ?
            )
            ",
            params![person.user_name, existing.map(PersonId::get)],
            |row| row.get::<_, i64>(0),
        )
        .context("check user name uniqueness")?;
    if taken == 1 {
        errors.push(ValidationError::DuplicateUserName(person.user_name.clone()));
    }
    Ok(errors)
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("ROLODEX_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set ROLODEX_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("rolodex.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; point ROLODEX_DB_PATH at a rolodex database"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; recreate the database",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }

    let existing_indexes = index_names(conn)?;
    let missing = REQUIRED_INDEXES
        .iter()
        .filter(|index| !existing_indexes.contains(index.name))
        .map(|index| index.name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!(
            "database is missing required indexes: {}; recreate the database",
            missing.join(", ")
        );
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn index_names(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(
            "
            SELECT name
            FROM sqlite_master
            WHERE type = 'index'
              AND name NOT LIKE 'sqlite_%'
            ",
        )
        .context("prepare index names query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query index names")?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .context("collect index names")
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

fn parse_datetime(raw: &str) -> Result<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(value);
    }

    OffsetDateTime::parse(
        raw,
        &format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ),
    )
    .with_context(|| format!("parse timestamp {raw:?}"))
}
