use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Board column for a todo. Stored as the `todo_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "todo_status", rename_all = "lowercase")]
pub enum Status {
    Todo,
    Inprogress,
    Done,
}

impl Status {
    /// The single source of the `completed == (status == done)` invariant;
    /// every write path derives `completed` through here.
    pub fn completed(self) -> bool {
        matches!(self, Status::Done)
    }

    /// Where a toggle lands: to `done` when not yet completed, back to
    /// `todo` otherwise. Toggling off never yields `inprogress`.
    pub fn after_toggle(completed: bool) -> Status {
        if completed {
            Status::Todo
        } else {
            Status::Done
        }
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Status::Todo),
            "inprogress" => Ok(Status::Inprogress),
            "done" => Ok(Status::Done),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Todo => "todo",
            Status::Inprogress => "inprogress",
            Status::Done => "done",
        };
        f.write_str(s)
    }
}

/// Todo record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
    pub status: Status,
    pub year_bucket: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
