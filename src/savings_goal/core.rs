//! Defines the core data model and database queries for savings goals.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::GoalId, user::UserId};

/// A savings target a user is working towards, e.g. an emergency fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// The ID of the savings goal.
    pub id: GoalId,
    /// What the user is saving for.
    pub name: String,
    /// The amount the user wants to reach. Always greater than zero.
    pub target_amount: f64,
    /// Optional detail about the goal.
    pub description: Option<String>,
    /// The date the user wants to reach the goal by, if any.
    pub deadline: Option<Date>,
    /// How much has been put aside so far.
    pub progress: f64,
    /// The user that owns this goal.
    pub user_id: UserId,
}

impl SavingsGoal {
    /// How far along the goal is, as a percentage capped at 100 for display.
    pub fn progress_percent(&self) -> f64 {
        (self.progress / self.target_amount * 100.0).min(100.0)
    }
}

/// The user-editable fields of a savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalFields {
    pub name: String,
    pub target_amount: f64,
    pub description: Option<String>,
    pub deadline: Option<Date>,
    pub progress: f64,
}

impl GoalFields {
    /// Check the invariants on goal fields: a non-empty name and a positive
    /// target amount.
    ///
    /// # Errors
    /// Returns an [Error::EmptyGoalName] or [Error::InvalidGoalTarget].
    fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyGoalName);
        }

        if !(self.target_amount > 0.0) {
            return Err(Error::InvalidGoalTarget);
        }

        Ok(())
    }
}

/// Create a new savings goal owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyGoalName] if the name is empty,
/// - [Error::InvalidGoalTarget] if the target amount is not positive,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_savings_goal(
    fields: GoalFields,
    user_id: UserId,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    fields.validate()?;

    let goal = connection
        .prepare(
            "INSERT INTO savings_goal (name, target_amount, description, deadline, progress, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, name, target_amount, description, deadline, progress, user_id",
        )?
        .query_row(
            (
                fields.name.trim(),
                fields.target_amount,
                fields.description,
                fields.deadline,
                fields.progress,
                user_id.as_i64(),
            ),
            map_goal_row,
        )?;

    Ok(goal)
}

/// Retrieve a savings goal owned by `user_id` by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a goal owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_savings_goal(
    id: GoalId,
    user_id: UserId,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let goal = connection
        .prepare(
            "SELECT id, name, target_amount, description, deadline, progress, user_id
             FROM savings_goal WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(&[(":id", &id), (":user_id", &user_id.as_i64())], map_goal_row)?;

    Ok(goal)
}

/// Retrieve all savings goals owned by `user_id` in creation order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_savings_goals_for_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(
            "SELECT id, name, target_amount, description, deadline, progress, user_id
             FROM savings_goal WHERE user_id = :user_id ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(Error::SqlError))
        .collect()
}

/// Overwrite the fields of the goal `id` if it is owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyGoalName] if the new name is empty,
/// - [Error::InvalidGoalTarget] if the new target amount is not positive,
/// - [Error::UpdateMissingGoal] if `id` does not refer to a goal owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_savings_goal(
    id: GoalId,
    fields: GoalFields,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    fields.validate()?;

    let rows_affected = connection.execute(
        "UPDATE savings_goal
         SET name = ?1, target_amount = ?2, description = ?3, deadline = ?4, progress = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            fields.name.trim(),
            fields.target_amount,
            fields.description,
            fields.deadline,
            fields.progress,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Delete the goal `id` if it is owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingGoal] if `id` does not refer to a goal owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_savings_goal(
    id: GoalId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings_goal WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

/// Create the savings goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings_goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL,
                description TEXT,
                deadline TEXT,
                progress REAL NOT NULL DEFAULT 0,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: row.get(2)?,
        description: row.get(3)?,
        deadline: row.get(4)?,
        progress: row.get(5)?,
        user_id: UserId::new(row.get(6)?),
    })
}
