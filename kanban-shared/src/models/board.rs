/// Board aggregation
///
/// A board is never stored. It is rebuilt on every read from a single
/// `columns LEFT JOIN tasks` query, whose flat rows are folded back into a
/// nested structure by [`BoardBuilder`].
///
/// # Row shape
///
/// ```text
/// column_id | column_name | task_id | task_description
/// ----------+-------------+---------+-----------------
///         1 | Todo        |       4 | write tests
///         1 | Todo        |       5 | fix bug
///         2 | Done        |    NULL | NULL             <- column without tasks
/// ```
///
/// # Ordering
///
/// Columns come out in ascending ID order. Tasks within a column come out in
/// ascending task ID order (the query's secondary sort key).
///
/// # Example
///
/// ```
/// use kanban_shared::models::board::{BoardBuilder, BoardRow};
///
/// let mut builder = BoardBuilder::new();
/// builder.push_row(BoardRow {
///     column_id: 1,
///     column_name: "Todo".to_string(),
///     task_id: None,
///     task_description: None,
/// });
///
/// let board = builder.finish();
/// assert_eq!(board.columns.len(), 1);
/// assert!(board.columns[0].tasks.is_empty());
/// ```

use std::collections::HashMap;

use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::task::Task;

const BOARD_QUERY: &str = r#"
    SELECT
        c.id AS column_id,
        c.name AS column_name,
        t.id AS task_id,
        t.description AS task_description
    FROM columns c
    LEFT JOIN tasks t ON t.column_id = c.id
    WHERE c.user_id = $1
    ORDER BY c.id, t.id
"#;

/// A user's board: ordered columns, each with its tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

/// A column as it appears inside a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    pub id: i32,
    pub name: String,
    pub tasks: Vec<Task>,
}

/// One row of the board join
///
/// Task fields are None when the column has no tasks.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BoardRow {
    pub column_id: i32,
    pub column_name: String,
    pub task_id: Option<i32>,
    pub task_description: Option<String>,
}

/// Folds join rows into a [`Board`]
///
/// Keeps an explicit emission list plus an index from column ID to its slot
/// in that list, so output order is the order columns were first seen and
/// never depends on hash map iteration.
#[derive(Debug, Default)]
pub struct BoardBuilder {
    columns: Vec<BoardColumn>,
    slots: HashMap<i32, usize>,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one join row
    pub fn push_row(&mut self, row: BoardRow) {
        let slot = match self.slots.get(&row.column_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.columns.len();
                self.columns.push(BoardColumn {
                    id: row.column_id,
                    name: row.column_name,
                    tasks: Vec::new(),
                });
                self.slots.insert(row.column_id, slot);
                slot
            }
        };

        // NULL task fields mean an empty column, not an empty task.
        if let (Some(task_id), Some(description)) = (row.task_id, row.task_description) {
            self.columns[slot].tasks.push(Task {
                id: task_id,
                column_id: row.column_id,
                description,
            });
        }
    }

    pub fn finish(self) -> Board {
        Board {
            columns: self.columns,
        }
    }
}

impl Board {
    /// Loads the board of a user with a single join query
    ///
    /// Rows are streamed into a [`BoardBuilder`]. Any query or decode error
    /// aborts the whole read; a partial board is never returned.
    ///
    /// A user without columns gets an empty board, not an error.
    pub async fn find_by_user_id(pool: &PgPool, user_id: i32) -> Result<Self, sqlx::Error> {
        let mut rows = sqlx::query_as::<_, BoardRow>(BOARD_QUERY)
            .bind(user_id)
            .fetch(pool);

        let mut builder = BoardBuilder::new();
        while let Some(row) = rows.try_next().await? {
            builder.push_row(row);
        }

        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(column_id: i32, name: &str, task: Option<(i32, &str)>) -> BoardRow {
        BoardRow {
            column_id,
            column_name: name.to_string(),
            task_id: task.map(|(id, _)| id),
            task_description: task.map(|(_, d)| d.to_string()),
        }
    }

    fn build(rows: Vec<BoardRow>) -> Board {
        let mut builder = BoardBuilder::new();
        for r in rows {
            builder.push_row(r);
        }
        builder.finish()
    }

    #[test]
    fn test_no_rows_gives_empty_board() {
        let board = build(vec![]);
        assert!(board.columns.is_empty());
        assert_eq!(serde_json::to_value(&board).unwrap(), serde_json::json!({ "columns": [] }));
    }

    #[test]
    fn test_column_without_tasks_is_kept() {
        let board = build(vec![row(1, "Todo", None)]);

        assert_eq!(
            serde_json::to_value(&board).unwrap(),
            serde_json::json!({
                "columns": [{ "id": 1, "name": "Todo", "tasks": [] }]
            })
        );
    }

    #[test]
    fn test_tasks_stay_in_their_own_column() {
        let board = build(vec![
            row(1, "Todo", Some((10, "a"))),
            row(1, "Todo", Some((11, "b"))),
            row(2, "Done", Some((12, "c"))),
            row(2, "Done", Some((13, "d"))),
        ]);

        assert_eq!(board.columns.len(), 2);
        assert_eq!(board.columns[0].id, 1);
        assert_eq!(board.columns[1].id, 2);

        let first: Vec<i32> = board.columns[0].tasks.iter().map(|t| t.id).collect();
        let second: Vec<i32> = board.columns[1].tasks.iter().map(|t| t.id).collect();
        assert_eq!(first, vec![10, 11]);
        assert_eq!(second, vec![12, 13]);

        assert!(board.columns[0].tasks.iter().all(|t| t.column_id == 1));
        assert!(board.columns[1].tasks.iter().all(|t| t.column_id == 2));
    }

    #[test]
    fn test_first_seen_order_is_preserved() {
        // Rows arrive sorted by column id; the builder must not reorder them.
        let ids: Vec<i32> = (1..=50).collect();
        let rows = ids.iter().map(|&id| row(id, "c", None)).collect();

        let board = build(rows);
        let out: Vec<i32> = board.columns.iter().map(|c| c.id).collect();
        assert_eq!(out, ids);
    }

    #[test]
    fn test_mixed_empty_and_populated_columns() {
        let board = build(vec![
            row(1, "Todo", None),
            row(2, "Doing", Some((5, "x"))),
            row(3, "Done", None),
        ]);

        assert_eq!(board.columns.len(), 3);
        assert!(board.columns[0].tasks.is_empty());
        assert_eq!(board.columns[1].tasks.len(), 1);
        assert_eq!(board.columns[1].tasks[0].description, "x");
        assert!(board.columns[2].tasks.is_empty());
    }
}
