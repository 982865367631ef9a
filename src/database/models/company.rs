use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `company` table.
///
/// Business attributes are nullable: `None` (JSON `null`, SQL `NULL`) is a
/// distinct state from the empty string. `id` is assigned by the database and is
/// never read from a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Company {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub name: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl Company {
    /// Same attributes, different identity
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}
