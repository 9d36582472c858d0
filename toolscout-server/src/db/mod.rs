//! Database module
//!
//! Contains entities, repositories, and pool setup.

pub mod event;
pub mod image;
pub mod tool;

pub use event::{CreateEvent, EventRepository, ToolEvent};
pub use image::{CatalogRow, ToolImage, ToolImageRepository};
pub use tool::{
    CategorySummary, CreateTool, LocationSummary, StatusSummary, Tool, ToolFilter, ToolListRow,
    ToolRepository, Totals, UpdateTool,
};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// All inventory repositories over one connection pool.
#[derive(Clone)]
pub struct InventoryStore {
    pub tools: ToolRepository,
    pub images: ToolImageRepository,
    pub events: EventRepository,
}

impl InventoryStore {
    /// Connect to the database and run pending migrations.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

        tracing::info!("Inventory store connected and migrations applied");

        Ok(Self::from_pool(pool))
    }

    /// Build the repositories from an existing pool (for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            tools: ToolRepository::new(pool.clone()),
            images: ToolImageRepository::new(pool.clone()),
            events: EventRepository::new(pool),
        }
    }
}
