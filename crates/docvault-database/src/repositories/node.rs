//! PostgreSQL node repository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::NodeId;
use docvault_entity::node::{CreateNode, FlagCategory, KindFilter, Node, NodePatch, NodeRecord};

use super::NodeRepository;

/// Node repository over the `nodes` table.
#[derive(Debug, Clone)]
pub struct PgNodeRepository {
    pool: PgPool,
}

impl PgNodeRepository {
    /// Create a new node repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NodeRepository for PgNodeRepository {
    async fn list_by_parent(&self, parent: Option<NodeId>, kind: KindFilter) -> AppResult<Vec<Node>> {
        let rows = sqlx::query_as::<_, NodeRecord>(
            "SELECT * FROM nodes \
             WHERE parent_folder_id IS NOT DISTINCT FROM $1 \
               AND ($2::boolean IS NULL OR is_folder = $2) \
             ORDER BY is_folder DESC, LOWER(name) ASC, name ASC",
        )
        .bind(parent.map(NodeId::into_uuid))
        .bind(kind.is_folder())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))?;

        Ok(rows.into_iter().map(Node::from).collect())
    }

    async fn list_all_folders(&self) -> AppResult<Vec<Node>> {
        let rows = sqlx::query_as::<_, NodeRecord>(
            "SELECT * FROM nodes WHERE is_folder ORDER BY LOWER(name) ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))?;

        Ok(rows.into_iter().map(Node::from).collect())
    }

    async fn find_by_id(&self, id: NodeId) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, NodeRecord>("SELECT * FROM nodes WHERE id = $1")
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Node::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))
    }

    async fn find_ancestors(&self, id: NodeId) -> AppResult<Vec<Node>> {
        // `lvl` bounds the walk so a corrupted parent chain cannot recurse forever.
        let rows = sqlx::query_as::<_, NodeRecord>(
            "WITH RECURSIVE chain AS ( \
                SELECT n.*, 0 AS lvl FROM nodes n WHERE n.id = $1 \
                UNION ALL \
                SELECT p.*, c.lvl + 1 FROM nodes p \
                INNER JOIN chain c ON p.id = c.parent_folder_id \
                WHERE c.lvl < 1024 \
             ) SELECT * FROM chain ORDER BY lvl DESC",
        )
        .bind(id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))?;

        Ok(rows.into_iter().map(Node::from).collect())
    }

    async fn insert(&self, data: &CreateNode) -> AppResult<Node> {
        sqlx::query_as::<_, NodeRecord>(
            "INSERT INTO nodes \
                (id, name, file_path, file_size, mime_type, is_folder, parent_folder_id, storage_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $3) RETURNING *",
        )
        .bind(data.id.into_uuid())
        .bind(&data.name)
        .bind(&data.storage_key)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .bind(data.is_folder)
        .bind(data.parent_id.map(NodeId::into_uuid))
        .fetch_one(&self.pool)
        .await
        .map(Node::from)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert node", e))
    }

    async fn update(&self, id: NodeId, patch: &NodePatch) -> AppResult<Node> {
        let (reparent, new_parent) = match patch.parent_id {
            Some(parent) => (true, parent.map(NodeId::into_uuid)),
            None => (false, None),
        };

        sqlx::query_as::<_, NodeRecord>(
            "UPDATE nodes SET \
                name = COALESCE($2, name), \
                parent_folder_id = CASE WHEN $3 THEN $4 ELSE parent_folder_id END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id.into_uuid())
        .bind(patch.name.as_deref())
        .bind(reparent)
        .bind(new_parent)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update node", e))?
        .map(Node::from)
        .ok_or_else(|| AppError::not_found(format!("Node {id} not found")))
    }

    async fn delete(&self, ids: &[NodeId]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let result = sqlx::query("DELETE FROM nodes WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete nodes", e))?;

        debug!(requested = ids.len(), deleted = result.rows_affected(), "Deleted node rows");
        Ok(result.rows_affected())
    }

    async fn clear_flag(&self, flag: FlagCategory) -> AppResult<u64> {
        let column = flag.column();
        let result = sqlx::query(&format!("UPDATE nodes SET {column} = FALSE WHERE {column}"))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear flag", e))?;
        Ok(result.rows_affected())
    }

    async fn set_flag(&self, id: NodeId, flag: FlagCategory) -> AppResult<Node> {
        let column = flag.column();
        sqlx::query_as::<_, NodeRecord>(&format!(
            "UPDATE nodes SET {column} = TRUE WHERE id = $1 AND NOT is_folder RETURNING *"
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set flag", e))?
        .map(Node::from)
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn list_storage_keys(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT COALESCE(storage_path, file_path) FROM nodes \
             WHERE NOT is_folder AND COALESCE(storage_path, file_path) IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list storage keys", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
