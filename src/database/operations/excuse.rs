use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::database::models::excuse::ExcuseEntity;

/// 启动时保证存在的示例数据
pub const SEED_EXCUSES: [(&str, &str); 3] = [
    ("My cat ate my homework", "school"),
    ("My dog broke my phone", "party"),
    ("My bird hid my keys", "dinner"),
];

/// 借口存储，持有整个进程共享的连接池
#[derive(Clone, Debug)]
pub struct ExcuseStore {
    pool: SqlitePool,
}

impl ExcuseStore {
    /// 打开数据库（文件不存在时创建），并初始化表结构和示例数据
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init().await?;
        store.seed().await?;

        info!("Excuse store ready at {}", database_url);
        Ok(store)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        // 长度约束由数据库负责，越界写入直接失败
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS excuses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                excuse_text TEXT NOT NULL CHECK (LENGTH(excuse_text) BETWEEN 1 AND 200),
                category TEXT CHECK (LENGTH(category) <= 50),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_text ON excuses(excuse_text)")
            .execute(&self.pool)
            .await?;

        debug!("excuses table and index initialized");
        Ok(())
    }

    // 按 文本+分类 去重，重复启动不会产生重复行
    async fn seed(&self) -> Result<(), sqlx::Error> {
        for (text, category) in SEED_EXCUSES {
            let result = sqlx::query(
                r#"
                INSERT INTO excuses (excuse_text, category)
                SELECT ?1, ?2
                WHERE NOT EXISTS (
                    SELECT 1 FROM excuses WHERE excuse_text = ?1 AND category IS ?2
                )
                "#,
            )
            .bind(text)
            .bind(category)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() > 0 {
                debug!("Seeded excuse: {}", text);
            }
        }
        Ok(())
    }

    /// 插入一条借口，返回新行 ID
    pub async fn insert(&self, text: &str, category: Option<&str>) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO excuses (excuse_text, category) VALUES (?1, ?2)")
            .bind(text)
            .bind(category)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// 查找包含 pattern 的借口文本，按插入顺序分页
    pub async fn search_by_text(
        &self,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT excuse_text FROM excuses
            WHERE excuse_text LIKE ?1
            ORDER BY id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(format!("%{}%", pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ExcuseEntity>, sqlx::Error> {
        sqlx::query_as::<_, ExcuseEntity>(
            "SELECT id, excuse_text, category, created_at FROM excuses WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM excuses")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
