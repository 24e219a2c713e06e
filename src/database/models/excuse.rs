use sqlx::FromRow;

/// 借口数据库实体
#[derive(Debug, Clone, FromRow)]
pub struct ExcuseEntity {
    pub id: i64,
    pub excuse_text: String,
    pub category: Option<String>,
    /// 插入时由数据库写入，之后不再修改
    pub created_at: chrono::NaiveDateTime,
}
