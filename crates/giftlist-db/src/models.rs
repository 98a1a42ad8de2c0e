/// Database row types: these map directly to SQLite rows.
/// Distinct from giftlist-types models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct GiftRow {
    pub id: i64,
    pub nome: String,
    pub presente: String,
    pub link: String,
    pub created_at: String,
}
