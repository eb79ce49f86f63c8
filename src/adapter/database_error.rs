use crate::domain::port::RepositoryError;

/// データベースエラー型
/// MySQLアダプター内部の失敗を分類し、ポートのエラー型へ変換する
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseError {
    /// データベース接続エラー（プール取得・トランザクション開始を含む）
    ConnectionError(String),
    /// SQLクエリエラー
    QueryError(String),
    /// マイグレーションエラー
    MigrationError(String),
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::ConnectionError(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::QueryError(msg) => write!(f, "Database query error: {}", msg),
            DatabaseError::MigrationError(msg) => write!(f, "Migration error: {}", msg),
        }
    }
}

impl std::error::Error for DatabaseError {}

/// リポジトリ実装はDatabaseErrorを内部で使い、ポート境界では
/// RepositoryErrorとして返す。楽観的同時実行制御の競合
/// （RepositoryError::Conflict）はこの変換を通らず、
/// 各リポジトリが明示的に生成する
impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConnectionError(msg) => RepositoryError::ConnectionFailed(msg),
            DatabaseError::QueryError(msg) | DatabaseError::MigrationError(msg) => {
                RepositoryError::OperationFailed(msg)
            }
        }
    }
}
