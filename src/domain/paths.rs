use chrono::NaiveDate;

/// Collection listing every known user.
pub const USERS_COLLECTION: &str = "users";

/// Root collection for forecast output.
pub const FORECAST_COLLECTION: &str = "ai-forecast";

/// `users/<uid>`
pub fn user_path(uid: &str) -> String {
    format!("{}/{}", USERS_COLLECTION, uid)
}

/// `users/<uid>/transactions`
pub fn transactions_collection(uid: &str) -> String {
    format!("{}/{}/transactions", USERS_COLLECTION, uid)
}

/// `ai-forecast/<uid>/daily/<YYYY-MM-DD>`
pub fn forecast_document_path(uid: &str, date: NaiveDate) -> String {
    format!(
        "{}/{}/daily/{}",
        FORECAST_COLLECTION,
        uid,
        date.format("%Y-%m-%d")
    )
}

/// Split a document path into its parent collection and document id.
/// Document paths have an even number of segments.
pub fn split_document_path(path: &str) -> Option<(&str, &str)> {
    let segments = path.split('/').count();
    if segments < 2 || segments % 2 != 0 || path.split('/').any(str::is_empty) {
        return None;
    }
    path.rsplit_once('/')
}
