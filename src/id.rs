use uuid::Uuid;

/// Fresh random identifier for a newly created task.
pub fn generate_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
