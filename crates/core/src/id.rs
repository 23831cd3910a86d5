use uuid::Uuid;

/// Returns a new account identifier.
///
/// Identifiers are UUID v7, so they are globally unique and roughly
/// ordered by creation time. Generation has no failure path.
pub fn generate() -> Uuid {
    Uuid::now_v7()
}

/// Parses an identifier back from its string form.
pub fn parse(value: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(value)
}
