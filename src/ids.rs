//! Identifier generation for rows created by the application.
//!
//! IDs are a short entity prefix followed by a UUID v4 in upper-case hex,
//! e.g. `NA-3F2C9E0B7D5A4C1E8B6F0A2D4C6E8F10`. The table's primary key is
//! still the final guard: a collision fails the insert instead of
//! overwriting a row.

use uuid::Uuid;

/// Prefix for nutritional analysis IDs
pub const ANALYSIS_PREFIX: &str = "NA";
/// Prefix for transport vehicle IDs
pub const VEHICLE_PREFIX: &str = "TV";

#[derive(Clone, Debug, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate an ID with the given prefix
    pub fn generate(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4().simple().to_string().to_uppercase())
    }

    pub fn analysis_id(&self) -> String {
        self.generate(ANALYSIS_PREFIX)
    }

    pub fn vehicle_id(&self) -> String {
        self.generate(VEHICLE_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefix_and_shape() {
        let ids = IdGenerator::new();
        let id = ids.analysis_id();
        let suffix = id.strip_prefix("NA-").expect("prefix");
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

        assert!(ids.vehicle_id().starts_with("TV-"));
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let ids = IdGenerator::new();
        let generated: HashSet<String> = (0..1000).map(|_| ids.vehicle_id()).collect();
        assert_eq!(generated.len(), 1000);
    }
}
