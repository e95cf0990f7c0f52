use crc32fast::Hasher;

/// Generate a stable document seed from a page name using CRC32.
pub fn get_page_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for entities within a document.
///
/// Ids look like `"{seed}-{n}"`. The counter can be fast-forwarded after
/// loading a persisted document so freshly generated ids never collide with
/// ids already in the tree.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(page_name: &str) -> Self {
        Self {
            seed: get_page_seed(page_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential id.
    pub fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past any `"{seed}-{n}"` ids already present.
    pub fn skip_past<'a>(&mut self, existing: impl Iterator<Item = &'a str>) {
        let prefix = format!("{}-", self.seed);
        for id in existing {
            if let Some(tail) = id.strip_prefix(&prefix) {
                if let Ok(n) = tail.parse::<u32>() {
                    self.count = self.count.max(n);
                }
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_seed_stability() {
        let a = get_page_seed("checkout");
        let b = get_page_seed("checkout");
        assert_eq!(a, b);

        let c = get_page_seed("upsell");
        assert_ne!(a, c);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdGenerator::new("checkout");

        let id1 = ids.next_id();
        let id2 = ids.next_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(ids.seed()));
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_skip_past_existing_ids() {
        let mut ids = IdGenerator::new("checkout");
        let seed = ids.seed().to_string();

        let existing = [
            format!("{seed}-4"),
            format!("{seed}-2"),
            "other-9".to_string(),
        ];
        ids.skip_past(existing.iter().map(|s| s.as_str()));

        assert!(ids.next_id().ends_with("-5"));
    }
}
