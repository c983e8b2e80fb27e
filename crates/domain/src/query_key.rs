/// Normalized lookup key into both the zone table and the response cache.
///
/// The name is a lowercase fully-qualified domain (trailing dot); class and
/// type are the raw 16-bit wire codes so arbitrary record types can be keyed
/// without a lossy enum mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub name: String,
    pub class: u16,
    pub rtype: u16,
}

impl QueryKey {
    pub fn new(name: impl Into<String>, class: u16, rtype: u16) -> Self {
        let mut name = name.into();
        name.make_ascii_lowercase();
        if !name.ends_with('.') {
            name.push('.');
        }
        Self { name, class, rtype }
    }

    /// Canonical question string used as the byte-cache key.
    pub fn cache_key(&self) -> String {
        format!(";{}\t{}\t{}", self.name, self.class, self.rtype)
    }
}
