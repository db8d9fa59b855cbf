use crate::store::EntryList;

/// Alias table, `name=value` entries in definition order.
#[derive(Debug, Clone, Default)]
pub struct Aliases {
    entries: EntryList,
}

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.value_of(name)
    }

    /// Define or redefine an alias. A redefined alias keeps its position.
    pub fn set(&mut self, name: &str, value: &str) {
        let text = format!("{name}={value}");
        match self.entries.position_of_key(name) {
            Some(index) => {
                self.entries.replace(index, text);
            }
            None => self.entries.push(text, 0),
        }
    }

    pub fn unset(&mut self, name: &str) -> bool {
        match self.entries.position_of_key(name) {
            Some(index) => self.entries.remove(index).is_some(),
            None => false,
        }
    }

    /// `(name, value)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.text.split_once('='))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render an alias the way `alias` prints it: `name='value'`.
pub fn format_alias(name: &str, value: &str) -> String {
    format!("{name}='{value}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_and_overwrite() {
        let mut a = Aliases::new();
        a.set("ll", "ls -la");
        a.set("g", "git");
        a.set("ll", "ls -l");
        assert_eq!(a.get("ll"), Some("ls -l"));
        let names: Vec<&str> = a.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["ll", "g"]);
    }

    #[test]
    fn lookup_is_exact() {
        let mut a = Aliases::new();
        a.set("lll", "x");
        assert_eq!(a.get("ll"), None);
    }

    #[test]
    fn unset_removes() {
        let mut a = Aliases::new();
        a.set("x", "y");
        assert!(a.unset("x"));
        assert!(a.is_empty());
        assert!(!a.unset("x"));
    }

    #[test]
    fn format_quotes_value() {
        assert_eq!(format_alias("ll", "ls -la"), "ll='ls -la'");
    }
}
