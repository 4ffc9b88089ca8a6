//! String greeting examples.

/// `"Hello, "` followed by `name`. An empty name is fine.
pub fn greet(name: &str) -> String {
    format!("Hello, {name}")
}

/// [`greet`] with `punctuation` appended.
pub fn decorated(name: &str, punctuation: &str) -> String {
    format!("{}{punctuation}", greet(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greet_prefixes_hello() {
        assert_eq!(greet("World"), "Hello, World");
    }

    #[test]
    fn greet_accepts_the_empty_name() {
        assert_eq!(greet(""), "Hello, ");
    }

    #[test]
    fn decorated_appends_punctuation() {
        assert_eq!(decorated("World", "!"), "Hello, World!");
        assert_eq!(decorated("", ""), "Hello, ");
    }
}
