use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneQuery {
    symbols: Vec<String>,
}

impl GeneQuery {
    pub fn parse(input: &str) -> Self {
        static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\s]+").unwrap());
        let symbols = SEPARATORS
            .split(input)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| token.to_uppercase())
            .collect();
        Self { symbols }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn joined(&self) -> String {
        self.symbols.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_mixed_separators() {
        let query = GeneQuery::parse("TP53, brca1\nMYC");
        assert_eq!(query.symbols(), ["TP53", "BRCA1", "MYC"]);
    }

    #[test]
    fn tokenize_drops_empty_tokens() {
        let query = GeneQuery::parse(" ,\n  TP53 ,, \n");
        assert_eq!(query.symbols(), ["TP53"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(GeneQuery::parse("  \n ,").is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let query = GeneQuery::parse("TP53 tp53");
        assert_eq!(query.symbols(), ["TP53", "TP53"]);
        assert_eq!(query.joined(), "TP53, TP53");
    }
}
