//! Where-clause construction from user input
//!
//! Users type bare field names (`id = 1 and name like 'X'`); the catalog
//! needs them qualified with the entity alias. This is a whitespace
//! tokenizer, not a parser: it assumes a conjunction/disjunction of
//! `field op value` clauses and leaves everything else to the server.
//! String literals are not tokenized specially, so a literal containing
//! ` and ` will get its next word prefixed.

/// Alias every generated query binds the entity to
pub const ENTITY_ALIAS: &str = "e";

fn is_connective(token: &str) -> bool {
    token.eq_ignore_ascii_case("and") || token.eq_ignore_ascii_case("or")
}

/// Turn user input into a where fragment, including its leading space.
///
/// Blank input yields `" "` so the fragment can be spliced unconditionally.
pub fn query_where_from_input(raw: &str) -> String {
    let input = raw.trim();
    if input.is_empty() {
        return " ".to_string();
    }

    let mut expect_field = true;
    let mut tokens = Vec::new();

    for word in input.split_whitespace() {
        let split = word.find(|c: char| c != '(').unwrap_or(word.len());
        let (parens, rest) = word.split_at(split);

        if rest.is_empty() {
            tokens.push(parens.to_string());
            continue;
        }

        if expect_field {
            tokens.push(format!("{parens}{ENTITY_ALIAS}.{rest}"));
            expect_field = false;
        } else {
            tokens.push(word.to_string());
            expect_field = is_connective(rest);
        }
    }

    format!(" where {}", tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_conjunction() {
        assert_eq!(
            query_where_from_input("id = 1 and name like 'X'"),
            " where e.id = 1 and e.name like 'X'"
        );
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(query_where_from_input(""), " ");
        assert_eq!(query_where_from_input("   \t"), " ");
    }

    #[test]
    fn test_connectives_are_case_insensitive() {
        assert_eq!(
            query_where_from_input("name = 'a' OR name = 'b' And id > 3"),
            " where e.name = 'a' OR e.name = 'b' And e.id > 3"
        );
    }

    #[test]
    fn test_leading_parentheses_are_split_off() {
        assert_eq!(
            query_where_from_input("(id = 1 or id = 2) and ((name = 'x'))"),
            " where (e.id = 1 or e.id = 2) and ((e.name = 'x'))"
        );
        assert_eq!(
            query_where_from_input("( id = 1 )"),
            " where ( e.id = 1 )"
        );
    }

    #[test]
    fn test_dotted_paths() {
        assert_eq!(
            query_where_from_input("investigation.id = 42"),
            " where e.investigation.id = 42"
        );
    }

    #[test]
    fn test_whitespace_is_normalised() {
        assert_eq!(
            query_where_from_input("  id   =\t1  "),
            " where e.id = 1"
        );
    }

    #[test]
    fn test_string_literals_are_not_special() {
        // Known limitation: words after a quoted "and" are treated as fields
        assert_eq!(
            query_where_from_input("name = 'salt and pepper'"),
            " where e.name = 'salt and e.pepper'"
        );
    }
}
