// sql query gate - every user query goes through here before execution
// substring checks, not a parser. conservative on purpose.

/// Keywords that must never appear anywhere in a candidate query.
///
/// Matched as plain substrings of the lowercased query, so a column called
/// "dropdown" gets rejected too. That false positive is accepted: a forbidden
/// word hiding inside a string literal is still blocked, which is the
/// direction we want to fail in.
const FORBIDDEN_KEYWORDS: [&str; 9] = [
    "drop", "delete", "insert", "update", "alter", "create", "truncate", "exec", "execute",
];

/// Verdict of the query gate.
///
/// `Valid` carries the caller's text untouched - the gate never rewrites a
/// query, it only decides whether the store may see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid {
        query: String,
    },
    Invalid {
        reason: String,
        suggestion: String,
    },
}

impl Validation {
    /// Run the rule chain over a candidate query.
    ///
    /// Rules run in order and the first failure wins:
    /// 1. must start with `select` (after trim, case-insensitive)
    /// 2. must not contain any forbidden keyword
    /// 3. must contain `from`
    ///
    /// Pure function, no side effects, nothing is executed here.
    pub fn check(query: &str) -> Self {
        let lowered = query.trim().to_lowercase();

        if !lowered.starts_with("select") {
            return Self::Invalid {
                reason: "Only SELECT queries are allowed.".to_string(),
                suggestion: "Start your query with SELECT.".to_string(),
            };
        }

        for keyword in FORBIDDEN_KEYWORDS {
            if lowered.contains(keyword) {
                return Self::Invalid {
                    reason: format!("Query contains forbidden keyword: {keyword}"),
                    suggestion: format!(
                        "Remove '{keyword}' or rewrite the query as a plain SELECT."
                    ),
                };
            }
        }

        if !lowered.contains("from") {
            return Self::Invalid {
                reason: "Query must include FROM clause.".to_string(),
                suggestion: "Add a FROM clause naming the table to read.".to_string(),
            };
        }

        Self::Valid {
            query: query.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
