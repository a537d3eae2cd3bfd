use std::fmt;

/// One planned call against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub person_ids: Vec<String>,
    /// When true, the ids travel together in a single query so the server
    /// returns items featuring all of them at once.
    pub match_all: bool,
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.match_all {
            write!(f, "all {} people together", self.person_ids.len())
        } else if let Some(id) = self.person_ids.first() {
            write!(f, "person {}", short_id(id))
        } else {
            write!(f, "nobody")
        }
    }
}

/// First block of a UUID is enough to identify it in a log line.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// Plan the searches for one cycle.
///
/// With two or more people the plan opens with one query naming everyone,
/// then adds one per person in input order; whatever the server makes of the
/// combined query, the per-person queries guarantee the union. A single
/// person needs only their individual query.
pub fn plan_queries(person_ids: &[String]) -> Vec<SearchQuery> {
    match person_ids.len() {
        0 => Vec::new(),
        1 => vec![SearchQuery {
            person_ids: person_ids.to_vec(),
            match_all: false,
        }],
        _ => {
            let mut queries = Vec::with_capacity(person_ids.len() + 1);
            queries.push(SearchQuery {
                person_ids: person_ids.to_vec(),
                match_all: true,
            });
            for id in person_ids {
                queries.push(SearchQuery {
                    person_ids: vec![id.clone()],
                    match_all: false,
                });
            }
            queries
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_people_no_queries() {
        assert!(plan_queries(&[]).is_empty());
    }

    #[test]
    fn test_single_person_single_query() {
        let queries = plan_queries(&ids(&["p1"]));
        assert_eq!(
            queries,
            vec![SearchQuery {
                person_ids: ids(&["p1"]),
                match_all: false,
            }]
        );
    }

    #[test]
    fn test_multiple_people_combined_then_individual() {
        let queries = plan_queries(&ids(&["p1", "p2", "p3"]));
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[0].person_ids, ids(&["p1", "p2", "p3"]));
        assert!(queries[0].match_all);
        for (query, id) in queries[1..].iter().zip(["p1", "p2", "p3"]) {
            assert_eq!(query.person_ids, vec![id.to_string()]);
            assert!(!query.match_all);
        }
    }

    #[test]
    fn test_display_labels() {
        let queries = plan_queries(&ids(&[
            "0df9efac-93a6-4cea-a8fd-9b9b9bba1653",
            "4c2d1fd1-0000-4444-8888-123456789abc",
        ]));
        assert_eq!(queries[0].to_string(), "all 2 people together");
        assert_eq!(queries[1].to_string(), "person 0df9efac");
    }
}
