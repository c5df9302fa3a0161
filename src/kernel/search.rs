//! Workspace search: a linear scan over every file in the tree.
//!
//! Open documents are read through their cached content; closed files are
//! read from the tree. Nothing is indexed or persisted.

use memchr::memmem::Finder;

use crate::kernel::documents::OpenDocumentSet;
use crate::kernel::error::{Result, WorkspaceError};
use crate::models::{FileTree, NodeId};

pub const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub use_regex: bool,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            use_regex: false,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// `line == 0` marks a file-name match; content matches are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: NodeId,
    pub name: String,
    pub path: String,
    pub line: usize,
    pub text: String,
}

impl SearchHit {
    pub fn is_name_match(&self) -> bool {
        self.line == 0
    }
}

enum Matcher {
    Literal {
        finder: Finder<'static>,
        case_sensitive: bool,
    },
    Regex(regex::Regex),
}

impl Matcher {
    fn new(query: &str, options: &SearchOptions) -> Result<Self> {
        if options.use_regex {
            let regex = regex::RegexBuilder::new(query)
                .case_insensitive(!options.case_sensitive)
                .build()
                .map_err(|e| WorkspaceError::InvalidQuery(e.to_string()))?;
            return Ok(Matcher::Regex(regex));
        }

        let needle = if options.case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Ok(Matcher::Literal {
            finder: Finder::new(needle.as_bytes()).into_owned(),
            case_sensitive: options.case_sensitive,
        })
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::Literal {
                finder,
                case_sensitive: true,
            } => finder.find(haystack.as_bytes()).is_some(),
            Matcher::Literal { finder, .. } => {
                finder.find(haystack.to_lowercase().as_bytes()).is_some()
            }
            Matcher::Regex(regex) => regex.is_match(haystack),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub options: SearchOptions,
    pub hits: Vec<SearchHit>,
    pub last_error: Option<String>,
}

impl SearchState {
    pub fn clear(&mut self) -> bool {
        let changed = !self.query.is_empty() || !self.hits.is_empty() || self.last_error.is_some();
        self.query.clear();
        self.hits.clear();
        self.last_error = None;
        changed
    }
}

/// Blank queries yield no hits.
pub fn search(
    tree: &FileTree,
    documents: &OpenDocumentSet,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchHit>> {
    if query.trim().is_empty() || options.max_results == 0 {
        return Ok(Vec::new());
    }
    let matcher = Matcher::new(query, options)?;
    let mut hits = Vec::new();

    for node in tree.files() {
        let content = documents
            .get(node.id())
            .map(|doc| doc.content.as_str())
            .or_else(|| node.content())
            .unwrap_or_default();

        if matcher.is_match(node.name()) {
            hits.push(SearchHit {
                id: node.id(),
                name: node.name().to_string(),
                path: node.path().to_string(),
                line: 0,
                text: String::new(),
            });
        }

        for (idx, line) in content.lines().enumerate() {
            if hits.len() >= options.max_results {
                break;
            }
            if matcher.is_match(line) {
                hits.push(SearchHit {
                    id: node.id(),
                    name: node.name().to_string(),
                    path: node.path().to_string(),
                    line: idx + 1,
                    text: line.trim().to_string(),
                });
            }
        }

        if hits.len() >= options.max_results {
            hits.truncate(options.max_results);
            break;
        }
    }

    Ok(hits)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
