//! # Dependency Chains
//!
//! A question may name at most one earlier question as its dependency. The
//! secret text of a dependent question is the parent's secret text followed
//! by the child's own answer, so proving question N requires knowing every
//! answer on its path to the root without ever revealing them.
//!
//! ## Structure
//!
//! - [`compose()`]: the composition rule itself.
//! - [`QuestionGraph`]: the dependency forest, keyed by each question's
//!   public commitment. Linking rejects self-dependencies and cycles.
//! - [`AnswerBook`]: the caller's known secret texts, one per question.
//!   Entries hold the full composite text, so resolving a child only needs
//!   its direct parent.
//! - [`resolve_secret_text()`]: graph + book + typed answer to secret text.
//!
//! ## Ordering
//!
//! A child can only be resolved after its parent's secret text has been
//! recorded. Callers proving a parent and child in one batch must record
//! the parent first.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::ChainError;
use crate::secret::Commitment;

/// Compose a dependent question's secret text.
///
/// Returns `parent + child`. A missing parent is an error, never an empty
/// prefix.
pub fn compose(parent_secret_text: Option<&str>, child_secret_text: &str) -> Result<String, ChainError> {
    let parent = parent_secret_text.ok_or(ChainError::MissingDependencyAnswer { dependency: None })?;

    let mut composite = String::with_capacity(parent.len() + child_secret_text.len());
    composite.push_str(parent);
    composite.push_str(child_secret_text);
    Ok(composite)
}

/// Dependency forest over questions, keyed by commitment.
#[derive(Debug, Clone, Default)]
pub struct QuestionGraph {
    parents: HashMap<Commitment, Option<Commitment>>,
}

impl QuestionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from externally stored edges without validating them.
    ///
    /// Use [`QuestionGraph::path_to_root`] (or [`resolve_secret_text`],
    /// which calls it) to detect cycles in untrusted edge sets.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Commitment, Option<Commitment>)>,
    {
        let mut parents = HashMap::new();
        for (question, dependency) in edges {
            if let Some(dep) = &dependency {
                parents.entry(dep.clone()).or_insert(None);
            }
            parents.insert(question, dependency);
        }
        Self { parents }
    }

    /// Register a question. Registering an existing question is a no-op.
    pub fn insert(&mut self, question: Commitment) {
        self.parents.entry(question).or_insert(None);
    }

    /// Make `question` depend on `dependency`.
    ///
    /// Both questions are registered if needed. Fails if the link would
    /// create a self-dependency or a cycle, or if `question` already
    /// depends on a different parent.
    pub fn link(&mut self, question: Commitment, dependency: Commitment) -> Result<(), ChainError> {
        if question == dependency {
            return Err(ChainError::SelfDependency(question));
        }

        if let Some(Some(existing)) = self.parents.get(&question) {
            if *existing == dependency {
                return Ok(());
            }
            return Err(ChainError::DependencyAlreadySet {
                question,
                existing: existing.clone(),
            });
        }

        // The new parent must not be a descendant of the question.
        self.insert(dependency.clone());
        if self.path_to_root(&dependency)?.contains(&question) {
            return Err(ChainError::DependencyCycle(question));
        }

        self.parents.insert(question, Some(dependency));
        Ok(())
    }

    /// Whether the question is registered.
    pub fn contains(&self, question: &Commitment) -> bool {
        self.parents.contains_key(question)
    }

    /// The direct dependency of a question, if any.
    pub fn dependency_of(&self, question: &Commitment) -> Result<Option<&Commitment>, ChainError> {
        self.parents
            .get(question)
            .map(Option::as_ref)
            .ok_or_else(|| ChainError::UnknownQuestion(question.clone()))
    }

    /// The chain from the root question down to `question`, inclusive.
    pub fn path_to_root(&self, question: &Commitment) -> Result<Vec<Commitment>, ChainError> {
        let mut path = vec![question.clone()];
        let mut seen: HashSet<&Commitment> = HashSet::from([question]);
        let mut current = question;

        while let Some(parent) = self.dependency_of(current)? {
            if !seen.insert(parent) {
                return Err(ChainError::DependencyCycle(parent.clone()));
            }
            path.push(parent.clone());
            current = parent;
        }

        path.reverse();
        Ok(path)
    }

    /// Number of registered questions.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether the graph has no questions.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Known secret texts, keyed by question commitment.
///
/// Holds plaintext answers: `Debug` prints only the entry count.
#[derive(Clone, Default)]
pub struct AnswerBook {
    secrets: HashMap<Commitment, String>,
}

impl AnswerBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the full secret text that commits to `question`.
    ///
    /// For dependent questions this is the composite text, not the typed
    /// answer alone.
    pub fn record(&mut self, question: Commitment, secret_text: impl Into<String>) {
        self.secrets.insert(question, secret_text.into());
    }

    /// The recorded secret text for a question.
    pub fn secret_text(&self, question: &Commitment) -> Option<&str> {
        self.secrets.get(question).map(String::as_str)
    }

    /// Whether a secret text is recorded for the question.
    pub fn contains(&self, question: &Commitment) -> bool {
        self.secrets.contains_key(question)
    }

    /// Number of recorded answers.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether no answers are recorded.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl fmt::Debug for AnswerBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerBook")
            .field("entries", &self.secrets.len())
            .finish()
    }
}

/// Derive the secret text to encode for `question` given the typed answer.
///
/// Root questions use the answer as-is. Dependent questions prepend the
/// parent's recorded secret text. The question's path is walked first so a
/// cyclic edge set is reported instead of resolved.
pub fn resolve_secret_text(
    graph: &QuestionGraph,
    book: &AnswerBook,
    question: &Commitment,
    answer: &str,
) -> Result<String, ChainError> {
    graph.path_to_root(question)?;

    match graph.dependency_of(question)? {
        None => Ok(answer.to_string()),
        Some(parent) => compose(book.secret_text(parent), answer).map_err(|_| {
            ChainError::MissingDependencyAnswer {
                dependency: Some(parent.clone()),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: u64) -> Commitment {
        Commitment::from(n)
    }

    // ── compose ─────────────────────────────────────────────────────

    #[test]
    fn compose_puts_parent_first() {
        assert_eq!(compose(Some("paris"), "seine").unwrap(), "parisseine");
    }

    #[test]
    fn compose_order_matters() {
        assert_ne!(
            compose(Some("a"), "b").unwrap(),
            compose(Some("b"), "a").unwrap()
        );
    }

    #[test]
    fn compose_without_parent_fails() {
        assert_eq!(
            compose(None, "seine"),
            Err(ChainError::MissingDependencyAnswer { dependency: None })
        );
    }

    #[test]
    fn compose_with_empty_parent_is_allowed() {
        // An empty recorded answer is still a recorded answer.
        assert_eq!(compose(Some(""), "x").unwrap(), "x");
    }

    // ── QuestionGraph ───────────────────────────────────────────────

    #[test]
    fn link_builds_path_root_first() {
        let mut g = QuestionGraph::new();
        g.insert(q(1));
        g.link(q(2), q(1)).unwrap();
        g.link(q(3), q(2)).unwrap();
        assert_eq!(g.path_to_root(&q(3)).unwrap(), vec![q(1), q(2), q(3)]);
        assert_eq!(g.path_to_root(&q(1)).unwrap(), vec![q(1)]);
    }

    #[test]
    fn link_rejects_self_dependency() {
        let mut g = QuestionGraph::new();
        assert_eq!(g.link(q(1), q(1)), Err(ChainError::SelfDependency(q(1))));
    }

    #[test]
    fn link_rejects_dependency_on_descendant() {
        let mut g = QuestionGraph::new();
        g.link(q(2), q(1)).unwrap();
        g.link(q(3), q(2)).unwrap();
        assert_eq!(g.link(q(1), q(3)), Err(ChainError::DependencyCycle(q(1))));
        // The failed link leaves the graph unchanged.
        assert_eq!(g.dependency_of(&q(1)).unwrap(), None);
    }

    #[test]
    fn link_rejects_second_parent() {
        let mut g = QuestionGraph::new();
        g.link(q(3), q(1)).unwrap();
        assert_eq!(
            g.link(q(3), q(2)),
            Err(ChainError::DependencyAlreadySet {
                question: q(3),
                existing: q(1)
            })
        );
        // Re-linking the same parent is idempotent.
        assert!(g.link(q(3), q(1)).is_ok());
    }

    #[test]
    fn from_edges_detects_cycles_on_walk() {
        let g = QuestionGraph::from_edges([(q(1), Some(q(2))), (q(2), Some(q(1)))]);
        assert!(matches!(
            g.path_to_root(&q(1)),
            Err(ChainError::DependencyCycle(_))
        ));
    }

    #[test]
    fn from_edges_registers_parents() {
        let g = QuestionGraph::from_edges([(q(2), Some(q(1)))]);
        assert!(g.contains(&q(1)));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn unknown_question_is_reported() {
        let g = QuestionGraph::new();
        assert_eq!(
            g.dependency_of(&q(9)),
            Err(ChainError::UnknownQuestion(q(9)))
        );
    }

    // ── resolve_secret_text ─────────────────────────────────────────

    #[test]
    fn resolve_root_question_uses_answer() {
        let mut g = QuestionGraph::new();
        g.insert(q(1));
        let book = AnswerBook::new();
        assert_eq!(resolve_secret_text(&g, &book, &q(1), "paris").unwrap(), "paris");
    }

    #[test]
    fn resolve_dependent_question_prefixes_parent_secret() {
        let mut g = QuestionGraph::new();
        g.link(q(2), q(1)).unwrap();
        g.link(q(3), q(2)).unwrap();

        let mut book = AnswerBook::new();
        book.record(q(1), "paris");
        let second = resolve_secret_text(&g, &book, &q(2), "seine").unwrap();
        assert_eq!(second, "parisseine");
        book.record(q(2), second);

        assert_eq!(
            resolve_secret_text(&g, &book, &q(3), "bridge").unwrap(),
            "parisseinebridge"
        );
    }

    #[test]
    fn resolve_without_parent_answer_names_the_parent() {
        let mut g = QuestionGraph::new();
        g.link(q(2), q(1)).unwrap();
        let book = AnswerBook::new();
        assert_eq!(
            resolve_secret_text(&g, &book, &q(2), "seine"),
            Err(ChainError::MissingDependencyAnswer {
                dependency: Some(q(1))
            })
        );
    }

    #[test]
    fn resolve_refuses_cyclic_graph() {
        let g = QuestionGraph::from_edges([(q(1), Some(q(2))), (q(2), Some(q(1)))]);
        let mut book = AnswerBook::new();
        book.record(q(2), "x");
        assert!(matches!(
            resolve_secret_text(&g, &book, &q(1), "y"),
            Err(ChainError::DependencyCycle(_))
        ));
    }

    #[test]
    fn answer_book_debug_hides_answers() {
        let mut book = AnswerBook::new();
        book.record(q(1), "top-secret");
        let rendered = format!("{book:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("entries: 1"));
    }
}
